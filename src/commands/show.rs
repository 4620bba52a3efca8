//! Print a single post

use anyhow::{bail, Result};

use crate::content::{MarkdownRenderer, Post};
use crate::Blog;

/// Print a post rendered to HTML, or its raw Markdown with `raw`
pub fn run(blog: &Blog, id: &str, raw: bool) -> Result<()> {
    let post = match blog.api.get_post(id) {
        Some(post) => post,
        None => bail!("Post {} not found", id),
    };

    println!("{}", output(&post, &blog.markdown, raw));
    Ok(())
}

fn output(post: &Post, renderer: &MarkdownRenderer, raw: bool) -> String {
    if raw {
        return post.content.clone();
    }
    let (_, body) = MarkdownRenderer::split_excerpt(&post.content);
    renderer.render_html(&body)
}
