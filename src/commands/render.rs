//! Render a local Markdown file

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::content::MarkdownRenderer;
use crate::Blog;

/// Render a Markdown file to HTML on stdout
pub fn run(blog: &Blog, path: &Path) -> Result<()> {
    println!("{}", render_file(&blog.markdown, path)?);
    Ok(())
}

/// Invalid UTF-8 is rendered lossily rather than rejected
pub fn render_file(renderer: &MarkdownRenderer, path: &Path) -> Result<String> {
    let bytes = fs::read(path).with_context(|| format!("Failed to read {:?}", path))?;
    Ok(renderer.render_bytes(&bytes).to_html())
}
