//! List posts

use anyhow::{Context, Result};

use crate::config::BlogConfig;
use crate::content::Post;
use crate::helpers::format_in_timezone;
use crate::Blog;

/// List published posts, or every post with `all`
pub fn run(blog: &Blog, all: bool) -> Result<()> {
    let posts = blog
        .api
        .fetch_posts()
        .context("Failed to fetch posts")?;

    let lines = listing(&posts, &blog.config, all);
    println!("Posts ({}):", lines.len());
    for line in lines {
        println!("  {}", line);
    }

    Ok(())
}

/// One line per post: date, title, id, and a marker for drafts
fn listing(posts: &[Post], config: &BlogConfig, all: bool) -> Vec<String> {
    posts
        .iter()
        .filter(|post| all || post.is_public())
        .map(|post| {
            let date = format_in_timezone(&post.created_at, &config.timezone, "YYYY-MM-DD");
            let draft = if post.published { "" } else { " (draft)" };
            format!("{} - {} [{}]{}", date, post.title, post.id, draft)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{post_json, posts_json};

    fn posts() -> Vec<Post> {
        serde_json::from_str(&posts_json(&[
            post_json(1, "Public", true),
            post_json(2, "Hidden", false),
        ]))
        .unwrap()
    }

    #[test]
    fn test_listing_published_only() {
        let config = BlogConfig {
            timezone: "UTC".to_string(),
            ..Default::default()
        };
        assert_eq!(
            listing(&posts(), &config, false),
            vec!["2024-01-15 - Public [1]"]
        );
    }

    #[test]
    fn test_listing_all_marks_drafts() {
        let config = BlogConfig {
            timezone: "UTC".to_string(),
            ..Default::default()
        };
        let lines = listing(&posts(), &config, true);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "2024-01-15 - Hidden [2] (draft)");
    }
}
