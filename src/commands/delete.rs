//! Delete a post

use anyhow::{Context, Result};

use crate::Blog;

/// Delete a post, failing when the API refuses
pub fn run(blog: &Blog, id: &str) -> Result<()> {
    blog.api
        .try_delete_post(id)
        .with_context(|| format!("Failed to delete post {}", id))?;
    println!("Deleted post {}", id);
    Ok(())
}
