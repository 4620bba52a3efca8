//! Content module - posts and markdown rendering

pub mod markdown;
mod post;

pub use markdown::MarkdownRenderer;
pub use post::{Author, NewPost, Post, PostId, PostUpdate, Tag};
