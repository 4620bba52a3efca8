//! Post form submitted by the write and edit pages

use serde::{Deserialize, Deserializer, Serialize};

use crate::content::{NewPost, Post, PostUpdate};
use crate::helpers::html::split_list;

/// Raw form fields, kept as entered so a failed save can re-render them
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostForm {
    pub title: String,
    pub content: String,
    pub summary: String,
    /// Comma separated tag names
    pub tags: String,
    #[serde(deserialize_with = "checkbox")]
    pub published: bool,
}

impl PostForm {
    /// Form pre-filled from an existing post
    pub fn from_post(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            content: post.content.clone(),
            summary: post.summary.clone().unwrap_or_default(),
            tags: post
                .tags
                .iter()
                .map(|tag| tag.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            published: post.published,
        }
    }

    /// Title and content are required
    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty() && !self.content.trim().is_empty()
    }

    pub fn to_new_post(&self) -> NewPost {
        let summary = self.summary.trim();
        NewPost {
            title: self.title.trim().to_string(),
            content: self.content.clone(),
            summary: (!summary.is_empty()).then(|| summary.to_string()),
            tags: Some(split_list(&self.tags)),
            published: Some(self.published),
        }
    }

    pub fn to_update(&self) -> PostUpdate {
        PostUpdate::from(self.to_new_post())
    }
}

/// An HTML checkbox is present when checked and missing otherwise
fn checkbox<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(matches!(value.as_deref(), Some(v) if v != "off" && v != "false"))
}
