//! Post models as exchanged with the posts API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::fmt;

use super::markdown::plain_text;
use super::MarkdownRenderer;
use crate::helpers::html::truncate;

/// Identifier of a post, tag or author.
///
/// The API emits numeric ids, but anything textual is accepted so the
/// front-end never has to care about the backend's key type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PostId(String);

impl PostId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for PostId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(n) => PostId(n.to_string()),
            RawId::Text(s) => PostId(s),
        })
    }
}

/// A blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,

    pub title: String,

    /// Raw markdown content
    pub content: String,

    #[serde(default)]
    pub summary: Option<String>,

    pub published: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,

    #[serde(default)]
    pub author: Option<Author>,

    /// Post tags, unique by id
    #[serde(default, deserialize_with = "unique_tags")]
    pub tags: Vec<Tag>,
}

impl Post {
    /// Whether the post may appear in public listings
    pub fn is_public(&self) -> bool {
        self.published
    }

    /// Short text for post cards.
    ///
    /// The summary wins, then the part before `<!-- more -->`, then the
    /// first `length` characters of the content. Markdown syntax and raw
    /// HTML are stripped in both fallbacks.
    pub fn excerpt(&self, length: usize) -> String {
        if let Some(summary) = self.summary.as_deref().filter(|s| !s.trim().is_empty()) {
            return summary.trim().to_string();
        }

        let (excerpt, _) = MarkdownRenderer::split_excerpt(&self.content);
        let source = excerpt.unwrap_or_else(|| self.content.clone());
        truncate(&plain_text(&source), length, None)
    }
}

/// Author of a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: PostId,
    #[serde(default)]
    pub name: Option<String>,
    pub email: String,
}

impl Author {
    /// Name shown next to a post, falling back to the email
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.email,
        }
    }
}

/// A tag attached to a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: PostId,
    pub name: String,
}

/// Fields of a post to create
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
}

/// Partial update of a post; only present fields are sent
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PostUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published: Option<bool>,
}

impl From<NewPost> for PostUpdate {
    fn from(post: NewPost) -> Self {
        Self {
            title: Some(post.title),
            content: Some(post.content),
            summary: post.summary,
            tags: post.tags,
            published: post.published,
        }
    }
}

/// Deserialize tags, keeping the first occurrence of each id
fn unique_tags<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Tag>, D::Error> {
    let tags = Option::<Vec<Tag>>::deserialize(deserializer)?.unwrap_or_default();
    let mut seen = HashSet::new();
    Ok(tags
        .into_iter()
        .filter(|tag| seen.insert(tag.id.clone()))
        .collect())
}
