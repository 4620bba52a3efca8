//! quillpost: a server-rendered blog front-end for a remote posts API
//!
//! Posts are fetched from a REST API, their Markdown is rendered through a
//! rule table with syntax highlighting, and pages are served with Tera
//! templates embedded in the binary.

pub mod api;
pub mod commands;
pub mod config;
pub mod content;
pub mod helpers;
pub mod i18n;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// The main blog application
#[derive(Clone)]
pub struct Blog {
    /// Blog configuration
    pub config: config::BlogConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Posts API client
    pub api: api::BlogApi,
    /// Markdown renderer with the configured highlight theme
    pub markdown: content::MarkdownRenderer,
    /// UI strings
    pub i18n: i18n::I18n,
}

impl Blog {
    /// Create a blog from a directory, optionally overriding the API base URL
    pub fn new<P: AsRef<Path>>(base_dir: P, api_url: Option<&str>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let mut config = config::BlogConfig::load_from_dir(&base_dir)?;
        if let Some(url) = api_url {
            config.api.base_url = url.to_string();
        }

        let mut i18n = i18n::I18n::new(&config.language);
        i18n.load_languages(base_dir.join("languages"))?;

        Ok(Self {
            api: api::BlogApi::new(&config.api),
            markdown: content::MarkdownRenderer::standard(&config.highlight.theme),
            i18n,
            config,
            base_dir,
        })
    }

    /// List posts
    pub fn list(&self, all: bool) -> Result<()> {
        commands::list::run(self, all)
    }

    /// Print one post
    pub fn show(&self, id: &str, raw: bool) -> Result<()> {
        commands::show::run(self, id, raw)
    }

    /// Delete one post
    pub fn delete(&self, id: &str) -> Result<()> {
        commands::delete::run(self, id)
    }
}
