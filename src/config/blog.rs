//! Blog configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::content::markdown::DEFAULT_THEME;

/// Base URL of the posts API the blog was built against
pub const DEFAULT_API_BASE_URL: &str =
    "https://qtnbpuw8jc.execute-api.ap-southeast-2.amazonaws.com/Prod";

/// Main blog configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogConfig {
    // Site
    pub title: String,
    pub subtitle: String,
    pub language: String,
    pub timezone: String,

    // URL
    pub root: String,

    // Date / Time format
    pub date_format: String,
    pub datetime_format: String,

    // Post cards
    pub excerpt_length: usize,

    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub highlight: HighlightConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            title: "我的博客".to_string(),
            subtitle: "分享技术心得与生活感悟".to_string(),
            language: "zh-CN".to_string(),
            timezone: String::new(),

            root: "/".to_string(),

            date_format: "YYYY年MM月DD日".to_string(),
            datetime_format: "YYYY年MM月DD日 HH:mm".to_string(),

            excerpt_length: 150,

            api: ApiConfig::default(),
            highlight: HighlightConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl BlogConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        let config: BlogConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        Ok(config)
    }

    /// Load `_config.yml` from a directory, or defaults when it is absent
    pub fn load_from_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let path = dir.as_ref().join("_config.yml");
        if path.exists() {
            tracing::debug!("Loading config from {:?}", path);
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }
}

/// Posts API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Code highlighting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    pub theme: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            theme: DEFAULT_THEME.to_string(),
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub ip: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ip: "localhost".to_string(),
            port: 3000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BlogConfig::default();
        assert_eq!(config.language, "zh-CN");
        assert_eq!(config.api.timeout(), Duration::from_secs(10));
        assert_eq!(config.api.base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_parse_partial_config() {
        let yaml = r#"
title: My Blog
language: en
api:
  base_url: http://localhost:8080
highlight:
  theme: InspiredGitHub
"#;
        let config: BlogConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.language, "en");
        assert_eq!(config.api.base_url, "http://localhost:8080");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.highlight.theme, "InspiredGitHub");
        assert_eq!(config.date_format, "YYYY年MM月DD日");
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = BlogConfig::load_from_dir(dir.path()).unwrap();
        assert_eq!(config.title, "我的博客");

        std::fs::write(dir.path().join("_config.yml"), "excerpt_length: 80\n").unwrap();
        let config = BlogConfig::load_from_dir(dir.path()).unwrap();
        assert_eq!(config.excerpt_length, 80);

        std::fs::write(dir.path().join("_config.yml"), "server: [not, a, map]\n").unwrap();
        assert!(BlogConfig::load_from_dir(dir.path()).is_err());
    }
}
