//! Page templates using the Tera template engine
//!
//! All pages are embedded directly in the binary. Autoescaping stays on for
//! every template; rendered post bodies are marked `| safe` where they are
//! inserted.

use anyhow::Result;
use serde::Serialize;
use tera::{Context, Tera};

use crate::config::BlogConfig;
use crate::content::{MarkdownRenderer, Post};
use crate::helpers::{format_in_timezone, post_url, url_for};
use crate::i18n::I18n;

/// Template renderer with the embedded pages
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all pages loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![".html"]);

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("pages/layout.html")),
            ("index.html", include_str!("pages/index.html")),
            ("post.html", include_str!("pages/post.html")),
            ("delete.html", include_str!("pages/delete.html")),
            ("write.html", include_str!("pages/write.html")),
            ("not_found.html", include_str!("pages/not_found.html")),
        ])?;

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        Ok(self.tera.render(template_name, context)?)
    }

    /// Context every page starts from: site data and UI strings
    pub fn page_context(config: &BlogConfig, i18n: &I18n) -> Context {
        let mut context = Context::new();
        context.insert("site", &SiteView::new(config));
        context.insert("t", &i18n.get_all_translations());
        context
    }
}

/// Site-wide data used by the layout
#[derive(Debug, Clone, Serialize)]
pub struct SiteView {
    pub title: String,
    pub subtitle: String,
    pub language: String,
    pub root: String,
}

impl SiteView {
    pub fn new(config: &BlogConfig) -> Self {
        Self {
            title: config.title.clone(),
            subtitle: config.subtitle.clone(),
            language: config.language.clone(),
            root: url_for(config, "/"),
        }
    }
}

/// A post as shown on an index card
#[derive(Debug, Clone, Serialize)]
pub struct PostCard {
    pub id: String,
    pub url: String,
    pub title: String,
    pub excerpt: String,
    pub date: String,
    pub tags: Vec<String>,
}

impl PostCard {
    pub fn new(post: &Post, config: &BlogConfig) -> Self {
        Self {
            id: post.id.to_string(),
            url: post_url(config, post.id.as_str()),
            title: post.title.clone(),
            excerpt: post.excerpt(config.excerpt_length),
            date: format_in_timezone(&post.created_at, &config.timezone, &config.date_format),
            tags: post.tags.iter().map(|tag| tag.name.clone()).collect(),
        }
    }
}

/// A post as shown on its own page
#[derive(Debug, Clone, Serialize)]
pub struct PostView {
    pub id: String,
    pub url: String,
    pub title: String,
    pub date: String,
    pub updated: String,
    pub author: Option<String>,
    pub tags: Vec<String>,
    pub summary: Option<String>,
    pub published: bool,
    /// Rendered HTML of the content
    pub content: String,
}

impl PostView {
    pub fn new(post: &Post, config: &BlogConfig, renderer: &MarkdownRenderer) -> Self {
        let (_, body) = MarkdownRenderer::split_excerpt(&post.content);
        Self {
            id: post.id.to_string(),
            url: post_url(config, post.id.as_str()),
            title: post.title.clone(),
            date: format_in_timezone(&post.created_at, &config.timezone, &config.date_format),
            updated: format_in_timezone(
                &post.updated_at,
                &config.timezone,
                &config.datetime_format,
            ),
            author: post.author.as_ref().map(|a| a.display_name().to_string()),
            tags: post.tags.iter().map(|tag| tag.name.clone()).collect(),
            summary: post
                .summary
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            published: post.published,
            content: renderer.render_html(&body),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Author, PostId, Tag};
    use chrono::{TimeZone, Utc};

    fn sample_post() -> Post {
        Post {
            id: PostId::new("7"),
            title: "<b>Hello</b>".to_string(),
            content: "Intro\n<!-- more -->\n```python\nprint(1)\n```\n".to_string(),
            summary: Some("  ".to_string()),
            published: true,
            created_at: Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2024, 1, 16, 12, 0, 0).unwrap(),
            author: Some(Author {
                id: PostId::new("1"),
                name: None,
                email: "me@example.com".to_string(),
            }),
            tags: vec![Tag {
                id: PostId::new("1"),
                name: "rust".to_string(),
            }],
        }
    }

    fn utc_config() -> BlogConfig {
        BlogConfig {
            timezone: "UTC".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_post_view() {
        let view = PostView::new(&sample_post(), &utc_config(), &MarkdownRenderer::new());
        assert_eq!(view.url, "/blog/7");
        assert_eq!(view.date, "2024年01月15日");
        assert_eq!(view.updated, "2024年01月16日 12:00");
        assert_eq!(view.author.as_deref(), Some("me@example.com"));
        assert!(view.summary.is_none());
        assert!(view.content.contains(r#"data-language="python""#));
        assert!(!view.content.contains("more"));
    }

    #[test]
    fn test_post_view_keeps_marker_inside_code() {
        let mut post = sample_post();
        post.content = "```\n<p>a</p>\n<!-- more -->\n    <p>b</p>\n```\n".to_string();
        let view = PostView::new(&post, &utc_config(), &MarkdownRenderer::new());
        assert!(view.content.contains("&lt;!-- more --&gt;"), "{}", view.content);
        assert!(view.content.contains("\n    &lt;p&gt;b&lt;/p&gt;\n"), "{}", view.content);
    }

    #[test]
    fn test_post_card() {
        let card = PostCard::new(&sample_post(), &utc_config());
        assert_eq!(card.excerpt, "Intro");
        assert_eq!(card.tags, vec!["rust"]);
    }

    #[test]
    fn test_post_page_escapes_title_but_not_content() {
        let config = utc_config();
        let renderer = TemplateRenderer::new().unwrap();
        let mut context = TemplateRenderer::page_context(&config, &I18n::new("en"));
        context.insert(
            "post",
            &PostView::new(&sample_post(), &config, &MarkdownRenderer::new()),
        );

        let html = renderer.render("post.html", &context).unwrap();
        assert!(html.contains("&lt;b&gt;Hello&lt;&#x2F;b&gt;"));
        assert!(!html.contains("<b>Hello</b>"));
        assert!(html.contains(r#"<div class="highlight language-python""#));
        assert!(html.contains("Last updated"));
    }

    #[test]
    fn test_index_states() {
        let config = BlogConfig::default();
        let renderer = TemplateRenderer::new().unwrap();
        let i18n = I18n::new("zh-CN");

        let mut context = TemplateRenderer::page_context(&config, &i18n);
        context.insert("posts", &Vec::<PostCard>::new());
        let html = renderer.render("index.html", &context).unwrap();
        assert!(html.contains(&i18n.get("empty_title")));
        assert!(html.contains(r#"href="/write""#));

        context.insert("error", &i18n.get("list_error"));
        let html = renderer.render("index.html", &context).unwrap();
        assert!(html.contains(&i18n.get("list_error")));
        assert!(html.contains(&i18n.get("retry")));
    }

    #[test]
    fn test_not_found_page() {
        let renderer = TemplateRenderer::new().unwrap();
        let context = TemplateRenderer::page_context(&BlogConfig::default(), &I18n::new("en"));
        let html = renderer.render("not_found.html", &context).unwrap();
        assert!(html.contains("404"));
        assert!(html.contains(r#"<html lang="zh-CN">"#));
    }
}
