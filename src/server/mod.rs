//! Blog web server

mod form;
mod pages;

use anyhow::Result;
use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use form::PostForm;

use crate::api::BlogApi;
use crate::config::BlogConfig;
use crate::content::MarkdownRenderer;
use crate::i18n::I18n;
use crate::templates::TemplateRenderer;
use crate::Blog;

/// State shared by all handlers; never mutated after startup
pub struct AppState {
    pub config: BlogConfig,
    pub api: BlogApi,
    pub markdown: MarkdownRenderer,
    pub templates: TemplateRenderer,
    pub i18n: I18n,
}

impl AppState {
    pub fn new(blog: &Blog) -> Result<Self> {
        Ok(Self {
            config: blog.config.clone(),
            api: blog.api.clone(),
            markdown: blog.markdown.clone(),
            templates: TemplateRenderer::new()?,
            i18n: blog.i18n.clone(),
        })
    }
}

/// Build the page router, mounted under the configured root
pub fn router(state: Arc<AppState>) -> Router {
    let routes = Router::new()
        .route("/", get(pages::index))
        .route("/write", get(pages::new_post).post(pages::create_post))
        .route("/blog/:id", get(pages::show_post))
        .route(
            "/blog/:id/edit",
            get(pages::edit_post).post(pages::update_post),
        )
        .route(
            "/blog/:id/delete",
            get(pages::confirm_delete).post(pages::delete_post),
        );

    let prefix = state.config.root.trim_matches('/');
    let app = if prefix.is_empty() {
        routes
    } else {
        Router::new().nest(&format!("/{}", prefix), routes)
    };

    app.fallback(pages::not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the blog server
pub async fn start(blog: &Blog, ip: &str, port: u16, open: bool) -> Result<()> {
    let state = Arc::new(AppState::new(blog)?);
    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}", ip, port);
    tracing::info!("Using posts API at {}", blog.config.api.base_url);
    println!("Server running at {}", url);
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}
