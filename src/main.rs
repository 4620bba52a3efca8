//! CLI entry point for quillpost

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "quillpost")]
#[command(version)]
#[command(about = "A server-rendered blog front-end for a remote posts API", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    /// Override the posts API base URL
    #[arg(long, global = true)]
    api: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the blog server
    #[command(alias = "s")]
    Server {
        /// Port to listen on (defaults to server.port)
        #[arg(short, long)]
        port: Option<u16>,

        /// IP address to bind to (defaults to server.ip)
        #[arg(short, long)]
        ip: Option<String>,

        /// Open browser automatically
        #[arg(short, long)]
        open: bool,
    },

    /// List posts
    List {
        /// Include unpublished posts
        #[arg(short, long)]
        all: bool,
    },

    /// Print a post as HTML
    Show {
        /// Post id
        id: String,

        /// Print the raw Markdown instead
        #[arg(long)]
        raw: bool,
    },

    /// Delete a post
    Delete {
        /// Post id
        id: String,
    },

    /// Render a local Markdown file to HTML
    Render {
        /// Markdown file
        file: PathBuf,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "quillpost=debug,info"
    } else {
        "quillpost=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    let load = || quillpost::Blog::new(&base_dir, cli.api.as_deref());

    match cli.command {
        Commands::Server { port, ip, open } => {
            let blog = load()?;
            let ip = ip.unwrap_or_else(|| blog.config.server.ip.clone());
            let port = port.unwrap_or(blog.config.server.port);
            tracing::info!("Starting server at http://{}:{}", ip, port);
            quillpost::server::start(&blog, &ip, port, open).await?;
        }

        // The API client blocks, keep it off the runtime threads
        Commands::List { all } => {
            let blog = load()?;
            tokio::task::spawn_blocking(move || blog.list(all)).await??;
        }

        Commands::Show { id, raw } => {
            let blog = load()?;
            tokio::task::spawn_blocking(move || blog.show(&id, raw)).await??;
        }

        Commands::Delete { id } => {
            let blog = load()?;
            tokio::task::spawn_blocking(move || blog.delete(&id)).await??;
        }

        Commands::Render { file } => {
            let blog = load()?;
            quillpost::commands::render::run(&blog, &file)?;
        }

        Commands::Version => {
            println!("quillpost version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
