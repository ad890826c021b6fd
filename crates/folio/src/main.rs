//! folio CLI - MDX blog builder and server.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

use config::Config;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "MDX blog builder and server")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to folio.toml config file
    #[arg(short, long, default_value = "folio.toml")]
    config: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a config file and a first post
    Init {
        /// Overwrite existing files
        #[arg(short, long)]
        yes: bool,
    },

    /// Create a new post dated today
    New {
        /// Post title, also used to derive the slug
        title: String,

        /// Post category
        #[arg(short, long)]
        category: Option<String>,

        /// One-line summary
        #[arg(short, long)]
        excerpt: Option<String>,
    },

    /// List posts, newest first
    List {
        /// Only posts in this category
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Build static site
    Build {
        /// Output directory (defaults to config or "dist")
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip minification
        #[arg(long)]
        no_minify: bool,
    },

    /// Serve posts and the JSON API from the content directory
    Serve {
        /// Port to listen on (defaults to config or 3000)
        #[arg(short, long)]
        port: Option<u16>,

        /// Do not open browser
        #[arg(long)]
        no_open: bool,
    },

    /// Preview a built site
    Preview {
        /// Port to listen on
        #[arg(short, long, default_value = "4000")]
        port: u16,

        /// Directory to serve (defaults to the build output)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    let load_config = || Config::load(&cli.config);

    // Execute command
    match cli.command {
        Commands::Init { yes } => {
            commands::init::run(&cli.config, yes).await?;
        }
        Commands::New {
            title,
            category,
            excerpt,
        } => {
            commands::new::run(&load_config()?, &title, category, excerpt).await?;
        }
        Commands::List { category } => {
            commands::list::run(&load_config()?, category.as_deref()).await?;
        }
        Commands::Build { output, no_minify } => {
            let minify = if no_minify { Some(false) } else { None };
            commands::build::run(&load_config()?, output, minify).await?;
        }
        Commands::Serve { port, no_open } => {
            commands::serve::run(&load_config()?, port, !no_open).await?;
        }
        Commands::Preview { port, dir } => {
            let dir = match dir {
                Some(dir) => dir,
                None => load_config()?.build.output,
            };
            commands::preview::run(port, dir).await?;
        }
    }

    Ok(())
}
