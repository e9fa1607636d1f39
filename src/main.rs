//! syncer-console - Self-hosted web console for the Syncer task service
//!
//! A thin presentation layer: renders the task list and forms, and delegates
//! every stateful operation to the remote task service over HTTP.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod api;
mod client;
mod config;
mod forms;
mod models;
mod views;

use config::Config;

#[derive(Parser)]
#[command(name = "syncer-console")]
#[command(about = "Self-hosted web console for the Syncer task service")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the console server
    Serve {
        /// Config file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Bind address (overrides config)
        #[arg(short, long)]
        bind: Option<String>,

        /// Task service base URL (overrides config)
        #[arg(short, long)]
        service_url: Option<String>,
    },

    /// Initialize a new config file
    Init {
        /// Output path for config file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("syncer_console=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            config,
            port,
            bind,
            service_url,
        } => {
            let mut cfg = if let Some(path) = config {
                Config::load_from(&path)?
            } else {
                Config::load()?
            };

            // Override with CLI args
            if let Some(p) = port {
                cfg.server.port = p;
            }
            if let Some(b) = bind {
                cfg.server.bind = b;
            }
            if let Some(url) = service_url {
                cfg.service.url = url;
            }

            run_server(cfg).await
        }

        Commands::Init { output } => {
            let path = output.unwrap_or_else(|| PathBuf::from("config.toml"));
            let cfg = Config::default();
            cfg.save_to(&path)?;

            println!("Created config file: {}", path.display());
            println!();
            println!("Next steps:");
            println!("  1. Point [service] url at the remote task service");
            println!(
                "  2. Start the console: syncer-console serve --config {}",
                path.display()
            );

            Ok(())
        }
    }
}

async fn run_server(config: Config) -> Result<()> {
    let client = client::TaskClient::new(&config.service)
        .context("Failed to build the task service client")?;

    let state = api::AppState::new(client);
    let app = api::create_router(state);

    let addr = format!("{}:{}", config.server.bind, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(
        service_url = %config.service.url,
        "🚀 syncer-console listening on http://{}",
        addr
    );

    axum::serve(listener, app).await?;

    Ok(())
}
