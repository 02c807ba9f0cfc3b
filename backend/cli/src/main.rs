mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use smilecheck_gateway::{start_server, GatewayState};
use smilecheck_media::FilterEnhancer;
use smilecheck_pipeline::{EvaluationPipeline, StaticLayout};
use smilecheck_store::JsonFileStore;
use smilecheck_understanding::SeededVisionAnalyzer;

use config::Config;

#[derive(Parser)]
#[command(name = "smilecheck")]
#[command(about = "SmileCheck: assisted smile evaluation demo")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the SmileCheck web server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
        /// Address to bind the HTTP server to
        #[arg(short, long)]
        bind: Option<String>,
    },
    /// Query a running server's health endpoint
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();
    smilecheck_logging::init_logger(config.log_dir.as_deref(), &config.log_level);

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, bind } => {
            let config = Config {
                port: port.unwrap_or(config.port),
                bind_address: bind.unwrap_or(config.bind_address),
                ..config
            };
            run_server(config).await?;
        }
        Commands::Status => {
            println!("SmileCheck status: checking...");
            let client = reqwest::Client::new();
            match client
                .get(format!("http://localhost:{}/api/health", config.port))
                .send()
                .await
            {
                Ok(resp) => {
                    let body: serde_json::Value = resp.json().await?;
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                Err(_) => {
                    println!("SmileCheck is not running on port {}", config.port);
                }
            }
        }
    }

    Ok(())
}

async fn run_server(config: Config) -> Result<()> {
    info!(
        port = config.port,
        bind = %config.bind_address,
        data_dir = %config.data_dir.display(),
        static_dir = %config.static_dir.display(),
        "Starting SmileCheck"
    );
    if config.secret_generated {
        warn!("SMILECHECK_SECRET_KEY is not set; flash cookies will not survive a restart");
    }

    let layout = StaticLayout::new(&config.static_dir);
    for dir in [layout.uploads_dir(), layout.enhanced_dir(), config.data_dir.clone()] {
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }

    let pipeline = EvaluationPipeline::new(
        Arc::new(JsonFileStore::new(&config.data_dir)),
        Arc::new(SeededVisionAnalyzer::new()),
        Arc::new(FilterEnhancer::new()),
        layout,
    );
    let state = GatewayState::new(pipeline, &config.secret_key)?;

    let addr: SocketAddr = format!("{}:{}", config.bind_address, config.port)
        .parse()
        .with_context(|| format!("Invalid bind address: {}:{}", config.bind_address, config.port))?;

    start_server(addr, state, config.max_upload_bytes).await
}
