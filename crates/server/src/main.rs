use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

mod api;
mod config;

use config::{BackendOverrides, ServerConfig};

#[derive(Parser, Debug)]
#[command(name = "atlasgate")]
#[command(about = "Tool-invocation server for Jira and Confluence", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "atlasgate.toml")]
    config: PathBuf,

    /// Port to listen on
    #[arg(short, long, env = "MCP_PORT", default_value = "8000")]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Atlassian site URL
    #[arg(long, env = "ATLASSIAN_URL")]
    atlassian_url: Option<String>,

    /// Atlassian account email
    #[arg(long, env = "ATLASSIAN_EMAIL")]
    atlassian_email: Option<String>,

    /// Atlassian API token
    #[arg(long, env = "ATLASSIAN_API_TOKEN", hide_env_values = true)]
    atlassian_api_token: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "atlasgate=info,tower_http=debug".into());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(args.log_json);

    tracing::info!("Starting atlasgate");

    // Load configuration
    let mut config = ServerConfig::load(&args.config)?;
    config.apply_overrides(BackendOverrides {
        base_url: args.atlassian_url,
        email: args.atlassian_email,
        api_token: args.atlassian_api_token,
    });

    // Start API server
    let addr = format!("{}:{}", args.host, args.port);
    api::serve(&addr, config).await?;

    Ok(())
}
