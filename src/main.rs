use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long)]
    config_path: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gatehouse=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = match args.config_path {
        Some(path) => read_config(&path)?,
        None => gatehouse::Config::default(),
    };

    let router = gatehouse::app(&config)?;

    let listener: SocketAddr = config
        .listen
        .parse()
        .with_context(|| format!("Invalid listen address: {}", config.listen))?;

    tracing::info!(
        "gateway listening on {} forwarding to {}",
        listener,
        config.backend_base_url
    );
    axum::Server::bind(&listener)
        .serve(router.into_make_service())
        .await?;

    Ok(())
}

fn read_config(config_path: &str) -> Result<gatehouse::Config> {
    let content = std::fs::read_to_string(config_path)
        .with_context(|| format!("Error reading config file {}", config_path))?;
    Ok(toml::from_str(&content)?)
}
