use std::net::SocketAddr;
use std::path::Path;

use anyhow::Context;
use codechat_core::Config;
use codechat_gateway::{AppState, GatewayServer};
use codechat_llm::any::AnyProvider;
use codechat_llm::compatible::CompatibleProvider;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

const CONFIG_PATH: &str = "config/default.toml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::load(Path::new(CONFIG_PATH)).context("loading configuration")?;
    config.validate().context("validating configuration")?;

    let provider = AnyProvider::Compatible(CompatibleProvider::new(
        config.llm.api_key.clone(),
        config.llm.base_url.clone(),
        config.llm.model.clone(),
        config.llm.max_tokens,
        Some(config.llm.embedding_model.clone()),
    ));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("parsing listen address")?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("ctrl-c received");
            let _ = shutdown_tx.send(true);
        }
    });

    let state = AppState::new(provider, config);
    GatewayServer::new(addr, state, shutdown_rx)
        .run()
        .await
        .context("serving HTTP")?;
    Ok(())
}
