use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::{event, Level};
use tracing_subscriber::EnvFilter;

use autocart_oauth::http::server::Server;
use autocart_oauth::provider::OAuth2Broker;
use autocart_oauth::util::cli::Options;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let opts = Options::parse();
    let addr = opts.socket_addr();

    let broker = OAuth2Broker::connect(
        opts.client_id.clone(),
        opts.client_secret.clone(),
        &opts.provider(),
        opts.frontends(),
    )
    .context("Failed to set up the provider client")?;

    event!(Level::INFO, %addr, "Server running on port {}", addr.port());
    if let Some(url) = &opts.external_url {
        event!(Level::INFO, %url, "Externally reachable");
    }

    let server = Server::new(Arc::new(broker));
    server.serve(addr).await;
    Ok(())
}
