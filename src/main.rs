use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use checkly::config::Config;
use checkly::server::{self, AppContext};
use checkly::store::StateStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG wins; default to info
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    let config = Config::load().context("loading configuration")?;
    let app = Arc::new(AppContext::open(StateStore::new(&config.db_path)));
    let router = server::router(app, &config.static_dir);

    // Print the link to the server
    tracing::info!("Server running at http://{}", config.addr);
    tracing::info!("Static files: {}", config.static_dir.display());
    tracing::info!("State file:   {}", config.db_path.display());

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("binding {}", config.addr))?;

    axum::serve(listener, router).await.context("server error")?;
    Ok(())
}
