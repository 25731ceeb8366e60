//! Upload form server for bank guarantee field extraction.

mod handlers;
mod router;
mod state;
mod templates;

use std::env;
use std::path::Path;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bgx_core::BgxConfig;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match env::var("BGX_CONFIG") {
        Ok(path) => BgxConfig::from_file(Path::new(&path))
            .with_context(|| format!("Failed to load config from {}", path))?,
        Err(_) => BgxConfig::default(),
    };

    let bind_addr = env::var("BGX_BIND").unwrap_or_else(|_| config.server.bind.clone());
    info!("Uploads go to {}", config.server.upload_dir.display());

    let app = router::app_router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;

    info!("Listening on http://{}", bind_addr);
    axum::serve(listener, app).await?;

    Ok(())
}
