pub mod error;
pub mod form;
pub mod handlers;
pub mod router;
pub mod state;

use std::net::SocketAddr;

use crate::config::AppConfig;

pub use router::create_router;
pub use state::AppState;

pub async fn run_server(
    addr: SocketAddr,
    config: AppConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(
        "Using sldl at {} (working directory {})",
        config.executable.display(),
        config.app_root.display()
    );

    let state = AppState::new(config)?;
    let app = create_router(state);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
