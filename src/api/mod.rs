//! In-memory sandbox of the betting backend.
//!
//! Serves the same endpoints [`BackendClient`](crate::market::BackendClient)
//! calls, from state held in memory. Used by `betmaster sandbox` and by the
//! integration tests.

pub mod demo;
pub mod handlers;
pub mod routes;

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::info;

pub use demo::with_demo_data;
pub use handlers::{AppState, SandboxBet, SandboxBook};
pub use routes::create_router;

use crate::utils::shutdown_signal;

/// Serve the sandbox until Ctrl-C.
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    info!(addr = %listener.local_addr()?, "Sandbox backend listening");
    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

/// Serve the sandbox on an ephemeral local port in a background task.
pub async fn spawn(state: AppState) -> std::io::Result<SocketAddr> {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
    let addr = listener.local_addr()?;
    let router = create_router(state);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            tracing::error!(error = %e, "Sandbox backend stopped");
        }
    });

    Ok(addr)
}
