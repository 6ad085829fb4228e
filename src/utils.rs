//! Small runtime helpers.

use tracing::{info, warn};

/// Resolves on Ctrl-C.
///
/// If the handler cannot be installed the future never resolves, so a
/// server keeps running rather than stopping at once.
pub async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!(error = %e, "Could not listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    }
}
