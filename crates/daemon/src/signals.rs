//! OS signals to `InterruptToken`

use scout_core::application::interrupt::{interrupt_channel, InterruptToken};
use tracing::{error, warn};

/// Resolve on Ctrl+C (SIGINT) or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => warn!("Received Ctrl+C"),
        _ = terminate => warn!("Received SIGTERM"),
    }
}

/// Token that fires on the first Ctrl+C or SIGTERM
pub fn interrupt_on_signals() -> InterruptToken {
    let (tx, token) = interrupt_channel();
    tokio::spawn(async move {
        shutdown_signal().await;
        tx.interrupt();
    });
    token
}
