//! HTTP Server
//!
//! Runs a router until the interrupt token fires, then drains in-flight
//! requests (`axum::serve(..).with_graceful_shutdown`).

use axum::Router;
use scout_core::application::interrupt::InterruptToken;
use std::net::SocketAddr;
use thiserror::Error;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },

    #[error("server runtime failed: {0}")]
    Serve(#[from] std::io::Error),
}

/// Serve on an already bound listener
pub async fn serve(
    listener: TcpListener,
    router: Router,
    mut interrupt: InterruptToken,
) -> Result<(), ServerError> {
    let local = listener.local_addr().ok();
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            interrupt.interrupted().await;
            info!(addr = ?local, "Shutdown requested, draining connections");
        })
        .await?;
    info!(addr = ?local, "Server stopped");
    Ok(())
}

/// Bind `addr` (e.g. `127.0.0.1:8001`) and serve until interrupted
pub async fn bind_and_serve(
    addr: &str,
    router: Router,
    interrupt: InterruptToken,
) -> Result<SocketAddr, ServerError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.to_string(),
            source,
        })?;
    let local = listener.local_addr()?;
    info!(addr = %local, "Listening");
    serve(listener, router, interrupt).await?;
    Ok(local)
}
