//! WebSocket signaling relay for peer-to-peer calls.
//!
//! Clients connect to `GET /ws`, receive their id, join a room by name and
//! then exchange offers, answers and candidates with other members through
//! the server. Media never passes through here.

#![forbid(unsafe_code)]

mod config;
mod room;
mod signaling;

pub use config::*;
pub use room::*;
pub use signaling::*;

use axum::Router;
use axum::routing::get;
use std::future::Future;
use tokio::net::TcpListener;

pub fn router(service: SignalingService) -> Router {
    Router::new()
        .route("/ws", get(ws_handler))
        .route("/health", get(|| async { "OK" }))
        .with_state(service)
}

/// Serve signaling on `listener` until `shutdown` resolves.
pub async fn serve<F>(
    listener: TcpListener,
    service: SignalingService,
    shutdown: F,
) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown)
        .await
}
