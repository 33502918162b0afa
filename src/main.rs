//! Adaptive Quiz · BKT mastery backend
//!
//! - Axum HTTP API
//! - In-memory store built from a TOML curriculum (or a built-in demo curriculum)
//! - Static SPA fallback (./static/index.html)
//!
//! Important env variables:
//!   PORT             : u16 (default 3000)
//!   CURRICULUM_PATH  : path to TOML curriculum (subjects, questions, students, BKT defaults)
//!   LOG_LEVEL        : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT       : "pretty" (default) or "json"

use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::info;

use adaptive_quiz_backend::{create_app, telemetry, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  let app = create_app(AppState::new());

  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "adaptive_quiz", %addr, "HTTP server listening");
  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await?;
  info!(target: "adaptive_quiz", "HTTP server stopped");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(target: "adaptive_quiz", error = %e, "Failed to listen for Ctrl-C");
    std::future::pending::<()>().await;
  }
}
