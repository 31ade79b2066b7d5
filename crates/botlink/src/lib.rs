//! # Botlink
//!
//! Remote control for a single-session chat-room bot.
//!
//! Botlink drives one persistent connection to an external chat server
//! through a pluggable [`ProtocolClient`](botlink_client::ProtocolClient)
//! and exposes its operations as named procedures over a WebSocket JSON
//! transport. The embedder supplies the protocol client; Botlink supplies
//! everything above it — session lifecycle, login gating, reply waiting,
//! bounded history, and the RPC surface.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use botlink::{RpcConfig, RpcServer, init_tracing};
//! use botlink_runtime::BotCoordinator;
//!
//! # async fn run(factory: impl botlink_client::ClientFactory) -> Result<(), botlink::BotlinkError> {
//! init_tracing();
//!
//! let coordinator = Arc::new(BotCoordinator::new(factory));
//! let config = RpcConfig::from_env();
//! let server = RpcServer::bind(&config.bind_addr, coordinator).await?;
//! server.run().await
//! # }
//! ```

mod config;
mod error;
pub mod rpc;
mod server;

pub use config::{BotCredentials, DEFAULT_BIND_ADDR, RpcConfig};
pub use error::BotlinkError;
pub use server::RpcServer;

/// Installs a process-wide `tracing` subscriber filtered by `RUST_LOG`.
///
/// No-op when a subscriber is already set, so tests and embedders that
/// configure their own logging are unaffected.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
