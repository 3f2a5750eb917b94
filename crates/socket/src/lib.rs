//! # GymBook line protocol
//!
//! A plain TCP front end for clients that cannot speak HTTP. Each connection
//! sends one command per line and gets exactly one reply line back:
//!
//! ```text
//! > LOGIN {"username": "alice", "password": "secret"}
//! < SUCCESS: Logged in as alice
//! > BOOK_SLOT 12
//! < SUCCESS: Booked slot on 2026-10-19 from 08:00 to 09:00
//! > BOOK_SLOT 12
//! < ERROR: You already have a booking for this slot
//! ```
//!
//! Booking goes through the same `SlotStore` as the HTTP API, so capacity
//! is enforced across both transports.

use eyre::Result;
use gymbook_db::Stores;
use tokio::net::TcpListener;
use tracing::info;

pub mod commands;
pub mod config;
pub mod server;
pub mod session;

/// Binds the configured address and serves connections until an accept
/// error occurs.
pub async fn start_server(config: config::SocketConfig, stores: Stores) -> Result<()> {
    let listener = TcpListener::bind(config.bind_addr()).await?;
    info!("Socket server listening on {}", config.bind_addr());

    server::serve(listener, stores).await
}
