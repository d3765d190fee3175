//! WebSocket transport module
//!
//! Receives authoritative state snapshots from the server and keeps the
//! connection alive with exponential backoff.

pub mod backoff;
pub mod client;
pub mod frame;

pub use backoff::Backoff;
pub use client::TransportClient;
pub use frame::parse_frame;
