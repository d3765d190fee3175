//! Refill Panel - a terminal panel for live refill countdown timers
//!
//! The server owns every timer and broadcasts its full state over a
//! WebSocket. This library mirrors that state, counts down smoothly between
//! broadcasts, and sends user actions back over the REST API.

pub mod api;
pub mod config;
pub mod error;
pub mod state;
pub mod tasks;
pub mod transport;
pub mod utils;
pub mod view;

// Re-export commonly used types
pub use api::{RequestClient, TimerApi};
pub use config::Config;
pub use error::PanelError;
pub use transport::TransportClient;
pub use utils::signals::shutdown_signal;
pub use view::PanelView;
