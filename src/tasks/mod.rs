//! Background tasks module
//!
//! Tasks that run alongside the panel's main loop.

pub mod countdown_ticker;

// Re-export main types
pub use countdown_ticker::{CardTick, CountdownTicker};
