//! HTTP API module
//!
//! The [`TimerApi`] trait is the seam between the view and the server; the
//! [`RequestClient`] implements it over HTTP.

pub mod client;
pub mod responses;

use async_trait::async_trait;

use crate::{error::Result, state::Timer};

pub use client::RequestClient;
pub use responses::{AdjustTimerRequest, CreateTimerRequest, ErrorBody, HealthResponse};

/// Mutating and loading operations against the timer server.
///
/// None of these touch local timer state; the next broadcast snapshot is
/// what reflects their effect.
#[async_trait]
pub trait TimerApi: Send + Sync {
    /// Fetch every timer the server knows about
    async fn list(&self) -> Result<Vec<Timer>>;

    /// Create a timer and return the server's record of it
    async fn create(&self, name: &str, minutes: u32, seconds: u32) -> Result<Timer>;

    /// Shift an active timer by `delta_seconds`
    async fn adjust(&self, id: &str, delta_seconds: i32) -> Result<()>;

    /// Restart a timer from its total duration
    async fn restart(&self, id: &str) -> Result<()>;

    async fn delete(&self, id: &str) -> Result<()>;
}
