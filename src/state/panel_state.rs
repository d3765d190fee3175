//! Client-only panel state: error banner, creation draft, pending confirmation

use chrono::{DateTime, Local};
use tracing::{debug, warn};

use super::CreationDraft;
use crate::error::PanelError;

/// Everything the panel tracks besides the timer cards themselves
#[derive(Debug, Default)]
pub struct PanelState {
    /// The single visible error message
    pub error: Option<String>,
    pub draft: CreationDraft,
    /// Timer id awaiting delete confirmation
    pub pending_delete: Option<String>,
    /// Wall-clock time the last snapshot was applied
    pub last_snapshot_at: Option<DateTime<Local>>,
    pub last_action: Option<String>,
}

impl PanelState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the visible error with `error`
    pub fn show_error(&mut self, error: &PanelError) {
        warn!("{} ({})", error, error.error_code());
        self.error = Some(error.to_string());
    }

    pub fn clear_error(&mut self) {
        if self.error.take().is_some() {
            debug!("Cleared panel error");
        }
    }

    /// Note a successful action and clear any stale error
    pub fn record_success(&mut self, action: &str) {
        self.last_action = Some(action.to_string());
        self.clear_error();
    }

    pub fn mark_snapshot(&mut self) {
        self.last_snapshot_at = Some(Local::now());
    }
}
