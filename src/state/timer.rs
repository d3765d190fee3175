//! Timer records as mirrored from the server

use serde::{Deserialize, Serialize};

/// Lifecycle status reported by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimerStatus {
    Active,
    Completed,
    Deleted,
    /// The server's countdown task crashed
    Error,
}

impl TimerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerStatus::Active => "active",
            TimerStatus::Completed => "completed",
            TimerStatus::Deleted => "deleted",
            TimerStatus::Error => "error",
        }
    }

    /// Only active timers count down locally
    pub fn is_active(&self) -> bool {
        matches!(self, TimerStatus::Active)
    }

    /// Whether a card is rendered for this status
    pub fn is_visible(&self) -> bool {
        !matches!(self, TimerStatus::Deleted)
    }
}

/// A server-owned timer. `remaining_seconds` is only trusted as of the
/// moment the record was received.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    pub id: String,
    pub name: String,
    pub remaining_seconds: i64,
    pub total_seconds: i64,
    pub status: TimerStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discord_message_id: Option<String>,
}

impl Timer {
    /// Create an active timer with the given remaining time
    pub fn active(id: impl Into<String>, name: impl Into<String>, remaining_seconds: i64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            remaining_seconds,
            total_seconds: remaining_seconds,
            status: TimerStatus::Active,
            discord_message_id: None,
        }
    }

    pub fn with_status(mut self, status: TimerStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}
