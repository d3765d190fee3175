//! Creation form state

use crate::error::{PanelError, Result};

/// Longest timer name the server accepts
pub const MAX_NAME_CHARS: usize = 50;
/// Minutes and seconds are each entered as 0..=59
pub const MAX_FIELD_VALUE: u32 = 59;

/// Transient, client-only state of the creation form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreationDraft {
    pub name: String,
    pub minutes: u32,
    pub seconds: u32,
}

impl CreationDraft {
    pub fn new(name: impl Into<String>, minutes: u32, seconds: u32) -> Self {
        Self {
            name: name.into(),
            minutes,
            seconds,
        }
    }

    /// Name as it will be submitted
    pub fn trimmed_name(&self) -> &str {
        self.name.trim()
    }

    pub fn total_seconds(&self) -> u32 {
        self.minutes * 60 + self.seconds
    }

    /// Check the draft before anything goes over the network
    pub fn validate(&self) -> Result<()> {
        let name = self.trimmed_name();
        if name.is_empty() {
            return Err(PanelError::validation("Timer name is required"));
        }
        if name.chars().count() > MAX_NAME_CHARS {
            return Err(PanelError::validation(format!(
                "Timer name must be at most {} characters",
                MAX_NAME_CHARS
            )));
        }
        if self.minutes > MAX_FIELD_VALUE || self.seconds > MAX_FIELD_VALUE {
            return Err(PanelError::validation(format!(
                "Minutes and seconds must each be between 0 and {}",
                MAX_FIELD_VALUE
            )));
        }
        if self.minutes == 0 && self.seconds == 0 {
            return Err(PanelError::validation("Time cannot be 0"));
        }
        Ok(())
    }

    /// Back to the empty form after a successful submission
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
