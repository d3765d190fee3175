//! State management module
//!
//! Server-mirrored timers, the per-timer countdown anchors derived from them,
//! and the client-only panel state (creation draft, error banner).

pub mod clock;
pub mod countdown;
pub mod draft;
pub mod panel_state;
pub mod timer;

// Re-export main types
pub use clock::{Clock, ManualClock, SystemClock};
pub use countdown::Countdown;
pub use draft::CreationDraft;
pub use panel_state::PanelState;
pub use timer::{Timer, TimerStatus};
