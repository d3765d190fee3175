//! Decoding of server → client frames

use serde_json::Value;

use crate::{
    error::{PanelError, Result},
    state::Timer,
};

/// Discriminator of the only frame the panel consumes
pub const STATE_UPDATE: &str = "state_update";

/// Decode a text frame.
///
/// `Ok(Some(timers))` for a state update, `Ok(None)` for any other
/// well-formed frame, `Err` for anything malformed.
pub fn parse_frame(text: &str) -> Result<Option<Vec<Timer>>> {
    let value: Value = serde_json::from_str(text).map_err(|e| PanelError::parse(e.to_string()))?;
    let Value::Object(mut object) = value else {
        return Err(PanelError::parse("frame is not a JSON object"));
    };

    if object.get("type").and_then(Value::as_str) != Some(STATE_UPDATE) {
        return Ok(None);
    }

    let timers = object
        .remove("timers")
        .ok_or_else(|| PanelError::parse("state_update frame without timers"))?;
    let timers: Vec<Timer> =
        serde_json::from_value(timers).map_err(|e| PanelError::parse(e.to_string()))?;
    Ok(Some(timers))
}
