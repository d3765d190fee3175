//! Request and response bodies of the timer REST API

use serde::{Deserialize, Serialize};

/// Body of `POST /timers`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateTimerRequest {
    pub name: String,
    pub minutes: u32,
    pub seconds: u32,
}

/// Body of `PATCH /timers/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdjustTimerRequest {
    pub adjust_seconds: i32,
}

/// Response of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub active_timers: u32,
    #[serde(default)]
    pub total_timers: u32,
}

/// Structured error body. The server answers `{"detail": "..."}` for
/// rejected requests and `{"detail": [{"msg": "..."}]}` for schema errors;
/// some proxies answer `{"message": "..."}`.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    detail: Option<ErrorDetail>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ErrorDetail {
    Text(String),
    Items(Vec<ErrorItem>),
}

#[derive(Debug, Clone, Deserialize)]
struct ErrorItem {
    msg: String,
}

impl ErrorBody {
    /// Parse a response body, returning its message if it has one
    pub fn message_from(body: &str) -> Option<String> {
        let parsed: ErrorBody = serde_json::from_str(body).ok()?;
        parsed.into_message()
    }

    fn into_message(self) -> Option<String> {
        let message = match self.detail {
            Some(ErrorDetail::Text(text)) => Some(text),
            Some(ErrorDetail::Items(items)) => {
                let joined = items
                    .into_iter()
                    .map(|item| item.msg)
                    .collect::<Vec<_>>()
                    .join("; ");
                Some(joined)
            }
            None => self.message,
        };
        message.filter(|m| !m.trim().is_empty())
    }
}
