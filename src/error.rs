//! Error taxonomy shared by the transport, request and view layers

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PanelError {
    /// Request never reached the server, or came back non-2xx
    #[error("{message}")]
    Network { message: String },

    /// Input rejected, either locally or by the server with a structured body
    #[error("{message}")]
    Validation { message: String },

    /// A WebSocket frame that could not be understood
    #[error("Malformed frame: {message}")]
    Parse { message: String },

    /// The WebSocket channel closed or failed
    #[error("Connection error: {message}")]
    Connection { message: String },

    #[error("Invalid server endpoint '{url}': {message}")]
    Endpoint { url: String, message: String },
}

impl PanelError {
    pub fn network(message: impl Into<String>) -> Self {
        PanelError::Network {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        PanelError::Validation {
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        PanelError::Parse {
            message: message.into(),
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        PanelError::Connection {
            message: message.into(),
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            PanelError::Network { .. } => "request.network_failed",
            PanelError::Validation { .. } => "request.validation_failed",
            PanelError::Parse { .. } => "transport.frame_malformed",
            PanelError::Connection { .. } => "transport.connection_lost",
            PanelError::Endpoint { .. } => "config.endpoint_invalid",
        }
    }

    /// Errors worth showing in the panel. Transport trouble only shows up
    /// as a stall in live updates.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            PanelError::Network { .. } | PanelError::Validation { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, PanelError>;
