use serde_json::Value;
use thiserror::Error;

/// A single failed HTTP exchange, before any normalization.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP request timed out")]
    Timeout,

    #[error("invalid response body: {0}")]
    Decode(String),
}

impl TransportError {
    pub fn status(&self) -> Option<u16> {
        match self {
            TransportError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw response body, parsed as JSON when possible.
    pub fn body(&self) -> Option<Value> {
        let TransportError::Status { body, .. } = self else {
            return None;
        };
        if body.trim().is_empty() {
            return None;
        }
        Some(serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.clone())))
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return TransportError::Timeout;
        }
        if let Some(status) = err.status() {
            return TransportError::Status {
                status: status.as_u16(),
                body: String::new(),
            };
        }
        TransportError::Network(err.to_string())
    }
}
