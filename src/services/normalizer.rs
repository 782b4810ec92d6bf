use crate::errors::{ErrorKind, HubError, TransportError};
use crate::services::transport::HttpMethod;
use serde_json::Value;

/// Maps a failure that survived the retry loop onto the user-facing taxonomy.
pub fn normalize_error(err: &TransportError, method: HttpMethod, path: &str) -> HubError {
    let status = err.status();
    let body = err.body();
    let server_message = body.as_ref().and_then(server_message);

    let normalized = match status {
        Some(400) => HubError::new(
            ErrorKind::BadRequest,
            "Bad Request",
            "The request was invalid. Please check your parameters.",
        ),
        Some(401) => HubError::new(
            ErrorKind::Unauthorized,
            "Unauthorized",
            "Access token is invalid or expired. Please authenticate again.",
        ),
        Some(403) => HubError::new(
            ErrorKind::Forbidden,
            "Forbidden",
            "You do not have permission to perform this action.",
        ),
        Some(404) => HubError::new(
            ErrorKind::NotFound,
            "Not Found",
            "The requested resource was not found.",
        ),
        Some(422) => {
            let mut description = "The request data is invalid.".to_string();
            if let Some(message) = server_message.as_deref() {
                description.push(' ');
                description.push_str(message);
            }
            HubError::new(ErrorKind::ValidationError, "Validation Error", description)
        }
        Some(429) => HubError::new(
            ErrorKind::RateLimited,
            "Rate Limit Exceeded",
            "Too many requests. Please wait before trying again.",
        ),
        Some(500) | Some(502) | Some(503) | Some(504) => HubError::new(
            ErrorKind::ServerError,
            "Server Error",
            "The server encountered an error. Please try again later.",
        ),
        _ => HubError::new(
            ErrorKind::Unknown,
            format!("{} {} Error", method, path),
            server_message.unwrap_or_else(|| err.to_string()),
        ),
    };

    let normalized = match status {
        Some(status) => normalized.with_status(status),
        None => normalized,
    };
    match body {
        Some(body) => normalized.with_cause(body),
        None => normalized,
    }
}

fn server_message(body: &Value) -> Option<String> {
    match body.get("message").or_else(|| body.get("error")) {
        Some(Value::String(text)) if !text.trim().is_empty() => Some(text.trim().to_string()),
        Some(Value::Array(items)) => {
            let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join("; "))
            }
        }
        _ => None,
    }
}
