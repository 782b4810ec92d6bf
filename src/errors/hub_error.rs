use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    MissingCredential,
    NoAccessToken,
    AuthenticationFailed,
    ApiError,
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    ValidationError,
    RateLimited,
    ServerError,
    Unknown,
    InvalidParameter,
    UnknownOperation,
    PageLimitExceeded,
}

/// A failure as the workflow author sees it.
///
/// `message` is the short title, `description` the sentence shown under it.
/// `cause` keeps the raw response body when one was received.
#[derive(Debug, Clone, Serialize)]
pub struct HubError {
    pub kind: ErrorKind,
    pub message: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http_status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl HubError {
    pub fn new(
        kind: ErrorKind,
        message: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            description: description.into(),
            http_status: None,
            cause: None,
            hint: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.http_status = Some(status);
        self
    }

    pub fn with_cause(mut self, cause: Value) -> Self {
        self.cause = Some(cause);
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn missing_credential(field: &str) -> Self {
        Self::new(
            ErrorKind::MissingCredential,
            "Missing Credential",
            format!("Connection setting '{}' is required", field),
        )
    }

    pub fn no_access_token() -> Self {
        Self::new(
            ErrorKind::NoAccessToken,
            "No Access Token",
            "No access token was supplied and none was found in the input data",
        )
        .with_hint(
            "Chain an 'auth/login' step before this one, or set the access token field manually.",
        )
    }

    pub fn authentication_failed() -> Self {
        Self::new(
            ErrorKind::AuthenticationFailed,
            "Authentication Failed",
            "Invalid username, password, or code",
        )
        .with_status(401)
    }

    pub fn api_error(description: impl Into<String>) -> Self {
        Self::new(ErrorKind::ApiError, "API Error", description)
    }

    pub fn invalid_parameter(description: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidParameter, "Invalid Parameter", description)
    }

    pub fn unknown_operation(description: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownOperation, "Unknown Operation", description)
    }

    pub fn page_limit_exceeded(max_pages: usize) -> Self {
        Self::new(
            ErrorKind::PageLimitExceeded,
            "Page Limit Exceeded",
            format!(
                "Stopped after {} full pages without reaching the end of the results",
                max_pages
            ),
        )
        .with_hint("Set a result limit, or raise HUB_MAX_PAGES if the listing is genuinely that large.")
    }
}

impl fmt::Display for HubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.message, self.description)
    }
}

impl Error for HubError {}
