use crate::constants::auth::TOKEN_FIELD;
use crate::errors::HubError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Opaque bearer credential. Lives for one execution only.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Returns `None` for blank input.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken([REDACTED])")
    }
}

/// Output of a prior workflow step. Records and lists are scanned for a
/// token; any other JSON value is carried along and never matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UpstreamPayload {
    Record(Map<String, Value>),
    RecordList(Vec<Value>),
    Other(Value),
}

impl UpstreamPayload {
    /// For a list only the first element is consulted.
    fn access_token(&self) -> Option<BearerToken> {
        let record = match self {
            UpstreamPayload::Record(record) => record,
            UpstreamPayload::RecordList(items) => items.first()?.as_object()?,
            UpstreamPayload::Other(_) => return None,
        };
        record
            .get(TOKEN_FIELD)
            .and_then(Value::as_str)
            .and_then(BearerToken::new)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpstreamItem {
    pub json: UpstreamPayload,
}

impl UpstreamItem {
    pub fn record(record: Map<String, Value>) -> Self {
        Self {
            json: UpstreamPayload::Record(record),
        }
    }
}

/// Picks the token for this invocation: the explicit parameter first, then
/// the first `access_token` found in upstream outputs.
pub fn resolve_token(
    explicit: Option<&str>,
    upstream: &[UpstreamItem],
) -> Result<BearerToken, HubError> {
    if let Some(token) = explicit.and_then(BearerToken::new) {
        return Ok(token);
    }
    upstream
        .iter()
        .find_map(|item| item.json.access_token())
        .ok_or_else(HubError::no_access_token)
}
