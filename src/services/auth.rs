use crate::constants::auth::{LOGIN_PATH, TOKEN_FIELD};
use crate::errors::{HubError, TransportError};
use crate::services::client::HubClient;
use crate::services::dispatcher::RequestDescriptor;
use crate::services::token::BearerToken;
use crate::services::transport::HttpMethod;
use serde_json::{Map, Value};

/// A successful login: the token plus the response exactly as received.
///
/// Only `access_token` decides success; the other fields are read leniently.
#[derive(Debug, Clone, PartialEq)]
pub struct LoginResponse {
    token: BearerToken,
    raw: Value,
}

impl LoginResponse {
    pub fn from_raw(raw: Value) -> Result<Self, HubError> {
        let token = raw
            .get(TOKEN_FIELD)
            .and_then(Value::as_str)
            .and_then(BearerToken::new)
            .ok_or_else(|| HubError::api_error("No access token received"))?;
        Ok(Self { token, raw })
    }

    pub fn token(&self) -> &BearerToken {
        &self.token
    }

    pub fn token_type(&self) -> Option<&str> {
        self.raw.get("token_type").and_then(Value::as_str)
    }

    pub fn expires_in(&self) -> Option<u64> {
        self.raw.get("expires_in").and_then(Value::as_u64)
    }

    pub fn into_raw(self) -> Value {
        self.raw
    }
}

impl HubClient {
    /// Exchanges the connection credentials for a token. Exactly one attempt.
    ///
    /// `one_time_code` overrides the code stored in the connection settings.
    pub async fn login(&self, one_time_code: Option<&str>) -> Result<LoginResponse, HubError> {
        let settings = self.settings();
        let mut body = Map::new();
        body.insert("username".to_string(), Value::String(settings.username().to_string()));
        body.insert("password".to_string(), Value::String(settings.password().to_string()));
        if let Some(code) = one_time_code
            .filter(|c| !c.trim().is_empty())
            .or(settings.one_time_code())
        {
            body.insert("otp".to_string(), Value::String(code.trim().to_string()));
        }

        let descriptor = RequestDescriptor::new(HttpMethod::Post, LOGIN_PATH).with_body(body);
        let request = self
            .dispatcher()
            .build_request(settings, &descriptor, None)?;
        let raw = self
            .dispatcher()
            .send(&request)
            .await
            .map_err(login_error)?;

        LoginResponse::from_raw(raw)
    }

    pub async fn authenticate(&self, one_time_code: Option<&str>) -> Result<BearerToken, HubError> {
        Ok(self.login(one_time_code).await?.token().clone())
    }
}

fn login_error(err: TransportError) -> HubError {
    if err.status() == Some(401) {
        return HubError::authentication_failed();
    }
    let mut wrapped = HubError::api_error(format!("Login request failed: {}", err));
    if let Some(status) = err.status() {
        wrapped = wrapped.with_status(status);
    }
    if let Some(body) = err.body() {
        wrapped = wrapped.with_cause(body);
    }
    wrapped
}

#[cfg(test)]
mod tests {
    use crate::errors::ErrorKind;
    use crate::services::testing::{client_with, status_error, RecordingSleeper, ScriptedTransport};
    use crate::services::transport::HttpMethod;
    use std::sync::Arc;

    #[tokio::test]
    async fn login_posts_credentials_and_returns_token() {
        let transport = Arc::new(ScriptedTransport::new(vec![Ok(serde_json::json!({
            "access_token": "tok123",
            "token_type": "Bearer",
            "expires_in": 28800
        }))]));
        let client = client_with(transport.clone(), Arc::new(RecordingSleeper::default()));

        let response = client.login(Some("123456")).await.unwrap();
        assert_eq!(response.token().as_str(), "tok123");
        assert_eq!(response.token_type(), Some("Bearer"));
        assert_eq!(response.expires_in(), Some(28800));

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, HttpMethod::Post);
        assert_eq!(requests[0].url, "http://host:8581/api/auth/login");
        assert_eq!(requests[0].header("authorization"), None);
        assert_eq!(
            requests[0].body,
            Some(serde_json::json!({"username": "admin", "password": "secret", "otp": "123456"}))
        );
    }

    #[tokio::test]
    async fn login_omits_otp_when_none_given() {
        let transport = Arc::new(ScriptedTransport::new(vec![Ok(
            serde_json::json!({"access_token": "tok"}),
        )]));
        let client = client_with(transport.clone(), Arc::new(RecordingSleeper::default()));
        client.authenticate(None).await.unwrap();
        let body = transport.requests()[0].body.clone().unwrap();
        assert!(body.get("otp").is_none());
    }

    #[tokio::test]
    async fn login_401_is_authentication_failure_and_not_retried() {
        let transport = Arc::new(ScriptedTransport::new(vec![Err(status_error(401, ""))]));
        let sleeper = Arc::new(RecordingSleeper::default());
        let client = client_with(transport.clone(), sleeper.clone());

        let err = client.authenticate(None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::AuthenticationFailed);
        assert_eq!(err.description, "Invalid username, password, or code");
        assert_eq!(transport.requests().len(), 1);
        assert!(sleeper.delays().is_empty());
    }

    #[tokio::test]
    async fn login_server_errors_are_wrapped_without_retry() {
        let transport = Arc::new(ScriptedTransport::new(vec![Err(status_error(
            503,
            r#"{"message":"starting"}"#,
        ))]));
        let client = client_with(transport.clone(), Arc::new(RecordingSleeper::default()));

        let err = client.login(None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ApiError);
        assert_eq!(err.http_status, Some(503));
        assert_eq!(err.cause.unwrap()["message"], "starting");
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test]
    async fn login_without_token_in_response_fails() {
        let transport = Arc::new(ScriptedTransport::new(vec![Ok(
            serde_json::json!({"token_type": "Bearer"}),
        )]));
        let client = client_with(transport, Arc::new(RecordingSleeper::default()));

        let err = client.login(None).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ApiError);
        assert_eq!(err.description, "No access token received");
    }

    #[tokio::test]
    async fn odd_side_fields_do_not_hide_the_token() {
        let transport = Arc::new(ScriptedTransport::new(vec![Ok(serde_json::json!({
            "access_token": "tok123",
            "token_type": 7,
            "expires_in": "8h"
        }))]));
        let client = client_with(transport, Arc::new(RecordingSleeper::default()));

        let response = client.login(None).await.unwrap();
        assert_eq!(response.token().as_str(), "tok123");
        assert_eq!(response.expires_in(), None);
        assert_eq!(response.token_type(), None);
        assert_eq!(response.into_raw()["expires_in"], "8h");
    }

    #[tokio::test]
    async fn blank_access_token_is_rejected() {
        let transport = Arc::new(ScriptedTransport::new(vec![Ok(
            serde_json::json!({"access_token": "  "}),
        )]));
        let client = client_with(transport, Arc::new(RecordingSleeper::default()));

        let err = client.authenticate(None).await.unwrap_err();
        assert_eq!(err.description, "No access token received");
    }
}
