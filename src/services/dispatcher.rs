use crate::constants::{headers::JSON, protocols::ALLOWED_HTTP};
use crate::errors::{HubError, TransportError};
use crate::services::credentials::ConnectionSettings;
use crate::services::logger::Logger;
use crate::services::token::BearerToken;
use crate::services::transport::{HttpMethod, HttpRequest, Transport};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use url::Url;

/// One logical call against the hub, independent of host and token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestDescriptor {
    pub method: HttpMethod,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<Map<String, Value>>,
}

impl RequestDescriptor {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            query: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn with_body(mut self, body: Map<String, Value>) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_query_param(mut self, key: &str, value: Value) -> Self {
        self.query
            .get_or_insert_with(Map::new)
            .insert(key.to_string(), value);
        self
    }
}

pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim();
    if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

/// Sends exactly one request per call. Retrying is the caller's business.
#[derive(Clone)]
pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    logger: Logger,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn Transport>, logger: &Logger) -> Self {
        Self {
            transport,
            logger: logger.child("dispatch"),
        }
    }

    pub fn build_request(
        &self,
        settings: &ConnectionSettings,
        descriptor: &RequestDescriptor,
        token: Option<&BearerToken>,
    ) -> Result<HttpRequest, HubError> {
        let url = build_url(
            settings.base_url(),
            &normalize_path(&descriptor.path),
            descriptor.query.as_ref(),
        )?;
        let mut headers = vec![
            ("Accept".to_string(), JSON.to_string()),
            ("Content-Type".to_string(), JSON.to_string()),
        ];
        if let Some(token) = token {
            headers.push(("Authorization".to_string(), token.header_value()));
        }
        Ok(HttpRequest {
            method: descriptor.method,
            url,
            headers,
            body: descriptor.body.clone().map(Value::Object),
        })
    }

    pub async fn send(&self, request: &HttpRequest) -> Result<Value, TransportError> {
        self.logger.debug(
            "HTTP request",
            Some(&serde_json::json!({"method": request.method.as_str(), "url": request.url})),
        );
        let result = self.transport.send(request).await;
        if let Err(err) = &result {
            self.logger.debug(
                "HTTP request failed",
                Some(&serde_json::json!({
                    "method": request.method.as_str(),
                    "url": request.url,
                    "status": err.status(),
                })),
            );
        }
        result
    }
}

fn build_url(base: &str, path: &str, query: Option<&Map<String, Value>>) -> Result<String, HubError> {
    let mut url = Url::parse(&format!("{}{}", base, path))
        .map_err(|_| HubError::invalid_parameter(format!("Invalid hub URL: {}{}", base, path)))?;
    if !scheme_allowed(url.scheme()) {
        return Err(HubError::invalid_parameter(
            "Only http/https hub URLs are supported",
        ));
    }

    if let Some(map) = query.filter(|map| map.values().any(|v| !v.is_null())) {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in map {
            match value {
                Value::Null => {}
                Value::Array(items) => {
                    for item in items {
                        pairs.append_pair(key, &render_query_value(item));
                    }
                }
                other => {
                    pairs.append_pair(key, &render_query_value(other));
                }
            }
        }
    }

    Ok(url.to_string())
}

fn render_query_value(value: &Value) -> String {
    value
        .as_str()
        .map(|s| s.to_string())
        .unwrap_or_else(|| value.to_string())
}

fn scheme_allowed(scheme: &str) -> bool {
    ALLOWED_HTTP
        .iter()
        .any(|allowed| allowed.trim_end_matches(':') == scheme)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::services::credentials::RawCredentials;

    struct NoopTransport;

    #[async_trait::async_trait]
    impl Transport for NoopTransport {
        async fn send(&self, _request: &HttpRequest) -> Result<Value, TransportError> {
            Ok(Value::Null)
        }
    }

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(Arc::new(NoopTransport), &Logger::new("test"))
    }

    fn settings(base_url: &str) -> ConnectionSettings {
        ConnectionSettings::resolve(RawCredentials {
            base_url: Some(base_url.to_string()),
            username: Some("admin".to_string()),
            password: Some("secret".to_string()),
            one_time_code: None,
        })
        .unwrap()
    }

    #[test]
    fn normalize_path_adds_missing_leading_slash() {
        assert_eq!(normalize_path("api/accessories"), "/api/accessories");
        assert_eq!(normalize_path("/api/accessories"), "/api/accessories");
    }

    #[test]
    fn build_request_injects_json_and_bearer_headers() {
        let token = BearerToken::new("tok123").unwrap();
        let request = dispatcher()
            .build_request(
                &settings("http://host:8581/"),
                &RequestDescriptor::get("api/accessories"),
                Some(&token),
            )
            .unwrap();
        assert_eq!(request.url, "http://host:8581/api/accessories");
        assert_eq!(request.header("accept"), Some("application/json"));
        assert_eq!(request.header("content-type"), Some("application/json"));
        assert_eq!(request.header("authorization"), Some("Bearer tok123"));
        assert!(request.body.is_none());
    }

    #[test]
    fn build_request_without_token_has_no_authorization() {
        let request = dispatcher()
            .build_request(
                &settings("http://host:8581"),
                &RequestDescriptor::new(HttpMethod::Post, "/api/auth/login"),
                None,
            )
            .unwrap();
        assert_eq!(request.header("authorization"), None);
    }

    #[test]
    fn query_parameters_are_encoded_and_nulls_skipped() {
        let descriptor = RequestDescriptor::get("/api/plugins")
            .with_query_param("page", serde_json::json!(2))
            .with_query_param("q", serde_json::json!("dummy switch"))
            .with_query_param("skip", Value::Null);
        let request = dispatcher()
            .build_request(&settings("http://host:8581"), &descriptor, None)
            .unwrap();
        assert_eq!(request.url, "http://host:8581/api/plugins?page=2&q=dummy+switch");
    }

    #[test]
    fn rejects_non_http_base_urls() {
        let err = dispatcher()
            .build_request(&settings("ftp://host"), &RequestDescriptor::get("/api"), None)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidParameter);
    }
}
