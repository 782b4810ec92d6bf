use crate::errors::TransportError;
use crate::services::client::HubClient;
use crate::services::config::PipelineConfig;
use crate::services::credentials::{ConnectionSettings, RawCredentials};
use crate::services::logger::Logger;
use crate::services::retry::Sleeper;
use crate::services::transport::{HttpRequest, Transport};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Default)]
pub struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn delays(&self) -> Vec<Duration> {
        self.delays.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, delay: Duration) {
        self.delays.lock().unwrap().push(delay);
    }
}

/// Replays canned results in order and records every request it sees.
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<Value, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<Result<Value, TransportError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: &HttpRequest) -> Result<Value, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Network("script exhausted".into())))
    }
}

pub fn status_error(status: u16, body: &str) -> TransportError {
    TransportError::Status {
        status,
        body: body.to_string(),
    }
}

pub fn client_with(
    transport: Arc<ScriptedTransport>,
    sleeper: Arc<RecordingSleeper>,
) -> HubClient {
    let settings = ConnectionSettings::resolve(RawCredentials {
        base_url: Some("http://host:8581/".to_string()),
        username: Some("admin".to_string()),
        password: Some("secret".to_string()),
        one_time_code: None,
    })
    .unwrap();
    HubClient::new(
        settings,
        transport,
        sleeper,
        PipelineConfig::default(),
        &Logger::new("test"),
    )
}
