#![allow(dead_code)]

use hub_workflow::managers::hub::HubManager;
use hub_workflow::services::client::HubClient;
use hub_workflow::services::config::PipelineConfig;
use hub_workflow::services::credentials::{ConnectionSettings, RawCredentials};
use hub_workflow::services::logger::Logger;
use hub_workflow::services::retry::TokioSleeper;
use hub_workflow::services::transport::ReqwestTransport;
use once_cell::sync::Lazy;
use std::sync::Arc;
use tokio::sync::Mutex;

pub static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

pub fn credentials(base_url: &str) -> RawCredentials {
    RawCredentials {
        base_url: Some(base_url.to_string()),
        username: Some("admin".to_string()),
        password: Some("secret".to_string()),
        one_time_code: None,
    }
}

/// Real reqwest pipeline against `base_url` with millisecond backoff.
pub fn client_for(base_url: &str) -> HubClient {
    let config = PipelineConfig::default().with_base_delay_ms(1);
    let settings = ConnectionSettings::resolve(credentials(base_url)).expect("settings");
    let transport = Arc::new(ReqwestTransport::new(&config).expect("transport"));
    HubClient::new(
        settings,
        transport,
        Arc::new(TokioSleeper),
        config,
        &Logger::new("test"),
    )
}

pub fn hub_for(base_url: &str) -> HubManager {
    HubManager::new(client_for(base_url), &Logger::new("test"))
}
