use crate::errors::HubError;
use crate::managers::hub::{HubManager, ItemInput, RunOptions};
use crate::services::client::HubClient;
use crate::services::config::PipelineConfig;
use crate::services::credentials::{ConnectionSettings, RawCredentials};
use crate::services::logger::Logger;
use crate::services::retry::TokioSleeper;
use crate::services::transport::ReqwestTransport;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

/// A complete run as read from a JSON document: connection, options, items.
#[derive(Debug, Clone, Deserialize)]
pub struct Invocation {
    #[serde(default)]
    pub credentials: RawCredentials,
    #[serde(default)]
    pub options: RunOptions,
    #[serde(default)]
    pub auto_login: bool,
    #[serde(default)]
    pub items: Vec<ItemInput>,
}

pub struct App {
    pub logger: Logger,
    pub config: PipelineConfig,
    pub hub: HubManager,
}

impl App {
    /// Wires the pipeline. Blank credential fields fall back to `HUB_*`
    /// environment variables; tunables come from the environment too.
    pub fn initialize(credentials: RawCredentials, auto_login: bool) -> Result<Self, HubError> {
        let logger = Logger::new("hub");
        let config = PipelineConfig::from_env();
        let settings = ConnectionSettings::resolve(credentials.or(RawCredentials::from_env()))?;
        let transport = Arc::new(ReqwestTransport::new(&config)?);
        let client = HubClient::new(
            settings,
            transport,
            Arc::new(TokioSleeper),
            config.clone(),
            &logger,
        );
        let hub = HubManager::new(client, &logger).with_auto_login(auto_login);

        logger.debug(
            "Initialized",
            Some(&serde_json::json!({
                "max_retries": config.max_retries,
                "timeout_ms": config.timeout_ms,
                "auto_login": auto_login,
            })),
        );
        Ok(Self {
            logger,
            config,
            hub,
        })
    }

    pub async fn run(invocation: Invocation) -> Result<Vec<Value>, HubError> {
        let app = Self::initialize(invocation.credentials, invocation.auto_login)?;
        let outputs = app
            .hub
            .process_items(invocation.items, invocation.options)
            .await?;
        app.logger.info(
            "Run finished",
            Some(&serde_json::json!({"items": outputs.len(), "log": app.logger.stats()})),
        );
        Ok(outputs)
    }
}
