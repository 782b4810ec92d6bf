use crate::errors::HubError;
use crate::services::config::PipelineConfig;
use crate::services::credentials::ConnectionSettings;
use crate::services::dispatcher::{normalize_path, Dispatcher, RequestDescriptor};
use crate::services::logger::Logger;
use crate::services::normalizer::normalize_error;
use crate::services::retry::{RetryPolicy, Sleeper};
use crate::services::token::BearerToken;
use crate::services::transport::Transport;
use serde_json::Value;
use std::sync::Arc;

/// The authenticated request pipeline for one hub connection:
/// dispatch, retry on transient statuses, normalize whatever still fails.
#[derive(Clone)]
pub struct HubClient {
    settings: ConnectionSettings,
    dispatcher: Dispatcher,
    retry: RetryPolicy,
    config: PipelineConfig,
    logger: Logger,
}

impl HubClient {
    pub fn new(
        settings: ConnectionSettings,
        transport: Arc<dyn Transport>,
        sleeper: Arc<dyn Sleeper>,
        config: PipelineConfig,
        logger: &Logger,
    ) -> Self {
        Self {
            dispatcher: Dispatcher::new(transport, logger),
            retry: RetryPolicy::new(&config, sleeper, logger),
            settings,
            config,
            logger: logger.child("client"),
        }
    }

    pub fn settings(&self) -> &ConnectionSettings {
        &self.settings
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub(crate) fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub async fn request(
        &self,
        descriptor: &RequestDescriptor,
        token: &BearerToken,
    ) -> Result<Value, HubError> {
        self.request_with(descriptor, Some(token)).await
    }

    /// Same pipeline without an `Authorization` header, for the few
    /// endpoints the hub serves before login.
    pub async fn request_public(&self, descriptor: &RequestDescriptor) -> Result<Value, HubError> {
        self.request_with(descriptor, None).await
    }

    async fn request_with(
        &self,
        descriptor: &RequestDescriptor,
        token: Option<&BearerToken>,
    ) -> Result<Value, HubError> {
        let request = self
            .dispatcher
            .build_request(&self.settings, descriptor, token)?;
        let result = self.retry.run(|| self.dispatcher.send(&request)).await;
        result.map_err(|err| {
            let normalized =
                normalize_error(&err, descriptor.method, &normalize_path(&descriptor.path));
            self.logger.warn(
                "Request failed",
                Some(&serde_json::json!({
                    "method": descriptor.method.as_str(),
                    "path": descriptor.path,
                    "kind": normalized.kind,
                    "status": normalized.http_status,
                })),
            );
            normalized
        })
    }
}
