use crate::catalog::{find_operation, OperationDef, OperationKind};
use crate::errors::{ErrorKind, HubError};
use crate::services::client::HubClient;
use crate::services::dispatcher::RequestDescriptor;
use crate::services::logger::Logger;
use crate::services::token::{resolve_token, BearerToken, UpstreamItem};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::sync::OnceCell;

const BATCH_PARAM: &str = "requests";
const RETURN_ALL_PARAM: &str = "return_all";
const LIMIT_PARAM: &str = "limit";
const METADATA_FIELD: &str = "_metadata";

/// One resource/operation invocation as the workflow engine hands it over.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OperationCall {
    pub resource: String,
    pub operation: String,
    #[serde(default)]
    pub parameters: Map<String, Value>,
    #[serde(default, alias = "accessToken")]
    pub access_token: Option<String>,
    #[serde(default, alias = "otp")]
    pub one_time_code: Option<String>,
}

impl OperationCall {
    pub fn new(resource: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            operation: operation.into(),
            ..Self::default()
        }
    }

    pub fn with_param(mut self, key: &str, value: Value) -> Self {
        self.parameters.insert(key.to_string(), value);
        self
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemInput {
    #[serde(flatten)]
    pub call: OperationCall,
    #[serde(default)]
    pub upstream: Vec<UpstreamItem>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct RunOptions {
    #[serde(default)]
    pub continue_on_fail: bool,
    #[serde(default)]
    pub include_metadata: bool,
}

#[derive(Clone)]
pub struct HubManager {
    client: HubClient,
    logger: Logger,
    auto_login: bool,
    /// Token obtained by auto-login, shared by every item of the run.
    session_token: Arc<OnceCell<BearerToken>>,
}

impl HubManager {
    pub fn new(client: HubClient, logger: &Logger) -> Self {
        Self {
            client,
            logger: logger.child("hub"),
            auto_login: false,
            session_token: Arc::new(OnceCell::new()),
        }
    }

    /// Log in on demand when no token is supplied or found upstream.
    pub fn with_auto_login(mut self, auto_login: bool) -> Self {
        self.auto_login = auto_login;
        self
    }

    pub async fn execute(
        &self,
        call: &OperationCall,
        upstream: &[UpstreamItem],
    ) -> Result<Value, HubError> {
        let op = find_operation(&call.resource, &call.operation)?;
        self.logger.debug(
            "Executing operation",
            Some(&serde_json::json!({"operation": op.key(), "method": op.method.as_str()})),
        );

        match op.kind {
            OperationKind::Login => {
                let response = self.client.login(call.one_time_code.as_deref()).await?;
                Ok(response.into_raw())
            }
            OperationKind::Batch => {
                let descriptors = batch_descriptors(&call.parameters)?;
                let token = self.token_for(call, upstream).await?;
                let results = self.client.run_batch(&descriptors, &token).await;
                serde_json::to_value(results).map_err(|err| HubError::api_error(err.to_string()))
            }
            OperationKind::Request => self.run_request(op, call, upstream).await,
        }
    }

    async fn run_request(
        &self,
        op: &OperationDef,
        call: &OperationCall,
        upstream: &[UpstreamItem],
    ) -> Result<Value, HubError> {
        let descriptor = op.descriptor(&call.parameters)?;
        if !op.authenticated {
            return self.client.request_public(&descriptor).await;
        }
        let token = self.token_for(call, upstream).await?;

        if op.pageable {
            if let Some(limit) = page_limit(&call.parameters)? {
                let items = self.client.paginate(&descriptor, &token, limit).await?;
                return Ok(Value::Array(items));
            }
        }
        self.client.request(&descriptor, &token).await
    }

    async fn token_for(
        &self,
        call: &OperationCall,
        upstream: &[UpstreamItem],
    ) -> Result<BearerToken, HubError> {
        match resolve_token(call.access_token.as_deref(), upstream) {
            Err(err) if self.auto_login && err.kind == ErrorKind::NoAccessToken => self
                .session_token
                .get_or_try_init(|| async {
                    self.logger.info("No access token supplied, logging in", None);
                    self.client.authenticate(call.one_time_code.as_deref()).await
                })
                .await
                .cloned(),
            other => other,
        }
    }

    /// Runs items strictly in order. With `continue_on_fail` a failed item
    /// becomes an `{error, details, _metadata}` record and the run goes on;
    /// otherwise the first failure aborts the run.
    pub async fn process_items(
        &self,
        items: Vec<ItemInput>,
        options: RunOptions,
    ) -> Result<Vec<Value>, HubError> {
        let mut outputs = Vec::with_capacity(items.len());
        for item in items {
            let result = self.execute(&item.call, &item.upstream).await;
            let success = result.is_ok();
            let output = match result {
                Ok(value) => value,
                Err(err) if options.continue_on_fail => {
                    self.logger.warn(
                        "Item failed, continuing",
                        Some(&serde_json::json!({
                            "resource": item.call.resource,
                            "operation": item.call.operation,
                            "kind": err.kind,
                        })),
                    );
                    error_record(&err)
                }
                Err(err) => return Err(err),
            };
            outputs.push(if options.include_metadata || !success {
                with_metadata(output, &item.call, success)
            } else {
                output
            });
        }
        Ok(outputs)
    }
}

fn batch_descriptors(params: &Map<String, Value>) -> Result<Vec<RequestDescriptor>, HubError> {
    let raw = match params.get(BATCH_PARAM) {
        Some(Value::String(text)) => serde_json::from_str(text).map_err(|err| {
            HubError::invalid_parameter(format!("Parameter '{}' is not valid JSON: {}", BATCH_PARAM, err))
        })?,
        Some(value) => value.clone(),
        None => Value::Array(Vec::new()),
    };
    serde_json::from_value(raw).map_err(|err| {
        HubError::invalid_parameter(format!(
            "Parameter '{}' must be a list of requests: {}",
            BATCH_PARAM, err
        ))
    })
}

/// `None` means a single request; `Some(None)` means every page.
fn page_limit(params: &Map<String, Value>) -> Result<Option<Option<usize>>, HubError> {
    let return_all = params
        .get(RETURN_ALL_PARAM)
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if return_all {
        return Ok(Some(None));
    }
    match params.get(LIMIT_PARAM) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => value
            .as_u64()
            .map(|limit| Some(Some(limit as usize)))
            .ok_or_else(|| {
                HubError::invalid_parameter(format!(
                    "Parameter '{}' must be a non-negative integer",
                    LIMIT_PARAM
                ))
            }),
    }
}

fn error_record(err: &HubError) -> Value {
    let mut record = Map::new();
    record.insert("error".to_string(), Value::String(err.to_string()));
    if let Ok(details) = serde_json::to_value(err) {
        record.insert("details".to_string(), details);
    }
    Value::Object(record)
}

fn with_metadata(output: Value, call: &OperationCall, success: bool) -> Value {
    let metadata = serde_json::json!({
        "resource": call.resource,
        "operation": call.operation,
        "executed_at": chrono::Utc::now().to_rfc3339(),
        "success": success,
    });
    let mut record = match output {
        Value::Object(map) => map,
        other => {
            let mut map = Map::new();
            map.insert("data".to_string(), other);
            map
        }
    };
    record.insert(METADATA_FIELD.to_string(), metadata);
    Value::Object(record)
}
