use crate::services::client::HubClient;
use crate::services::dispatcher::RequestDescriptor;
use crate::services::token::BearerToken;
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchItemResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HubClient {
    /// Runs every descriptor in order, one at a time. A failed item is
    /// recorded and the batch moves on.
    pub async fn run_batch(
        &self,
        descriptors: &[RequestDescriptor],
        token: &BearerToken,
    ) -> Vec<BatchItemResult> {
        let mut results = Vec::with_capacity(descriptors.len());
        for descriptor in descriptors {
            let result = match self.request(descriptor, token).await {
                Ok(data) => BatchItemResult {
                    success: true,
                    data: Some(data),
                    error: None,
                },
                Err(err) => BatchItemResult {
                    success: false,
                    data: None,
                    error: Some(err.to_string()),
                },
            };
            results.push(result);
        }
        results
    }
}
