use crate::constants::pagination::{PAGE_PARAM, SIZE_PARAM};
use crate::errors::HubError;
use crate::services::client::HubClient;
use crate::services::dispatcher::RequestDescriptor;
use crate::services::token::BearerToken;
use crate::services::transport::HttpMethod;
use serde_json::Value;

impl HubClient {
    /// Walks `page=1,2,..` with a fixed page size until a short page arrives
    /// or `limit` items are collected. Fails with `PageLimitExceeded` once
    /// `max_pages` full pages have been read without reaching either stop.
    pub async fn paginate(
        &self,
        descriptor: &RequestDescriptor,
        token: &BearerToken,
        limit: Option<usize>,
    ) -> Result<Vec<Value>, HubError> {
        if descriptor.method != HttpMethod::Get {
            return Err(HubError::invalid_parameter(format!(
                "Only GET requests can be paginated, got {}",
                descriptor.method
            )));
        }
        if limit == Some(0) {
            return Ok(Vec::new());
        }

        let page_size = self.config().page_size;
        let max_pages = self.config().max_pages;
        let mut items = Vec::new();

        for page in 1..=max_pages {
            let request = descriptor
                .clone()
                .with_query_param(PAGE_PARAM, Value::from(page))
                .with_query_param(SIZE_PARAM, Value::from(page_size));
            let page_items = page_items(self.request(&request, token).await?);
            let fetched = page_items.len();
            items.extend(page_items);

            if let Some(limit) = limit {
                if items.len() >= limit {
                    items.truncate(limit);
                    return Ok(items);
                }
            }
            if fetched < page_size {
                return Ok(items);
            }
        }

        Err(HubError::page_limit_exceeded(max_pages))
    }
}

/// Arrays are pages; an object with a `data` array contributes that array;
/// anything else is a single item.
fn page_items(response: Value) -> Vec<Value> {
    match response {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => items,
            Some(other) => {
                map.insert("data".to_string(), other);
                vec![Value::Object(map)]
            }
            None => vec![Value::Object(map)],
        },
        other => vec![other],
    }
}
