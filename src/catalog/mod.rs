mod operations;

use crate::errors::HubError;
use crate::services::dispatcher::RequestDescriptor;
use crate::services::transport::HttpMethod;
use crate::utils::suggest::suggest;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use std::collections::{BTreeSet, HashMap};

use operations::OPERATIONS;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// Authenticated request, optionally pageable.
    Request,
    /// Credential exchange; the response is returned as-is.
    Login,
    /// Runs the descriptors found in the `requests` parameter.
    Batch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Identifier,
    PluginName,
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathParam {
    pub name: &'static str,
    pub kind: ParamKind,
}

impl PathParam {
    pub const fn new(name: &'static str, kind: ParamKind) -> Self {
        Self { name, kind }
    }
}

/// How the request body is assembled from call parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodySpec {
    None,
    /// One parameter holding a JSON object, or a string that parses to one.
    Param(&'static str),
    /// Scalar parameters copied under their own names when present.
    Fields(&'static [&'static str]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationDef {
    pub resource: &'static str,
    pub operation: &'static str,
    pub method: HttpMethod,
    pub path: &'static str,
    pub path_params: &'static [PathParam],
    pub query: &'static [&'static str],
    pub body: BodySpec,
    pub pageable: bool,
    pub authenticated: bool,
    pub kind: OperationKind,
}

impl OperationDef {
    pub const fn new(
        resource: &'static str,
        operation: &'static str,
        method: HttpMethod,
        path: &'static str,
    ) -> Self {
        Self {
            resource,
            operation,
            method,
            path,
            path_params: &[],
            query: &[],
            body: BodySpec::None,
            pageable: false,
            authenticated: true,
            kind: OperationKind::Request,
        }
    }

    const fn path_params(self, path_params: &'static [PathParam]) -> Self {
        Self {
            path_params,
            ..self
        }
    }

    const fn query(self, query: &'static [&'static str]) -> Self {
        Self { query, ..self }
    }

    const fn body(self, body: BodySpec) -> Self {
        Self { body, ..self }
    }

    const fn pageable(self) -> Self {
        Self {
            pageable: true,
            ..self
        }
    }

    const fn public(self) -> Self {
        Self {
            authenticated: false,
            ..self
        }
    }

    const fn kind(self, kind: OperationKind) -> Self {
        Self { kind, ..self }
    }

    pub fn key(&self) -> String {
        format!("{}/{}", self.resource, self.operation)
    }

    /// Turns call parameters into a descriptor: path placeholders filled and
    /// encoded, optional query values copied, body assembled.
    pub fn descriptor(&self, params: &Map<String, Value>) -> Result<RequestDescriptor, HubError> {
        let mut path = self.path.to_string();
        for param in self.path_params {
            let value = path_value(params, param)?;
            let encoded = urlencoding::encode(&value);
            path = path.replace(&format!("{{{}}}", param.name), &encoded);
        }

        let mut descriptor = RequestDescriptor::new(self.method, path);
        for name in self.query {
            if let Some(value) = params.get(*name).filter(|v| !v.is_null()) {
                descriptor = descriptor.with_query_param(name, value.clone());
            }
        }
        if let Some(body) = build_body(self.body, params)? {
            descriptor = descriptor.with_body(body);
        }
        Ok(descriptor)
    }
}

static IDENTIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._:-]*$").expect("identifier regex"));

static PLUGIN_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(@[a-z0-9~-][a-z0-9._~-]*/)?[a-z0-9~-][a-z0-9._~-]*$").expect("plugin name regex")
});

static OPERATION_MAP: Lazy<HashMap<String, &'static OperationDef>> =
    Lazy::new(|| OPERATIONS.iter().map(|op| (op.key(), op)).collect());

pub fn operations() -> &'static [OperationDef] {
    OPERATIONS
}

pub fn resources() -> Vec<&'static str> {
    OPERATIONS
        .iter()
        .map(|op| op.resource)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn find_operation(resource: &str, operation: &str) -> Result<&'static OperationDef, HubError> {
    let resource = resource.trim();
    let operation = operation.trim();
    if let Some(op) = OPERATION_MAP.get(&format!("{}/{}", resource, operation)) {
        return Ok(*op);
    }

    let known = resources();
    if !known.iter().any(|known| *known == resource) {
        return Err(with_suggestions(
            HubError::unknown_operation(format!("Unknown resource '{}'", resource)),
            suggest(resource, known.iter().copied(), 3),
        ));
    }
    let candidates: Vec<&str> = OPERATIONS
        .iter()
        .filter(|op| op.resource == resource)
        .map(|op| op.operation)
        .collect();
    Err(with_suggestions(
        HubError::unknown_operation(format!(
            "Unknown operation '{}' for resource '{}'",
            operation, resource
        )),
        suggest(operation, candidates, 3),
    ))
}

fn with_suggestions(err: HubError, suggestions: Vec<String>) -> HubError {
    if suggestions.is_empty() {
        return err;
    }
    err.with_hint(format!("Did you mean: {}?", suggestions.join(", ")))
}

fn path_value(params: &Map<String, Value>, param: &PathParam) -> Result<String, HubError> {
    let raw = match params.get(param.name) {
        Some(Value::String(value)) => value.trim().to_string(),
        Some(Value::Number(value)) => value.to_string(),
        Some(Value::Null) | None => String::new(),
        Some(_) => {
            return Err(HubError::invalid_parameter(format!(
                "Parameter '{}' must be a string or number",
                param.name
            )))
        }
    };
    if raw.is_empty() {
        return Err(HubError::invalid_parameter(format!(
            "Parameter '{}' is required",
            param.name
        )));
    }
    let valid = match param.kind {
        ParamKind::Identifier => IDENTIFIER_RE.is_match(&raw),
        ParamKind::PluginName => PLUGIN_NAME_RE.is_match(&raw),
        ParamKind::Text => true,
    };
    if !valid {
        return Err(HubError::invalid_parameter(format!(
            "Parameter '{}' has an invalid value '{}'",
            param.name, raw
        )));
    }
    Ok(raw)
}

fn build_body(
    spec: BodySpec,
    params: &Map<String, Value>,
) -> Result<Option<Map<String, Value>>, HubError> {
    match spec {
        BodySpec::None => Ok(None),
        BodySpec::Param(name) => match params.get(name) {
            Some(Value::Object(map)) => Ok(Some(map.clone())),
            Some(Value::String(text)) => match serde_json::from_str::<Value>(text) {
                Ok(Value::Object(map)) => Ok(Some(map)),
                _ => Err(HubError::invalid_parameter(format!(
                    "Parameter '{}' must be a JSON object",
                    name
                ))),
            },
            Some(Value::Null) | None => Err(HubError::invalid_parameter(format!(
                "Parameter '{}' is required",
                name
            ))),
            Some(_) => Err(HubError::invalid_parameter(format!(
                "Parameter '{}' must be a JSON object",
                name
            ))),
        },
        BodySpec::Fields(fields) => {
            let body: Map<String, Value> = fields
                .iter()
                .filter_map(|field| {
                    params
                        .get(*field)
                        .filter(|v| !v.is_null())
                        .map(|v| (field.to_string(), v.clone()))
                })
                .collect();
            Ok((!body.is_empty()).then_some(body))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use serde_json::json;

    fn params(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn covers_every_resource_category() {
        assert_eq!(
            resources(),
            vec![
                "accessories",
                "auth",
                "backups",
                "batch",
                "config",
                "logs",
                "platform",
                "plugins",
                "server",
                "status",
                "users"
            ]
        );
    }

    #[test]
    fn keys_are_unique() {
        let keys: BTreeSet<String> = OPERATIONS.iter().map(OperationDef::key).collect();
        assert_eq!(keys.len(), OPERATIONS.len());
    }

    #[test]
    fn placeholders_match_declared_params() {
        for op in OPERATIONS {
            let declared = op.path_params.len();
            let found = op.path.matches('{').count();
            assert_eq!(declared, found, "{}", op.key());
            for param in op.path_params {
                assert!(op.path.contains(&format!("{{{}}}", param.name)), "{}", op.key());
            }
        }
    }

    #[test]
    fn only_get_operations_are_pageable() {
        for op in OPERATIONS.iter().filter(|op| op.pageable) {
            assert_eq!(op.method, HttpMethod::Get, "{}", op.key());
        }
    }

    #[test]
    fn unknown_operation_suggests_close_names() {
        let err = find_operation("accessories", "lst").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownOperation);
        assert_eq!(err.hint.as_deref(), Some("Did you mean: list?"));

        let err = find_operation("acessories", "list").unwrap_err();
        assert_eq!(err.description, "Unknown resource 'acessories'");
        assert_eq!(err.hint.as_deref(), Some("Did you mean: accessories?"));
    }

    #[test]
    fn fills_and_encodes_scoped_plugin_names() {
        let op = find_operation("plugins", "lookup").unwrap();
        let descriptor = op
            .descriptor(&params(json!({"pluginName": "@scope/homebridge-foo"})))
            .unwrap();
        assert_eq!(descriptor.path, "/api/plugins/lookup/%40scope%2Fhomebridge-foo");
        assert_eq!(descriptor.method, HttpMethod::Get);
    }

    #[test]
    fn rejects_invalid_path_params() {
        let op = find_operation("plugins", "lookup").unwrap();
        let err = op
            .descriptor(&params(json!({"pluginName": "../../etc"})))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidParameter);

        let op = find_operation("users", "delete").unwrap();
        let err = op.descriptor(&params(json!({"userId": "  "}))).unwrap_err();
        assert_eq!(err.description, "Parameter 'userId' is required");

        let descriptor = op.descriptor(&params(json!({"userId": 7}))).unwrap();
        assert_eq!(descriptor.path, "/api/users/7");
    }

    #[test]
    fn text_params_are_percent_encoded() {
        let op = find_operation("plugins", "search").unwrap();
        let descriptor = op
            .descriptor(&params(json!({"query": "smart plug"})))
            .unwrap();
        assert_eq!(descriptor.path, "/api/plugins/search/smart%20plug");
    }

    #[test]
    fn field_bodies_skip_absent_values() {
        let op = find_operation("accessories", "set_characteristic").unwrap();
        let descriptor = op
            .descriptor(&params(json!({
                "uniqueId": "abc123",
                "characteristicType": "On",
                "value": true,
                "ignored": 1
            })))
            .unwrap();
        assert_eq!(descriptor.method, HttpMethod::Put);
        assert_eq!(
            descriptor.body,
            Some(params(json!({"characteristicType": "On", "value": true})))
        );

        let op = find_operation("server", "restart").unwrap();
        assert_eq!(op.descriptor(&Map::new()).unwrap().body, None);
    }

    #[test]
    fn param_bodies_accept_objects_and_json_strings() {
        let op = find_operation("config", "update").unwrap();
        let from_object = op
            .descriptor(&params(json!({"config": {"bridge": {"name": "Hub"}}})))
            .unwrap();
        let from_string = op
            .descriptor(&params(json!({"config": "{\"bridge\":{\"name\":\"Hub\"}}"})))
            .unwrap();
        assert_eq!(from_object.body, from_string.body);

        let err = op
            .descriptor(&params(json!({"config": "[1,2]"})))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidParameter);
    }

    #[test]
    fn optional_query_values_are_copied() {
        let op = find_operation("logs", "download").unwrap();
        let descriptor = op.descriptor(&params(json!({"colour": "yes"}))).unwrap();
        assert_eq!(descriptor.query, Some(params(json!({"colour": "yes"}))));
        assert_eq!(op.descriptor(&Map::new()).unwrap().query, None);
    }
}
