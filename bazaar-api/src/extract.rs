/// Request extractors
///
/// - [`JsonObject`]: request body as a JSON object, with JSON error bodies
///   instead of axum's plain-text rejections
/// - [`UuidPath`]: `:id` path segment as a UUID, 404 when it is not one

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::ApiError;

/// JSON object request body
///
/// An empty body is treated as `{}` so that missing fields are reported
/// per field.
#[derive(Debug, Clone, Default)]
pub struct JsonObject(pub Map<String, Value>);

#[async_trait]
impl<S> FromRequest<S> for JsonObject
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;

        parse_object(&bytes).map(JsonObject)
    }
}

fn parse_object(bytes: &[u8]) -> Result<Map<String, Value>, ApiError> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }

    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| ApiError::BadRequest(format!("JSON parse error - {}", e)))?;

    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Err(ApiError::non_field("No data provided")),
        other => Err(ApiError::non_field(format!(
            "Invalid data. Expected a dictionary, but got {}.",
            type_name(&other)
        ))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Array(_) => "list",
        Value::String(_) => "str",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "int",
        Value::Null => "null",
        Value::Object(_) => "dict",
    }
}

/// UUID path parameter; anything else is reported as not found
#[derive(Debug, Clone, Copy)]
pub struct UuidPath(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for UuidPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::not_found())?;

        Uuid::parse_str(&id)
            .map(UuidPath)
            .map_err(|_| ApiError::not_found())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_body_is_empty_object() {
        assert!(parse_object(b"").unwrap().is_empty());
        assert!(parse_object(b"  \n").unwrap().is_empty());
    }

    #[test]
    fn test_object_body() {
        let map = parse_object(br#"{"username": "ale"}"#).unwrap();
        assert_eq!(map["username"], "ale");
    }

    #[test]
    fn test_malformed_json() {
        match parse_object(b"{not json") {
            Err(ApiError::BadRequest(msg)) => assert!(msg.starts_with("JSON parse error - ")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_non_object_json() {
        match parse_object(b"[1, 2]") {
            Err(ApiError::NonField(messages)) => assert_eq!(
                messages,
                vec!["Invalid data. Expected a dictionary, but got list.".to_string()]
            ),
            other => panic!("unexpected {:?}", other),
        }
    }
}
