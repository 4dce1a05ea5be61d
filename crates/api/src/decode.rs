//! Shape checks for loosely typed JSON payloads.

use serde_json::{Map, Value};
use tracing::warn;

use crate::error::{ApiError, Result};

pub(crate) fn parse_object(body: &[u8]) -> Result<Map<String, Value>> {
    match serde_json::from_slice::<Value>(body)? {
        Value::Object(map) => Ok(map),
        _ => Err(unexpected("<root>", "an object")),
    }
}

pub(crate) fn take_string(map: &mut Map<String, Value>, field: &'static str) -> Result<String> {
    match map.remove(field) {
        Some(Value::String(value)) => Ok(value),
        _ => Err(unexpected(field, "a string")),
    }
}

pub(crate) fn take_object(
    map: &mut Map<String, Value>,
    field: &'static str,
) -> Result<Map<String, Value>> {
    match map.remove(field) {
        Some(Value::Object(value)) => Ok(value),
        _ => Err(unexpected(field, "an object")),
    }
}

fn unexpected(field: &'static str, expected: &'static str) -> ApiError {
    warn!(field, expected, "Response does not have the expected shape");
    ApiError::UnexpectedShape { field, expected }
}
