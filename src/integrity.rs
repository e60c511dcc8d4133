//! Request pre-checks shared by the mutating endpoints
//!
//! Callers run them in a fixed order and stop at the first failure:
//! identifier syntax, existence, path/body id agreement, required fields.

use serde_json::Value;

use crate::error::{ApiError, ApiResult};
use crate::store::DocId;

/// Parse a path identifier, failing with `BadRequest(message)`
pub fn parse_id(raw: &str, message: &str) -> ApiResult<DocId> {
    DocId::parse(raw).ok_or_else(|| ApiError::bad_request(message))
}

/// First of `fields` (in the given order) absent from `body`.
///
/// A key holding `null` counts as present; a non-object body has no fields.
pub fn first_missing(body: &Value, fields: &[&'static str]) -> Option<&'static str> {
    fields
        .iter()
        .copied()
        .find(|f| body.as_object().is_none_or(|obj| !obj.contains_key(*f)))
}

pub fn require_fields(body: &Value, fields: &[&'static str]) -> ApiResult<()> {
    match first_missing(body, fields) {
        Some(field) => Err(ApiError::MissingField(field)),
        None => Ok(()),
    }
}

/// The body's `id` must name the same document as the path
pub fn ensure_ids_match(path_raw: &str, path_id: &DocId, body: &Value) -> ApiResult<()> {
    let body_id = body.get("id").or_else(|| body.get("_id"));
    let matches = body_id
        .and_then(Value::as_str)
        .and_then(DocId::parse)
        .is_some_and(|id| &id == path_id);

    if matches {
        return Ok(());
    }

    let shown = match body_id {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "none".to_string(),
    };
    Err(ApiError::bad_request(format!(
        "Request path id ({path_raw}) and request body id ({shown}) must match"
    )))
}

/// Read `field` as text. Numbers and booleans are stringified; `null`,
/// arrays and objects are rejected.
pub fn text_field(body: &Value, field: &str) -> ApiResult<Option<String>> {
    match body.get(field) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(_) => Err(ApiError::bad_request(format!("`{field}` must be a string"))),
    }
}
