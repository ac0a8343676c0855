//! JSON API request handlers.
//!
//! Payloads arrive as loose JSON and are validated field by field, so a bad
//! request names the offending field instead of failing wholesale.

pub mod accounts;
pub mod courses;
pub mod imap_connections;
pub mod organizations;
pub mod session;

use entity::organization;
use sea_orm::{DatabaseConnection, EntityTrait};
use serde_json::Value;

use crate::error::ApiError;

/// A required string field: present, a string, non-blank after trimming.
pub(crate) fn required_string(payload: &Value, key: &str) -> Result<String, ApiError> {
    match payload.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(ApiError::bad_request(format!("Field '{key}' is required."))),
    }
}

/// An optional string field. Absent and null both read as `None`.
pub(crate) fn optional_string(payload: &Value, key: &str) -> Result<Option<String>, ApiError> {
    match payload.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ApiError::bad_request(format!(
            "Field '{key}' must be a string."
        ))),
    }
}

pub(crate) fn optional_bool(payload: &Value, key: &str) -> Result<Option<bool>, ApiError> {
    match payload.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(ApiError::bad_request(format!(
            "Field '{key}' must be a boolean."
        ))),
    }
}

/// An optional integer field. Strictly numeric; quoted numbers are rejected.
pub(crate) fn optional_int(payload: &Value, key: &str) -> Result<Option<i32>, ApiError> {
    let invalid = || ApiError::bad_request(format!("Field '{key}' must be an integer."));
    match payload.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .and_then(|v| i32::try_from(v).ok())
            .map(Some)
            .ok_or_else(invalid),
        Some(_) => Err(invalid()),
    }
}

/// An integer that browser clients may also send as a quoted string,
/// typically a value round-tripped through localStorage.
pub(crate) fn lenient_int(value: &Value) -> Option<i32> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|v| i32::try_from(v).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// 404 when the organization in the path does not exist. Callers check
/// membership first, so for regular members this can no longer fail.
pub(crate) async fn ensure_organization(
    db: &DatabaseConnection,
    organization_id: i32,
) -> Result<(), ApiError> {
    if organization::Entity::find_by_id(organization_id)
        .one(db)
        .await?
        .is_none()
    {
        return Err(ApiError::NotFound("Organization not found.".to_string()));
    }
    Ok(())
}
