//! Active organization selection for the current session.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use entity::{organization, session};
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde_json::{json, Value};

use crate::auth::{require_member, AuthUser};
use crate::error::ApiError;
use crate::state::AppState;

use super::lenient_int;

/// Remembers which organization the caller is currently working in. The
/// choice lives on the session row, so it survives page reloads but not a
/// new login.
pub async fn update_session(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(payload) = payload?;
    let organization_id = payload
        .get("active_organization_id")
        .and_then(lenient_int)
        .ok_or_else(|| {
            ApiError::bad_request("Field 'active_organization_id' must be an integer.")
        })?;

    require_member(&state.db, &auth, organization_id).await?;
    if organization::Entity::find_by_id(organization_id)
        .one(&state.db)
        .await?
        .is_none()
    {
        return Err(ApiError::Forbidden);
    }

    let mut active: session::ActiveModel = auth.session.into();
    active.active_organization_id = Set(Some(organization_id));
    let updated = active.update(&state.db).await?;

    Ok(Json(
        json!({ "active_organization_id": updated.active_organization_id }),
    ))
}
