//! Organization listing and creation.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use entity::{organization, organization_user};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde_json::{json, Value};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::state::AppState;
use crate::util::now_ts;

use super::{optional_string, required_string};

fn organization_json(org: &organization::Model) -> Value {
    json!({
        "id": org.id,
        "name": org.name,
        "description": org.description,
    })
}

/// Superadmins see every organization; everyone else only the ones they
/// belong to.
pub async fn list_organizations(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<Value>, ApiError> {
    let select = organization::Entity::find().order_by_asc(organization::Column::Id);
    let organizations = if auth.user.is_superadmin {
        select.all(&state.db).await?
    } else {
        let memberships = organization_user::Entity::find()
            .filter(organization_user::Column::UserId.eq(auth.user.id))
            .all(&state.db)
            .await?;
        let ids: Vec<i32> = memberships.iter().map(|m| m.organization_id).collect();
        select
            .filter(organization::Column::Id.is_in(ids))
            .all(&state.db)
            .await?
    };

    let organizations: Vec<Value> = organizations.iter().map(organization_json).collect();
    Ok(Json(json!({ "organizations": organizations })))
}

/// Organizations are a platform-wide resource; only superadmins create them.
pub async fn create_organization(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    if !auth.user.is_superadmin {
        return Err(ApiError::Forbidden);
    }

    let Json(payload) = payload?;
    let name = required_string(&payload, "name")?;
    let description = optional_string(&payload, "description")?;

    let now = now_ts();
    let created = organization::ActiveModel {
        name: Set(name),
        description: Set(description),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    tracing::info!(organization_id = created.id, "organization created");
    Ok((StatusCode::CREATED, Json(organization_json(&created))).into_response())
}
