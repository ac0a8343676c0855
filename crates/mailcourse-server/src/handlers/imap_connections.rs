//! IMAP connection management.
//!
//! Courses deliver their lessons over mail; each organization stores the
//! mailbox accounts used for that. The stored password never leaves the
//! server, so responses carry every column except it.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use entity::imap_connection;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use serde_json::{json, Value};

use crate::auth::{require_member, require_writer, AuthUser};
use crate::error::ApiError;
use crate::state::AppState;
use crate::util::now_ts;

use super::{ensure_organization, lenient_int, required_string};

fn imap_connection_json(connection: &imap_connection::Model) -> Value {
    json!({
        "id": connection.id,
        "organization_id": connection.organization_id,
        "server": connection.server,
        "port": connection.port,
        "email": connection.email,
    })
}

pub async fn list_imap_connections(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(organization_id): Path<i32>,
) -> Result<Json<Value>, ApiError> {
    require_member(&state.db, &auth, organization_id).await?;
    ensure_organization(&state.db, organization_id).await?;

    let connections: Vec<Value> = imap_connection::Entity::find()
        .filter(imap_connection::Column::OrganizationId.eq(organization_id))
        .order_by_asc(imap_connection::Column::Id)
        .all(&state.db)
        .await?
        .iter()
        .map(imap_connection_json)
        .collect();
    Ok(Json(json!({ "imap_connections": connections })))
}

pub async fn create_imap_connection(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(organization_id): Path<i32>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    require_writer(&state.db, &auth, organization_id).await?;
    ensure_organization(&state.db, organization_id).await?;

    let Json(payload) = payload?;
    let server = required_string(&payload, "server")?;
    let email = required_string(&payload, "email")?;
    let password = required_string(&payload, "password")?;
    let port = port_field(&payload)?;

    let now = now_ts();
    let created = imap_connection::ActiveModel {
        organization_id: Set(organization_id),
        server: Set(server),
        port: Set(port),
        email: Set(email),
        password: Set(password),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    tracing::info!(
        imap_connection_id = created.id,
        organization_id,
        "imap connection created"
    );
    Ok((StatusCode::CREATED, Json(imap_connection_json(&created))).into_response())
}

/// The connection form posts the port as text, so a quoted number is fine.
fn port_field(payload: &Value) -> Result<i32, ApiError> {
    let invalid = || ApiError::bad_request("Field 'port' must be a positive integer.");
    let value = payload.get("port").ok_or_else(invalid)?;
    let port = lenient_int(value).ok_or_else(invalid)?;
    if port <= 0 {
        return Err(invalid());
    }
    Ok(port)
}
