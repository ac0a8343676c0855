//! Course CRUD inside an organization.
//!
//! All routes are scoped by the organization path segment, and membership is
//! checked before anything else. Outsiders get the same 403 whether or not
//! the organization exists.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use entity::{course, imap_connection};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::{require_member, require_writer, AuthUser};
use crate::error::ApiError;
use crate::state::AppState;
use crate::util::now_ts;

use super::{ensure_organization, optional_bool, optional_int, optional_string, required_string};

fn course_json(course: &course::Model) -> Value {
    json!({
        "id": course.id,
        "organization_id": course.organization_id,
        "title": course.title,
        "slug": course.slug,
        "description": course.description,
        "enabled": course.enabled,
        "imap_connection_id": course.imap_connection_id,
    })
}

#[derive(Debug, Deserialize)]
pub struct CourseListQuery {
    enabled: Option<String>,
}

/// Lists the organization's courses in creation order. `?enabled=true` and
/// `?enabled=false` filter; any other value lists everything.
pub async fn list_courses(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(organization_id): Path<i32>,
    Query(query): Query<CourseListQuery>,
) -> Result<Json<Value>, ApiError> {
    require_member(&state.db, &auth, organization_id).await?;
    ensure_organization(&state.db, organization_id).await?;

    let mut select = course::Entity::find()
        .filter(course::Column::OrganizationId.eq(organization_id))
        .order_by_asc(course::Column::Id);
    match query.enabled.as_deref() {
        Some("true") => select = select.filter(course::Column::Enabled.eq(true)),
        Some("false") => select = select.filter(course::Column::Enabled.eq(false)),
        _ => {}
    }

    let courses: Vec<Value> = select
        .all(&state.db)
        .await?
        .iter()
        .map(course_json)
        .collect();
    Ok(Json(json!({ "courses": courses })))
}

pub async fn get_course(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path((organization_id, course_id)): Path<(i32, i32)>,
) -> Result<Json<Value>, ApiError> {
    require_member(&state.db, &auth, organization_id).await?;

    let Some(found) = find_course(&state.db, organization_id, course_id).await? else {
        return Err(ApiError::NotFound("Course not found.".to_string()));
    };
    Ok(Json(course_json(&found)))
}

/// Creates a course. New courses start disabled; they are switched on from
/// the course list once content is in place.
pub async fn create_course(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path(organization_id): Path<i32>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    require_writer(&state.db, &auth, organization_id).await?;
    ensure_organization(&state.db, organization_id).await?;

    let Json(payload) = payload?;
    let title = required_string(&payload, "title")?;
    let slug = required_string(&payload, "slug")?;
    let description = optional_string(&payload, "description")?;
    let imap_connection_id = optional_int(&payload, "imap_connection_id")?;

    if let Some(id) = imap_connection_id {
        ensure_imap_connection(&state.db, organization_id, id).await?;
    }

    let duplicate = course::Entity::find()
        .filter(course::Column::OrganizationId.eq(organization_id))
        .filter(course::Column::Slug.eq(slug.as_str()))
        .one(&state.db)
        .await?;
    if duplicate.is_some() {
        return Err(ApiError::conflict("Course with this slug already exists."));
    }

    let now = now_ts();
    let created = course::ActiveModel {
        organization_id: Set(organization_id),
        title: Set(title),
        slug: Set(slug),
        description: Set(description),
        enabled: Set(false),
        imap_connection_id: Set(imap_connection_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    tracing::info!(
        course_id = created.id,
        organization_id,
        "course created"
    );
    Ok((StatusCode::CREATED, Json(course_json(&created))).into_response())
}

/// Partial update. The slug is the course's address and cannot be changed.
///
/// The IMAP link is driven by two fields: `imap_connection_id` attaches a
/// connection, `reset_imap_connection: true` detaches the current one.
/// Sending both is contradictory and rejected before anything is looked up.
pub async fn update_course(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path((organization_id, course_id)): Path<(i32, i32)>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    require_writer(&state.db, &auth, organization_id).await?;

    let Json(payload) = payload?;
    if payload.get("slug").is_some() {
        return Err(ApiError::bad_request("Slug cannot be changed."));
    }

    let title = match payload.get("title") {
        None | Some(Value::Null) => None,
        Some(_) => Some(required_string(&payload, "title")?),
    };
    let description = optional_string(&payload, "description")?;
    let enabled = optional_bool(&payload, "enabled")?;
    let imap_connection_id = optional_int(&payload, "imap_connection_id")?;
    let reset_imap_connection = optional_bool(&payload, "reset_imap_connection")?.unwrap_or(false);

    if reset_imap_connection && imap_connection_id.is_some() {
        return Err(ApiError::conflict(
            "Cannot set imap_connection_id when reset_imap_connection is True.",
        ));
    }

    let Some(found) = find_course(&state.db, organization_id, course_id).await? else {
        return Err(ApiError::conflict("Course not found."));
    };

    if let Some(id) = imap_connection_id {
        ensure_imap_connection(&state.db, organization_id, id).await?;
    }

    let mut active: course::ActiveModel = found.into();
    if let Some(title) = title {
        active.title = Set(title);
    }
    if let Some(description) = description {
        active.description = Set(Some(description));
    }
    if let Some(enabled) = enabled {
        active.enabled = Set(enabled);
    }
    if reset_imap_connection {
        active.imap_connection_id = Set(None);
    } else if let Some(id) = imap_connection_id {
        active.imap_connection_id = Set(Some(id));
    }
    active.updated_at = Set(now_ts());

    let updated = active.update(&state.db).await?;
    Ok(Json(course_json(&updated)))
}

pub async fn delete_course(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    Path((organization_id, course_id)): Path<(i32, i32)>,
) -> Result<Json<Value>, ApiError> {
    require_writer(&state.db, &auth, organization_id).await?;

    let result = course::Entity::delete_many()
        .filter(course::Column::Id.eq(course_id))
        .filter(course::Column::OrganizationId.eq(organization_id))
        .exec(&state.db)
        .await?;
    if result.rows_affected == 0 {
        return Err(ApiError::conflict("Course not found."));
    }

    tracing::info!(course_id, organization_id, "course deleted");
    Ok(Json(json!({})))
}

async fn find_course(
    db: &DatabaseConnection,
    organization_id: i32,
    course_id: i32,
) -> Result<Option<course::Model>, ApiError> {
    Ok(course::Entity::find()
        .filter(course::Column::Id.eq(course_id))
        .filter(course::Column::OrganizationId.eq(organization_id))
        .one(db)
        .await?)
}

/// An IMAP connection can only be attached inside its own organization.
async fn ensure_imap_connection(
    db: &DatabaseConnection,
    organization_id: i32,
    imap_connection_id: i32,
) -> Result<(), ApiError> {
    let found = imap_connection::Entity::find()
        .filter(imap_connection::Column::Id.eq(imap_connection_id))
        .filter(imap_connection::Column::OrganizationId.eq(organization_id))
        .one(db)
        .await?;
    if found.is_none() {
        return Err(ApiError::bad_request(
            "Unknown imap_connection_id for this organization.",
        ));
    }
    Ok(())
}
