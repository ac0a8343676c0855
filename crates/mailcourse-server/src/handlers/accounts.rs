//! Login and logout.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use entity::{session, user};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde_json::{json, Value};

use crate::auth::{AuthUser, SESSION_COOKIE};
use crate::crypto;
use crate::error::ApiError;
use crate::state::AppState;
use crate::util::{generate_session_token, now_ts};

use super::required_string;

/// Exchanges credentials for a fresh session. The token is set as an HttpOnly
/// cookie for browsers and also returned in the body for API clients, which
/// send it back as a bearer token.
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(payload) = payload?;
    let username = required_string(&payload, "username")?;
    let password = required_string(&payload, "password")?;

    let Some(account) = user::Entity::find()
        .filter(user::Column::Username.eq(username.as_str()))
        .one(&state.db)
        .await?
    else {
        return Err(ApiError::Unauthorized);
    };

    if !crypto::verify_encoded_password(&password, &account.password_hash) {
        return Err(ApiError::Unauthorized);
    }
    if !account.enabled {
        return Err(ApiError::Forbidden);
    }

    let now = now_ts();
    let token = generate_session_token();
    session::ActiveModel {
        token: Set(token.clone()),
        user_id: Set(account.id),
        active_organization_id: Set(None),
        created_at: Set(now),
        expires_at: Set(now + state.config.session_ttl_secs),
        ..Default::default()
    }
    .insert(&state.db)
    .await?;

    tracing::info!(user_id = account.id, "user logged in");

    let cookie = format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        state.config.session_ttl_secs
    );
    let body = json!({
        "id": account.id,
        "username": account.username,
        "email": account.email,
        "is_superadmin": account.is_superadmin,
        "token": token,
    });
    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)], Json(body)).into_response())
}

/// Deletes the current session and expires the cookie.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Response, ApiError> {
    session::Entity::delete_by_id(auth.session.id)
        .exec(&state.db)
        .await?;

    tracing::info!(user_id = auth.user.id, "user logged out");

    let cookie = format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie)], Json(json!({}))).into_response())
}
