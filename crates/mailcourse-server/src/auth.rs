//! Session authentication and organization role checks.
//!
//! A login stores a random token in the `sessions` table. Requests present it
//! either as the `sessionid` cookie (browser flow) or as a bearer token in the
//! `Authorization` header. Expired sessions stay in the table until the row is
//! replaced by a new login; they simply stop authenticating.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::header;
use axum::http::request::Parts;
use entity::{organization_user, session, user, OrganizationRole};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use crate::error::ApiError;
use crate::state::AppState;
use crate::util::now_ts;

pub const SESSION_COOKIE: &str = "sessionid";

/// An authenticated caller: the user plus the session row that admitted them.
pub struct AuthUser {
    pub user: user::Model,
    pub session: session::Model,
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = extract_token(parts).ok_or(ApiError::Unauthorized)?;
        authenticate_token(&state.db, &token).await
    }
}

/// Looks up a session token and resolves it to a user.
///
/// Unknown, expired or orphaned tokens all answer 401; a disabled account
/// answers 403 so the client knows the credentials themselves were fine.
pub async fn authenticate_token(
    db: &DatabaseConnection,
    token: &str,
) -> Result<AuthUser, ApiError> {
    let Some(found) = session::Entity::find()
        .filter(session::Column::Token.eq(token))
        .one(db)
        .await?
    else {
        return Err(ApiError::Unauthorized);
    };

    if found.expires_at <= now_ts() {
        return Err(ApiError::Unauthorized);
    }

    let Some(account) = user::Entity::find_by_id(found.user_id).one(db).await? else {
        return Err(ApiError::Unauthorized);
    };

    if !account.enabled {
        return Err(ApiError::Forbidden);
    }

    Ok(AuthUser {
        user: account,
        session: found,
    })
}

fn extract_token(parts: &Parts) -> Option<String> {
    if let Some(token) = cookie_token(parts) {
        return Some(token);
    }
    bearer_token(parts)
}

fn cookie_token(parts: &Parts) -> Option<String> {
    let cookies = parts.headers.get(header::COOKIE)?.to_str().ok()?;
    for pair in cookies.split(';') {
        let mut halves = pair.trim().splitn(2, '=');
        let (Some(name), Some(value)) = (halves.next(), halves.next()) else {
            continue;
        };
        if name != SESSION_COOKIE {
            continue;
        }
        let value = value.trim().trim_matches('"');
        if !value.is_empty() {
            return Some(value.to_string());
        }
    }
    None
}

fn bearer_token(parts: &Parts) -> Option<String> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

/// The caller's role inside an organization, if they are a member.
pub async fn membership_role(
    db: &DatabaseConnection,
    user_id: i32,
    organization_id: i32,
) -> Result<Option<OrganizationRole>, ApiError> {
    let Some(row) = organization_user::Entity::find()
        .filter(organization_user::Column::UserId.eq(user_id))
        .filter(organization_user::Column::OrganizationId.eq(organization_id))
        .one(db)
        .await?
    else {
        return Ok(None);
    };
    Ok(OrganizationRole::parse(&row.role))
}

/// Any role grants read access; superadmins bypass membership entirely.
pub async fn require_member(
    db: &DatabaseConnection,
    auth: &AuthUser,
    organization_id: i32,
) -> Result<(), ApiError> {
    if auth.user.is_superadmin {
        return Ok(());
    }
    match membership_role(db, auth.user.id, organization_id).await? {
        Some(_) => Ok(()),
        None => Err(ApiError::Forbidden),
    }
}

/// Write access: admins and editors only. Membership is checked before the
/// organization itself, so outsiders cannot probe which ids exist.
pub async fn require_writer(
    db: &DatabaseConnection,
    auth: &AuthUser,
    organization_id: i32,
) -> Result<(), ApiError> {
    if auth.user.is_superadmin {
        return Ok(());
    }
    match membership_role(db, auth.user.id, organization_id).await? {
        Some(role) if role.can_write() => Ok(()),
        _ => Err(ApiError::Forbidden),
    }
}
