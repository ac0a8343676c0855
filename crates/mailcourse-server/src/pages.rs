//! Server-rendered platform pages.
//!
//! Each page is a static HTML shell the React frontend mounts into; the only
//! server-side work is splicing vite asset tags into the marker comment.
//! Templates rewritten by the prebuild step carry no marker and pass through
//! unchanged.

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;

use crate::assets::render_asset_markers;
use crate::error::ApiError;
use crate::state::AppState;

pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    render_page(&state, "index").await
}

pub async fn courses(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    render_page(&state, "courses").await
}

pub async fn organizations(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    render_page(&state, "organizations").await
}

pub async fn users(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    render_page(&state, "users").await
}

async fn render_page(state: &AppState, name: &str) -> Result<Html<String>, ApiError> {
    let path = PathBuf::from(&state.config.templates_dir)
        .join("platform")
        .join(format!("{name}.html"));
    let template = tokio::fs::read_to_string(&path)
        .await
        .map_err(|err| ApiError::Internal(format!("failed to read {}: {err}", path.display())))?;
    Ok(Html(render_asset_markers(
        &template,
        &state.manifest,
        &state.config.static_url,
    )))
}
