//! Route table and middleware stack.

use std::sync::Arc;

use axum::http::{header, HeaderName, Method};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers::{accounts, courses, imap_connections, organizations, session};
use crate::pages;
use crate::state::AppState;

pub fn build_router(state: Arc<AppState>) -> Router {
    let organizations_routes =
        get(organizations::list_organizations).post(organizations::create_organization);
    let courses_routes = get(courses::list_courses).post(courses::create_course);
    let course_routes = get(courses::get_course)
        .post(courses::update_course)
        .delete(courses::delete_course);
    let imap_routes =
        get(imap_connections::list_imap_connections).post(imap_connections::create_imap_connection);

    // Browser clients are inconsistent about trailing slashes, so every API
    // resource is reachable both ways.
    let api = Router::new()
        .route("/login", post(accounts::login))
        .route("/login/", post(accounts::login))
        .route("/logout", post(accounts::logout))
        .route("/logout/", post(accounts::logout))
        .route("/session", post(session::update_session))
        .route("/session/", post(session::update_session))
        .route("/organizations", organizations_routes.clone())
        .route("/organizations/", organizations_routes)
        .route(
            "/organizations/{organization_id}/courses",
            courses_routes.clone(),
        )
        .route("/organizations/{organization_id}/courses/", courses_routes)
        .route(
            "/organizations/{organization_id}/courses/{course_id}",
            course_routes.clone(),
        )
        .route(
            "/organizations/{organization_id}/courses/{course_id}/",
            course_routes,
        )
        .route(
            "/organizations/{organization_id}/imap-connections",
            imap_routes.clone(),
        )
        .route(
            "/organizations/{organization_id}/imap-connections/",
            imap_routes,
        );

    let platform = Router::new()
        .route("/", get(pages::index))
        .route("/courses", get(pages::courses))
        .route("/courses/", get(pages::courses))
        .route("/organizations", get(pages::organizations))
        .route("/organizations/", get(pages::organizations))
        .route("/users", get(pages::users))
        .route("/users/", get(pages::users));

    // A nested "/" matches only the bare prefix, so the slash form of the
    // platform root needs its own top-level route.
    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .route("/platform/", get(pages::index))
        .nest("/platform", platform)
        .nest_service("/static", ServeDir::new(state.config.static_dir.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Mirrors the request origin so credentialed requests work from the vite
/// dev server without a fixed origin list.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
            HeaderName::from_static("x-csrftoken"),
            HeaderName::from_static("x-requested-with"),
        ])
}
