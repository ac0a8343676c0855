mod common;

use axum::http::StatusCode;
use common::{seed_roles, spawn_app};
use entity::session;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde_json::{json, Value};

#[tokio::test]
async fn member_selects_active_organization() {
    let app = spawn_app().await;
    let roles = seed_roles(&app).await;
    let server = app.server();
    let org = roles.organization.id;

    let response = server
        .post("/api/session")
        .authorization_bearer(&roles.viewer.token)
        .json(&json!({ "active_organization_id": org }))
        .await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>(),
        json!({ "active_organization_id": org })
    );

    // The choice is stored on the session row.
    let stored = session::Entity::find()
        .filter(session::Column::Token.eq(roles.viewer.token.as_str()))
        .one(&app.db)
        .await
        .expect("query session")
        .expect("session exists");
    assert_eq!(stored.active_organization_id, Some(org));
}

#[tokio::test]
async fn quoted_organization_id_is_accepted() {
    let app = spawn_app().await;
    let roles = seed_roles(&app).await;
    let server = app.server();
    let org = roles.organization.id;

    // Clients round-trip the id through localStorage, which stringifies it.
    let response = server
        .post("/api/session")
        .authorization_bearer(&roles.viewer.token)
        .json(&json!({ "active_organization_id": org.to_string() }))
        .await;
    response.assert_status_ok();
    assert_eq!(
        response.json::<Value>(),
        json!({ "active_organization_id": org })
    );
}

#[tokio::test]
async fn non_member_cannot_select_an_organization() {
    let app = spawn_app().await;
    let roles = seed_roles(&app).await;
    let server = app.server();
    let org = roles.organization.id;

    let response = server
        .post("/api/session")
        .authorization_bearer(&roles.outsider.token)
        .json(&json!({ "active_organization_id": org }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(response.json::<Value>(), json!({ "error": "Forbidden" }));
}

#[tokio::test]
async fn unknown_organization_is_forbidden() {
    let app = spawn_app().await;
    let roles = seed_roles(&app).await;
    let server = app.server();

    let response = server
        .post("/api/session")
        .authorization_bearer(&roles.superadmin.token)
        .json(&json!({ "active_organization_id": 9999 }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn invalid_payloads_are_rejected() {
    let app = spawn_app().await;
    let roles = seed_roles(&app).await;
    let server = app.server();

    for payload in [
        json!({}),
        json!({ "active_organization_id": "banana" }),
        json!({ "active_organization_id": null }),
    ] {
        let response = server
            .post("/api/session")
            .authorization_bearer(&roles.viewer.token)
            .json(&payload)
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn anonymous_requests_are_rejected() {
    let app = spawn_app().await;
    let roles = seed_roles(&app).await;
    let server = app.server();

    let response = server
        .post("/api/session")
        .json(&json!({ "active_organization_id": roles.organization.id }))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}
