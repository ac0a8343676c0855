mod common;

use axum::http::StatusCode;
use common::{seed_roles, spawn_app};
use serde_json::{json, Value};

fn valid_payload() -> Value {
    json!({
        "server": "imap.example.com",
        "port": 993,
        "email": "courses@example.com",
        "password": "hunter2",
    })
}

#[tokio::test]
async fn anonymous_requests_are_rejected() {
    let app = spawn_app().await;
    let roles = seed_roles(&app).await;
    let server = app.server();
    let org = roles.organization.id;

    let response = server
        .get(&format!("/api/organizations/{org}/imap-connections"))
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>(), json!({ "error": "Unauthorized" }));
}

#[tokio::test]
async fn listing_starts_empty() {
    let app = spawn_app().await;
    let roles = seed_roles(&app).await;
    let server = app.server();
    let org = roles.organization.id;

    let response = server
        .get(&format!("/api/organizations/{org}/imap-connections"))
        .authorization_bearer(&roles.viewer.token)
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({ "imap_connections": [] }));
}

#[tokio::test]
async fn create_and_list_never_expose_the_password() {
    let app = spawn_app().await;
    let roles = seed_roles(&app).await;
    let server = app.server();
    let org = roles.organization.id;

    let response = server
        .post(&format!("/api/organizations/{org}/imap-connections/"))
        .authorization_bearer(&roles.editor.token)
        .json(&valid_payload())
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body["server"], "imap.example.com");
    assert_eq!(body["port"], 993);
    assert_eq!(body["email"], "courses@example.com");
    assert_eq!(body["organization_id"], org);
    assert!(body.get("password").is_none());

    let listed: Value = server
        .get(&format!("/api/organizations/{org}/imap-connections"))
        .authorization_bearer(&roles.viewer.token)
        .await
        .json();
    let connections = listed["imap_connections"].as_array().expect("array");
    assert_eq!(connections.len(), 1);
    assert!(connections[0].get("password").is_none());
}

#[tokio::test]
async fn port_accepts_quoted_numbers() {
    let app = spawn_app().await;
    let roles = seed_roles(&app).await;
    let server = app.server();
    let org = roles.organization.id;

    // The connection form posts the port as text.
    let response = server
        .post(&format!("/api/organizations/{org}/imap-connections/"))
        .authorization_bearer(&roles.editor.token)
        .json(&json!({
            "server": "imap.example.com",
            "port": "143",
            "email": "courses@example.com",
            "password": "hunter2",
        }))
        .await;
    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.json::<Value>()["port"], 143);
}

#[tokio::test]
async fn invalid_ports_are_rejected() {
    let app = spawn_app().await;
    let roles = seed_roles(&app).await;
    let server = app.server();
    let org = roles.organization.id;

    let mut missing = valid_payload();
    missing.as_object_mut().expect("object").remove("port");

    let payloads = [
        missing,
        json!({
            "server": "imap.example.com",
            "port": "not-a-port",
            "email": "courses@example.com",
            "password": "hunter2",
        }),
        json!({
            "server": "imap.example.com",
            "port": -1,
            "email": "courses@example.com",
            "password": "hunter2",
        }),
    ];
    for payload in payloads {
        let response = server
            .post(&format!("/api/organizations/{org}/imap-connections/"))
            .authorization_bearer(&roles.editor.token)
            .json(&payload)
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn viewer_cannot_create_connections() {
    let app = spawn_app().await;
    let roles = seed_roles(&app).await;
    let server = app.server();
    let org = roles.organization.id;

    let response = server
        .post(&format!("/api/organizations/{org}/imap-connections/"))
        .authorization_bearer(&roles.viewer.token)
        .json(&valid_payload())
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn outsider_cannot_list_connections() {
    let app = spawn_app().await;
    let roles = seed_roles(&app).await;
    let server = app.server();
    let org = roles.organization.id;

    let response = server
        .get(&format!("/api/organizations/{org}/imap-connections"))
        .authorization_bearer(&roles.outsider.token)
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
}
