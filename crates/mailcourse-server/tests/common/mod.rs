//! Shared fixtures for the API tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use entity::{organization, organization_user, session, user};
use migration::{Migrator, MigratorTrait};
use sea_orm::{
    ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait, Set,
};

use mailcourse_server::assets::ViteManifest;
use mailcourse_server::util::{generate_session_token, now_ts};
use mailcourse_server::{build_router, crypto, AppState, Config};

pub const PASSWORD: &str = "correct horse battery staple";

/// Low round count keeps seeding cheap; production rounds come from config.
const TEST_PBKDF2_ITERATIONS: u32 = 1_000;

pub struct TestApp {
    pub db: DatabaseConnection,
    pub router: Router,
}

pub async fn spawn_app() -> TestApp {
    let mut options = ConnectOptions::new("sqlite::memory:");
    // A single pooled connection, so every query sees the same in-memory
    // database.
    options.max_connections(1);
    let db = Database::connect(options)
        .await
        .expect("connect to in-memory sqlite");
    Migrator::up(&db, None).await.expect("run migrations");

    let state = Arc::new(AppState {
        db: db.clone(),
        config: Config::default(),
        manifest: ViteManifest::default(),
    });
    TestApp {
        router: build_router(state),
        db,
    }
}

/// A logged-in user and the bearer token for its session.
pub struct Account {
    pub user: user::Model,
    pub token: String,
}

/// One organization with a member of every role, a superadmin, and an
/// authenticated outsider with no memberships at all.
pub struct Roles {
    pub organization: organization::Model,
    pub superadmin: Account,
    pub admin: Account,
    pub editor: Account,
    pub viewer: Account,
    pub outsider: Account,
}

pub async fn seed_roles(app: &TestApp) -> Roles {
    let organization = app.create_organization("Test Organization").await;

    let superadmin = app.account("superadmin", true).await;
    let admin = app.account("platformadmin", false).await;
    let editor = app.account("editor", false).await;
    let viewer = app.account("viewer", false).await;
    let outsider = app.account("outsider", false).await;

    app.add_membership(admin.user.id, organization.id, "admin")
        .await;
    app.add_membership(editor.user.id, organization.id, "editor")
        .await;
    app.add_membership(viewer.user.id, organization.id, "viewer")
        .await;

    Roles {
        organization,
        superadmin,
        admin,
        editor,
        viewer,
        outsider,
    }
}

impl TestApp {
    pub fn server(&self) -> TestServer {
        TestServer::new(self.router.clone()).expect("start test server")
    }

    pub async fn account(&self, username: &str, superadmin: bool) -> Account {
        let user = self.create_user(username, superadmin).await;
        let token = self.force_login(user.id).await;
        Account { user, token }
    }

    pub async fn create_user(&self, username: &str, superadmin: bool) -> user::Model {
        let now = now_ts();
        user::ActiveModel {
            username: Set(username.to_string()),
            email: Set(format!("{username}@example.com")),
            password_hash: Set(crypto::encode_password(PASSWORD, TEST_PBKDF2_ITERATIONS)),
            is_superadmin: Set(superadmin),
            enabled: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .expect("insert user")
    }

    pub async fn disable_user(&self, user_id: i32) {
        let found = user::Entity::find_by_id(user_id)
            .one(&self.db)
            .await
            .expect("query user")
            .expect("user exists");
        let mut active: user::ActiveModel = found.into();
        active.enabled = Set(false);
        active.update(&self.db).await.expect("update user");
    }

    pub async fn create_organization(&self, name: &str) -> organization::Model {
        let now = now_ts();
        organization::ActiveModel {
            name: Set(name.to_string()),
            description: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .expect("insert organization")
    }

    pub async fn add_membership(&self, user_id: i32, organization_id: i32, role: &str) {
        organization_user::ActiveModel {
            user_id: Set(user_id),
            organization_id: Set(organization_id),
            role: Set(role.to_string()),
            created_at: Set(now_ts()),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .expect("insert membership");
    }

    /// Creates a session row directly, skipping the login endpoint.
    pub async fn force_login(&self, user_id: i32) -> String {
        let now = now_ts();
        let token = generate_session_token();
        session::ActiveModel {
            token: Set(token.clone()),
            user_id: Set(user_id),
            active_organization_id: Set(None),
            created_at: Set(now),
            expires_at: Set(now + 3_600),
            ..Default::default()
        }
        .insert(&self.db)
        .await
        .expect("insert session");
        token
    }
}
