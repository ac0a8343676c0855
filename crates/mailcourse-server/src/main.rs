use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use entity::user;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, ColumnTrait, Database, DatabaseConnection, EntityTrait, QueryFilter, Set};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mailcourse_server::assets::ViteManifest;
use mailcourse_server::util::now_ts;
use mailcourse_server::{build_router, crypto, AppState, Config};

#[derive(Parser)]
#[command(name = "mailcourse-server", version, about = "Mailcourse learning platform server")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run migrations and serve the HTTP API and platform pages.
    Serve,
    /// Apply pending database migrations and exit.
    Migrate,
    /// Create a user account.
    CreateUser {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Grant access to every organization.
        #[arg(long)]
        superadmin: bool,
    },
    /// Bake built frontend asset tags into the platform templates.
    Prebuild {
        /// Project root containing dist/manifest.json and templates/.
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mailcourse_server=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Serve => serve().await,
        Command::Migrate => migrate().await,
        Command::CreateUser {
            username,
            email,
            password,
            superadmin,
        } => create_user(username, email, password, superadmin).await,
        Command::Prebuild { root } => mailcourse_server::prebuild::run(&root),
    }
}

async fn connect(config: &Config) -> Result<DatabaseConnection> {
    Database::connect(config.database_url.as_str())
        .await
        .with_context(|| format!("failed to connect to {}", config.database_url))
}

async fn serve() -> Result<()> {
    let config = Config::from_env().map_err(anyhow::Error::msg)?;
    let db = connect(&config).await?;

    Migrator::up(&db, None)
        .await
        .context("failed to run migrations")?;
    info!("database migrations applied");

    let manifest = ViteManifest::load(Path::new(&config.manifest_path));
    let listen_addr = config.listen_addr.clone();
    let state = Arc::new(AppState {
        db,
        config,
        manifest,
    });
    let app = build_router(state);

    let listener = TcpListener::bind(&listen_addr)
        .await
        .with_context(|| format!("failed to bind {listen_addr}"))?;
    info!(addr = %listen_addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

async fn migrate() -> Result<()> {
    let config = Config::from_env().map_err(anyhow::Error::msg)?;
    let db = connect(&config).await?;
    Migrator::up(&db, None)
        .await
        .context("failed to run migrations")?;
    info!("database migrations applied");
    Ok(())
}

async fn create_user(username: String, email: String, password: String, superadmin: bool) -> Result<()> {
    let config = Config::from_env().map_err(anyhow::Error::msg)?;
    let db = connect(&config).await?;
    Migrator::up(&db, None)
        .await
        .context("failed to run migrations")?;

    let username = username.trim().to_string();
    if username.is_empty() {
        bail!("username must not be blank");
    }
    let existing = user::Entity::find()
        .filter(user::Column::Username.eq(username.as_str()))
        .one(&db)
        .await?;
    if existing.is_some() {
        bail!("user '{username}' already exists");
    }

    let now = now_ts();
    let created = user::ActiveModel {
        username: Set(username),
        email: Set(email.trim().to_string()),
        password_hash: Set(crypto::encode_password(&password, config.pbkdf2_iterations)),
        is_superadmin: Set(superadmin),
        enabled: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await?;

    println!("Created user '{}' (id {})", created.username, created.id);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        return;
    }
    info!("shutting down");
}
