use sea_orm::DatabaseConnection;

use crate::assets::ViteManifest;
use crate::config::Config;

/// Shared application state handed to every request handler.
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Config,
    pub manifest: ViteManifest,
}
