//! Web server for the mailcourse learning platform.
//!
//! Organizations run email-based courses; admins manage them through a JSON
//! API and a handful of server-rendered platform pages that host the React
//! frontend.

pub mod assets;
pub mod auth;
pub mod config;
pub mod crypto;
pub mod error;
pub mod handlers;
pub mod pages;
pub mod prebuild;
pub mod routes;
pub mod state;
pub mod util;

pub use config::Config;
pub use routes::build_router;
pub use state::AppState;
