//! Runtime configuration, read from the environment.

use std::env;

/// Server settings resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// sea-orm connection string, e.g. `sqlite://mailcourse.db?mode=rwc`.
    pub database_url: String,
    /// Socket address the HTTP server binds to.
    pub listen_addr: String,
    /// URL prefix under which built frontend assets are served. Always ends with `/`.
    pub static_url: String,
    /// Directory served at `static_url`.
    pub static_dir: String,
    /// Directory holding the platform page templates.
    pub templates_dir: String,
    /// Path to the vite `manifest.json` produced by the frontend build.
    pub manifest_path: String,
    /// Lifetime of a login session in seconds.
    pub session_ttl_secs: i64,
    /// PBKDF2 round count for newly hashed passwords.
    pub pbkdf2_iterations: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let config = Self {
            database_url: env_string("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://mailcourse.db?mode=rwc".to_string()),
            listen_addr: env_string("LISTEN_ADDR").unwrap_or_else(|| "127.0.0.1:8000".to_string()),
            static_url: normalize_url_prefix(
                env_string("STATIC_URL").unwrap_or_else(|| "/static/".to_string()),
            ),
            static_dir: env_string("STATIC_DIR").unwrap_or_else(|| "static".to_string()),
            templates_dir: env_string("TEMPLATES_DIR").unwrap_or_else(|| "templates".to_string()),
            manifest_path: env_string("MANIFEST_PATH")
                .unwrap_or_else(|| "static/manifest.json".to_string()),
            session_ttl_secs: env_parsed("SESSION_TTL_SECS").unwrap_or(1_209_600),
            pbkdf2_iterations: env_parsed("PBKDF2_ITERATIONS").unwrap_or(600_000),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), String> {
        if self.session_ttl_secs <= 0 {
            return Err("SESSION_TTL_SECS must be positive".to_string());
        }
        if self.pbkdf2_iterations == 0 {
            return Err("PBKDF2_ITERATIONS must be positive".to_string());
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            listen_addr: "127.0.0.1:8000".to_string(),
            static_url: "/static/".to_string(),
            static_dir: "static".to_string(),
            templates_dir: "templates".to_string(),
            manifest_path: "static/manifest.json".to_string(),
            session_ttl_secs: 1_209_600,
            pbkdf2_iterations: 600_000,
        }
    }
}

/// Reads an environment variable, treating blank values as unset.
fn env_string(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Option<T> {
    env_string(name).and_then(|value| value.parse().ok())
}

/// Asset URLs are built by direct concatenation, so the prefix must end with `/`.
fn normalize_url_prefix(mut prefix: String) -> String {
    if !prefix.ends_with('/') {
        prefix.push('/');
    }
    prefix
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn static_url_gains_trailing_slash() {
        assert_eq!(normalize_url_prefix("/assets".to_string()), "/assets/");
        assert_eq!(normalize_url_prefix("/assets/".to_string()), "/assets/");
    }

    #[test]
    fn zero_ttl_is_rejected() {
        let config = Config {
            session_ttl_secs: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
}
