use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::LazyLock;

/// Placeholder secret used when `VAULT_JWT_SECRET` is not set. Start-up
/// logs a warning when the process runs with it.
pub const DEV_JWT_SECRET: &str = "sitevault-development-secret";

/// Absolute URL for the profile picture assigned at registration.
pub const DEFAULT_PROFILE_PICTURE: &str =
    "https://static.sitevault.dev/images/default-profile.png";

/// Process configuration, resolved once at start-up from defaults merged
/// with `VAULT_`-prefixed environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// sqlx connection string; the SQLite file is created if missing.
    pub database_url: String,
    /// Address the HTTP server binds to.
    pub listen_addr: String,
    /// HS256 secret for signing and verifying session tokens.
    pub jwt_secret: String,
    /// Default log filter when `RUST_LOG` is absent.
    pub loglevel: String,
    /// Root directory of the local image store.
    pub image_root: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite:sitevault.db".to_string(),
            listen_addr: "0.0.0.0:8000".to_string(),
            jwt_secret: DEV_JWT_SECRET.to_string(),
            loglevel: "info".to_string(),
            image_root: PathBuf::from("images"),
        }
    }
}

pub static CONFIG: LazyLock<Config> = LazyLock::new(|| {
    Figment::from(Serialized::defaults(Config::default()))
        .merge(Env::prefixed("VAULT_"))
        .extract()
        .expect("invalid VAULT_* configuration")
});
