//! Server settings, read from the process environment.
//!
//! See [`DiscordConfig`](oxcyshop_platform_access::DiscordConfig) for the
//! OAuth2 settings and [`AccessConfig`](oxcyshop_platform_access::AccessConfig)
//! for the whitelist.

use oxcyshop_platform_access::{AccessConfig, DiscordConfig};
use serde::Deserialize;

/// Everything the server needs to start.
#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Discord OAuth2 configuration.
    #[serde(default)]
    pub discord: DiscordConfig,

    /// Storage backend configuration.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Whitelist configuration.
    #[serde(default)]
    pub access: AccessConfig,
}

/// Storage backend settings.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the storage backend; `/auth_discord` is appended for
    /// session issuance.
    #[serde(default = "default_backend_url")]
    pub base_url: String,
}

fn default_listen_addr() -> String {
    "127.0.0.1:3000".to_string()
}

fn default_backend_url() -> String {
    "http://localhost:8000".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
        }
    }
}

impl ServerConfig {
    /// Reads the settings from environment variables.
    ///
    /// Nested keys use `__` as separator, e.g. `DISCORD__CLIENT_SECRET` or
    /// `ACCESS__WHITELIST`.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable cannot be deserialized.
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::default().separator("__"))
            .build()?
            .try_deserialize()
    }
}
