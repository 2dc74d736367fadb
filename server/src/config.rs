use anyhow::{Context, Result};
use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;
use std::path::PathBuf;

const CONFIG_PATH_VAR: &str = "DASHBOARD_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "dashboard.toml";

/// Which document store and identity provider the server talks to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Firebase,
    #[default]
    Memory,
}

#[derive(Clone, Debug, Deserialize)]
pub struct FirebaseConfig {
    pub api_key: Option<SecretString>,
    pub project_id: Option<String>,
    #[serde(default = "default_database")]
    pub database: String,
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            project_id: None,
            database: default_database(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendKind,
    #[serde(default)]
    pub firebase: FirebaseConfig,
    /// Key for signing session cookies. A random key is generated when
    /// unset, so sessions do not survive a restart.
    pub session_secret: Option<SecretString>,
    #[serde(default = "default_users_collection")]
    pub users_collection: String,
    #[serde(default)]
    pub secure_cookies: bool,
}

impl Config {
    /// Reads `dashboard.toml` (or the file named by `DASHBOARD_CONFIG`), then
    /// applies `DASHBOARD_*` environment overrides. Nested keys use `__`,
    /// e.g. `DASHBOARD_FIREBASE__API_KEY`.
    pub fn load() -> Result<Self> {
        let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into());

        let builder = config::Config::builder()
            .add_source(File::from(PathBuf::from(&path)).required(false))
            .add_source(
                Environment::with_prefix("DASHBOARD")
                    .prefix_separator("_")
                    .separator("__"),
            );

        Self::build(builder).with_context(|| format!("failed to load configuration from {path}"))
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        Ok(builder.build()?.try_deserialize()?)
    }
}

fn default_database() -> String {
    "(default)".into()
}

fn default_users_collection() -> String {
    types::user::USERS_COLLECTION.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;
    use secrecy::ExposeSecret;

    fn from_toml(toml: &str) -> Result<Config> {
        Config::build(config::Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = from_toml("").unwrap();
        assert_eq!(config.backend, BackendKind::Memory);
        assert_eq!(config.users_collection, "users");
        assert_eq!(config.firebase.database, "(default)");
        assert!(config.session_secret.is_none());
        assert!(!config.secure_cookies);
    }

    #[test]
    fn test_firebase_section() {
        let config = from_toml(
            r#"
            backend = "firebase"
            session_secret = "s3cret"

            [firebase]
            api_key = "key"
            project_id = "demo-project"
            "#,
        )
        .unwrap();

        assert_eq!(config.backend, BackendKind::Firebase);
        assert_eq!(config.firebase.project_id.as_deref(), Some("demo-project"));
        assert_eq!(
            config.firebase.api_key.as_ref().map(|k| k.expose_secret()),
            Some("key")
        );
        assert_eq!(config.firebase.database, "(default)");
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        assert!(from_toml(r#"backend = "postgres""#).is_err());
    }
}
