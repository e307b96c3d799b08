use std::{env, fmt::Display, str::FromStr};

use thiserror::Error;
use tracing::{info, warn};
use utils::assets::{AssetVersionError, version_from_manifest};

use crate::inertia::template::{RootTemplate, TemplateError};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },
    #[error(transparent)]
    AssetVersion(#[from] AssetVersionError),
    #[error(transparent)]
    Template(#[from] TemplateError),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Public base URL used to build absolute `X-Inertia-Location` values
    pub app_url: String,
    pub app_name: String,
    /// Current asset version; empty when assets are not versioned
    pub version: String,
    pub root_template: RootTemplate,
    pub encrypt_history: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = var("HOST").unwrap_or_else(|| "127.0.0.1".to_string());
        let port = try_load("PORT", 3000)?;
        let app_url = var("APP_URL").unwrap_or_else(|| format!("http://{host}:{port}"));
        let app_name = var("APP_NAME").unwrap_or_else(|| "Inertia Events".to_string());
        let encrypt_history = try_load("INERTIA_ENCRYPT_HISTORY", false)?;

        let version = match (var("INERTIA_VERSION"), var("ASSET_MANIFEST")) {
            (Some(version), _) => version,
            (None, Some(manifest)) => {
                let version = version_from_manifest(&manifest)?;
                info!(manifest = %manifest, version = %version, "Asset version from manifest");
                version
            }
            (None, None) => {
                warn!("Neither INERTIA_VERSION nor ASSET_MANIFEST set, assets are unversioned");
                String::new()
            }
        };

        let root_template = match var("INERTIA_ROOT_TEMPLATE") {
            Some(path) => RootTemplate::from_file(&path)?,
            None => RootTemplate::default(),
        };

        Ok(Self {
            host,
            port,
            app_url,
            app_name,
            version,
            root_template,
            encrypt_history,
        })
    }

    /// Configuration with defaults for everything but the URL and version
    pub fn new(app_url: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            app_url: app_url.into(),
            app_name: "Inertia Events".to_string(),
            version: version.into(),
            root_template: RootTemplate::default(),
            encrypt_history: false,
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn try_load<T>(key: &str, default: T) -> Result<T, ConfigError>
where
    T: FromStr + Display,
    T::Err: Display,
{
    match var(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key: key.to_string(),
            reason: e.to_string(),
        }),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_defaults() {
        let config = Config::new("http://example.com", "c32b8e4965f418ad");
        assert_eq!(config.app_url, "http://example.com");
        assert_eq!(config.version, "c32b8e4965f418ad");
        assert!(!config.encrypt_history);
        assert_eq!(config.address(), "127.0.0.1:0");
    }

    #[test]
    fn test_try_load_reports_bad_values() {
        // Unique key so parallel tests do not race on the environment.
        let key = "INERTIA_TEST_TRY_LOAD_PORT";
        unsafe { env::set_var(key, "not-a-port") };

        let err = try_load::<u16>(key, 3000).unwrap_err();
        assert!(err.to_string().contains(key));

        unsafe { env::remove_var(key) };
        assert_eq!(try_load::<u16>(key, 3000).unwrap(), 3000);
    }
}
