//! Google Play publishing credentials

use crate::error::ConfigError;

/// Everything the Play half needs: a service-account key with publishing
/// scope plus the target package.
#[derive(Debug, Clone)]
pub struct PlayConfig {
    /// Service-account key JSON document (the full file contents)
    pub service_account_json: String,
    /// Android application id, e.g. `com.example.app`
    pub package_name: String,
}

impl PlayConfig {
    /// Assemble from optional CLI/env inputs.
    pub fn from_options(
        json_key: Option<String>,
        package_name: Option<String>,
    ) -> Result<Self, ConfigError> {
        let service_account_json = match json_key {
            Some(v) if !v.trim().is_empty() => v,
            _ => {
                return Err(ConfigError::MissingField {
                    field: "service account key",
                    env_var: "GOOGLE_PLAY_JSON_KEY",
                    flag: "google-play-json-key",
                })
            }
        };
        let package_name = match package_name {
            Some(v) if !v.trim().is_empty() => v,
            _ => {
                return Err(ConfigError::MissingField {
                    field: "package name",
                    env_var: "GOOGLE_PLAY_PACKAGE_NAME",
                    flag: "google-play-package-name",
                })
            }
        };

        Ok(Self {
            service_account_json,
            package_name,
        })
    }
}
