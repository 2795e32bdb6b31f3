use std::{collections::HashMap, fs};

use thiserror::Error;
use url::Url;

pub const DEFAULT_API_BASE: &str = "http://localhost:8080";
const SETTINGS_FILE: &str = "dashboard.toml";
const API_BASE_ENV_VARS: [&str; 2] = ["EMPLOYEE_API_BASE", "APP__API_BASE"];

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("invalid api base address '{value}': {source}")]
    InvalidApiBase {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("api base address '{0}' must use http or https")]
    UnsupportedScheme(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    api_base: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

impl ClientSettings {
    /// Defaults, then `dashboard.toml` in the working directory, then
    /// environment.
    pub fn load() -> Result<Self, SettingsError> {
        let file_contents = fs::read_to_string(SETTINGS_FILE).ok();
        Self::load_from(file_contents.as_deref(), |name| std::env::var(name).ok())
    }

    pub fn load_from(
        file_contents: Option<&str>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, SettingsError> {
        let mut raw_api_base = DEFAULT_API_BASE.to_string();

        if let Some(raw) = file_contents {
            match toml::from_str::<HashMap<String, String>>(raw) {
                Ok(file_cfg) => {
                    if let Some(v) = file_cfg.get("api_base") {
                        raw_api_base = v.clone();
                    }
                }
                Err(error) => tracing::warn!(%error, "ignoring unreadable {SETTINGS_FILE}"),
            }
        }

        for name in API_BASE_ENV_VARS {
            if let Some(v) = env(name) {
                raw_api_base = v;
            }
        }

        Self::default().with_api_base(&raw_api_base)
    }

    /// Replaces the api base address, applying the same normalization as
    /// [`ClientSettings::load`].
    pub fn with_api_base(mut self, raw: &str) -> Result<Self, SettingsError> {
        let api_base = normalize_api_base(raw);
        validate_api_base(&api_base)?;
        self.api_base = api_base;
        Ok(self)
    }

    /// Base address without a trailing slash.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    pub fn api_base_url(&self) -> Result<Url, SettingsError> {
        validate_api_base(&self.api_base)
    }
}

/// Trims whitespace and a single trailing `/`; blank input selects the
/// default address.
pub fn normalize_api_base(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return DEFAULT_API_BASE.to_string();
    }
    trimmed.strip_suffix('/').unwrap_or(trimmed).to_string()
}

fn validate_api_base(api_base: &str) -> Result<Url, SettingsError> {
    let url = Url::parse(api_base).map_err(|source| SettingsError::InvalidApiBase {
        value: api_base.to_string(),
        source,
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(SettingsError::UnsupportedScheme(api_base.to_string()));
    }
    Ok(url)
}
