use config::{Config, ConfigError, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;

pub const CONFIG_PATH_VAR: &str = "FUELTRACK_CONFIG";

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default)]
    pub api_token: Option<SecretString>,

    /// Vehicle or fleet whose fuelings are shown.
    #[serde(default = "default_scope_id")]
    pub scope_id: String,

    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Pointer travel in cells before a press becomes a drag.
    #[serde(default = "default_drag_threshold")]
    pub drag_threshold: u16,

    #[serde(default = "default_currency_prefix")]
    pub currency_prefix: String,
}

fn default_api_url() -> String {
    fleet_api::DEFAULT_BASE_URL.to_string()
}

fn default_scope_id() -> String {
    "default".to_string()
}

fn default_page_size() -> usize {
    crate::engine::DEFAULT_PAGE_SIZE
}

fn default_drag_threshold() -> u16 {
    crate::engine::drag::DEFAULT_DRAG_THRESHOLD
}

fn default_currency_prefix() -> String {
    "R$".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_token: None,
            scope_id: default_scope_id(),
            page_size: default_page_size(),
            drag_threshold: default_drag_threshold(),
            currency_prefix: default_currency_prefix(),
        }
    }
}

impl Settings {
    /// Read `$FUELTRACK_CONFIG` (default `fueltrack.toml`) overlaid by
    /// `FUELTRACK_*` environment variables.
    pub fn new() -> Result<Self, ConfigError> {
        let config_path =
            std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| "fueltrack.toml".to_string());
        Self::load(&config_path)
    }

    pub fn load(config_path: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name(config_path).required(false))
            .add_source(
                Environment::with_prefix("FUELTRACK")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        settings.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.api_url.is_empty() {
            return Err("api_url is required".to_string());
        }
        if !self.api_url.starts_with("http") {
            return Err("api_url must be a valid HTTP(S) URL".to_string());
        }
        if self.page_size == 0 {
            return Err("page_size must be at least 1".to_string());
        }
        if self.scope_id.trim().is_empty() {
            return Err("scope_id is required".to_string());
        }
        Ok(())
    }
}
