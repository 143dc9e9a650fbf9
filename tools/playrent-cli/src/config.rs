//! CLI configuration.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use playrent_commerce::money::Currency;
use playrent_data::{ClientConfig, RetryPolicy};
use playrent_storefront::Settings;
use serde::{Deserialize, Serialize};

/// File names searched for, in order, in each directory.
pub const CONFIG_NAMES: [&str; 3] = ["playrent.toml", ".playrent.toml", "playrent.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Store API connection.
    #[serde(default)]
    pub api: ApiConfig,

    /// Storefront display and local state.
    #[serde(default)]
    pub storefront: StorefrontConfig,

    /// Log output.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Environment-specific overrides.
    #[serde(default)]
    pub environments: HashMap<String, EnvironmentConfig>,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Find a config file in `start` or any parent directory.
    pub fn discover(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            for name in CONFIG_NAMES {
                let candidate = current.join(name);
                if candidate.is_file() {
                    return Some(candidate);
                }
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Config with the named environment's sections laid over the base.
    pub fn for_environment(&self, env: &str) -> Result<CliConfig> {
        let Some(overrides) = self.environments.get(env) else {
            bail!("Unknown environment: {}", env);
        };

        let mut config = self.clone();
        if let Some(ref api) = overrides.api {
            config.api = api.clone();
        }
        if let Some(ref storefront) = overrides.storefront {
            config.storefront = storefront.clone();
        }
        if let Some(ref logging) = overrides.logging {
            config.logging = logging.clone();
        }
        Ok(config)
    }

    /// Apply `PLAYRENT_*` environment variables.
    pub fn apply_env(&mut self, vars: impl IntoIterator<Item = (String, String)>) {
        for (key, value) in vars {
            match key.as_str() {
                "PLAYRENT_API_URL" => self.api.base_url = value,
                "PLAYRENT_TENANT" => self.api.tenant_id = value,
                "PLAYRENT_TOKEN" => self.api.token = Some(value),
                "PLAYRENT_STATE_DIR" => self.storefront.state_dir = value,
                _ => {}
            }
        }
    }

    /// Check values the commands rely on.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if url::Url::parse(&self.api.base_url).is_err() {
            errors.push(format!("api.base_url '{}' is not a URL", self.api.base_url));
        }
        if self.api.tenant_id.trim().is_empty() {
            errors.push("api.tenant_id is required".to_string());
        }
        if Currency::from_code(&self.storefront.currency).is_none() {
            errors.push(format!(
                "storefront.currency '{}' is not supported",
                self.storefront.currency
            ));
        }
        if self.storefront.page_size < 1 {
            errors.push("storefront.page_size must be at least 1".to_string());
        }
        errors
    }

    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::new(&self.api.base_url, self.api.tenant_id.as_str())
            .with_timeout(Duration::from_millis(self.api.timeout_ms))
            .with_retry(RetryPolicy::new(self.api.max_retries));
        if let Some(ref token) = self.api.token {
            config = config.with_token(token);
        }
        config
    }

    pub fn settings(&self) -> Result<Settings> {
        let currency = Currency::from_code(&self.storefront.currency).with_context(|| {
            format!("Unsupported currency: {}", self.storefront.currency)
        })?;
        Ok(Settings {
            currency,
            page_size: self.storefront.page_size,
        })
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|e| e == "json")
}

/// Store API connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_tenant")]
    pub tenant_id: String,

    /// Session token sent as a bearer token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Retries for GET, PUT and DELETE.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_tenant() -> String {
    "default".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_max_retries() -> u32 {
    2
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            tenant_id: default_tenant(),
            token: None,
            timeout_ms: default_timeout_ms(),
            max_retries: default_max_retries(),
        }
    }
}

/// Storefront display and local state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorefrontConfig {
    #[serde(default = "default_currency")]
    pub currency: String,

    #[serde(default = "default_page_size")]
    pub page_size: i64,

    /// Directory for the session and draft state, relative to the
    /// working directory unless absolute.
    #[serde(default = "default_state_dir")]
    pub state_dir: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_page_size() -> i64 {
    12
}

fn default_state_dir() -> String {
    ".playrent".to_string()
}

impl Default for StorefrontConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            page_size: default_page_size(),
            state_dir: default_state_dir(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Human,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Environment-specific configuration overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    #[serde(default)]
    pub api: Option<ApiConfig>,

    #[serde(default)]
    pub storefront: Option<StorefrontConfig>,

    #[serde(default)]
    pub logging: Option<LoggingConfig>,
}

/// Generate a default playrent.toml config file.
pub fn generate_default_config(tenant: &str) -> String {
    format!(
        r#"# PlayRent client configuration

[api]
base_url = "http://localhost:3000"
tenant_id = "{tenant}"
# token = "..."
timeout_ms = 10000
max_retries = 2

[storefront]
currency = "USD"
page_size = 12
state_dir = ".playrent"

[logging]
level = "warn"
format = "human"

[environments.staging.api]
base_url = "https://staging.playrent.example"
tenant_id = "{tenant}"

[environments.production.api]
base_url = "https://playrent.example"
tenant_id = "{tenant}"
"#,
        tenant = tenant
    )
}
