//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use anyhow::{Context as _, Result};
use playrent_cache::Cache;
use playrent_data::ApiClient;
use playrent_storefront::{AppState, ChannelNotifier, Notification};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::config::CliConfig;
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// Effective configuration, after environment overrides.
    pub config: CliConfig,
    /// Where the configuration came from, if a file was found.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    state: OnceLock<Arc<AppState>>,
    notifications: Mutex<Option<UnboundedReceiver<Notification>>>,
}

impl Context {
    /// Load configuration from `config_path`, or the nearest config file.
    pub fn load(config_path: Option<&str>, env: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let config_path = match config_path {
            Some(path) => Some(PathBuf::from(path)),
            None => CliConfig::discover(&cwd),
        };
        let mut config = match config_path {
            Some(ref path) => CliConfig::load(path)?,
            None => CliConfig::default(),
        };
        if let Some(env) = env {
            config = config.for_environment(env)?;
        }
        config.apply_env(std::env::vars());

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
            state: OnceLock::new(),
            notifications: Mutex::new(None),
        })
    }

    /// Connect to the store API and open the local state directory.
    ///
    /// Commands that only touch configuration never call this.
    pub fn connect(&self) -> Result<Arc<AppState>> {
        if let Some(state) = self.state.get() {
            return Ok(state.clone());
        }

        let client = ApiClient::connect(self.config.client_config())
            .context("Failed to create API client")?;
        let state_dir = self.state_dir();
        let store = Cache::open_dir(&state_dir)
            .with_context(|| format!("Failed to open state directory: {}", state_dir.display()))?;
        let (notifier, rx) = ChannelNotifier::new();

        let state = Arc::new(
            AppState::new(client, store, Arc::new(notifier)).with_settings(self.config.settings()?),
        );
        tracing::debug!(state_dir = %state_dir.display(), "storefront state opened");

        if let Ok(mut slot) = self.notifications.lock() {
            *slot = Some(rx);
        }
        Ok(self.state.get_or_init(|| state).clone())
    }

    /// Print every notification raised since the last flush.
    pub fn flush_notifications(&self) {
        let Ok(mut slot) = self.notifications.lock() else {
            return;
        };
        if let Some(rx) = slot.as_mut() {
            while let Ok(notification) = rx.try_recv() {
                self.output.notification(&notification);
            }
        }
    }

    /// Directory holding the session and draft slices.
    pub fn state_dir(&self) -> PathBuf {
        self.resolve_path(&self.config.storefront.state_dir)
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if Path::new(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }
}
