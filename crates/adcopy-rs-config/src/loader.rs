//! Config file discovery, environment overlay, and validation.

use crate::{ConfigError, ServiceConfig};
use directories::UserDirs;
use log::{debug, info};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Default config filename.
const DEFAULT_CONFIG_FILE: &str = "adcopy.json5";
/// Default config directory under the home directory.
const DEFAULT_CONFIG_DIR: &str = ".adcopy";

/// Environment variables read by [`ServiceConfig::apply_env`].
pub mod env_keys {
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
    pub const OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
    pub const OPENAI_MODEL: &str = "OPENAI_MODEL";
    pub const DATABASE_URL: &str = "DATABASE_URL";
    pub const BIND: &str = "ADCOPY_BIND";
}

impl ServiceConfig {
    /// Load and validate config from a JSON5 file on disk.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!("loading config file (path={})", path.display());
        let contents = fs::read_to_string(path)?;
        Self::load_from_str(&contents)
    }

    /// Parse and validate config from JSON5 contents.
    pub fn load_from_str(contents: &str) -> Result<Self, ConfigError> {
        debug!("loading config from raw contents (len={})", contents.len());
        let config: ServiceConfig = json5::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the config file to use and load it.
    ///
    /// Precedence: `explicit`, then `<cwd>/adcopy.json5`, then
    /// `~/.adcopy/adcopy.json5`. Falls back to defaults when none exist.
    /// An explicit path that does not exist is an error.
    pub fn discover(
        cwd: impl AsRef<Path>,
        explicit: Option<&Path>,
    ) -> Result<(Self, Option<PathBuf>), ConfigError> {
        if let Some(path) = explicit {
            let config = Self::load_from_path(path)?;
            return Ok((config, Some(path.to_path_buf())));
        }

        let candidates = [
            Some(cwd.as_ref().join(DEFAULT_CONFIG_FILE)),
            default_user_config_path(),
        ];
        for candidate in candidates.into_iter().flatten() {
            if candidate.exists() {
                info!("using config file (path={})", candidate.display());
                let config = Self::load_from_path(&candidate)?;
                return Ok((config, Some(candidate)));
            }
            debug!("config candidate missing (path={})", candidate.display());
        }
        info!("no config file found, using defaults");
        Ok((Self::default(), None))
    }

    /// Overlay values from the process environment.
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Overlay values from an arbitrary lookup, then re-validate.
    ///
    /// Empty values are treated as unset.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        if let Some(key) = read(env_keys::OPENAI_API_KEY) {
            self.gateway.api_key = Some(key);
        }
        if let Some(base_url) = read(env_keys::OPENAI_BASE_URL) {
            self.gateway.base_url = base_url;
        }
        if let Some(model) = read(env_keys::OPENAI_MODEL) {
            self.gateway.model = model;
        }
        if let Some(url) = read(env_keys::DATABASE_URL) {
            self.store.database_url = Some(url);
        }
        if let Some(bind) = read(env_keys::BIND) {
            self.server.bind = bind;
        }
        debug!(
            "applied environment overlay (api_key_set={}, database_url_set={}, model={})",
            self.gateway.api_key.is_some(),
            self.store.database_url.is_some(),
            self.gateway.model
        );
        self.validate()
    }

    /// Validate field ranges and cross-field constraints.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.bind.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::invalid(
                "server.bind",
                format!("'{}' is not a socket address", self.server.bind),
            ));
        }
        if self.gateway.base_url.trim().is_empty() {
            return Err(ConfigError::invalid("gateway.base_url", "must not be empty"));
        }
        if self.gateway.model.trim().is_empty() {
            return Err(ConfigError::invalid("gateway.model", "must not be empty"));
        }
        if !(0.0..=2.0).contains(&self.gateway.temperature) {
            return Err(ConfigError::invalid(
                "gateway.temperature",
                "must be between 0 and 2",
            ));
        }
        if self.gateway.timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "gateway.timeout_secs",
                "must be greater than zero",
            ));
        }
        if self.history.default_limit < 1 {
            return Err(ConfigError::invalid(
                "history.default_limit",
                "must be at least 1",
            ));
        }
        if self.history.max_limit < self.history.default_limit {
            return Err(ConfigError::invalid(
                "history.max_limit",
                "must not be smaller than history.default_limit",
            ));
        }
        Ok(())
    }
}

/// Default user config path under the home directory.
fn default_user_config_path() -> Option<PathBuf> {
    UserDirs::new().map(|dirs| {
        dirs.home_dir()
            .join(DEFAULT_CONFIG_DIR)
            .join(DEFAULT_CONFIG_FILE)
    })
}
