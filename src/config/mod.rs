// Configuration module

mod models;

pub use models::*;

use crate::error::{ProxyError, Result};
use config::{Config, Environment, File, FileFormat, FileSourceFile};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "VISION_RELAY";

/// Variables understood by earlier deployments of the proxy, mapped to their
/// config keys. They override the prefixed variables.
const LEGACY_ENV: [(&str, &str); 4] = [
    ("LMSTUDIO_API_BASE", "upstream.api_base_url"),
    ("LMSTUDIO_API_KEY", "upstream.api_key"),
    ("PROXY_TIMEOUT", "upstream.timeout_seconds"),
    ("LMSTUDIO_PROXY_MODEL_NAME", "upstream.model_name"),
];

impl AppConfig {
    /// Load configuration from multiple sources with precedence:
    /// 1. Legacy environment variables (highest)
    /// 2. `VISION_RELAY_*` environment variables
    /// 3. Config file (`config_path`, else `~/.vision-relay/config.toml` if present)
    /// 4. Defaults (lowest)
    ///
    /// CLI flags are applied by the caller on top of the result.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(config_path, std::env::vars().collect())
    }

    /// Same as [`AppConfig::load`], reading variables from `env` instead of the process.
    pub fn load_with_env(config_path: Option<&Path>, env: HashMap<String, String>) -> Result<Self> {
        let file = match config_path {
            Some(path) => File::from(path).required(true),
            None => File::from(Self::default_config_path()).required(false),
        };
        Self::from_sources(file, env)
    }

    fn from_sources(
        file: File<FileSourceFile, FileFormat>,
        env: HashMap<String, String>,
    ) -> Result<Self> {
        let mut builder = Config::builder()
            .add_source(Config::try_from(&Self::default())?)
            .add_source(file)
            // VISION_RELAY_UPSTREAM__TIMEOUT_SECONDS -> upstream.timeout_seconds
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .source(Some(env.clone())),
            );

        for (var, key) in LEGACY_ENV {
            builder = builder.set_override_option(key, env.get(var).cloned())?;
        }

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.normalized().validate()
    }

    fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".vision-relay")
            .join("config.toml")
    }

    fn normalized(mut self) -> Self {
        let base = self.upstream.api_base_url.trim().trim_end_matches('/');
        self.upstream.api_base_url = base.to_string();
        self.upstream.api_key = self.upstream.api_key.trim().to_string();
        self
    }

    fn validate(self) -> Result<Self> {
        let base = &self.upstream.api_base_url;
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(ProxyError::Config(format!(
                "upstream.api_base_url must be an http(s) URL, got {:?}",
                base
            )));
        }
        if self.upstream.timeout_seconds == 0 {
            return Err(ProxyError::Config(
                "upstream.timeout_seconds must be greater than zero".to_string(),
            ));
        }
        Ok(self)
    }
}
