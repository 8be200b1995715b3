//! Configuration data structures for the vision relay.
//!
//! This module defines the schema for the application settings: the HTTP
//! listener, the upstream OpenAI-compatible backend, and logging output.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The root configuration object for the application.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP server settings (host, port, body limit).
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream chat-completion backend settings.
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Logging and observability settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for the built-in HTTP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The IP address or hostname the server should bind to.
    /// Default: `127.0.0.1`
    #[serde(default = "default_host")]
    pub host: String,

    /// The port number the server should listen on.
    /// Default: `8000`
    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest accepted request body. Base64 images inflate payloads by ~4/3.
    /// Default: 50 MiB
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

/// Settings for the upstream OpenAI-compatible backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the backend API, including the `/v1` segment.
    /// Default: `http://localhost:1234/v1`
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Optional bearer credential forwarded on every upstream call.
    /// Default: empty (no `Authorization` header)
    #[serde(default)]
    pub api_key: String,

    /// Bound on a buffered completion, and on time-to-first-byte when streaming.
    /// Default: `300`
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// TCP connect timeout in seconds.
    /// Default: `10`
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,

    /// Timeout for the model listing call.
    /// Default: `30`
    #[serde(default = "default_models_timeout")]
    pub models_timeout_seconds: u64,

    /// Maximum number of idle pooled connections kept per upstream host.
    /// Default: `32`
    #[serde(default = "default_pool_size")]
    pub pool_max_idle_per_host: usize,

    /// Model tag reported by `/health` and the fallback model listing.
    /// Default: `lmstudio-proxy`
    #[serde(default = "default_model_name")]
    pub model_name: String,
}

/// Settings for application logging and output format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum log level (`trace`, `debug`, `info`, `warn`, `error`).
    /// Default: `info`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format for logs (`pretty`, `json`, `compact`).
    /// Default: `pretty`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }

    pub fn models_timeout(&self) -> Duration {
        Duration::from_secs(self.models_timeout_seconds)
    }

    /// The configured API key, if one is set.
    pub fn bearer_token(&self) -> Option<&str> {
        let key = self.api_key.trim();
        (!key.is_empty()).then_some(key)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            api_key: String::new(),
            timeout_seconds: default_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
            models_timeout_seconds: default_models_timeout(),
            pool_max_idle_per_host: default_pool_size(),
            model_name: default_model_name(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// Helper functions for serde defaults
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_max_body_bytes() -> usize {
    50 * 1024 * 1024
}

fn default_api_base_url() -> String {
    "http://localhost:1234/v1".to_string()
}

fn default_timeout() -> u64 {
    300
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_models_timeout() -> u64 {
    30
}

fn default_pool_size() -> usize {
    32
}

fn default_model_name() -> String {
    "lmstudio-proxy".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}
