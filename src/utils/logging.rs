//! Structured logging and secret-safe trace utilities.
//!
//! This module configures the `tracing` ecosystem for the application and
//! provides helpers that keep upstream credentials out of log sinks.

use crate::config::LoggingConfig;
use crate::error::{ProxyError, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes the global tracing subscriber for the application.
///
/// Supports three output formats:
/// - `json`: Structured JSON logs for production ingestion.
/// - `compact`: Single-line human-readable output.
/// - `pretty` (default): Multi-line, colorized output for development.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| ProxyError::Config(format!("Invalid log level {:?}: {}", config.level, e)))?;

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = match config.format.as_str() {
        "json" => registry.with(tracing_subscriber::fmt::layer().json()).try_init(),
        "compact" => registry.with(tracing_subscriber::fmt::layer().compact()).try_init(),
        _ => registry.with(tracing_subscriber::fmt::layer().pretty()).try_init(),
    };

    installed.map_err(|e| ProxyError::Internal(format!("Failed to install logger: {}", e)))
}

/// Replaces the token following every `Bearer ` with `[REDACTED]`.
///
/// Upstream error bodies sometimes echo the request headers back; this keeps
/// the API key out of the logs when they are recorded.
pub fn sanitize(input: &str) -> String {
    const BEARER: &str = "Bearer ";

    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find(BEARER) {
        let token_start = pos + BEARER.len();
        result.push_str(&rest[..token_start]);

        let token_len = rest[token_start..]
            .find(|c: char| c.is_whitespace() || c == '"' || c == '\'' || c == ',')
            .unwrap_or(rest.len() - token_start);
        if token_len > 0 {
            result.push_str("[REDACTED]");
        }
        rest = &rest[token_start + token_len..];
    }

    result.push_str(rest);
    result
}

/// Describe a secret for startup logs by presence and length only.
pub fn mask_secret(secret: &str) -> String {
    match secret.chars().count() {
        0 => "<none>".to_string(),
        len => format!("set ({} chars)", len),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_bearer_token() {
        let input = "{\"headers\": {\"authorization\": \"Bearer sk-lm-abc123\"}}";
        let output = sanitize(input);
        assert!(output.contains("Bearer [REDACTED]\""));
        assert!(!output.contains("sk-lm-abc123"));
    }

    #[test]
    fn test_sanitize_multiple_tokens() {
        let output = sanitize("Bearer one, Bearer two and Bearer three");
        assert_eq!(output, "Bearer [REDACTED], Bearer [REDACTED] and Bearer [REDACTED]");
    }

    #[test]
    fn test_sanitize_leaves_plain_text() {
        assert_eq!(sanitize("model not loaded"), "model not loaded");
        assert_eq!(sanitize("Bearer "), "Bearer ");
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret(""), "<none>");
        assert_eq!(mask_secret("short"), "set (5 chars)");
        assert_eq!(mask_secret("sk-lm-0123456789"), "set (16 chars)");
        assert!(!mask_secret("sk-lm-0123456789").contains("sk-"));
    }
}
