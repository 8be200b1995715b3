// Upstream OpenAI-compatible API client

use crate::config::UpstreamConfig;
use crate::error::{ProxyError, Result};
use crate::metrics;
use crate::models::openai::UpstreamChatRequest;
use crate::utils::logging::sanitize;
use bytes::Bytes;
use futures::stream::{BoxStream, StreamExt};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Response};
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// Content type reported to streaming callers when the upstream sends none.
pub const DEFAULT_STREAM_CONTENT_TYPE: &str = "text/event-stream";

/// An upstream response whose body has not been read yet.
pub struct UpstreamStream {
    pub status: u16,
    pub content_type: String,
    pub chunks: BoxStream<'static, reqwest::Result<Bytes>>,
}

/// Client for the upstream chat-completion backend.
///
/// Holds one connection pool shared by all requests. Credentials and the
/// default headers are fixed at construction; calls carry no other state.
pub struct UpstreamClient {
    http_client: Client,
    config: UpstreamConfig,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        // No client-wide timeout: it would also cut off long streams.
        let http_client = Client::builder()
            .default_headers(Self::default_headers(config)?)
            .connect_timeout(config.connect_timeout())
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Some(Duration::from_secs(60)))
            .tcp_nodelay(true)
            .use_rustls_tls()
            .build()
            .map_err(|e| ProxyError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        debug!(
            "Created upstream client for {} (authenticated: {})",
            config.api_base_url,
            config.bearer_token().is_some()
        );

        Ok(Self {
            http_client,
            config: config.clone(),
        })
    }

    fn default_headers(config: &UpstreamConfig) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("vision-relay/", env!("CARGO_PKG_VERSION"))),
        );

        if let Some(token) = config.bearer_token() {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|_| {
                ProxyError::Config("upstream.api_key is not a valid header value".to_string())
            })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        Ok(headers)
    }

    /// Get the API base URL
    pub fn base_url(&self) -> &str {
        &self.config.api_base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.api_base_url, path)
    }

    /// POST `/chat/completions` and wait for the whole JSON body.
    ///
    /// The configured timeout covers the entire exchange.
    pub async fn chat_completion(&self, payload: &UpstreamChatRequest<'_>) -> Result<(u16, Value)> {
        let url = self.endpoint("chat/completions");
        let timeout = self.config.timeout();
        let started = Instant::now();

        debug!("Calling {} (buffered, {} messages)", url, payload.messages.len());

        let result = async {
            let response = self
                .http_client
                .post(&url)
                .timeout(timeout)
                .json(payload)
                .send()
                .await
                .map_err(|e| transport_error(e, timeout))?;
            let response = error_for_status(response).await?;
            let status = response.status().as_u16();

            let text = response
                .text()
                .await
                .map_err(|e| transport_error(e, timeout))?;
            let body: Value = serde_json::from_str(&text).map_err(|e| {
                error!("Failed to parse upstream response: {}", e);
                debug!("Response body (first 500 chars): {}", text.chars().take(500).collect::<String>());
                ProxyError::Upstream(format!("Response parsing error: {}", e))
            })?;

            Ok::<_, ProxyError>((status, body))
        }
        .await;

        let status = match &result {
            Ok((status, _)) => *status,
            Err(e) => failure_status(e),
        };
        metrics::record_upstream_call("chat", status, started.elapsed().as_secs_f64());

        result
    }

    /// POST `/chat/completions` for a streamed answer.
    ///
    /// Returns as soon as response headers arrive; the configured timeout
    /// bounds only that wait. The body is left unread in
    /// [`UpstreamStream::chunks`].
    pub async fn stream_chat_completion(
        &self,
        payload: &UpstreamChatRequest<'_>,
    ) -> Result<UpstreamStream> {
        let url = self.endpoint("chat/completions");
        let timeout = self.config.timeout();
        let started = Instant::now();

        debug!("Calling {} (streaming, {} messages)", url, payload.messages.len());

        let request = self
            .http_client
            .post(&url)
            .header(ACCEPT, DEFAULT_STREAM_CONTENT_TYPE)
            .json(payload)
            .send();

        let result = async {
            let response = match tokio::time::timeout(timeout, request).await {
                Ok(sent) => sent.map_err(|e| transport_error(e, timeout))?,
                Err(_) => return Err(ProxyError::Timeout(timeout)),
            };
            let response = error_for_status(response).await?;

            let content_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .filter(|value| !value.is_empty())
                .unwrap_or(DEFAULT_STREAM_CONTENT_TYPE)
                .to_string();

            Ok::<_, ProxyError>(UpstreamStream {
                status: response.status().as_u16(),
                content_type,
                chunks: response.bytes_stream().boxed(),
            })
        }
        .await;

        let status = match &result {
            Ok(stream) => stream.status,
            Err(e) => failure_status(e),
        };
        metrics::record_upstream_call("chat_stream", status, started.elapsed().as_secs_f64());

        result
    }

    /// GET `/models`.
    pub async fn list_models(&self) -> Result<Value> {
        let url = self.endpoint("models");
        let timeout = self.config.models_timeout();
        let started = Instant::now();

        let result = async {
            let response = self
                .http_client
                .get(&url)
                .timeout(timeout)
                .send()
                .await
                .map_err(|e| transport_error(e, timeout))?;
            let response = error_for_status(response).await?;
            Ok::<_, ProxyError>(response.json::<Value>().await?)
        }
        .await;

        let status = match &result {
            Ok(_) => 200,
            Err(e) => failure_status(e),
        };
        metrics::record_upstream_call("models", status, started.elapsed().as_secs_f64());

        result
    }
}

fn transport_error(e: reqwest::Error, timeout: Duration) -> ProxyError {
    if e.is_timeout() {
        ProxyError::Timeout(timeout)
    } else {
        ProxyError::Http(e)
    }
}

/// Status label for metrics; 0 when no upstream status was received.
fn failure_status(e: &ProxyError) -> u16 {
    match e {
        ProxyError::UpstreamStatus { status, .. } => *status,
        _ => 0,
    }
}

/// Turn a non-success response into [`ProxyError::UpstreamStatus`], keeping
/// the upstream's JSON error body when it has one.
async fn error_for_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    error!("Upstream error: HTTP {} - Response body: {}", status, sanitize(&text));

    let body = serde_json::from_str::<Value>(&text).unwrap_or_else(|_| {
        let message = if text.trim().is_empty() {
            format!("Upstream returned HTTP {}", status)
        } else {
            format!("Upstream returned HTTP {}: {}", status, text.trim())
        };
        json!({ "error": { "message": message } })
    });

    Err(ProxyError::UpstreamStatus {
        status: status.as_u16(),
        body,
    })
}
