// HTTP request handlers

use super::routes::AppState;
use crate::error::{ProxyError, Result};
use crate::metrics;
use crate::models::openai::ChatCompletionRequest;
use crate::translation::{build_upstream_request, fill_response_metadata};
use crate::upstream::relay_chunks;
use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub upstream: String,
    pub model: String,
}

/// Static liveness report; does not contact the upstream.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        upstream: state.config.upstream.api_base_url.clone(),
        model: state.config.upstream.model_name.clone(),
    })
}

/// Handler for /v1/models. Never fails: upstream errors yield a one-entry
/// listing naming the configured model.
pub async fn list_models_handler(State(state): State<AppState>) -> Json<Value> {
    match state.upstream.list_models().await {
        Ok(models) => Json(models),
        Err(e) => {
            warn!("Model listing failed, serving fallback: {}", e);
            metrics::record_model_list_fallback();
            Json(fallback_model_list(
                &state.config.upstream.model_name,
                &e.to_string(),
            ))
        }
    }
}

pub fn fallback_model_list(model_name: &str, error: &str) -> Value {
    json!({
        "object": "list",
        "data": [{ "id": model_name, "object": "model" }],
        "note": format!("fallback: {}", error),
    })
}

/// Handler for /v1/chat/completions (OpenAI Chat Completions compatible)
pub async fn chat_completions_handler(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response> {
    // Manually deserialize to get better error messages
    let request: ChatCompletionRequest = serde_json::from_slice(&body).map_err(|e| {
        error!("Failed to deserialize request: {}", e);
        debug!(
            "Raw body (first 500 chars): {}",
            String::from_utf8_lossy(&body[..body.len().min(500)])
        );
        ProxyError::InvalidRequest(format!("JSON deserialization error: {}", e))
    })?;

    info!(
        "Received chat completion request: model={}, messages={}, stream={}",
        request.model().map_or_else(|| "<unset>".to_string(), |model| model.to_string()),
        request.messages.len(),
        request.stream()
    );

    let payload = build_upstream_request(&request);

    if request.stream() {
        let upstream = state.upstream.stream_chat_completion(&payload).await?;
        debug!(
            "Relaying upstream stream: status={}, content-type={}",
            upstream.status, upstream.content_type
        );

        return Response::builder()
            .status(upstream.status)
            .header(header::CONTENT_TYPE, upstream.content_type)
            .header(header::CACHE_CONTROL, "no-cache")
            .header("X-Accel-Buffering", "no")
            .body(Body::from_stream(relay_chunks(upstream.chunks)))
            .map_err(|e| ProxyError::Internal(format!("Failed to build stream response: {}", e)));
    }

    let (status, body) = state.upstream.chat_completion(&payload).await?;
    let body = fill_response_metadata(body, request.model());
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::OK);

    Ok((status, Json(body)).into_response())
}

/// Prometheus text exposition of the process metrics.
pub async fn metrics_handler() -> Result<Response> {
    let body = metrics::gather_metrics()
        .map_err(|e| ProxyError::Internal(format!("Failed to encode metrics: {}", e)))?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_model_list_shape() {
        let listing = fallback_model_list("lmstudio-proxy", "connection refused");
        assert_eq!(
            listing,
            json!({
                "object": "list",
                "data": [{"id": "lmstudio-proxy", "object": "model"}],
                "note": "fallback: connection refused"
            })
        );
    }
}
