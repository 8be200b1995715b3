// HTTP routes configuration

use super::handlers::{
    chat_completions_handler, health_handler, list_models_handler, metrics_handler,
};
use super::middleware::{request_id_layers, track_metrics};
use crate::config::AppConfig;
use crate::error::Result;
use crate::upstream::UpstreamClient;
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub upstream: Arc<UpstreamClient>,
}

pub fn create_router(config: AppConfig, upstream: UpstreamClient) -> Result<Router> {
    let body_limit = config.server.max_body_bytes;
    let state = AppState {
        config,
        upstream: Arc::new(upstream),
    };

    let (set_request_id, propagate_request_id) = request_id_layers();

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/v1/models", get(list_models_handler))
        .route("/v1/chat/completions", post(chat_completions_handler))
        .route("/metrics", get(metrics_handler))
        .route_layer(middleware::from_fn(track_metrics))
        // Requests carry base64 images, so the extractor default (2MB) is
        // replaced by the configured limit.
        .layer(DefaultBodyLimit::disable())
        .layer(
            ServiceBuilder::new()
                .layer(set_request_id)
                .layer(TraceLayer::new_for_http())
                .layer(propagate_request_id)
                .layer(RequestBodyLimitLayer::new(body_limit)),
        )
        .with_state(state);

    Ok(app)
}
