//! Axum-based HTTP server implementation for the vision relay.
//!
//! This module sets up the HTTP server that accepts OpenAI-compatible chat
//! completion requests, folds top-level image fields into the conversation
//! and relays the call to the configured backend.
//!
//! # Components
//!
//! - `handlers`: Implementation of individual API endpoints (chat, models, health, metrics).
//! - `middleware`: Request ID tracking and per-route metrics.
//! - `routes`: The main router configuration that ties everything together.

mod handlers;
mod middleware;
mod routes;

pub use handlers::{fallback_model_list, HealthResponse};
pub use routes::{create_router, AppState};
