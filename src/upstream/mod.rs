//! Client side of the relay: the OpenAI-compatible backend.
//!
//! - `client`: pooled HTTP client issuing buffered and streamed chat
//!   completions and model listings.
//! - `streaming`: order-preserving pass-through of upstream byte chunks.

mod client;
pub mod streaming;

pub use client::{UpstreamClient, UpstreamStream, DEFAULT_STREAM_CONTENT_TYPE};
pub use streaming::relay_chunks;
