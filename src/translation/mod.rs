// Request/response shaping between callers and the upstream backend

pub mod request;
pub mod response;

pub use request::{build_upstream_request, compose_messages};
pub use response::fill_response_metadata;
