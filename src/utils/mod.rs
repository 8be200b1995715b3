//! Utility functions and helpers for the vision relay.
//!
//! # Submodules
//!
//! - `logging`: Tracing initialization and secret redaction for log output.

pub mod logging;
