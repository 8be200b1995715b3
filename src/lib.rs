// vision-relay - OpenAI-compatible proxy that folds top-level images into multimodal messages

pub mod cli;
pub mod config;
pub mod error;
pub mod metrics;
pub mod models;
pub mod server;
pub mod translation;
pub mod upstream;
pub mod utils;
pub mod vision;
