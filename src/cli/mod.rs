// CLI module for vision-relay

use clap::Parser;
use std::path::PathBuf;

/// vision-relay - OpenAI-compatible proxy that folds top-level images into multimodal messages
#[derive(Parser, Debug)]
#[command(name = "vision-relay", version, about, long_about = None)]
pub struct Args {
    /// Path to a TOML config file (default: ~/.vision-relay/config.toml when present)
    #[arg(long, env = "VISION_RELAY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Address to bind, overriding server.host
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on, overriding server.port
    #[arg(long)]
    pub port: Option<u16>,
}
