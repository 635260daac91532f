use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Command-line configuration of the scoring HTTP server.
#[derive(Parser, Debug, Clone)]
#[command(name = "scoring-server", version, about = "Scoring API HTTP server")]
pub struct Config {
    /// Interface to listen on
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(short = 'p', long, default_value_t = 8080)]
    pub port: u16,

    /// Append log lines to this file instead of stdout
    #[arg(short = 'l', long)]
    pub log: Option<PathBuf>,

    /// Upper bound on one dispatch, store calls included
    #[arg(long, default_value_t = 3000)]
    pub timeout_ms: u64,

    /// JSON object of store keys to preload, e.g. {"i:1": ["books"]}
    #[arg(long)]
    pub seed: Option<PathBuf>,
}

impl Config {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
