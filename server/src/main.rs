mod config;
mod http;
mod logging;

use anyhow::Context;
use clap::Parser;
use config::Config;
use http::AppState;
use log::{debug, info, warn};
use scoring::api::{Dispatcher, MemoryStore, Store};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

const PURGE_INTERVAL: Duration = Duration::from_secs(60);

/// Load a JSON object into the store. String values are kept verbatim, any
/// other value is stored as its JSON text.
fn seed_store(store: &MemoryStore, path: &Path) -> anyhow::Result<usize> {
    let raw = std::fs::read(path).with_context(|| format!("reading seed {}", path.display()))?;
    let Value::Object(entries) = serde_json::from_slice(&raw)
        .with_context(|| format!("parsing seed {}", path.display()))?
    else {
        anyhow::bail!("seed {} must be a JSON object", path.display());
    };

    for (key, value) in &entries {
        let text = match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        };
        store.set(key, &text, Duration::ZERO)?;
    }
    Ok(entries.len())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for ctrl-c: {err}");
        std::future::pending::<()>().await;
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();
    logging::init(config.log.as_deref())?;

    let store = Arc::new(MemoryStore::new());
    if let Some(path) = &config.seed {
        let loaded = seed_store(&store, path)?;
        info!("Loaded {loaded} store entries from {}", path.display());
    }

    let purge_store = Arc::clone(&store);
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(PURGE_INTERVAL);
        loop {
            ticker.tick().await;
            let purged = purge_store.purge_expired();
            if purged > 0 {
                debug!("purged {purged} expired store entries");
            }
        }
    });

    let dispatcher = Dispatcher::new(store).context("building dispatcher")?;
    let state = Arc::new(AppState::new(dispatcher, config.timeout()));

    let addr = config.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!("Starting server at {}", listener.local_addr()?);

    http::serve(listener, state, shutdown_signal()).await;
    info!("Server stopped");
    Ok(())
}
