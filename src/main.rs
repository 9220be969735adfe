use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use rmcp::ServiceExt;
use rmcp::transport::stdio;
use tracing_subscriber::EnvFilter;

use mcp_stays::adapters::cache::memory_cache::MemoryCache;
use mcp_stays::adapters::catalog::cached::CachedCatalog;
use mcp_stays::adapters::firestore::client::FirestoreClient;
use mcp_stays::adapters::memory::store::MemoryStore;
use mcp_stays::config::types::{Config, StoreBackend};
use mcp_stays::config::{load_config, load_seed};
use mcp_stays::engine::BookingEngine;
use mcp_stays::mcp::server::StaysMcpServer;
use mcp_stays::ports::booking_store::BookingStore;
use mcp_stays::ports::cache::PropertyCache;
use mcp_stays::ports::property_catalog::PropertyCatalog;

fn find_config_path() -> PathBuf {
    if let Ok(path) = std::env::var("MCP_STAYS_CONFIG") {
        return PathBuf::from(path);
    }

    let candidates = [PathBuf::from("config.yaml"), exe_dir().join("config.yaml")];
    for path in &candidates {
        if path.exists() {
            return path.clone();
        }
    }

    candidates[0].clone()
}

fn exe_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Build the booking store and the raw property catalog for the configured backend.
fn build_backend(config: &Config) -> Result<(Arc<dyn BookingStore>, Arc<dyn PropertyCatalog>)> {
    match config.store.backend {
        StoreBackend::Memory => {
            let properties = match config.seed {
                Some(ref path) => load_seed(path)?,
                None => Vec::new(),
            };
            tracing::info!(properties = properties.len(), "using in-memory store");
            let store = Arc::new(MemoryStore::with_properties(properties));
            Ok((
                Arc::clone(&store) as Arc<dyn BookingStore>,
                store as Arc<dyn PropertyCatalog>,
            ))
        }
        StoreBackend::Firestore => {
            tracing::info!(
                project_id = %config.store.project_id,
                database = %config.store.database,
                "using firestore store"
            );
            let client = Arc::new(FirestoreClient::new(&config.store)?);
            Ok((
                Arc::clone(&client) as Arc<dyn BookingStore>,
                client as Arc<dyn PropertyCatalog>,
            ))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout is reserved for MCP JSON-RPC
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::info!("Starting mcp-stays server");

    let config_path = find_config_path();
    let config = load_config(&config_path)?;

    let (store, raw_catalog) = build_backend(&config)?;
    let cache: Arc<dyn PropertyCache> = Arc::new(MemoryCache::new(config.catalog.max_entries));
    let catalog: Arc<dyn PropertyCatalog> = Arc::new(CachedCatalog::new(
        raw_catalog,
        cache,
        Duration::from_secs(config.catalog.property_ttl_secs),
    ));

    let engine = Arc::new(BookingEngine::new(store));
    if !config.booking.guarded_reservations {
        tracing::warn!("guarded reservations disabled, concurrent bookings may overlap");
    }
    let server = StaysMcpServer::new(engine, catalog, config.booking.guarded_reservations);

    let service = server.serve(stdio()).await?;
    service.waiting().await?;

    Ok(())
}
