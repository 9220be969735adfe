use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub booking: BookingConfig,
    /// JSON file of properties loaded into the in-memory backend at startup.
    #[serde(default)]
    pub seed: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Memory,
    Firestore,
}

/// Where bookings and properties live.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: StoreBackend,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default = "default_database")]
    pub database: String,
    /// Web API key, sent as the `key` query parameter.
    #[serde(default)]
    pub api_key: Option<String>,
    /// ID token of the signed-in user, sent as a bearer token.
    #[serde(default)]
    pub auth_token: Option<String>,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::default(),
            base_url: default_base_url(),
            project_id: String::new(),
            database: default_database(),
            api_key: None,
            auth_token: None,
            request_timeout_secs: default_timeout(),
            user_agent: default_user_agent(),
            page_size: default_page_size(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
    #[serde(default = "default_property_ttl")]
    pub property_ttl_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            property_ttl_secs: default_property_ttl(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BookingConfig {
    /// Hold a per-property lock across the availability check and the write.
    #[serde(default = "default_true")]
    pub guarded_reservations: bool,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            guarded_reservations: true,
        }
    }
}

fn default_base_url() -> String {
    "https://firestore.googleapis.com/v1".into()
}

fn default_database() -> String {
    "(default)".into()
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")).into()
}

fn default_page_size() -> u32 {
    300
}

fn default_max_entries() -> usize {
    500
}

fn default_property_ttl() -> u64 {
    300
}

fn default_true() -> bool {
    true
}
