pub mod types;

use std::path::Path;

use crate::domain::property::Property;
use crate::error::{Result, StayError};
use types::Config;

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        tracing::info!(
            "Config file not found at {}, using defaults",
            path.display()
        );
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        StayError::Config(format!(
            "failed to read config file {}: {e}",
            path.display()
        ))
    })?;
    let config: Config = serde_yml::from_str(&content)?;
    Ok(config)
}

/// Read a JSON array of properties for seeding the in-memory backend.
pub fn load_seed(path: &Path) -> Result<Vec<Property>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        StayError::Config(format!("failed to read seed file {}: {e}", path.display()))
    })?;
    let properties: Vec<Property> = serde_json::from_str(&content)?;
    if let Some(p) = properties.iter().find(|p| p.id.trim().is_empty()) {
        return Err(StayError::Config(format!(
            "seed property '{}' has an empty id",
            p.title
        )));
    }
    Ok(properties)
}
