use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::property::{Host, NewProperty, Property};
use crate::error::Result;
use crate::ports::cache::PropertyCache;
use crate::ports::property_catalog::PropertyCatalog;

/// A catalog that serves recent property snapshots from a cache and only
/// goes to the backing catalog on a miss.
pub struct CachedCatalog {
    inner: Arc<dyn PropertyCatalog>,
    cache: Arc<dyn PropertyCache>,
    ttl: Duration,
}

impl CachedCatalog {
    pub fn new(
        inner: Arc<dyn PropertyCatalog>,
        cache: Arc<dyn PropertyCache>,
        ttl: Duration,
    ) -> Self {
        Self { inner, cache, ttl }
    }
}

#[async_trait]
impl PropertyCatalog for CachedCatalog {
    async fn list_properties(&self) -> Result<Vec<Property>> {
        let properties = self.inner.list_properties().await?;
        for property in &properties {
            self.cache.put(property, self.ttl);
        }
        Ok(properties)
    }

    async fn get_property(&self, id: &str) -> Result<Option<Property>> {
        if let Some(hit) = self.cache.get(id) {
            debug!(property_id = id, "property cache hit");
            return Ok(Some(hit));
        }
        let fetched = self.inner.get_property(id).await?;
        match fetched {
            Some(ref property) => self.cache.put(property, self.ttl),
            None => self.cache.evict(id),
        }
        Ok(fetched)
    }

    async fn create_property(&self, host_id: &str, listing: NewProperty) -> Result<String> {
        self.inner.create_property(host_id, listing).await
    }

    async fn update_host_info(&self, host_id: &str, host: &Host) -> Result<Vec<String>> {
        let updated = self.inner.update_host_info(host_id, host).await?;
        for id in &updated {
            self.cache.evict(id);
        }
        debug!(host_id, evicted = updated.len(), "host info updated, snapshots evicted");
        Ok(updated)
    }
}
