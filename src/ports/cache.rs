use std::time::Duration;

use crate::domain::property::Property;

/// Short-lived store of property snapshots keyed by property id.
pub trait PropertyCache: Send + Sync {
    fn get(&self, id: &str) -> Option<Property>;
    fn put(&self, property: &Property, ttl: Duration);
    fn evict(&self, id: &str);
}
