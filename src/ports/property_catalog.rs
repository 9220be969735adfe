use async_trait::async_trait;

use crate::domain::property::{Host, NewProperty, Property};
use crate::error::Result;

#[async_trait]
pub trait PropertyCatalog: Send + Sync {
    async fn list_properties(&self) -> Result<Vec<Property>>;
    async fn get_property(&self, id: &str) -> Result<Option<Property>>;

    /// Store a listing owned by `host_id` and return its new id.
    async fn create_property(&self, host_id: &str, listing: NewProperty) -> Result<String>;

    /// Rewrite the host card on every property owned by `host_id`.
    /// Returns the ids of the properties that were updated.
    async fn update_host_info(&self, host_id: &str, host: &Host) -> Result<Vec<String>>;
}
