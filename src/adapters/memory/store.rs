use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::booking::{Booking, NewBooking};
use crate::domain::property::{Host, NewProperty, Property};
use crate::error::Result;
use crate::ports::booking_store::BookingStore;
use crate::ports::property_catalog::PropertyCatalog;

/// Document store kept in process memory.
///
/// Serves local runs and tests. Like the hosted store it assigns ids and
/// creation times itself and applies no overlap checks of its own.
#[derive(Default)]
pub struct MemoryStore {
    bookings: RwLock<HashMap<String, Booking>>,
    properties: RwLock<HashMap<String, Property>>,
    next_id: AtomicU64,
    next_property_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_properties(properties: impl IntoIterator<Item = Property>) -> Self {
        let map = properties
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect::<HashMap<_, _>>();
        Self {
            properties: RwLock::new(map),
            ..Self::default()
        }
    }

    pub async fn upsert_property(&self, property: Property) {
        self.properties
            .write()
            .await
            .insert(property.id.clone(), property);
    }

    pub async fn booking_count(&self) -> usize {
        self.bookings.read().await.len()
    }

    fn allocate_id(&self) -> String {
        let n = self.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        format!("bk-{n:06}")
    }

    fn allocate_property_id(&self) -> String {
        let n = self.next_property_id.fetch_add(1, Ordering::Relaxed) + 1;
        format!("pr-{n:06}")
    }

    async fn bookings_where(&self, pred: impl Fn(&Booking) -> bool) -> Vec<Booking> {
        self.bookings
            .read()
            .await
            .values()
            .filter(|b| pred(b))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn insert_booking(&self, booking: NewBooking) -> Result<String> {
        let id = self.allocate_id();
        let record = booking.into_booking(id.clone(), Utc::now());
        self.bookings.write().await.insert(id.clone(), record);
        debug!(booking_id = %id, "memory store: booking inserted");
        Ok(id)
    }

    async fn bookings_for_property(&self, property_id: &str) -> Result<Vec<Booking>> {
        Ok(self.bookings_where(|b| b.property_id == property_id).await)
    }

    async fn bookings_for_user(&self, user_id: &str) -> Result<Vec<Booking>> {
        Ok(self.bookings_where(|b| b.user_id == user_id).await)
    }

    async fn get_booking(&self, id: &str) -> Result<Option<Booking>> {
        Ok(self.bookings.read().await.get(id).cloned())
    }

    async fn delete_booking(&self, id: &str) -> Result<()> {
        let removed = self.bookings.write().await.remove(id);
        debug!(booking_id = id, existed = removed.is_some(), "memory store: booking deleted");
        Ok(())
    }
}

#[async_trait]
impl PropertyCatalog for MemoryStore {
    async fn list_properties(&self) -> Result<Vec<Property>> {
        let mut all: Vec<Property> = self.properties.read().await.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(all)
    }

    async fn get_property(&self, id: &str) -> Result<Option<Property>> {
        Ok(self.properties.read().await.get(id).cloned())
    }

    async fn create_property(&self, host_id: &str, listing: NewProperty) -> Result<String> {
        let mut properties = self.properties.write().await;
        // seeded ids may already use the generated format
        let id = loop {
            let id = self.allocate_property_id();
            if !properties.contains_key(&id) {
                break id;
            }
        };
        properties.insert(id.clone(), listing.into_property(id.clone(), host_id));
        debug!(property_id = %id, host_id, "memory store: property created");
        Ok(id)
    }

    async fn update_host_info(&self, host_id: &str, host: &Host) -> Result<Vec<String>> {
        let mut properties = self.properties.write().await;
        let mut updated: Vec<String> = properties
            .values_mut()
            .filter(|p| p.host_id == host_id)
            .map(|p| {
                p.host = host.clone();
                p.id.clone()
            })
            .collect();
        updated.sort();
        debug!(host_id, count = updated.len(), "memory store: host info updated");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{d, make_property};

    fn new_booking(user: &str, property: &str, check_in: &str, check_out: &str) -> NewBooking {
        NewBooking {
            user_id: user.into(),
            property_id: property.into(),
            property_title: "Title".into(),
            property_image: String::new(),
            check_in: d(check_in),
            check_out: d(check_out),
            guests: 1,
            nights: 1,
            price_per_night: 10.0,
            total_price: 10.0,
        }
    }

    #[tokio::test]
    async fn insert_assigns_sequential_ids() {
        let store = MemoryStore::new();
        let a = store
            .insert_booking(new_booking("u1", "p1", "2024-06-01", "2024-06-02"))
            .await
            .unwrap();
        let b = store
            .insert_booking(new_booking("u1", "p1", "2024-06-02", "2024-06-03"))
            .await
            .unwrap();
        assert_eq!(a, "bk-000001");
        assert_eq!(b, "bk-000002");
        assert_eq!(store.booking_count().await, 2);
    }

    #[tokio::test]
    async fn queries_filter_by_equality() {
        let store = MemoryStore::new();
        store
            .insert_booking(new_booking("u1", "p1", "2024-06-01", "2024-06-02"))
            .await
            .unwrap();
        store
            .insert_booking(new_booking("u2", "p1", "2024-06-03", "2024-06-04"))
            .await
            .unwrap();
        store
            .insert_booking(new_booking("u1", "p2", "2024-06-01", "2024-06-02"))
            .await
            .unwrap();

        assert_eq!(store.bookings_for_property("p1").await.unwrap().len(), 2);
        assert_eq!(store.bookings_for_user("u1").await.unwrap().len(), 2);
        assert!(store.bookings_for_user("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn get_and_delete() {
        let store = MemoryStore::new();
        let id = store
            .insert_booking(new_booking("u1", "p1", "2024-06-01", "2024-06-02"))
            .await
            .unwrap();
        let stored = store.get_booking(&id).await.unwrap().unwrap();
        assert_eq!(stored.user_id, "u1");

        store.delete_booking(&id).await.unwrap();
        assert!(store.get_booking(&id).await.unwrap().is_none());
        // second delete is a no-op
        store.delete_booking(&id).await.unwrap();
    }

    #[tokio::test]
    async fn catalog_lists_sorted_and_gets_by_id() {
        let store = MemoryStore::with_properties(vec![
            make_property("p2", 80.0, 2),
            make_property("p1", 120.0, 4),
        ]);
        let all = store.list_properties().await.unwrap();
        assert_eq!(all[0].id, "p1");
        assert_eq!(all[1].id, "p2");
        assert!(store.get_property("p2").await.unwrap().is_some());
        assert!(store.get_property("p9").await.unwrap().is_none());

        store.upsert_property(make_property("p9", 50.0, 1)).await;
        assert!(store.get_property("p9").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn create_property_assigns_id_and_owner() {
        let store = MemoryStore::with_properties(vec![make_property("pr-000001", 80.0, 2)]);
        let listing = NewProperty {
            title: "Dune Cottage".into(),
            price: 140.0,
            ..Default::default()
        };
        let id = store.create_property("host-7", listing).await.unwrap();
        assert_eq!(id, "pr-000002");

        let stored = store.get_property(&id).await.unwrap().unwrap();
        assert_eq!(stored.host_id, "host-7");
        assert_eq!(stored.title, "Dune Cottage");
        assert_eq!(store.list_properties().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn update_host_info_touches_only_that_host() {
        let mut mine = make_property("p1", 80.0, 2);
        mine.host_id = "h1".into();
        let mut also_mine = make_property("p2", 90.0, 2);
        also_mine.host_id = "h1".into();
        let mut theirs = make_property("p3", 70.0, 2);
        theirs.host_id = "h2".into();
        let store = MemoryStore::with_properties(vec![mine, also_mine, theirs]);

        let host = Host::normalized("Rita", "https://img.example/rita.png");
        let updated = store.update_host_info("h1", &host).await.unwrap();
        assert_eq!(updated, vec!["p1".to_string(), "p2".to_string()]);

        assert_eq!(store.get_property("p1").await.unwrap().unwrap().host.name, "rita");
        assert_eq!(store.get_property("p3").await.unwrap().unwrap().host.name, "ana");
    }
}
