use async_trait::async_trait;

use crate::domain::booking::{Booking, NewBooking};
use crate::error::Result;

/// The `bookings` collection of the document store.
///
/// Queries are plain equality filters; the store knows nothing about date
/// ranges or overlaps.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Insert a booking and return the id the store assigned to it.
    async fn insert_booking(&self, booking: NewBooking) -> Result<String>;
    async fn bookings_for_property(&self, property_id: &str) -> Result<Vec<Booking>>;
    async fn bookings_for_user(&self, user_id: &str) -> Result<Vec<Booking>>;
    async fn get_booking(&self, id: &str) -> Result<Option<Booking>>;
    /// Unconditional delete. Deleting a missing id is not an error.
    async fn delete_booking(&self, id: &str) -> Result<()>;
}
