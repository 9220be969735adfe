//! Booking availability engine.
//!
//! The store underneath only supports equality queries, so every overlap
//! decision is made here over the full list of a property's bookings.

pub mod locks;

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::domain::booking::{
    BookedRange, Booking, BookingRequest, NewBooking, Quote, sort_by_check_in_desc,
};
use crate::domain::property::Property;
use crate::domain::stay::StayRange;
use crate::error::{Result, StayError};
use crate::ports::booking_store::BookingStore;
use locks::PropertyLocks;

/// First stored booking that the candidate stay conflicts with.
pub fn first_conflict<'a>(candidate: &StayRange, bookings: &'a [Booking]) -> Option<&'a Booking> {
    bookings.iter().find(|b| candidate.conflicts_with(&b.stay()))
}

pub struct BookingEngine {
    store: Arc<dyn BookingStore>,
    locks: PropertyLocks,
}

impl BookingEngine {
    pub fn new(store: Arc<dyn BookingStore>) -> Self {
        Self {
            store,
            locks: PropertyLocks::new(),
        }
    }

    /// Whether `[check_in, check_out)` is free at the property.
    ///
    /// Does not validate the range; an inverted range is checked as given.
    pub async fn check_availability(
        &self,
        property_id: &str,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> Result<bool> {
        let bookings = self.store.bookings_for_property(property_id).await?;
        let candidate = StayRange::unchecked(check_in, check_out);
        let conflict = first_conflict(&candidate, &bookings);
        if let Some(existing) = conflict {
            debug!(
                property_id,
                candidate = %candidate,
                conflicting_booking = %existing.id,
                "stay conflicts with existing booking"
            );
        }
        Ok(conflict.is_none())
    }

    /// Every reserved interval of the property, in store order.
    pub async fn booked_date_ranges(&self, property_id: &str) -> Result<Vec<BookedRange>> {
        let bookings = self.store.bookings_for_property(property_id).await?;
        Ok(bookings.iter().map(BookedRange::from).collect())
    }

    /// Persist a booking priced from the property snapshot.
    ///
    /// This does not check availability; see [`BookingEngine::reserve`].
    pub async fn create_booking(
        &self,
        requester_id: &str,
        request: &BookingRequest,
        property: &Property,
    ) -> Result<String> {
        let booking = NewBooking::from_request(requester_id, request, property);
        let nights = booking.nights;
        let total = booking.total_price;
        let id = self.store.insert_booking(booking).await?;
        info!(
            booking_id = %id,
            property_id = %request.property_id,
            user_id = requester_id,
            nights,
            total,
            "booking created"
        );
        Ok(id)
    }

    pub async fn cancel_booking(&self, booking_id: &str) -> Result<()> {
        self.store.delete_booking(booking_id).await?;
        info!(booking_id, "booking cancelled");
        Ok(())
    }

    /// The user's bookings, latest check-in first.
    pub async fn user_bookings(&self, user_id: &str) -> Result<Vec<Booking>> {
        let mut bookings = self.store.bookings_for_user(user_id).await?;
        sort_by_check_in_desc(&mut bookings);
        Ok(bookings)
    }

    pub async fn get_booking(&self, booking_id: &str) -> Result<Booking> {
        self.store
            .get_booking(booking_id)
            .await?
            .ok_or_else(|| StayError::NotFound {
                collection: "bookings".into(),
                id: booking_id.into(),
            })
    }

    pub fn quote(request: &BookingRequest, property: &Property) -> Result<Quote> {
        let stay = StayRange::new(request.check_in, request.check_out)?;
        Ok(Quote::for_stay(&stay, property))
    }

    /// Validate, check and create as one step per property.
    ///
    /// The property's lock is held from the availability read until the
    /// write has landed, so two reservations racing through this engine
    /// cannot both succeed for overlapping stays.
    pub async fn reserve(
        &self,
        requester_id: &str,
        request: &BookingRequest,
        property: &Property,
    ) -> Result<String> {
        request.validate(property)?;

        let _guard = self.locks.acquire(&request.property_id).await;
        let available = self
            .check_availability(&request.property_id, request.check_in, request.check_out)
            .await?;
        if !available {
            warn!(
                property_id = %request.property_id,
                user_id = requester_id,
                check_in = %request.check_in,
                check_out = %request.check_out,
                "reservation rejected, dates already booked"
            );
            return Err(StayError::Unavailable {
                property_id: request.property_id.clone(),
                check_in: request.check_in,
                check_out: request.check_out,
            });
        }
        self.create_booking(requester_id, request, property).await
    }
}
