#![allow(clippy::cast_precision_loss)]

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::property::Property;
use crate::domain::stay::StayRange;
use crate::error::{Result, StayError};

/// What a guest asks for when booking a property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub property_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
}

impl BookingRequest {
    pub fn stay(&self) -> StayRange {
        StayRange::unchecked(self.check_in, self.check_out)
    }

    /// Checks the request against the property snapshot it will be booked on.
    ///
    /// A capacity of 0 means the catalog did not record one, so the guest
    /// count is only required to be positive.
    pub fn validate(&self, property: &Property) -> Result<()> {
        if self.property_id.trim().is_empty() {
            return Err(StayError::InvalidParams {
                reason: "property id is required".into(),
            });
        }
        if self.property_id != property.id {
            return Err(StayError::InvalidParams {
                reason: format!(
                    "request is for property '{}' but snapshot is '{}'",
                    self.property_id, property.id
                ),
            });
        }
        StayRange::new(self.check_in, self.check_out)?;
        if self.guests == 0 {
            return Err(StayError::InvalidParams {
                reason: "guests must be at least 1".into(),
            });
        }
        let capacity = property.capacity.guest;
        if capacity > 0 && self.guests > capacity {
            return Err(StayError::InvalidParams {
                reason: format!(
                    "{} guests exceeds the property's capacity of {capacity}",
                    self.guests
                ),
            });
        }
        Ok(())
    }
}

/// Price breakdown for a stay at a property's current nightly rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub nights: i64,
    pub price_per_night: f64,
    pub total_price: f64,
}

impl Quote {
    pub fn for_stay(stay: &StayRange, property: &Property) -> Self {
        let nights = stay.nights();
        Self {
            nights,
            price_per_night: property.price,
            total_price: nights as f64 * property.price,
        }
    }
}

impl std::fmt::Display for Quote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} nights x {:.2} = {:.2}",
            self.nights, self.price_per_night, self.total_price
        )
    }
}

/// A booking ready to be written: everything except the store-assigned id
/// and creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBooking {
    pub user_id: String,
    pub property_id: String,
    pub property_title: String,
    pub property_image: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
    pub nights: i64,
    pub price_per_night: f64,
    pub total_price: f64,
}

impl NewBooking {
    /// Snapshot the property's title, image and rate into a new booking.
    pub fn from_request(user_id: &str, request: &BookingRequest, property: &Property) -> Self {
        let quote = Quote::for_stay(&request.stay(), property);
        Self {
            user_id: user_id.to_string(),
            property_id: request.property_id.clone(),
            property_title: property.title.clone(),
            property_image: property.image.clone(),
            check_in: request.check_in,
            check_out: request.check_out,
            guests: request.guests,
            nights: quote.nights,
            price_per_night: quote.price_per_night,
            total_price: quote.total_price,
        }
    }

    pub fn into_booking(self, id: String, created_at: DateTime<Utc>) -> Booking {
        Booking {
            id,
            user_id: self.user_id,
            property_id: self.property_id,
            property_title: self.property_title,
            property_image: self.property_image,
            check_in: self.check_in,
            check_out: self.check_out,
            guests: self.guests,
            nights: self.nights,
            price_per_night: self.price_per_night,
            total_price: self.total_price,
            created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub user_id: String,
    pub property_id: String,
    pub property_title: String,
    pub property_image: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
    pub nights: i64,
    pub price_per_night: f64,
    pub total_price: f64,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    pub fn stay(&self) -> StayRange {
        StayRange::unchecked(self.check_in, self.check_out)
    }
}

impl std::fmt::Display for Booking {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (ID: {}) | {} → {} | {} guests | {} nights x {:.2} = {:.2}",
            self.property_title,
            self.id,
            self.check_in,
            self.check_out,
            self.guests,
            self.nights,
            self.price_per_night,
            self.total_price,
        )
    }
}

/// A reserved interval as shown on a date picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookedRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl From<&Booking> for BookedRange {
    fn from(booking: &Booking) -> Self {
        Self {
            from: booking.check_in,
            to: booking.check_out,
        }
    }
}

/// Sort newest stay first.
pub fn sort_by_check_in_desc(bookings: &mut [Booking]) {
    bookings.sort_by(|a, b| b.check_in.cmp(&a.check_in));
}
