use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};

use crate::domain::booking::{Booking, BookingRequest, NewBooking};
use crate::domain::property::{Address, Capacity, Host, Property};
use crate::domain::stay::parse_date;
use crate::error::Result;
use crate::ports::booking_store::BookingStore;

type InsertFn = Box<dyn Fn(&NewBooking) -> Result<String> + Send + Sync>;
type QueryFn = Box<dyn Fn(&str) -> Result<Vec<Booking>> + Send + Sync>;
type GetFn = Box<dyn Fn(&str) -> Result<Option<Booking>> + Send + Sync>;
type DeleteFn = Box<dyn Fn(&str) -> Result<()> + Send + Sync>;

/// Booking store whose every operation is a swappable closure.
#[allow(clippy::struct_field_names)]
pub struct MockBookingStore {
    insert_fn: Mutex<InsertFn>,
    property_fn: Mutex<QueryFn>,
    user_fn: Mutex<QueryFn>,
    get_fn: Mutex<GetFn>,
    delete_fn: Mutex<DeleteFn>,
}

impl Default for MockBookingStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBookingStore {
    pub fn new() -> Self {
        Self {
            insert_fn: Mutex::new(Box::new(|_| Ok("mock-booking".into()))),
            property_fn: Mutex::new(Box::new(|_| Ok(vec![]))),
            user_fn: Mutex::new(Box::new(|_| Ok(vec![]))),
            get_fn: Mutex::new(Box::new(|_| Ok(None))),
            delete_fn: Mutex::new(Box::new(|_| Ok(()))),
        }
    }

    #[must_use]
    pub fn with_insert(
        self,
        f: impl Fn(&NewBooking) -> Result<String> + Send + Sync + 'static,
    ) -> Self {
        *self.insert_fn.lock().unwrap() = Box::new(f);
        self
    }

    #[must_use]
    pub fn with_property_bookings(
        self,
        f: impl Fn(&str) -> Result<Vec<Booking>> + Send + Sync + 'static,
    ) -> Self {
        *self.property_fn.lock().unwrap() = Box::new(f);
        self
    }

    #[must_use]
    pub fn with_user_bookings(
        self,
        f: impl Fn(&str) -> Result<Vec<Booking>> + Send + Sync + 'static,
    ) -> Self {
        *self.user_fn.lock().unwrap() = Box::new(f);
        self
    }

    #[must_use]
    pub fn with_get(
        self,
        f: impl Fn(&str) -> Result<Option<Booking>> + Send + Sync + 'static,
    ) -> Self {
        *self.get_fn.lock().unwrap() = Box::new(f);
        self
    }

    #[must_use]
    pub fn with_delete(self, f: impl Fn(&str) -> Result<()> + Send + Sync + 'static) -> Self {
        *self.delete_fn.lock().unwrap() = Box::new(f);
        self
    }
}

#[async_trait]
impl BookingStore for MockBookingStore {
    async fn insert_booking(&self, booking: NewBooking) -> Result<String> {
        let f = self.insert_fn.lock().unwrap();
        f(&booking)
    }

    async fn bookings_for_property(&self, property_id: &str) -> Result<Vec<Booking>> {
        let f = self.property_fn.lock().unwrap();
        f(property_id)
    }

    async fn bookings_for_user(&self, user_id: &str) -> Result<Vec<Booking>> {
        let f = self.user_fn.lock().unwrap();
        f(user_id)
    }

    async fn get_booking(&self, id: &str) -> Result<Option<Booking>> {
        let f = self.get_fn.lock().unwrap();
        f(id)
    }

    async fn delete_booking(&self, id: &str) -> Result<()> {
        let f = self.delete_fn.lock().unwrap();
        f(id)
    }
}

// ---------- Builders ----------

pub fn d(s: &str) -> NaiveDate {
    parse_date(s).unwrap()
}

pub fn make_property(id: &str, price: f64, guests: u32) -> Property {
    Property {
        id: id.into(),
        host_id: "host-1".into(),
        title: format!("Property {id}"),
        description: "A quiet place near the beach".into(),
        amenities: vec!["WiFi".into(), "Kitchen".into()],
        price,
        rating: 4.5,
        superhost: false,
        address: Address {
            street: "1 Harbour Rd".into(),
            zip_code: "1000".into(),
            city: "Lisbon".into(),
            country: "Portugal".into(),
        },
        coordinates: None,
        capacity: Capacity {
            guest: guests,
            bedroom: 1,
        },
        host: Host {
            name: "ana".into(),
            image: String::new(),
        },
        image: format!("https://img.example/{id}.jpg"),
        images: vec![],
    }
}

pub fn make_request(
    property_id: &str,
    check_in: &str,
    check_out: &str,
    guests: u32,
) -> BookingRequest {
    BookingRequest {
        property_id: property_id.into(),
        check_in: d(check_in),
        check_out: d(check_out),
        guests,
    }
}

pub fn make_booking(
    id: &str,
    user_id: &str,
    property_id: &str,
    check_in: &str,
    check_out: &str,
) -> Booking {
    let property = make_property(property_id, 100.0, 4);
    NewBooking::from_request(
        user_id,
        &make_request(property_id, check_in, check_out, 1),
        &property,
    )
    .into_booking(id.into(), Utc::now())
}
