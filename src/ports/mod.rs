pub mod booking_store;
pub mod cache;
pub mod property_catalog;
