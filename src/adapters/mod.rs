pub mod cache;
pub mod catalog;
pub mod firestore;
pub mod memory;
