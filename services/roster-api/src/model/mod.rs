//! Record store data model.
//!
//! # Purpose
//! Re-exports the stored person record used by the store and HTTP layers.
mod person;

pub use person::PersonRecord;
