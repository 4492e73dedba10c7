//! Record store service library crate.
//!
//! # Purpose
//! Exposes the person record API surface, configuration, observability, and
//! storage backends for use by the binary and tests.
pub mod api;
pub mod app;
pub mod config;
pub mod model;
pub mod observability;
pub mod store;
