//! Record store contract and backends.
//!
//! # Purpose
//! Defines the `PeopleStore` trait that owns the authoritative person table,
//! the shared error type, and the in-memory and SQLite implementations.
//!
//! # Key invariants
//! - Every write re-reads the canonical row before returning it.
//! - Ids are assigned by the store, strictly increasing, never reused.
//! - Input is normalized by the store itself; callers cannot bypass it.
use crate::model::PersonRecord;
use async_trait::async_trait;
use roster_common::{FieldError, LIST_LIMIT, PersonInput};
use thiserror::Error;

pub mod memory;
pub mod sqlite;

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub list_limit: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            list_limit: LIST_LIMIT,
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid input: {0}")]
    InvalidInput(#[from] FieldError),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Unexpected(err.into())
    }
}

impl From<sqlx::migrate::MigrateError> for StoreError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        StoreError::Unexpected(err.into())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait PeopleStore: Send + Sync {
    /// All records, newest id first, capped at the configured list limit.
    async fn list_people(&self) -> StoreResult<Vec<PersonRecord>>;
    async fn get_person(&self, id: i64) -> StoreResult<PersonRecord>;
    async fn create_person(&self, input: PersonInput) -> StoreResult<PersonRecord>;
    /// Full replace: optional fields missing from `input` become null.
    async fn update_person(&self, id: i64, input: PersonInput) -> StoreResult<PersonRecord>;
    /// Returns the number of removed rows; a missing id yields 0.
    async fn delete_person(&self, id: i64) -> StoreResult<u64>;

    async fn health_check(&self) -> StoreResult<()>;
    fn is_durable(&self) -> bool;
    fn backend_name(&self) -> &'static str;
}
