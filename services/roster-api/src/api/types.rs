//! HTTP API request/response types.
//!
//! # Purpose
//! Defines the service-local payload shapes. Person records and bodies come
//! from `roster_common` so the client and the server share one definition.
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub use roster_common::{DeleteResponse, Person, PersonInput};

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct SystemInfo {
    pub api_version: String,
    pub storage_backend: String,
    pub durable_storage: bool,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, Clone)]
pub struct HealthStatus {
    pub status: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub request_id: Option<String>,
}
