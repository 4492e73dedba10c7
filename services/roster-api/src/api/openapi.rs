//! OpenAPI schema aggregation for the record store API.
//!
//! # Purpose
//! Collects all routes and schema types into a single OpenAPI document for docs
//! and client generation.
use crate::api::{
    people, system,
    types::{DeleteResponse, ErrorResponse, HealthStatus, Person, PersonInput, SystemInfo},
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "roster-api",
        version = "v1",
        description = "Person record store HTTP API"
    ),
    paths(
        system::system_info,
        system::system_health,
        people::list_people,
        people::get_person,
        people::create_person,
        people::update_person,
        people::delete_person
    ),
    components(schemas(
        SystemInfo,
        HealthStatus,
        ErrorResponse,
        Person,
        PersonInput,
        DeleteResponse
    )),
    tags(
        (name = "system", description = "Service metadata and health"),
        (name = "people", description = "Person records")
    )
)]
pub struct ApiDoc;
