//! Person record API handlers.
//!
//! # Purpose
//! Implements list/get/create/update/delete over the record store with
//! consistent error mapping. Responses always carry the row as re-read by
//! the store.
use crate::api::error::{
    ApiError, api_bad_body, api_internal, api_not_found, api_validation_error,
};
use crate::api::parse_person_id;
use crate::api::types::{DeleteResponse, Person, PersonInput};
use crate::app::AppState;
use crate::store::StoreError;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

#[utoipa::path(
    get,
    path = "/api/people",
    tag = "people",
    responses(
        (status = 200, description = "People ordered by id descending, at most 1000", body = [Person]),
        (status = 500, description = "Storage fault", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn list_people(
    State(state): State<AppState>,
) -> Result<Json<Vec<Person>>, ApiError> {
    let rows = state
        .store
        .list_people()
        .await
        .map_err(|err| api_internal("failed to list people", &err))?;
    Ok(Json(rows.into_iter().map(Person::from).collect()))
}

#[utoipa::path(
    get,
    path = "/api/people/{id}",
    tag = "people",
    params(
        ("id" = i64, Path, description = "Person id")
    ),
    responses(
        (status = 200, description = "Person", body = Person),
        (status = 404, description = "Person not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn get_person(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Person>, ApiError> {
    let id = parse_person_id(&id).ok_or_else(|| api_not_found("person not found"))?;
    match state.store.get_person(id).await {
        Ok(row) => Ok(Json(row.into())),
        Err(StoreError::NotFound(_)) => Err(api_not_found("person not found")),
        Err(err) => Err(api_internal("failed to load person", &err)),
    }
}

#[utoipa::path(
    post,
    path = "/api/people",
    tag = "people",
    request_body = PersonInput,
    responses(
        (status = 201, description = "Person created", body = Person),
        (status = 400, description = "Name missing or body malformed", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn create_person(
    State(state): State<AppState>,
    body: Result<Json<PersonInput>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(input) = body.map_err(api_bad_body)?;
    match state.store.create_person(input).await {
        Ok(row) => {
            tracing::debug!(id = row.id, "person created");
            Ok((StatusCode::CREATED, Json(Person::from(row))))
        }
        Err(StoreError::InvalidInput(err)) => Err(api_validation_error(&err.to_string())),
        Err(err) => Err(api_internal("failed to create person", &err)),
    }
}

#[utoipa::path(
    put,
    path = "/api/people/{id}",
    tag = "people",
    params(
        ("id" = i64, Path, description = "Person id")
    ),
    request_body = PersonInput,
    responses(
        (status = 200, description = "Person replaced", body = Person),
        (status = 400, description = "Name missing or body malformed", body = crate::api::types::ErrorResponse),
        (status = 404, description = "Person not found", body = crate::api::types::ErrorResponse)
    )
)]
pub(crate) async fn update_person(
    Path(id): Path<String>,
    State(state): State<AppState>,
    body: Result<Json<PersonInput>, JsonRejection>,
) -> Result<Json<Person>, ApiError> {
    let Json(input) = body.map_err(api_bad_body)?;
    let id = parse_person_id(&id).ok_or_else(|| api_not_found("person not found"))?;
    match state.store.update_person(id, input).await {
        Ok(row) => Ok(Json(row.into())),
        Err(StoreError::InvalidInput(err)) => Err(api_validation_error(&err.to_string())),
        Err(StoreError::NotFound(_)) => Err(api_not_found("person not found")),
        Err(err) => Err(api_internal("failed to update person", &err)),
    }
}

#[utoipa::path(
    delete,
    path = "/api/people/{id}",
    tag = "people",
    params(
        ("id" = i64, Path, description = "Person id")
    ),
    responses(
        (status = 200, description = "Deleted row count, 0 when the id was absent", body = DeleteResponse)
    )
)]
pub(crate) async fn delete_person(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let Some(id) = parse_person_id(&id) else {
        return Ok(Json(DeleteResponse::deleted(0)));
    };
    let deleted = state
        .store
        .delete_person(id)
        .await
        .map_err(|err| api_internal("failed to delete person", &err))?;
    Ok(Json(DeleteResponse::deleted(deleted)))
}
