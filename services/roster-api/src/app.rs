//! Record store HTTP application wiring.
//!
//! # Purpose
//! Builds the Axum router, configures tracing and CORS middleware, and defines
//! the shared application state injected into handlers.
//!
//! # Notes
//! This module centralizes route composition to keep `main` small and testable.
use crate::api;
use crate::api::openapi::ApiDoc;
use crate::config::AllowedOrigins;
use crate::observability;
use crate::store::PeopleStore;
use axum::Router;
use axum::http::{Method, header};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_opentelemetry::OpenTelemetrySpanExt;
use utoipa::OpenApi;

#[derive(Clone)]
pub struct AppState {
    pub api_version: String,
    pub store: Arc<dyn PeopleStore + Send + Sync>,
    pub allowed_origins: AllowedOrigins,
}

impl AppState {
    pub fn new(store: Arc<dyn PeopleStore + Send + Sync>, allowed_origins: AllowedOrigins) -> Self {
        Self {
            api_version: "v1".to_string(),
            store,
            allowed_origins,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer =
        TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
            let parent = observability::trace_context_from_headers(request.headers());
            let origin = request
                .headers()
                .get(header::ORIGIN)
                .and_then(|value| value.to_str().ok())
                .unwrap_or("<no-origin>");
            let span = tracing::info_span!(
                "http.request",
                method = %request.method(),
                uri = %request.uri(),
                origin = %origin,
                version = ?request.version()
            );
            span.set_parent(parent);
            span
        });
    let cors_layer = cors_layer(&state.allowed_origins);

    Router::new()
        .route(
            "/api/system/info",
            axum::routing::get(api::system::system_info),
        )
        .route(
            "/api/system/health",
            axum::routing::get(api::system::system_health),
        )
        .route(
            "/api/people",
            axum::routing::get(api::people::list_people).post(api::people::create_person),
        )
        .route(
            "/api/people/:id",
            axum::routing::get(api::people::get_person)
                .put(api::people::update_person)
                .delete(api::people::delete_person),
        )
        .merge(
            utoipa_swagger_ui::SwaggerUi::new("/docs").url("/api/openapi.json", ApiDoc::openapi()),
        )
        .layer(cors_layer)
        .layer(trace_layer)
        .with_state(state)
}

/// Cross-origin policy for browser clients. Credentials are never allowed,
/// so the wildcard origin stays valid.
pub fn cors_layer(allowed_origins: &AllowedOrigins) -> CorsLayer {
    let allow_origin = match allowed_origins {
        AllowedOrigins::Any => AllowOrigin::any(),
        AllowedOrigins::List(origins) => AllowOrigin::list(origins.iter().cloned()),
    };
    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(false)
}
