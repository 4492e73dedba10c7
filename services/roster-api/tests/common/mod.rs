use roster_api::app::{AppState, build_router};
use roster_api::config::AllowedOrigins;
use roster_api::store::PeopleStore;
use std::sync::Arc;

pub type TestApp = axum::routing::RouterIntoService<axum::body::Body, ()>;

pub async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

pub fn app_with_store(
    store: Arc<dyn PeopleStore + Send + Sync>,
    allowed_origins: AllowedOrigins,
) -> TestApp {
    build_router(AppState::new(store, allowed_origins)).into_service()
}
