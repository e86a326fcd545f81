use crate::{SharedData, api, logging};
use axum::Router;
use std::sync::Arc;

/// Wires every route, the API documentation, and request tracing onto a single router
/// backed by the given shared state
pub fn build_router(shared_data: Arc<SharedData>) -> Router {
    let router = Router::new()
        .merge(api::todo::todo_routes())
        .merge(api::swagger_main::build_documentation())
        .with_state(shared_data);

    logging::attach_tracing_http(router)
}
