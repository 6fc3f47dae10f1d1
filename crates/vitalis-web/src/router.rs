//! Axum router — maps URL paths to handlers.

use std::any::Any;
use std::sync::Arc;

use axum::{
    response::Response,
    routing::{get, post},
    Router,
};
use tower_http::{catch_panic::CatchPanicLayer, compression::CompressionLayer, trace::TraceLayer};

use crate::error::error_response;
use crate::handlers::{home::home, predict::predict};
use crate::state::{AppState, SharedState};

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    let shared: SharedState = Arc::new(state);

    Router::new()
        .route("/",        get(home))
        .route("/predict", post(predict))

        // Middleware
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}

/// A panicking handler gets the same plain-text answer as any other failure.
fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "internal error".to_string()
    };
    tracing::error!(%detail, "Handler panicked");
    error_response(detail)
}
