//! Request-boundary error: every failure inside a handler ends up here and
//! is returned to the client as one plain-text line.

use axum::extract::rejection::FormRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use vitalis_model::ModelError;

/// Prefix of every user-visible failure message.
pub const ERROR_MARKER: &str = "❌ Error:";

#[derive(Debug, Error)]
pub enum WebError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Form(#[from] FormRejection),

    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),
}

/// Plain-text failure response used by handlers and the panic guard.
pub fn error_response(message: impl std::fmt::Display) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("{ERROR_MARKER} {message}"),
    )
        .into_response()
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Request failed");
        error_response(&self)
    }
}
