//! vitalis-web — Vital-sign triage front-end.
//! Serves the input form, coerces submissions into the model's feature
//! vector and renders the predicted category.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;
pub mod templates;
