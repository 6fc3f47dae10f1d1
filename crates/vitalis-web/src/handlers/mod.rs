//! HTTP handlers for all web routes.

pub mod home;
pub mod predict;
