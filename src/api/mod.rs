//! HTTP API.

pub mod routes;
pub mod todos;

pub use routes::{serve, AppState};
