//! # Todolist
//!
//! A task-management service: a JSON REST API over an embedded task store,
//! with a PDF report export.
//!
//! This library provides:
//! - An HTTP API for listing, creating, updating, and deleting tasks
//! - A deterministic PDF report generator rendering the list as paginated
//!   tables of incomplete and completed tasks
//! - An HTTP client that owns the list filter/sort contract used by UIs
//!
//! ## Modules
//! - `api`: axum routes and request/response mapping
//! - `store`: SQLite-backed task persistence
//! - `report`: report layout and PDF encoding
//! - `client`: reqwest-based API client with filtering and sorting

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod report;
pub mod store;
pub mod task;

pub use config::Config;
pub use task::{Priority, Task};
