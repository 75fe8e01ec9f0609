//! Libris Library Catalog Server
//!
//! A Rust REST API server for a library catalog: users browse, rate and
//! review books, borrow and return them; administrators manage the catalog,
//! categories and global settings.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
