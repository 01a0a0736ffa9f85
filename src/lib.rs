//! Local library catalog server
//!
//! Books, authors, genres, languages and physical book copies, served as
//! JSON catalog pages with a per-session visit counter and an admin CRUD
//! surface.

use std::sync::Arc;

pub mod admin;
pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod pagination;
pub mod repository;
pub mod services;
pub mod session;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
