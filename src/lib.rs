//! ShareIt item sharing server
//!
//! Users list items, other users book them for a time window and owners
//! approve or decline those bookings. This crate serves the booking
//! lifecycle over a REST JSON API.

use std::sync::Arc;

pub mod api;
pub mod clock;
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
    pub services: Arc<services::Services>,
}
