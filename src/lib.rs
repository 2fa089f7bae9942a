//! GearGuard maintenance management server
//!
//! Employees report equipment problems as maintenance requests, technicians
//! accept and resolve them, managers oversee teams and the equipment fleet.
//! The crate exposes the record store, the lifecycle services and the REST
//! router so the server can also be embedded or driven from tests.

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

impl AppState {
    pub fn new(config: AppConfig, services: services::Services) -> Self {
        Self {
            config: Arc::new(config),
            services: Arc::new(services),
        }
    }
}
