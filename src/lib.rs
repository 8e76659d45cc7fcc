pub mod auth;
pub mod config;
pub mod db;
pub mod err;
pub mod logging;
pub mod models;
pub mod report;
pub mod routes;
pub mod state;

use axum::Router;

pub use config::ShopieaArgs;
pub use state::{AppState, ServiceInfo};

/// Builds the complete HTTP application around already initialised state.
pub fn server(state: AppState) -> Router {
    routes::router(state)
}
