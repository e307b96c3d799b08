use axum::Router;

pub mod config;
pub mod error;
pub mod inertia;
pub mod routes;
pub mod state;

use config::Config;
use state::AppState;

/// Demo application with the protocol adapter installed
pub fn app(config: &Config) -> Router {
    routes::router(AppState::new(config))
}
