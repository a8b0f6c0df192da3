use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{health, login};
use crate::AppState;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check
        .route("/health", get(health::health_check))

        // Login
        .route("/login", post(login::login))
}
