mod config;
mod error;
mod handlers;
mod lookup;
mod routes;
mod sheets;

use anyhow::{Context, Result};
use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use shared::models::ProfileProjection;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;
use crate::routes::api_routes;
use crate::sheets::{GoogleSheetsClient, RowSource};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub rows: Arc<dyn RowSource>,
    pub projection: Arc<ProfileProjection>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "backend=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::from_env()?;

    tracing::info!("Starting sheet login relay");

    let sheets = GoogleSheetsClient::from_config(&config).await?;
    tracing::info!(
        spreadsheet = %config.spreadsheet_id,
        range = %config.sheet_range,
        "Google Sheets client initialized"
    );

    let state = AppState {
        rows: Arc::new(sheets),
        projection: Arc::new(config.profile_projection.clone()),
    };

    let app = create_app(state, &config)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server running at http://localhost:{}", config.port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn create_app(state: AppState, config: &AppConfig) -> Result<Router> {
    let app = Router::new()
        .merge(api_routes())
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(&config.cors_allowed_origin)?)
        .with_state(state);

    Ok(app)
}

/// CORS restricted to the single configured origin.
fn build_cors_layer(origin: &str) -> Result<CorsLayer> {
    let origin: HeaderValue = origin
        .parse()
        .with_context(|| format!("CORS_ALLOWED_ORIGIN '{}' is not a valid origin", origin))?;

    tracing::info!("CORS configured for origin: {:?}", origin);

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::exact(origin))
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]))
}
