//! HTTP rate service: live rates with a static fallback, synthetic trends and
//! the client entry page.

pub mod error;
pub mod routes;
pub mod service;

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    http::{HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use std::any::Any;
use std::path::Path;
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::core::config::{AppConfig, ServerConfig};
use crate::core::currency::RateProvider;
use crate::providers::{TrendGenerator, UpstreamRateProvider};
use error::ErrorBody;
use service::RateService;

pub struct AppState {
    pub rates: RateService,
    pub trends: TrendGenerator,
}

pub type SharedState = Arc<AppState>;

pub fn build_state(config: &AppConfig) -> Result<SharedState> {
    let upstream: Option<Arc<dyn RateProvider>> = match config.live_upstream() {
        Some(upstream) => {
            info!(base_url = %upstream.base_url, "Using live upstream rates");
            UpstreamRateProvider::from_config(upstream)?
                .map(|provider| Arc::new(provider) as Arc<dyn RateProvider>)
        }
        None => {
            info!("No upstream credential configured, serving fallback rates only");
            None
        }
    };

    Ok(Arc::new(AppState {
        rates: RateService::new(upstream),
        trends: TrendGenerator::from_config(&config.history),
    }))
}

/// JSON endpoints, mounted both at the root and under `/api`.
fn api_routes() -> Router<SharedState> {
    Router::new()
        .route("/rates", get(routes::get_rates))
        .route("/history", get(routes::get_history))
        .route("/chart", get(routes::get_history))
        .route("/health", get(routes::health))
}

pub fn app_router(state: SharedState, config: &ServerConfig) -> Router {
    let static_dir = Path::new(&config.static_dir);
    let index_file = static_dir.join("index.html");
    let static_service = ServeDir::new(static_dir).fallback(ServeFile::new(index_file));

    let router = Router::new()
        .merge(api_routes())
        .nest("/api", api_routes())
        .fallback_service(static_service)
        .with_state(state);
    with_middleware(router, config)
}

/// Wraps a router with panic recovery, request tracing and CORS.
pub fn with_middleware(router: Router, config: &ServerConfig) -> Router {
    router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_origins))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(%origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::OPTIONS])
}

fn handle_panic(_err: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!("Request handler panicked");
    (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody::internal())).into_response()
}

pub async fn serve(config: &AppConfig) -> Result<()> {
    let state = build_state(config)?;
    let router = app_router(state, &config.server);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Server running on http://{}", listener.local_addr()?);
    info!(
        "Supporting {} currencies",
        crate::core::currency::SUPPORTED_CURRENCIES.len()
    );
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
