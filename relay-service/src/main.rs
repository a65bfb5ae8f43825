use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use orders::SignalError;
use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

mod broker;
mod config;
mod types;
mod webhook;

use broker::{AlpacaClient, BrokerError};
use config::Config;
use types::*;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    let broker = AlpacaClient::new(&config)?;
    let bind_addr = config.bind_addr;

    info!(?config, "Loaded relay configuration");
    info!(" Forwarding orders to {}", broker.orders_url());

    let app = app(AppState {
        config: Arc::new(config),
        broker: Arc::new(broker),
    });

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;

    info!(" Signal relay starting on http://{}", bind_addr);
    info!(" Available endpoints:");
    info!("  POST /webhook - Relay a trade signal as a market order");
    info!("  GET  /health  - Health check");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!(" Signal relay stopped");
    Ok(())
}

#[derive(Clone)]
struct AppState {
    config: Arc<Config>,
    broker: Arc<AlpacaClient>,
}

fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/webhook", post(webhook::receive_signal))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!(" Shutdown requested, draining connections"),
        Err(e) => {
            warn!(" Could not listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthStatus {
        status: "healthy".to_string(),
        service: "signal-relay".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.config.environment.as_str().to_string(),
        timestamp: SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default(),
    })
}

#[derive(Debug)]
enum AppError {
    UnsupportedMediaType,
    Signal(SignalError),
    Broker(BrokerError),
}

impl From<SignalError> for AppError {
    fn from(err: SignalError) -> Self {
        AppError::Signal(err)
    }
}

impl From<BrokerError> for AppError {
    fn from(err: BrokerError) -> Self {
        AppError::Broker(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::UnsupportedMediaType => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                ErrorBody {
                    error: INVALID_CONTENT_TYPE.to_string(),
                    details: None,
                },
            ),
            AppError::Signal(err) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    error: err.to_string(),
                    details: None,
                },
            ),
            AppError::Broker(err) => {
                warn!(" Order placement failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        error: ORDER_FAILED.to_string(),
                        details: Some(err.details()),
                    },
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
