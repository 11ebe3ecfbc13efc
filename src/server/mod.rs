//! HTTP surface of the simulation.
//!
//! - `GET /start-simulation?scenario=…` returns the opening narrative.
//! - `POST /chat` plays the next game master turn.
//! - `POST /evaluate` scores the finished drill.
//!
//! Failures answer with `{ "error": … }`, each request is independent of the others.

use axum::{
    routing::{get, post},
    Router,
};
use eyre::{Context, Result};
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

mod error;
pub use error::{ApiError, ErrorResponse};

mod handlers;
pub use handlers::{ChatRequest, EvaluateRequest, EvaluationResponse, TextResponse};

use crate::simulation::Simulator;

/// Shared state of the router, immutable after startup.
#[derive(Clone)]
pub struct AppState {
    pub simulator: Arc<Simulator>,
}

/// Builds the router with all endpoints.
pub fn router(simulator: Simulator) -> Router {
    let state = AppState {
        simulator: Arc::new(simulator),
    };

    Router::new()
        .route("/start-simulation", get(handlers::start_simulation))
        .route("/chat", post(handlers::chat))
        .route("/evaluate", post(handlers::evaluate))
        .route("/health", get(handlers::health))
        .with_state(state)
}

/// Serves the router at the given address until the token is cancelled.
///
/// In-flight requests complete before this returns.
pub async fn serve(simulator: Simulator, addr: SocketAddr, token: CancellationToken) -> Result<()> {
    let model = simulator.describe();
    let listener = TcpListener::bind(addr)
        .await
        .wrap_err_with(|| format!("could not bind to {}", addr))?;
    log::info!("Backend server listening at http://{} ({})", addr, model);

    axum::serve(listener, router(simulator))
        .with_graceful_shutdown(async move { token.cancelled().await })
        .await
        .wrap_err("server error")?;

    log::info!("Backend server stopped");
    Ok(())
}
