//! REST API for predictions and the live dashboard.
//!
//! Prediction endpoints:
//! - `GET /`, `GET /health` - service status
//! - `POST /predict`, `POST /batch_predict` - stateless model evaluation
//!
//! Dashboard endpoints, backed by one shared profile store:
//! - `GET /dashboard` - full dashboard snapshot
//! - `GET|PUT|PATCH /profile` - read, replace or edit the profile
//! - `POST /presets/{name}` - load a preset
//! - `POST /recommendations/{id}/apply` - accept a current recommendation

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::routing::{get, post};
use rand::rngs::StdRng;
use tracing::info;

use crate::clock::ClockContext;
use crate::config::ClockConfig;
use crate::error::EngineError;
use crate::predict::ConsumptionModel;
use crate::profile::ProfileStore;

/// Mutable session data. Guarded as a unit so a mutation and the reads that
/// depend on it are never interleaved with another request.
pub struct Session {
    pub store: ProfileStore,
    /// Jitter source for dashboard traces.
    pub rng: StdRng,
}

/// Application state shared across all request handlers.
pub struct AppState {
    session: Mutex<Session>,
    clock: ClockConfig,
    model_name: &'static str,
}

impl AppState {
    /// Wraps a store and trace random source for serving.
    ///
    /// # Arguments
    ///
    /// * `store` - Profile store the dashboard endpoints read and mutate
    /// * `rng` - Source of trace jitter
    /// * `clock` - Pinned calendar fields; unset fields follow the system clock
    pub fn new(store: ProfileStore, rng: StdRng, clock: ClockConfig) -> Self {
        let model_name = store.model().name();
        Self {
            session: Mutex::new(Session { store, rng }),
            clock,
            model_name,
        }
    }

    /// Clock reading for the current request.
    fn current_clock(&self) -> Result<ClockContext, EngineError> {
        self.clock.resolve(ClockContext::now())
    }
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared application state
///
/// # Returns
///
/// Configured `Router` ready to serve.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/predict", post(handlers::predict))
        .route("/batch_predict", post(handlers::batch_predict))
        .route("/dashboard", get(handlers::get_dashboard))
        .route(
            "/profile",
            get(handlers::get_profile)
                .put(handlers::put_profile)
                .patch(handlers::patch_profile),
        )
        .route("/presets/{name}", post(handlers::apply_preset))
        .route(
            "/recommendations/{id}/apply",
            post(handlers::apply_recommendation),
        )
        .with_state(state)
}

/// Binds to the given address and serves the API until the process exits.
///
/// # Arguments
///
/// * `state` - Shared application state
/// * `addr` - Socket address to bind to
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("API server listening on http://{addr}");
    axum::serve(listener, app).await
}
