//! Request handlers for the API endpoints.

use std::sync::{Arc, MutexGuard};

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use tracing::{info, warn};

use super::types::{
    API_VERSION, AppliedRecommendationResponse, BatchPredictionResponse, ErrorResponse,
    HealthResponse, PredictionResponse, ProfileResponse, RootResponse,
};
use super::{AppState, Session};
use crate::dashboard::DashboardView;
use crate::error::EngineError;
use crate::predict::{FeatureVector, predict as predict_kw};
use crate::profile::update::FieldAssignment;
use crate::profile::{Preset, ProfileUpdate, UserProfile};

/// Error half of every fallible handler.
type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(status: StatusCode, error: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
}

fn status_of(e: &EngineError) -> StatusCode {
    match e {
        EngineError::InvalidFeature { .. }
        | EngineError::UnknownField(_)
        | EngineError::InvalidValue { .. } => StatusCode::BAD_REQUEST,
        EngineError::UnknownPreset { .. } | EngineError::UnknownRecommendation(_) => {
            StatusCode::NOT_FOUND
        }
    }
}

fn engine_error(e: EngineError) -> ApiError {
    warn!(error = %e, "rejected request");
    error_response(status_of(&e), e.to_string())
}

/// Locks the session and brings its clock up to date.
fn lock_session(state: &AppState) -> Result<MutexGuard<'_, Session>, ApiError> {
    let mut session = state.session.lock().map_err(|_| {
        error_response(StatusCode::INTERNAL_SERVER_ERROR, "session lock poisoned")
    })?;
    let clock = state.current_clock().map_err(engine_error)?;
    if *session.store.clock() != clock {
        session.store.set_clock(clock).map_err(engine_error)?;
    }
    Ok(session)
}

/// `GET /` → 200 + `RootResponse`
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Energy Prediction API",
        status: "running",
        model_loaded: true,
    })
}

/// `GET /health` → 200 + `HealthResponse`
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        model_loaded: true,
        model: state.model_name,
        api_version: API_VERSION,
    })
}

/// Evaluates the model for one feature vector.
///
/// `POST /predict` → 200 + `PredictionResponse`
/// Out-of-range fields → 400 + `ErrorResponse`
pub async fn predict(
    Json(features): Json<FeatureVector>,
) -> Result<Json<PredictionResponse>, ApiError> {
    let prediction = predict_kw(&features).map_err(engine_error)?;
    info!(?features, prediction, "prediction served");
    Ok(Json(PredictionResponse {
        prediction,
        status: "success",
        message: "Prediction completed successfully",
    }))
}

/// Evaluates the model for every vector; one invalid vector fails the batch.
///
/// `POST /batch_predict` → 200 + `BatchPredictionResponse`
pub async fn batch_predict(
    Json(batch): Json<Vec<FeatureVector>>,
) -> Result<Json<BatchPredictionResponse>, ApiError> {
    let predictions = batch
        .iter()
        .enumerate()
        .map(|(i, features)| {
            predict_kw(features).map_err(|e| {
                warn!(index = i, error = %e, "rejected batch entry");
                error_response(status_of(&e), format!("entry {i}: {e}"))
            })
        })
        .collect::<Result<Vec<f64>, ApiError>>()?;
    info!(count = predictions.len(), "batch prediction served");
    Ok(Json(BatchPredictionResponse {
        count: predictions.len(),
        predictions,
        status: "success",
    }))
}

/// `GET /dashboard` → 200 + `DashboardView`
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DashboardView>, ApiError> {
    let mut session = lock_session(&state)?;
    let Session { store, rng } = &mut *session;
    let view = DashboardView::build(store, rng).map_err(engine_error)?;
    Ok(Json(view))
}

/// `GET /profile` → 200 + `ProfileResponse`
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let session = lock_session(&state)?;
    Ok(Json(ProfileResponse::from(&session.store)))
}

/// Replaces the whole profile.
///
/// `PUT /profile` → 200 + `ProfileResponse`
pub async fn put_profile(
    State(state): State<Arc<AppState>>,
    Json(profile): Json<UserProfile>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let mut session = lock_session(&state)?;
    session.store.set_profile(profile).map_err(engine_error)?;
    Ok(Json(ProfileResponse::from(&session.store)))
}

/// Edits one profile field.
///
/// `PATCH /profile` with `{"path": "...", "value": "..."}` → 200 + `ProfileResponse`
/// Unknown path → 400 + `ErrorResponse`
pub async fn patch_profile(
    State(state): State<Arc<AppState>>,
    Json(assignment): Json<FieldAssignment>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let update = ProfileUpdate::try_from(&assignment).map_err(engine_error)?;
    let mut session = lock_session(&state)?;
    session.store.update(update).map_err(engine_error)?;
    Ok(Json(ProfileResponse::from(&session.store)))
}

/// `POST /presets/{name}` → 200 + `ProfileResponse`, unknown name → 404
pub async fn apply_preset(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let preset = Preset::from_name(&name).map_err(engine_error)?;
    let mut session = lock_session(&state)?;
    session.store.apply_preset(preset).map_err(engine_error)?;
    Ok(Json(ProfileResponse::from(&session.store)))
}

/// Accepts the current recommendation with the given id.
///
/// `POST /recommendations/{id}/apply` → 200 + `AppliedRecommendationResponse`
/// No such current recommendation → 404
pub async fn apply_recommendation(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u8>,
) -> Result<Json<AppliedRecommendationResponse>, ApiError> {
    let mut session = lock_session(&state)?;
    let applied = session
        .store
        .apply_recommendation_id(id)
        .map_err(engine_error)?;
    Ok(Json(AppliedRecommendationResponse {
        applied,
        scores: *session.store.scores(),
        prediction_kw: session.store.current_prediction_kw(),
        recommendations: session.store.recommendations(),
    }))
}
