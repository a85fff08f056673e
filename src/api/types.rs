//! API response types.
//!
//! The prediction endpoints keep the response shapes of the original
//! prediction service so existing clients continue to work.

use serde::Serialize;

use crate::predict::ConsumptionModel;
use crate::profile::{ProfileStore, UserProfile};
use crate::recommend::Recommendation;
use crate::scoring::EfficiencyScores;

/// Version reported by `/health`.
pub const API_VERSION: &str = "1.0.0";

/// `GET /` body.
#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
    pub status: &'static str,
    pub model_loaded: bool,
}

/// `GET /health` body.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_loaded: bool,
    /// Name of the consumption model serving predictions.
    pub model: &'static str,
    pub api_version: &'static str,
}

/// Single prediction result.
#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    /// Predicted draw (kW).
    pub prediction: f64,
    pub status: &'static str,
    pub message: &'static str,
}

/// Batch prediction result, one entry per input vector in request order.
#[derive(Debug, Serialize)]
pub struct BatchPredictionResponse {
    pub predictions: Vec<f64>,
    pub status: &'static str,
    pub count: usize,
}

/// Profile state after a read or mutation.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub profile: UserProfile,
    pub scores: EfficiencyScores,
    /// Current-instant prediction (kW).
    pub prediction_kw: f64,
}

impl<M: ConsumptionModel> From<&ProfileStore<M>> for ProfileResponse {
    fn from(store: &ProfileStore<M>) -> Self {
        Self {
            profile: store.profile().clone(),
            scores: *store.scores(),
            prediction_kw: store.current_prediction_kw(),
        }
    }
}

/// Result of accepting a recommendation.
#[derive(Debug, Serialize)]
pub struct AppliedRecommendationResponse {
    pub applied: Recommendation,
    pub scores: EfficiencyScores,
    pub prediction_kw: f64,
    /// Recommendations for the updated scores.
    pub recommendations: Vec<Recommendation>,
}

/// Error response body for 4xx/5xx errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}
