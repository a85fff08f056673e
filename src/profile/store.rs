//! The single mutable holder of session state.
//!
//! A [`ProfileStore`] owns the profile, the efficiency scores derived from it,
//! the calendar reading and the current-instant prediction. Every mutation
//! recomputes the derived values before returning, then notifies subscribers.

use std::fmt;

use serde::Serialize;
use tracing::{debug, info};

use super::{Preset, ProfileUpdate, UserProfile};
use crate::clock::ClockContext;
use crate::error::EngineError;
use crate::predict::{ConsumptionModel, FeatureVector, SyntheticModel};
use crate::recommend::{Recommendation, generate_recommendations};
use crate::scoring::EfficiencyScores;

/// Notification sent to subscribers after a mutation has been fully applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum StoreEvent {
    /// The profile was replaced or edited; scores were rescored from it.
    ProfileChanged {
        scores: EfficiencyScores,
        prediction_kw: f64,
    },
    /// A preset replaced the profile.
    PresetApplied {
        preset: Preset,
        scores: EfficiencyScores,
        prediction_kw: f64,
    },
    /// A recommendation adjusted the scores.
    RecommendationApplied {
        id: u8,
        title: &'static str,
        scores: EfficiencyScores,
        prediction_kw: f64,
    },
}

type Observer = Box<dyn FnMut(&StoreEvent) + Send>;

/// Profile holder with synchronous recomputation and change notifications.
///
/// Scores normally mirror the profile. Accepting a recommendation raises a
/// score directly without touching the profile; the next profile change
/// rescored from scratch discards that boost.
///
/// # Examples
///
/// ```
/// use greensense::clock::ClockContext;
/// use greensense::profile::{Preset, ProfileStore, UserProfile};
///
/// let clock = ClockContext::new(10, 3, 2).unwrap();
/// let mut store = ProfileStore::new(UserProfile::default(), clock).unwrap();
/// store.apply_preset(Preset::HighUsage).unwrap();
/// assert_eq!(store.profile(), &Preset::HighUsage.profile());
/// assert!(store.scores().kitchen < 0.8);
/// ```
pub struct ProfileStore<M: ConsumptionModel = SyntheticModel> {
    model: M,
    profile: UserProfile,
    scores: EfficiencyScores,
    clock: ClockContext,
    prediction_kw: f64,
    observers: Vec<Observer>,
}

impl ProfileStore<SyntheticModel> {
    /// Creates a store backed by the synthetic model.
    ///
    /// # Errors
    ///
    /// Propagates model validation errors from the initial prediction.
    pub fn new(profile: UserProfile, clock: ClockContext) -> Result<Self, EngineError> {
        Self::with_model(SyntheticModel, profile, clock)
    }
}

impl<M: ConsumptionModel> ProfileStore<M> {
    /// Creates a store backed by an arbitrary model.
    ///
    /// # Errors
    ///
    /// Propagates model validation errors from the initial prediction.
    pub fn with_model(
        model: M,
        profile: UserProfile,
        clock: ClockContext,
    ) -> Result<Self, EngineError> {
        let scores = EfficiencyScores::from_profile(&profile);
        let prediction_kw = model.predict_kw(&FeatureVector::new(&clock, &scores))?;
        Ok(Self {
            model,
            profile,
            scores,
            clock,
            prediction_kw,
            observers: Vec::new(),
        })
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Current scores, including any accepted recommendation boosts.
    pub fn scores(&self) -> &EfficiencyScores {
        &self.scores
    }

    pub fn clock(&self) -> &ClockContext {
        &self.clock
    }

    /// Predicted draw at the stored clock and scores (kW).
    pub fn current_prediction_kw(&self) -> f64 {
        self.prediction_kw
    }

    /// Recommendations for the stored scores and clock.
    pub fn recommendations(&self) -> Vec<Recommendation> {
        generate_recommendations(&self.scores, &self.clock)
    }

    /// Registers a callback invoked after every mutation.
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: FnMut(&StoreEvent) + Send + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    /// Replaces the whole profile and rescores it.
    ///
    /// # Errors
    ///
    /// Propagates model validation errors; the store is left unchanged on error.
    pub fn set_profile(&mut self, profile: UserProfile) -> Result<(), EngineError> {
        self.replace_profile(profile)?;
        info!("profile replaced");
        self.notify(StoreEvent::ProfileChanged {
            scores: self.scores,
            prediction_kw: self.prediction_kw,
        });
        Ok(())
    }

    /// Replaces the profile with a preset.
    ///
    /// # Errors
    ///
    /// Propagates model validation errors; the store is left unchanged on error.
    pub fn apply_preset(&mut self, preset: Preset) -> Result<(), EngineError> {
        self.replace_profile(preset.profile())?;
        info!(preset = preset.name(), "preset applied");
        self.notify(StoreEvent::PresetApplied {
            preset,
            scores: self.scores,
            prediction_kw: self.prediction_kw,
        });
        Ok(())
    }

    /// Applies one field-level edit and rescores the profile.
    ///
    /// # Errors
    ///
    /// Propagates model validation errors; the store is left unchanged on error.
    pub fn update(&mut self, update: ProfileUpdate) -> Result<(), EngineError> {
        let mut profile = self.profile.clone();
        update.apply(&mut profile);
        self.replace_profile(profile)?;
        info!(?update, "profile field updated");
        self.notify(StoreEvent::ProfileChanged {
            scores: self.scores,
            prediction_kw: self.prediction_kw,
        });
        Ok(())
    }

    /// Moves the calendar reading and re-predicts. Scores are kept as they are.
    ///
    /// # Errors
    ///
    /// Propagates model validation errors; the store is left unchanged on error.
    pub fn set_clock(&mut self, clock: ClockContext) -> Result<(), EngineError> {
        self.prediction_kw = self
            .model
            .predict_kw(&FeatureVector::new(&clock, &self.scores))?;
        self.clock = clock;
        debug!(hour = clock.hour(), prediction_kw = self.prediction_kw, "clock moved");
        Ok(())
    }

    /// Applies a recommendation's action to the scores.
    ///
    /// Advisory recommendations leave the scores untouched but still notify.
    ///
    /// # Errors
    ///
    /// Propagates model validation errors; the store is left unchanged on error.
    pub fn apply_recommendation(
        &mut self,
        recommendation: &Recommendation,
    ) -> Result<(), EngineError> {
        let mut scores = self.scores;
        recommendation.action.apply_to(&mut scores);
        self.prediction_kw = self
            .model
            .predict_kw(&FeatureVector::new(&self.clock, &scores))?;
        self.scores = scores;
        info!(
            id = recommendation.id,
            title = recommendation.title,
            "recommendation applied"
        );
        self.notify(StoreEvent::RecommendationApplied {
            id: recommendation.id,
            title: recommendation.title,
            scores: self.scores,
            prediction_kw: self.prediction_kw,
        });
        Ok(())
    }

    /// Applies the currently generated recommendation with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownRecommendation`] if no current
    /// recommendation carries `id`.
    pub fn apply_recommendation_id(&mut self, id: u8) -> Result<Recommendation, EngineError> {
        let recommendation = self
            .recommendations()
            .into_iter()
            .find(|r| r.id == id)
            .ok_or(EngineError::UnknownRecommendation(id))?;
        self.apply_recommendation(&recommendation)?;
        Ok(recommendation)
    }

    fn replace_profile(&mut self, profile: UserProfile) -> Result<(), EngineError> {
        let scores = EfficiencyScores::from_profile(&profile);
        let prediction_kw = self
            .model
            .predict_kw(&FeatureVector::new(&self.clock, &scores))?;
        self.profile = profile;
        self.scores = scores;
        self.prediction_kw = prediction_kw;
        debug!(
            kitchen = scores.kitchen,
            laundry = scores.laundry,
            climate = scores.climate,
            prediction_kw,
            "rescored profile"
        );
        Ok(())
    }

    fn notify(&mut self, event: StoreEvent) {
        for observer in &mut self.observers {
            observer(&event);
        }
    }
}

impl<M: ConsumptionModel> fmt::Debug for ProfileStore<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileStore")
            .field("model", &self.model.name())
            .field("profile", &self.profile)
            .field("scores", &self.scores)
            .field("clock", &self.clock)
            .field("prediction_kw", &self.prediction_kw)
            .field("observers", &self.observers.len())
            .finish()
    }
}
