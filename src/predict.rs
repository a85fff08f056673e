//! Consumption model: feature vector in, instantaneous household draw (kW) out.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::clock::{ClockContext, validate_day_of_week, validate_hour, validate_month};
use crate::error::EngineError;
use crate::scoring::EfficiencyScores;

/// Lowest draw the model ever reports (kW).
pub const MIN_CONSUMPTION_KW: f64 = 0.1;

const BASE_CONSUMPTION_KW: f64 = 2.5;

/// Model input: calendar position plus the three efficiency ratios.
///
/// Field names follow the prediction API; the original PascalCase names are
/// accepted as aliases when deserializing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Hour of day (0..=23).
    #[serde(alias = "Hour")]
    pub hour: u8,
    /// Calendar month (1..=12).
    #[serde(alias = "Month")]
    pub month: u8,
    /// Day of week (0..=6, 0 = Sunday).
    #[serde(alias = "DayofWeek")]
    pub day_of_week: u8,
    #[serde(alias = "Kitchen_Efficiency")]
    pub kitchen_eff: f64,
    #[serde(alias = "Laundry_Efficiency")]
    pub laundry_eff: f64,
    #[serde(alias = "Climate_Efficiency")]
    pub climate_eff: f64,
}

impl FeatureVector {
    /// Builds a feature vector from a clock reading and current scores.
    pub fn new(clock: &ClockContext, scores: &EfficiencyScores) -> Self {
        Self {
            hour: clock.hour(),
            month: clock.month(),
            day_of_week: clock.day_of_week(),
            kitchen_eff: scores.kitchen,
            laundry_eff: scores.laundry,
            climate_eff: scores.climate,
        }
    }

    /// Mean of the three efficiency ratios.
    pub fn average_efficiency(&self) -> f64 {
        (self.kitchen_eff + self.laundry_eff + self.climate_eff) / 3.0
    }

    /// Checks every field against its documented range.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidFeature`] for the first field out of range.
    /// Efficiencies must be finite and within `[0.0, 1.0]`.
    pub fn validate(&self) -> Result<(), EngineError> {
        self.validate_calendar()?;
        for (field, value) in [
            ("kitchen_eff", self.kitchen_eff),
            ("laundry_eff", self.laundry_eff),
            ("climate_eff", self.climate_eff),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(EngineError::invalid_feature(
                    field,
                    format!("must be a finite value in [0.0, 1.0], got {value}"),
                ));
            }
        }
        Ok(())
    }

    /// Checks hour, month and weekday only, leaving the ratios unchecked.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidFeature`] naming the first out-of-range field.
    pub fn validate_calendar(&self) -> Result<(), EngineError> {
        validate_hour(self.hour)?;
        validate_month(self.month)?;
        validate_day_of_week(self.day_of_week)
    }
}

/// A model mapping a feature vector to instantaneous consumption.
///
/// Implementations must be stateless with respect to their inputs: every call is
/// evaluated fresh.
pub trait ConsumptionModel {
    /// Predicts household draw in kW for one feature vector.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidFeature`] if `features` fails validation.
    fn predict_kw(&self, features: &FeatureVector) -> Result<f64, EngineError> {
        features.validate()?;
        Ok(self.evaluate_kw(features))
    }

    /// Evaluates the model without validating the input.
    ///
    /// Callers must have checked the calendar fields; ratios slightly outside
    /// `[0.0, 1.0]` are evaluated as given.
    fn evaluate_kw(&self, features: &FeatureVector) -> f64;

    /// Short model name for logs and health reports.
    fn name(&self) -> &'static str;
}

/// Closed-form synthetic model.
///
/// ```text
/// hour_effect    = sin((hour - 6) * PI / 12) * 1.5 + 1.5
/// month_effect   = 1.3 if month > 6 else 1.1
/// weekday_effect = 0.9 on Sunday/Saturday, 1.1 otherwise
/// kw             = max(0.1, 2.5 * hour_effect * month_effect * weekday_effect * (2 - avg_eff))
/// ```
///
/// The daily cycle bottoms out at hour 0 (sin = -1 at hour 0) and peaks at hour 12;
/// higher average efficiency pulls the last factor toward 1.
#[derive(Debug, Default, Clone, Copy)]
pub struct SyntheticModel;

impl SyntheticModel {
    fn hour_effect(hour: u8) -> f64 {
        ((f64::from(hour) - 6.0) * PI / 12.0).sin() * 1.5 + 1.5
    }

    fn month_effect(month: u8) -> f64 {
        1.0 + if month > 6 { 0.3 } else { 0.1 }
    }

    fn weekday_effect(day_of_week: u8) -> f64 {
        if day_of_week == 0 || day_of_week == 6 {
            0.9
        } else {
            1.1
        }
    }
}

impl ConsumptionModel for SyntheticModel {
    fn evaluate_kw(&self, features: &FeatureVector) -> f64 {
        let kw = BASE_CONSUMPTION_KW
            * Self::hour_effect(features.hour)
            * Self::month_effect(features.month)
            * Self::weekday_effect(features.day_of_week)
            * (2.0 - features.average_efficiency());
        kw.max(MIN_CONSUMPTION_KW)
    }

    fn name(&self) -> &'static str {
        "synthetic"
    }
}

/// Predicts consumption with the default [`SyntheticModel`].
///
/// # Errors
///
/// Returns [`EngineError::InvalidFeature`] if `features` fails validation.
pub fn predict(features: &FeatureVector) -> Result<f64, EngineError> {
    SyntheticModel.predict_kw(features)
}
