//! Calendar context for predictions: hour of day, month and weekday.

use chrono::{Datelike, Local, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Short weekday labels indexed by day-of-week (0 = Sunday).
pub const DAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// A validated calendar reading.
///
/// Normally taken from the system clock with [`ClockContext::now`]; tests and
/// fixed-clock configs build one with [`ClockContext::new`].
///
/// # Examples
///
/// ```
/// use greensense::clock::ClockContext;
///
/// let clock = ClockContext::new(18, 7, 3).unwrap();
/// assert_eq!(clock.hour(), 18);
/// assert_eq!(clock.day_label(), "Wed");
/// assert!(ClockContext::new(24, 7, 3).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClockContext {
    hour: u8,
    month: u8,
    day_of_week: u8,
}

impl ClockContext {
    /// Creates a clock reading.
    ///
    /// # Arguments
    ///
    /// * `hour` - Hour of day, 0..=23
    /// * `month` - Calendar month, 1..=12
    /// * `day_of_week` - Day of week, 0..=6 with 0 = Sunday
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidFeature`] naming the first out-of-range field.
    pub fn new(hour: u8, month: u8, day_of_week: u8) -> Result<Self, EngineError> {
        validate_hour(hour)?;
        validate_month(month)?;
        validate_day_of_week(day_of_week)?;
        Ok(Self {
            hour,
            month,
            day_of_week,
        })
    }

    /// Reads the local system clock.
    pub fn now() -> Self {
        let now = Local::now();
        // chrono guarantees these ranges, so the narrowing casts are lossless.
        Self {
            hour: now.hour() as u8,
            month: now.month() as u8,
            day_of_week: now.weekday().num_days_from_sunday() as u8,
        }
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    /// Day of week, 0 = Sunday.
    pub fn day_of_week(&self) -> u8 {
        self.day_of_week
    }

    /// Short label of the current weekday.
    pub fn day_label(&self) -> &'static str {
        DAY_LABELS[usize::from(self.day_of_week)]
    }

    /// Returns a copy with a different hour.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidFeature`] if `hour > 23`.
    pub fn with_hour(self, hour: u8) -> Result<Self, EngineError> {
        validate_hour(hour)?;
        Ok(Self { hour, ..self })
    }

    /// Returns a copy with a different weekday.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidFeature`] if `day_of_week > 6`.
    pub fn with_day_of_week(self, day_of_week: u8) -> Result<Self, EngineError> {
        validate_day_of_week(day_of_week)?;
        Ok(Self {
            day_of_week,
            ..self
        })
    }
}

impl<'de> Deserialize<'de> for ClockContext {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct Raw {
            hour: u8,
            month: u8,
            day_of_week: u8,
        }

        let raw = Raw::deserialize(deserializer)?;
        Self::new(raw.hour, raw.month, raw.day_of_week).map_err(serde::de::Error::custom)
    }
}

pub(crate) fn validate_hour(hour: u8) -> Result<(), EngineError> {
    if hour > 23 {
        return Err(EngineError::invalid_feature(
            "hour",
            format!("must be in 0..=23, got {hour}"),
        ));
    }
    Ok(())
}

pub(crate) fn validate_month(month: u8) -> Result<(), EngineError> {
    if !(1..=12).contains(&month) {
        return Err(EngineError::invalid_feature(
            "month",
            format!("must be in 1..=12, got {month}"),
        ));
    }
    Ok(())
}

pub(crate) fn validate_day_of_week(day_of_week: u8) -> Result<(), EngineError> {
    if day_of_week > 6 {
        return Err(EngineError::invalid_feature(
            "day_of_week",
            format!("must be in 0..=6, got {day_of_week}"),
        ));
    }
    Ok(())
}
