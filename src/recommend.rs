//! Savings recommendations derived from current scores and time of day.

use std::fmt;

use serde::Serialize;

use crate::clock::ClockContext;
use crate::scoring::{EfficiencyScores, Subsystem};
use crate::tariff::{CARBON_KG_PER_KWH, COST_PER_KWH};

/// Most recommendations returned for one evaluation.
pub const MAX_RECOMMENDATIONS: usize = 3;

/// Score increase applied when a threshold recommendation is accepted.
pub const APPLY_STEP: f64 = 0.1;

/// Evening window (inclusive hours) flagged as peak consumption.
pub const PEAK_HOURS: std::ops::RangeInclusive<u8> = 17..=21;

const PEAK_MONTHLY_SAVINGS: f64 = 780.0;
const PEAK_CARBON_SAVINGS_KG: f64 = 8.0;

/// Per-subsystem threshold rule.
///
/// `monthly_kwh_factor` scales the score shortfall into monthly energy saved;
/// it is a heuristic weight, not a measured quantity.
#[derive(Debug, Clone, Copy)]
struct ThresholdRule {
    kind: RecommendationKind,
    subsystem: Subsystem,
    threshold: f64,
    monthly_kwh_factor: f64,
    apply_cap: f64,
    priority: Priority,
}

const THRESHOLD_RULES: [ThresholdRule; 3] = [
    ThresholdRule {
        kind: RecommendationKind::ImproveKitchen,
        subsystem: Subsystem::Kitchen,
        threshold: 0.8,
        monthly_kwh_factor: 30.0,
        apply_cap: 0.9,
        priority: Priority::High,
    },
    ThresholdRule {
        kind: RecommendationKind::OptimizeLaundry,
        subsystem: Subsystem::Laundry,
        threshold: 0.75,
        monthly_kwh_factor: 20.0,
        apply_cap: 0.85,
        priority: Priority::Medium,
    },
    ThresholdRule {
        kind: RecommendationKind::EnhanceClimate,
        subsystem: Subsystem::Climate,
        threshold: 0.7,
        monthly_kwh_factor: 40.0,
        apply_cap: 0.8,
        priority: Priority::High,
    },
];

/// Recommendation urgency. Informational only; output order never depends on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => f.write_str("high"),
            Self::Medium => f.write_str("medium"),
        }
    }
}

/// The four recommendation rules, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    ImproveKitchen,
    OptimizeLaundry,
    EnhanceClimate,
    PeakHourAlert,
}

impl RecommendationKind {
    /// Stable numeric id (1..=4).
    pub fn id(self) -> u8 {
        match self {
            Self::ImproveKitchen => 1,
            Self::OptimizeLaundry => 2,
            Self::EnhanceClimate => 3,
            Self::PeakHourAlert => 4,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::ImproveKitchen => "Improve Kitchen Efficiency",
            Self::OptimizeLaundry => "Optimize Laundry Schedule",
            Self::EnhanceClimate => "Enhance Climate Control",
            Self::PeakHourAlert => "Peak Hour Alert",
        }
    }
}

/// What accepting a recommendation does to the current scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecommendationAction {
    /// Raise one sub-system score by `step`, never above `cap`.
    RaiseScore {
        subsystem: Subsystem,
        step: f64,
        cap: f64,
    },
    /// Advisory only.
    None,
}

impl RecommendationAction {
    /// Applies the action to `scores` in place.
    pub fn apply_to(&self, scores: &mut EfficiencyScores) {
        if let Self::RaiseScore {
            subsystem,
            step,
            cap,
        } = *self
        {
            let score = scores.get_mut(subsystem);
            *score = (*score + step).min(cap);
        }
    }
}

/// A suggested change with its projected savings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub id: u8,
    pub kind: RecommendationKind,
    pub title: &'static str,
    pub description: String,
    /// Projected savings per month, in currency units.
    pub monthly_savings: f64,
    /// Projected CO2 avoided per month (kg).
    pub carbon_savings_kg: f64,
    pub priority: Priority,
    pub action: RecommendationAction,
}

impl Recommendation {
    fn from_rule(rule: &ThresholdRule, score: f64) -> Self {
        let shortfall_kwh = (rule.threshold - score) * rule.monthly_kwh_factor;
        Self {
            id: rule.kind.id(),
            kind: rule.kind,
            title: rule.kind.title(),
            description: threshold_description(rule.subsystem, score),
            monthly_savings: shortfall_kwh * COST_PER_KWH,
            carbon_savings_kg: shortfall_kwh * CARBON_KG_PER_KWH,
            priority: rule.priority,
            action: RecommendationAction::RaiseScore {
                subsystem: rule.subsystem,
                step: APPLY_STEP,
                cap: rule.apply_cap,
            },
        }
    }

    fn peak_hour_alert() -> Self {
        let kind = RecommendationKind::PeakHourAlert;
        Self {
            id: kind.id(),
            kind,
            title: kind.title(),
            description: "You're in peak consumption hours (5PM-9PM). Consider delaying \
                          non-essential appliance use."
                .to_string(),
            monthly_savings: PEAK_MONTHLY_SAVINGS,
            carbon_savings_kg: PEAK_CARBON_SAVINGS_KG,
            priority: Priority::Medium,
            action: RecommendationAction::None,
        }
    }
}

fn threshold_description(subsystem: Subsystem, score: f64) -> String {
    let percent = score * 100.0;
    match subsystem {
        Subsystem::Kitchen => format!(
            "Your kitchen efficiency is at {percent:.1}%. Consider using energy-efficient \
             appliances during off-peak hours."
        ),
        Subsystem::Laundry => format!(
            "Your laundry efficiency is {percent:.1}%. Run full loads during low-demand \
             hours (2AM-6AM)."
        ),
        Subsystem::Climate => format!(
            "Your climate efficiency is {percent:.1}%. Adjust thermostat settings and \
             improve insulation."
        ),
    }
}

/// Returns `true` when `hour` falls in the evening peak window.
pub fn is_peak_hour(hour: u8) -> bool {
    PEAK_HOURS.contains(&hour)
}

/// Evaluates every rule in fixed order and keeps the first three that trigger.
///
/// Kitchen, laundry and climate thresholds are checked first, then the peak-hour
/// window. Returns an empty vector when nothing triggers.
pub fn generate_recommendations(
    scores: &EfficiencyScores,
    clock: &ClockContext,
) -> Vec<Recommendation> {
    let mut recommendations: Vec<Recommendation> = THRESHOLD_RULES
        .iter()
        .filter_map(|rule| {
            let score = scores.get(rule.subsystem);
            (score < rule.threshold).then(|| Recommendation::from_rule(rule, score))
        })
        .collect();

    if is_peak_hour(clock.hour()) {
        recommendations.push(Recommendation::peak_hour_alert());
    }

    recommendations.truncate(MAX_RECOMMENDATIONS);
    recommendations
}
