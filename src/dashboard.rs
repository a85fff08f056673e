//! One-shot assembly of everything the dashboard shows.

use std::fmt;

use rand::Rng;
use serde::Serialize;

use crate::clock::ClockContext;
use crate::error::EngineError;
use crate::forecast::{
    ComparisonRow, DailyForecast, PredictionPoint, build_efficiency_comparison,
    build_historical_trace, build_weekly_forecast,
};
use crate::predict::ConsumptionModel;
use crate::profile::ProfileStore;
use crate::recommend::Recommendation;
use crate::scoring::EfficiencyScores;
use crate::tariff::{CURRENCY_SYMBOL, cost_of};

/// Headline metrics shown above the charts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DashboardSummary {
    /// Predicted draw right now (kW).
    pub current_kw: f64,
    /// Cost of one hour at the current draw.
    pub hourly_cost: f64,
    /// Mean of the three scores, as a percentage.
    pub average_efficiency_percent: f64,
    /// Sum of the weekly forecast (kWh).
    pub weekly_total_kwh: f64,
}

impl DashboardSummary {
    /// Derives the headline metrics.
    ///
    /// # Arguments
    ///
    /// * `current_kw` - Current-instant prediction
    /// * `scores` - Current efficiency scores
    /// * `weekly` - Seven-day forecast
    pub fn from_parts(
        current_kw: f64,
        scores: &EfficiencyScores,
        weekly: &[DailyForecast],
    ) -> Self {
        Self {
            current_kw,
            hourly_cost: cost_of(current_kw),
            average_efficiency_percent: scores.average() * 100.0,
            weekly_total_kwh: weekly.iter().map(|d| d.predicted_kwh).sum(),
        }
    }
}

/// Complete dashboard snapshot for one profile and clock.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub clock: ClockContext,
    pub scores: EfficiencyScores,
    pub summary: DashboardSummary,
    pub trace: Vec<PredictionPoint>,
    pub comparison: Vec<ComparisonRow>,
    pub weekly: Vec<DailyForecast>,
    pub recommendations: Vec<Recommendation>,
}

impl DashboardView {
    /// Builds every series from the store's current state.
    ///
    /// Only the historical trace consumes randomness from `rng`.
    ///
    /// # Errors
    ///
    /// Propagates model validation errors.
    pub fn build<M, R>(store: &ProfileStore<M>, rng: &mut R) -> Result<Self, EngineError>
    where
        M: ConsumptionModel,
        R: Rng + ?Sized,
    {
        let model = store.model();
        let scores = *store.scores();
        let clock = *store.clock();
        let weekly = build_weekly_forecast(model, &scores, &clock)?;
        Ok(Self {
            clock,
            scores,
            summary: DashboardSummary::from_parts(store.current_prediction_kw(), &scores, &weekly),
            trace: build_historical_trace(model, &scores, &clock, rng)?,
            comparison: build_efficiency_comparison(model, &scores, &clock)?,
            weekly,
            recommendations: store.recommendations(),
        })
    }
}

impl fmt::Display for DashboardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.summary;
        writeln!(
            f,
            "--- GreenSense Dashboard ({} {:02}:00, month {}) ---",
            self.clock.day_label(),
            self.clock.hour(),
            self.clock.month()
        )?;
        writeln!(f, "Current power:         {:.2} kW", s.current_kw)?;
        writeln!(f, "Hourly cost:           {CURRENCY_SYMBOL}{:.2}", s.hourly_cost)?;
        writeln!(f, "Average efficiency:    {:.1}%", s.average_efficiency_percent)?;
        writeln!(f, "Weekly prediction:     {:.1} kWh", s.weekly_total_kwh)?;

        writeln!(f, "\n--- Efficiency ---")?;
        for row in &self.comparison {
            writeln!(
                f,
                "{:<8} {:>5.1}% (optimal {:.0}%)",
                row.subsystem.label(),
                row.current_percent,
                row.optimal_percent
            )?;
        }

        writeln!(f, "\n--- Weekly Forecast ---")?;
        for day in &self.weekly {
            writeln!(
                f,
                "{}  {:>6.1} kWh  target {:.0} kWh  {CURRENCY_SYMBOL}{:.2}",
                day.day, day.predicted_kwh, day.target_kwh, day.cost
            )?;
        }

        write!(f, "\n--- Recommendations ---")?;
        if self.recommendations.is_empty() {
            write!(f, "\nNo recommendations. Everything looks efficient.")?;
        }
        for rec in &self.recommendations {
            write!(
                f,
                "\n[{}] {} ({}): save {CURRENCY_SYMBOL}{:.0}/month, {:.1} kg CO2\n    {}",
                rec.id,
                rec.title,
                rec.priority,
                rec.monthly_savings,
                rec.carbon_savings_kg,
                rec.description
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::profile::{Preset, UserProfile};

    fn store(preset: Preset, hour: u8) -> ProfileStore {
        let clock = ClockContext::new(hour, 7, 3).expect("valid clock");
        ProfileStore::new(preset.profile(), clock).expect("store")
    }

    #[test]
    fn summary_matches_parts() {
        let store = store(Preset::Default, 12);
        let mut rng = StdRng::seed_from_u64(1);
        let view = DashboardView::build(&store, &mut rng).expect("view");

        assert_eq!(view.summary.current_kw, store.current_prediction_kw());
        assert!((view.summary.hourly_cost - store.current_prediction_kw() * 6.5).abs() < 1e-9);
        let weekly: f64 = view.weekly.iter().map(|d| d.predicted_kwh).sum();
        assert!((view.summary.weekly_total_kwh - weekly).abs() < 1e-9);
        assert!(
            (view.summary.average_efficiency_percent - store.scores().average() * 100.0).abs()
                < 1e-9
        );
    }

    #[test]
    fn view_has_every_series() {
        let store = store(Preset::HighUsage, 10);
        let mut rng = StdRng::seed_from_u64(2);
        let view = DashboardView::build(&store, &mut rng).expect("view");
        assert_eq!(view.trace.len(), 24);
        assert_eq!(view.comparison.len(), 3);
        assert_eq!(view.weekly.len(), 7);
        assert_eq!(view.recommendations.len(), 3);
    }

    #[test]
    fn report_lists_recommendations() {
        let store = store(Preset::HighUsage, 10);
        let mut rng = StdRng::seed_from_u64(3);
        let text = DashboardView::build(&store, &mut rng)
            .expect("view")
            .to_string();
        assert!(text.contains("GreenSense Dashboard (Wed 10:00, month 7)"));
        assert!(text.contains("Improve Kitchen Efficiency"));
        assert!(text.contains("Enhance Climate Control"));
    }

    #[test]
    fn report_without_recommendations() {
        let clock = ClockContext::new(9, 2, 1).expect("valid clock");
        let store = ProfileStore::new(UserProfile::default(), clock).expect("store");
        let mut rng = StdRng::seed_from_u64(4);
        let text = DashboardView::build(&store, &mut rng)
            .expect("view")
            .to_string();
        assert!(text.contains("No recommendations"));
    }
}
