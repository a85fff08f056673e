//! Plain-language announcements for store events and headline metrics.
//!
//! The engine never narrates on its own; the CLI logs these lines and the
//! terminal dashboard shows them in its status line.

use crate::dashboard::DashboardSummary;
use crate::profile::{Preset, StoreEvent};
use crate::recommend::Recommendation;
use crate::scoring::EfficiencyScores;

/// Announcement for a store notification.
pub fn narrate(event: &StoreEvent) -> String {
    match event {
        StoreEvent::PresetApplied { preset, .. } => match preset {
            Preset::Default => "Reset to default optimized values".to_string(),
            Preset::HighUsage => "Applied high consumption scenario for testing".to_string(),
            Preset::Optimal => "Applied optimal efficiency scenario for testing".to_string(),
        },
        StoreEvent::RecommendationApplied { title, .. } => {
            format!("Applied recommendation: {title}")
        }
        StoreEvent::ProfileChanged { prediction_kw, .. } => {
            format!("Profile updated. Predicted consumption is now {prediction_kw:.2} kilowatts")
        }
    }
}

/// One sentence per headline metric, in dashboard order.
pub fn summary_announcements(summary: &DashboardSummary) -> [String; 4] {
    [
        format!(
            "Current predicted power consumption is {:.2} kilowatts",
            summary.current_kw
        ),
        format!("Estimated hourly cost is {:.2} rupees", summary.hourly_cost),
        format!(
            "Average efficiency across all systems is {:.1} percent",
            summary.average_efficiency_percent
        ),
        format!(
            "Weekly predicted consumption is {:.1} kilowatts",
            summary.weekly_total_kwh
        ),
    ]
}

/// Reads a recommendation aloud.
pub fn describe_recommendation(rec: &Recommendation) -> String {
    format!(
        "{}. {}. This can save {:.0} rupees per month.",
        rec.title, rec.description, rec.monthly_savings
    )
}

/// Full model status: current prediction plus every sub-system score.
pub fn model_status(prediction_kw: f64, scores: &EfficiencyScores) -> String {
    format!(
        "Current model prediction is {prediction_kw:.3} kilowatts. \
         Your kitchen efficiency is {:.1} percent. \
         Your laundry efficiency is {:.1} percent. \
         Your climate efficiency is {:.1} percent.",
        scores.kitchen * 100.0,
        scores.laundry * 100.0,
        scores.climate * 100.0
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores() -> EfficiencyScores {
        EfficiencyScores {
            kitchen: 0.5,
            laundry: 0.55,
            climate: 0.3,
        }
    }

    #[test]
    fn preset_narration() {
        let event = StoreEvent::PresetApplied {
            preset: Preset::HighUsage,
            scores: scores(),
            prediction_kw: 4.0,
        };
        assert_eq!(
            narrate(&event),
            "Applied high consumption scenario for testing"
        );
    }

    #[test]
    fn recommendation_narration() {
        let event = StoreEvent::RecommendationApplied {
            id: 2,
            title: "Optimize Laundry Schedule",
            scores: scores(),
            prediction_kw: 4.0,
        };
        assert_eq!(
            narrate(&event),
            "Applied recommendation: Optimize Laundry Schedule"
        );
    }

    #[test]
    fn summary_sentences_use_fixed_precision() {
        let summary = DashboardSummary {
            current_kw: 3.14159,
            hourly_cost: 20.42,
            average_efficiency_percent: 66.666,
            weekly_total_kwh: 512.04,
        };
        let lines = summary_announcements(&summary);
        assert_eq!(
            lines[0],
            "Current predicted power consumption is 3.14 kilowatts"
        );
        assert_eq!(lines[1], "Estimated hourly cost is 20.42 rupees");
        assert_eq!(
            lines[2],
            "Average efficiency across all systems is 66.7 percent"
        );
        assert_eq!(lines[3], "Weekly predicted consumption is 512.0 kilowatts");
    }

    #[test]
    fn model_status_lists_every_score() {
        let text = model_status(2.5, &scores());
        assert!(text.starts_with("Current model prediction is 2.500 kilowatts."));
        assert!(text.contains("laundry efficiency is 55.0 percent"));
        assert!(text.contains("climate efficiency is 30.0 percent"));
    }
}
