//! Color constants and auto-scaling helpers for the TUI.

use ratatui::style::Color;

/// Consumption trace line color.
pub const TRACE_COLOR: Color = Color::Cyan;
/// Weekly forecast bar color.
pub const WEEKLY_BAR: Color = Color::Blue;
/// Efficiency gauge color when at or above the reference level.
pub const EFFICIENCY_GOOD: Color = Color::Green;
/// Efficiency gauge color when within 15 points of the reference level.
pub const EFFICIENCY_FAIR: Color = Color::Yellow;
/// Efficiency gauge color when far below the reference level.
pub const EFFICIENCY_POOR: Color = Color::Red;
/// Header bar foreground.
pub const HEADER_FG: Color = Color::White;
/// Header bar background.
pub const HEADER_BG: Color = Color::Green;
/// Footer help text color.
pub const FOOTER_FG: Color = Color::DarkGray;
/// High-priority recommendation marker.
pub const PRIORITY_HIGH: Color = Color::Magenta;

/// Returns a gauge color comparing a score to its reference level (both percent).
pub fn efficiency_color(current_percent: f64, optimal_percent: f64) -> Color {
    if current_percent >= optimal_percent {
        EFFICIENCY_GOOD
    } else if current_percent >= optimal_percent - 15.0 {
        EFFICIENCY_FAIR
    } else {
        EFFICIENCY_POOR
    }
}

/// Computes Y-axis bounds from chart data points with 10% padding.
pub fn auto_bounds_y(points: &[(f64, f64)]) -> [f64; 2] {
    let ys = points.iter().map(|&(_, y)| y);
    let min = ys.clone().fold(f64::INFINITY, f64::min);
    let max = ys.fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return [0.0, 1.0];
    }
    let range = (max - min).max(0.1);
    let pad = range * 0.1;
    [(min - pad).max(0.0), max + pad]
}
