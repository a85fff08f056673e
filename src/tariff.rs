//! Fixed monetary and carbon conversion factors.

/// Currency units charged per kWh.
pub const COST_PER_KWH: f64 = 6.5;

/// Kilograms of CO2 attributed to each kWh saved.
pub const CARBON_KG_PER_KWH: f64 = 0.7;

/// Symbol prefixed to currency amounts in reports.
pub const CURRENCY_SYMBOL: &str = "₹";

/// Converts energy (kWh) to currency.
pub fn cost_of(kwh: f64) -> f64 {
    kwh * COST_PER_KWH
}

/// Converts energy (kWh) to kilograms of CO2.
pub fn carbon_of(kwh: f64) -> f64 {
    kwh * CARBON_KG_PER_KWH
}
