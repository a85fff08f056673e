//! Additive efficiency scoring per household sub-system.
//!
//! Each scorer starts from a fixed base ratio, adds a delta for every matched
//! option, and clamps the total to [`MIN_EFFICIENCY`, `MAX_EFFICIENCY`] once at
//! the end. Terms are independent, so the order options are listed in never matters.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::profile::{
    ClimateProfile, ClimateSetting, Hvac, Insulation, KitchenAppliance, KitchenProfile,
    KitchenUsage, LaundryHabit, LaundryMachine, LaundryProfile, Maintenance, Timing, UserProfile,
    WashTemperature,
};

/// Worst-case efficiency ratio.
pub const MIN_EFFICIENCY: f64 = 0.3;
/// Best-case efficiency ratio.
pub const MAX_EFFICIENCY: f64 = 1.0;

const KITCHEN_BASE: f64 = 0.70;
const LAUNDRY_BASE: f64 = 0.65;
const CLIMATE_BASE: f64 = 0.60;

/// Household sub-systems that carry an efficiency score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Subsystem {
    Kitchen,
    Laundry,
    Climate,
}

impl Subsystem {
    /// All sub-systems in display order.
    pub const ALL: [Self; 3] = [Self::Kitchen, Self::Laundry, Self::Climate];

    /// Capitalized label for reports.
    pub fn label(self) -> &'static str {
        match self {
            Self::Kitchen => "Kitchen",
            Self::Laundry => "Laundry",
            Self::Climate => "Climate",
        }
    }
}

impl fmt::Display for Subsystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Efficiency ratios for the three sub-systems, each in `[0.3, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyScores {
    pub kitchen: f64,
    pub laundry: f64,
    pub climate: f64,
}

impl EfficiencyScores {
    /// Scores a full profile.
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            kitchen: kitchen_efficiency(&profile.kitchen),
            laundry: laundry_efficiency(&profile.laundry),
            climate: climate_efficiency(&profile.climate),
        }
    }

    /// Returns the score of one sub-system.
    pub fn get(&self, subsystem: Subsystem) -> f64 {
        match subsystem {
            Subsystem::Kitchen => self.kitchen,
            Subsystem::Laundry => self.laundry,
            Subsystem::Climate => self.climate,
        }
    }

    /// Returns a mutable reference to one sub-system's score.
    pub fn get_mut(&mut self, subsystem: Subsystem) -> &mut f64 {
        match subsystem {
            Subsystem::Kitchen => &mut self.kitchen,
            Subsystem::Laundry => &mut self.laundry,
            Subsystem::Climate => &mut self.climate,
        }
    }

    /// Arithmetic mean of the three ratios.
    pub fn average(&self) -> f64 {
        (self.kitchen + self.laundry + self.climate) / 3.0
    }
}

/// Scores every sub-system of `profile`.
pub fn efficiency_scores(profile: &UserProfile) -> EfficiencyScores {
    EfficiencyScores::from_profile(profile)
}

fn clamp_efficiency(raw: f64) -> f64 {
    raw.clamp(MIN_EFFICIENCY, MAX_EFFICIENCY)
}

/// Kitchen efficiency from appliances, usage pattern and run timing.
pub fn kitchen_efficiency(kitchen: &KitchenProfile) -> f64 {
    let appliances: f64 = kitchen
        .appliances
        .iter()
        .map(|appliance| match appliance {
            KitchenAppliance::Induction => 0.10,
            KitchenAppliance::Microwave => 0.05,
            KitchenAppliance::LedLighting => 0.05,
            KitchenAppliance::Unrecognized => 0.0,
        })
        .sum();
    let usage = match kitchen.usage {
        KitchenUsage::Optimized => 0.10,
        KitchenUsage::Wasteful => -0.20,
        KitchenUsage::Normal | KitchenUsage::Unrecognized => 0.0,
    };
    let timing = match kitchen.timings {
        Timing::OffPeak => 0.05,
        Timing::Peak | Timing::Unrecognized => 0.0,
    };
    clamp_efficiency(KITCHEN_BASE + appliances + usage + timing)
}

/// Laundry efficiency from machine features, loading habit and wash temperature.
pub fn laundry_efficiency(laundry: &LaundryProfile) -> f64 {
    let machines: f64 = laundry
        .machines
        .iter()
        .map(|machine| match machine {
            LaundryMachine::FrontLoad => 0.15,
            LaundryMachine::Inverter => 0.10,
            LaundryMachine::Unrecognized => 0.0,
        })
        .sum();
    let habits = match laundry.habits {
        LaundryHabit::FullLoads => 0.10,
        LaundryHabit::AirDry => 0.05,
        LaundryHabit::SmallLoads | LaundryHabit::Unrecognized => 0.0,
    };
    let temperature = match laundry.temperature {
        WashTemperature::ColdWash => 0.10,
        WashTemperature::HotWash => -0.10,
        WashTemperature::WarmWash | WashTemperature::Unrecognized => 0.0,
    };
    clamp_efficiency(LAUNDRY_BASE + machines + habits + temperature)
}

/// Climate efficiency from equipment, insulation, servicing and thermostat use.
pub fn climate_efficiency(climate: &ClimateProfile) -> f64 {
    let hvac = match climate.hvac {
        Hvac::InverterAc => 0.15,
        Hvac::SplitAc => 0.10,
        Hvac::OldAc => -0.10,
        Hvac::Unrecognized => 0.0,
    };
    let insulation = match climate.insulation {
        Insulation::Good => 0.10,
        Insulation::Poor => -0.10,
        Insulation::Average | Insulation::Unrecognized => 0.0,
    };
    let maintenance = match climate.maintenance {
        Maintenance::Regular => 0.08,
        Maintenance::Never => -0.15,
        Maintenance::Yearly | Maintenance::Unrecognized => 0.0,
    };
    let settings = match climate.settings {
        ClimateSetting::OptimalTemp => 0.05,
        ClimateSetting::Extreme | ClimateSetting::Unrecognized => 0.0,
    };
    clamp_efficiency(CLIMATE_BASE + hvac + insulation + maintenance + settings)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::profile::Preset;

    const EPS: f64 = 1e-9;

    #[test]
    fn default_profile_scores() {
        let scores = efficiency_scores(&Preset::Default.profile());
        // 0.70 + 0.10 + 0.05 + 0.10 + 0.05
        assert!((scores.kitchen - 1.0).abs() < EPS);
        assert!((scores.laundry - 1.0).abs() < EPS);
        assert!((scores.climate - 0.98).abs() < EPS);
    }

    #[test]
    fn high_usage_scores() {
        let scores = efficiency_scores(&Preset::HighUsage.profile());
        assert!((scores.kitchen - 0.50).abs() < EPS);
        assert!((scores.laundry - 0.55).abs() < EPS);
        // 0.60 - 0.10 - 0.10 - 0.15 = 0.25 before clamping
        assert_eq!(scores.climate, MIN_EFFICIENCY);
    }

    #[test]
    fn optimal_profile_is_capped() {
        let scores = efficiency_scores(&Preset::Optimal.profile());
        // kitchen 0.70 + 0.20 + 0.10 + 0.05 = 1.05 before clamping
        assert_eq!(scores.kitchen, MAX_EFFICIENCY);
        // laundry 0.65 + 0.25 + 0.05 + 0.10 = 1.05 before clamping
        assert_eq!(scores.laundry, MAX_EFFICIENCY);
        assert!((scores.climate - 0.98).abs() < EPS);
    }

    #[test]
    fn kitchen_terms_are_independent() {
        let kitchen = KitchenProfile {
            appliances: BTreeSet::from([KitchenAppliance::LedLighting]),
            usage: KitchenUsage::Normal,
            timings: Timing::Peak,
        };
        assert!((kitchen_efficiency(&kitchen) - 0.75).abs() < EPS);

        let wasteful = KitchenProfile {
            usage: KitchenUsage::Wasteful,
            ..kitchen
        };
        assert!((kitchen_efficiency(&wasteful) - 0.55).abs() < EPS);
    }

    #[test]
    fn unrecognized_options_contribute_nothing() {
        let laundry = LaundryProfile {
            machines: BTreeSet::from([LaundryMachine::Unrecognized]),
            habits: LaundryHabit::Unrecognized,
            temperature: WashTemperature::Unrecognized,
        };
        assert!((laundry_efficiency(&laundry) - LAUNDRY_BASE).abs() < EPS);

        let climate = ClimateProfile {
            hvac: Hvac::Unrecognized,
            insulation: Insulation::Unrecognized,
            maintenance: Maintenance::Unrecognized,
            settings: ClimateSetting::Unrecognized,
        };
        assert!((climate_efficiency(&climate) - CLIMATE_BASE).abs() < EPS);
    }

    #[test]
    fn every_option_combination_stays_in_range() {
        let usages = [
            KitchenUsage::Wasteful,
            KitchenUsage::Normal,
            KitchenUsage::Optimized,
        ];
        let timings = [Timing::Peak, Timing::OffPeak];
        let appliance_sets = [
            vec![],
            vec![KitchenAppliance::Induction],
            vec![
                KitchenAppliance::Induction,
                KitchenAppliance::Microwave,
                KitchenAppliance::LedLighting,
            ],
        ];
        for usage in usages {
            for timing in timings {
                for set in &appliance_sets {
                    let kitchen = KitchenProfile {
                        appliances: set.iter().copied().collect(),
                        usage,
                        timings: timing,
                    };
                    let s = kitchen_efficiency(&kitchen);
                    assert!((MIN_EFFICIENCY..=MAX_EFFICIENCY).contains(&s));
                }
            }
        }

        for hvac in [Hvac::OldAc, Hvac::SplitAc, Hvac::InverterAc] {
            for insulation in [Insulation::Poor, Insulation::Average, Insulation::Good] {
                for maintenance in [Maintenance::Never, Maintenance::Yearly, Maintenance::Regular]
                {
                    for settings in [ClimateSetting::Extreme, ClimateSetting::OptimalTemp] {
                        let s = climate_efficiency(&ClimateProfile {
                            hvac,
                            insulation,
                            maintenance,
                            settings,
                        });
                        assert!((MIN_EFFICIENCY..=MAX_EFFICIENCY).contains(&s));
                    }
                }
            }
        }
    }

    #[test]
    fn average_and_accessors_agree() {
        let mut scores = EfficiencyScores {
            kitchen: 0.6,
            laundry: 0.9,
            climate: 0.3,
        };
        assert!((scores.average() - 0.6).abs() < EPS);
        *scores.get_mut(Subsystem::Climate) = 0.9;
        assert_eq!(scores.get(Subsystem::Climate), 0.9);
    }
}
