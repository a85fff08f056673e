//! Built-in household scenarios.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{
    ClimateProfile, ClimateSetting, Hvac, Insulation, KitchenAppliance, KitchenProfile,
    KitchenUsage, LaundryHabit, LaundryMachine, LaundryProfile, Maintenance, Timing, UserProfile,
    WashTemperature,
};
use crate::error::EngineError;

/// A named, fully specified profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// The starting profile: efficient but not every upgrade installed.
    #[default]
    Default,
    /// Worst-case choice in every sub-system.
    HighUsage,
    /// Every upgrade and good habit selected.
    Optimal,
}

impl Preset {
    /// Available preset names.
    pub const PRESETS: &[&str] = &["default", "high_usage", "optimal"];

    /// Looks up a preset by name.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::UnknownPreset`] if the name is not in [`Self::PRESETS`].
    pub fn from_name(name: &str) -> Result<Self, EngineError> {
        match name {
            "default" => Ok(Self::Default),
            "high_usage" => Ok(Self::HighUsage),
            "optimal" => Ok(Self::Optimal),
            _ => Err(EngineError::UnknownPreset {
                name: name.to_string(),
                available: Self::PRESETS.join(", "),
            }),
        }
    }

    /// Preset name as used on the CLI and in config files.
    pub fn name(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::HighUsage => "high_usage",
            Self::Optimal => "optimal",
        }
    }

    /// Builds the profile this preset stands for.
    pub fn profile(self) -> UserProfile {
        match self {
            Self::Default => UserProfile {
                kitchen: KitchenProfile {
                    appliances: BTreeSet::from([
                        KitchenAppliance::Induction,
                        KitchenAppliance::Microwave,
                    ]),
                    usage: KitchenUsage::Optimized,
                    timings: Timing::OffPeak,
                },
                laundry: LaundryProfile {
                    machines: BTreeSet::from([LaundryMachine::FrontLoad]),
                    habits: LaundryHabit::FullLoads,
                    temperature: WashTemperature::ColdWash,
                },
                climate: ClimateProfile {
                    hvac: Hvac::InverterAc,
                    insulation: Insulation::Good,
                    maintenance: Maintenance::Regular,
                    settings: ClimateSetting::OptimalTemp,
                },
            },
            Self::HighUsage => UserProfile {
                kitchen: KitchenProfile {
                    appliances: BTreeSet::new(),
                    usage: KitchenUsage::Wasteful,
                    timings: Timing::Peak,
                },
                laundry: LaundryProfile {
                    machines: BTreeSet::new(),
                    habits: LaundryHabit::SmallLoads,
                    temperature: WashTemperature::HotWash,
                },
                climate: ClimateProfile {
                    hvac: Hvac::OldAc,
                    insulation: Insulation::Poor,
                    maintenance: Maintenance::Never,
                    settings: ClimateSetting::Extreme,
                },
            },
            Self::Optimal => UserProfile {
                kitchen: KitchenProfile {
                    appliances: BTreeSet::from([
                        KitchenAppliance::Induction,
                        KitchenAppliance::Microwave,
                        KitchenAppliance::LedLighting,
                    ]),
                    usage: KitchenUsage::Optimized,
                    timings: Timing::OffPeak,
                },
                laundry: LaundryProfile {
                    machines: BTreeSet::from([
                        LaundryMachine::FrontLoad,
                        LaundryMachine::Inverter,
                    ]),
                    habits: LaundryHabit::AirDry,
                    temperature: WashTemperature::ColdWash,
                },
                climate: ClimateProfile {
                    hvac: Hvac::InverterAc,
                    insulation: Insulation::Good,
                    maintenance: Maintenance::Regular,
                    settings: ClimateSetting::OptimalTemp,
                },
            },
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_name_resolves() {
        for name in Preset::PRESETS {
            let preset = Preset::from_name(name).expect("listed preset should resolve");
            assert_eq!(preset.name(), *name);
        }
    }

    #[test]
    fn unknown_preset_lists_alternatives() {
        let err = Preset::from_name("eco").expect_err("must fail");
        let msg = err.to_string();
        assert!(msg.contains("eco"));
        assert!(msg.contains("high_usage"));
    }

    #[test]
    fn high_usage_owns_nothing() {
        let profile = Preset::HighUsage.profile();
        assert!(profile.kitchen.appliances.is_empty());
        assert!(profile.laundry.machines.is_empty());
    }
}
