//! Household profile: the categorical appliance and habit choices the engine scores.
//!
//! Every option set is a closed enum. Values arriving from TOML or JSON that do not
//! name a known option deserialize into the `Unrecognized` variant, which carries
//! no bonus or penalty when scored.

/// Named profile presets.
pub mod presets;
/// Mutable profile holder with change notifications.
pub mod store;
/// Field-level profile edits.
pub mod update;

use std::collections::BTreeSet;

use serde::de::{DeserializeOwned, IntoDeserializer};
use serde::{Deserialize, Serialize};

pub use presets::Preset;
pub use store::{ProfileStore, StoreEvent};
pub use update::ProfileUpdate;

/// Kitchen appliances that improve efficiency when present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KitchenAppliance {
    Induction,
    Microwave,
    LedLighting,
    #[serde(other)]
    Unrecognized,
}

/// How the kitchen is used day to day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KitchenUsage {
    Wasteful,
    Normal,
    Optimized,
    #[serde(other)]
    Unrecognized,
}

/// When heavy kitchen appliances are run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timing {
    Peak,
    OffPeak,
    #[serde(other)]
    Unrecognized,
}

/// Washing machine features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaundryMachine {
    FrontLoad,
    Inverter,
    #[serde(other)]
    Unrecognized,
}

/// Laundry loading and drying habit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaundryHabit {
    SmallLoads,
    FullLoads,
    AirDry,
    #[serde(other)]
    Unrecognized,
}

/// Wash temperature setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WashTemperature {
    HotWash,
    WarmWash,
    ColdWash,
    #[serde(other)]
    Unrecognized,
}

/// Air-conditioning equipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Hvac {
    OldAc,
    SplitAc,
    InverterAc,
    #[serde(other)]
    Unrecognized,
}

/// Building insulation quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Insulation {
    Poor,
    Average,
    Good,
    #[serde(other)]
    Unrecognized,
}

/// How often the HVAC system is serviced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Maintenance {
    Never,
    Yearly,
    Regular,
    #[serde(other)]
    Unrecognized,
}

/// Thermostat setting style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClimateSetting {
    Extreme,
    OptimalTemp,
    #[serde(other)]
    Unrecognized,
}

/// Kitchen sub-system choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KitchenProfile {
    /// Efficient appliances owned.
    #[serde(default)]
    pub appliances: BTreeSet<KitchenAppliance>,
    /// Usage pattern.
    pub usage: KitchenUsage,
    /// Appliance run timing.
    pub timings: Timing,
}

/// Laundry sub-system choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LaundryProfile {
    /// Machine features owned.
    #[serde(default)]
    pub machines: BTreeSet<LaundryMachine>,
    /// Loading and drying habit.
    pub habits: LaundryHabit,
    /// Wash temperature.
    pub temperature: WashTemperature,
}

/// Climate-control sub-system choices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClimateProfile {
    pub hvac: Hvac,
    pub insulation: Insulation,
    pub maintenance: Maintenance,
    pub settings: ClimateSetting,
}

/// The household configuration declared by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserProfile {
    pub kitchen: KitchenProfile,
    pub laundry: LaundryProfile,
    pub climate: ClimateProfile,
}

impl Default for UserProfile {
    /// The profile every session starts from.
    fn default() -> Self {
        Preset::Default.profile()
    }
}

/// Parses a single categorical option from its snake_case name.
///
/// Unknown names resolve to the enum's `Unrecognized` variant rather than failing.
pub(crate) fn parse_option<T: DeserializeOwned>(
    value: &str,
) -> Result<T, serde::de::value::Error> {
    T::deserialize(value.into_deserializer())
}
