use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::{
    ClimateSetting, Hvac, Insulation, KitchenAppliance, KitchenUsage, LaundryHabit,
    LaundryMachine, Maintenance, Timing, UserProfile, WashTemperature, parse_option,
};
use crate::error::EngineError;

/// Every addressable profile path, for help text and error messages.
pub const UPDATE_PATHS: &[&str] = &[
    "kitchen.appliances.<item>",
    "kitchen.usage",
    "kitchen.timings",
    "laundry.machines.<item>",
    "laundry.habits",
    "laundry.temperature",
    "climate.hvac",
    "climate.insulation",
    "climate.maintenance",
    "climate.settings",
];

/// A single field-level edit to a [`UserProfile`].
///
/// # Examples
///
/// ```
/// use greensense::profile::{KitchenUsage, ProfileUpdate, UserProfile};
///
/// let update: ProfileUpdate = "kitchen.usage=wasteful".parse().unwrap();
/// let mut profile = UserProfile::default();
/// update.apply(&mut profile);
/// assert_eq!(profile.kitchen.usage, KitchenUsage::Wasteful);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileUpdate {
    KitchenAppliance { item: KitchenAppliance, owned: bool },
    KitchenUsage(KitchenUsage),
    KitchenTimings(Timing),
    LaundryMachine { item: LaundryMachine, owned: bool },
    LaundryHabits(LaundryHabit),
    LaundryTemperature(WashTemperature),
    ClimateHvac(Hvac),
    ClimateInsulation(Insulation),
    ClimateMaintenance(Maintenance),
    ClimateSettings(ClimateSetting),
}

/// Wire form of an update: a dotted path and its new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FieldAssignment {
    pub path: String,
    pub value: String,
}

impl ProfileUpdate {
    /// Parses a dotted path and value into a typed edit.
    ///
    /// Set membership paths (`kitchen.appliances.<item>`, `laundry.machines.<item>`)
    /// take `on`/`off` (or `true`/`false`). Single-choice paths take the option's
    /// snake_case name; unknown option names become `Unrecognized`.
    ///
    /// # Errors
    ///
    /// * [`EngineError::UnknownField`] if `path` addresses no profile field
    /// * [`EngineError::InvalidValue`] if a membership value is not a switch word
    pub fn parse(path: &str, value: &str) -> Result<Self, EngineError> {
        let path = path.trim();
        let value = value.trim();
        let update = match path.split('.').collect::<Vec<_>>().as_slice() {
            ["kitchen", "appliances", item] => Self::KitchenAppliance {
                item: option(path, item)?,
                owned: switch(path, value)?,
            },
            ["kitchen", "usage"] => Self::KitchenUsage(option(path, value)?),
            ["kitchen", "timings"] => Self::KitchenTimings(option(path, value)?),
            ["laundry", "machines", item] => Self::LaundryMachine {
                item: option(path, item)?,
                owned: switch(path, value)?,
            },
            ["laundry", "habits"] => Self::LaundryHabits(option(path, value)?),
            ["laundry", "temperature"] => Self::LaundryTemperature(option(path, value)?),
            ["climate", "hvac"] => Self::ClimateHvac(option(path, value)?),
            ["climate", "insulation"] => Self::ClimateInsulation(option(path, value)?),
            ["climate", "maintenance"] => Self::ClimateMaintenance(option(path, value)?),
            ["climate", "settings"] => Self::ClimateSettings(option(path, value)?),
            _ => return Err(EngineError::UnknownField(path.to_string())),
        };
        Ok(update)
    }

    /// Writes this edit into `profile`.
    pub fn apply(&self, profile: &mut UserProfile) {
        match *self {
            Self::KitchenAppliance { item, owned } => {
                if owned {
                    profile.kitchen.appliances.insert(item);
                } else {
                    profile.kitchen.appliances.remove(&item);
                }
            }
            Self::KitchenUsage(usage) => profile.kitchen.usage = usage,
            Self::KitchenTimings(timings) => profile.kitchen.timings = timings,
            Self::LaundryMachine { item, owned } => {
                if owned {
                    profile.laundry.machines.insert(item);
                } else {
                    profile.laundry.machines.remove(&item);
                }
            }
            Self::LaundryHabits(habits) => profile.laundry.habits = habits,
            Self::LaundryTemperature(temperature) => profile.laundry.temperature = temperature,
            Self::ClimateHvac(hvac) => profile.climate.hvac = hvac,
            Self::ClimateInsulation(insulation) => profile.climate.insulation = insulation,
            Self::ClimateMaintenance(maintenance) => profile.climate.maintenance = maintenance,
            Self::ClimateSettings(settings) => profile.climate.settings = settings,
        }
    }
}

impl TryFrom<&FieldAssignment> for ProfileUpdate {
    type Error = EngineError;

    fn try_from(assignment: &FieldAssignment) -> Result<Self, Self::Error> {
        Self::parse(&assignment.path, &assignment.value)
    }
}

/// Parses the `path=value` form used on the command line.
impl FromStr for ProfileUpdate {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (path, value) = s.split_once('=').ok_or_else(|| EngineError::InvalidValue {
            path: s.to_string(),
            value: String::new(),
            message: "expected path=value".to_string(),
        })?;
        Self::parse(path, value)
    }
}

fn option<T: DeserializeOwned>(path: &str, value: &str) -> Result<T, EngineError> {
    parse_option(value).map_err(|e| EngineError::InvalidValue {
        path: path.to_string(),
        value: value.to_string(),
        message: e.to_string(),
    })
}

fn switch(path: &str, value: &str) -> Result<bool, EngineError> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" => Ok(true),
        "off" | "false" | "no" => Ok(false),
        _ => Err(EngineError::InvalidValue {
            path: path.to_string(),
            value: value.to_string(),
            message: "expected on or off".to_string(),
        }),
    }
}
