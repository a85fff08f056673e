//! TOML-based dashboard configuration.

use std::fs;
use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Deserialize;
use thiserror::Error;

use crate::clock::{ClockContext, validate_day_of_week, validate_hour, validate_month};
use crate::error::EngineError;
use crate::profile::{
    ClimateProfile, KitchenProfile, LaundryProfile, Preset, ProfileUpdate, UserProfile,
};

/// Default port for the HTTP API.
pub const DEFAULT_API_PORT: u16 = 3000;

/// Top-level dashboard configuration parsed from TOML.
///
/// Every section is optional. An empty file yields the default preset read
/// against the system clock with an unseeded trace.
///
/// ```toml
/// preset = "high_usage"
///
/// [profile]
/// set = ["kitchen.usage=normal"]
///
/// [clock]
/// hour = 18
///
/// [forecast]
/// seed = 7
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DashboardConfig {
    /// Preset the starting profile is built from.
    #[serde(default)]
    pub preset: Preset,
    /// Overrides layered on top of the preset.
    #[serde(default)]
    pub profile: ProfileConfig,
    /// Fixed calendar fields; unset fields come from the system clock.
    #[serde(default)]
    pub clock: ClockConfig,
    /// Historical trace randomness.
    #[serde(default)]
    pub forecast: ForecastConfig,
    /// HTTP API settings.
    #[serde(default)]
    pub api: ApiConfig,
}

/// Per-sub-system replacements and field edits applied after the preset.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProfileConfig {
    /// Replaces the preset's kitchen choices when present.
    pub kitchen: Option<KitchenProfile>,
    /// Replaces the preset's laundry choices when present.
    pub laundry: Option<LaundryProfile>,
    /// Replaces the preset's climate choices when present.
    pub climate: Option<ClimateProfile>,
    /// `path=value` edits applied last, in order.
    pub set: Vec<String>,
}

/// Calendar fields pinned by configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClockConfig {
    pub hour: Option<u8>,
    pub month: Option<u8>,
    /// 0 = Sunday.
    pub day_of_week: Option<u8>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ForecastConfig {
    /// Seed for the trace jitter; `None` draws one from the OS.
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    /// TCP port the API binds on all interfaces.
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_API_PORT,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"clock.hour"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl ClockConfig {
    /// Fills unset fields from `fallback`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidFeature`] if a pinned field is out of range.
    pub fn resolve(&self, fallback: ClockContext) -> Result<ClockContext, EngineError> {
        ClockContext::new(
            self.hour.unwrap_or(fallback.hour()),
            self.month.unwrap_or(fallback.month()),
            self.day_of_week.unwrap_or(fallback.day_of_week()),
        )
    }
}

impl ForecastConfig {
    /// Builds the trace random source.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

impl DashboardConfig {
    /// Returns a config that starts from the named preset with all other
    /// sections defaulted.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        let preset =
            Preset::from_name(name).map_err(|e| ConfigError::new("preset", e.to_string()))?;
        Ok(Self {
            preset,
            ..Self::default()
        })
    }

    /// Parses a config from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("config", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a config from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Parsed `[profile] set` edits.
    ///
    /// # Errors
    ///
    /// Returns one `ConfigError` per entry that does not parse.
    pub fn profile_updates(&self) -> Result<Vec<ProfileUpdate>, Vec<ConfigError>> {
        let mut updates = Vec::with_capacity(self.profile.set.len());
        let mut errors = Vec::new();
        for (i, entry) in self.profile.set.iter().enumerate() {
            match entry.parse::<ProfileUpdate>() {
                Ok(update) => updates.push(update),
                Err(e) => {
                    errors.push(ConfigError::new(format!("profile.set[{i}]"), e.to_string()));
                }
            }
        }
        if errors.is_empty() {
            Ok(updates)
        } else {
            Err(errors)
        }
    }

    /// Builds the starting profile: preset, then table overrides, then `set` edits.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError` from an unparseable `set` entry.
    pub fn initial_profile(&self) -> Result<UserProfile, ConfigError> {
        let mut profile = self.preset.profile();
        if let Some(kitchen) = &self.profile.kitchen {
            profile.kitchen = kitchen.clone();
        }
        if let Some(laundry) = &self.profile.laundry {
            profile.laundry = laundry.clone();
        }
        if let Some(climate) = &self.profile.climate {
            profile.climate = climate.clone();
        }
        let updates = self.profile_updates().map_err(|errors| {
            errors
                .into_iter()
                .next()
                .unwrap_or_else(|| ConfigError::new("profile.set", "invalid entry"))
        })?;
        for update in updates {
            update.apply(&mut profile);
        }
        Ok(profile)
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let c = &self.clock;
        let checks = [
            ("clock.hour", c.hour.map(validate_hour)),
            ("clock.month", c.month.map(validate_month)),
            ("clock.day_of_week", c.day_of_week.map(validate_day_of_week)),
        ];
        for (field, check) in checks {
            if let Some(Err(e)) = check {
                errors.push(ConfigError::new(field, e.to_string()));
            }
        }

        if let Err(mut set_errors) = self.profile_updates() {
            errors.append(&mut set_errors);
        }

        if self.api.port == 0 {
            errors.push(ConfigError::new("api.port", "must be > 0"));
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{Hvac, KitchenUsage};

    #[test]
    fn default_config_valid() {
        let cfg = DashboardConfig::default();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "default should be valid: {errors:?}");
        assert_eq!(cfg.preset, Preset::Default);
        assert_eq!(cfg.api.port, DEFAULT_API_PORT);
    }

    #[test]
    fn from_preset_known_and_unknown() {
        let cfg = DashboardConfig::from_preset("optimal").expect("known preset");
        assert_eq!(cfg.preset, Preset::Optimal);

        let e = DashboardConfig::from_preset("solar_farm").unwrap_err();
        assert_eq!(e.field, "preset");
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let cfg = DashboardConfig::from_toml_str("").expect("empty config");
        assert_eq!(cfg.preset, Preset::Default);
        assert_eq!(cfg.clock, ClockConfig::default());
        assert_eq!(cfg.forecast.seed, None);
    }

    #[test]
    fn full_toml_parses() {
        let toml = r#"
preset = "high_usage"

[profile]
set = ["kitchen.usage=normal", "climate.hvac=split_ac"]

[profile.laundry]
machines = ["front_load"]
habits = "full_loads"
temperature = "cold_wash"

[clock]
hour = 18
month = 7
day_of_week = 3

[forecast]
seed = 99

[api]
port = 8080
"#;
        let cfg = DashboardConfig::from_toml_str(toml).expect("valid TOML should parse");
        assert!(cfg.validate().is_empty());
        assert_eq!(cfg.preset, Preset::HighUsage);
        assert_eq!(cfg.forecast.seed, Some(99));
        assert_eq!(cfg.api.port, 8080);

        let profile = cfg.initial_profile().expect("profile");
        assert_eq!(profile.kitchen.usage, KitchenUsage::Normal);
        assert_eq!(profile.climate.hvac, Hvac::SplitAc);
        assert_eq!(profile.laundry, Preset::Default.profile().laundry);
        // untouched climate fields stay at the preset's values
        assert_eq!(
            profile.climate.insulation,
            Preset::HighUsage.profile().climate.insulation
        );
    }

    #[test]
    fn unknown_field_rejected() {
        let toml = r#"
[forecast]
seed = 1
horizon_days = 14
"#;
        assert!(DashboardConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn unknown_preset_in_toml_rejected() {
        assert!(DashboardConfig::from_toml_str("preset = \"villa\"").is_err());
    }

    #[test]
    fn validation_collects_every_error() {
        let mut cfg = DashboardConfig::default();
        cfg.clock.hour = Some(24);
        cfg.clock.day_of_week = Some(9);
        cfg.profile.set = vec!["garage.door=open".to_string(), "no-equals".to_string()];
        cfg.api.port = 0;

        let fields: Vec<String> = cfg.validate().into_iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "clock.hour",
                "clock.day_of_week",
                "profile.set[0]",
                "profile.set[1]",
                "api.port",
            ]
        );
    }

    #[test]
    fn clock_resolves_against_fallback() {
        let fallback = ClockContext::new(6, 1, 0).expect("valid clock");
        let cfg = ClockConfig {
            hour: Some(20),
            month: None,
            day_of_week: Some(5),
        };
        let clock = cfg.resolve(fallback).expect("valid clock");
        assert_eq!(
            (clock.hour(), clock.month(), clock.day_of_week()),
            (20, 1, 5)
        );
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        use rand::Rng;

        let cfg = ForecastConfig { seed: Some(5) };
        let a: u64 = cfg.rng().random();
        let b: u64 = cfg.rng().random();
        assert_eq!(a, b);
    }
}
