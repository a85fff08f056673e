//! Household energy estimation and recommendation engine.
//!
//! A categorical [`profile::UserProfile`] is scored into three efficiency
//! ratios, fed with the calendar into a consumption model, and expanded into
//! the series and recommendations a dashboard shows.

pub mod clock;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod forecast;
/// CSV export.
pub mod io;
pub mod predict;
/// Household profile model, presets and the profile store.
pub mod profile;
pub mod recommend;
pub mod reporting;
pub mod scoring;
pub mod tariff;

/// REST API (feature `api`).
#[cfg(feature = "api")]
pub mod api;
/// Terminal dashboard (feature `tui`).
#[cfg(feature = "tui")]
pub mod tui;

pub use error::EngineError;
