//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use rand::SeedableRng;
use rand::rngs::StdRng;

use greensense::clock::ClockContext;
use greensense::profile::{Preset, ProfileStore, StoreEvent};

/// Tuesday 10:00 in March, outside the peak window.
pub fn off_peak_clock() -> ClockContext {
    ClockContext::new(10, 3, 2).expect("valid clock")
}

/// Friday 18:00 in September, inside the peak window.
pub fn peak_clock() -> ClockContext {
    ClockContext::new(18, 9, 5).expect("valid clock")
}

/// Store seeded from a preset.
pub fn store_for(preset: Preset, clock: ClockContext) -> ProfileStore {
    ProfileStore::new(preset.profile(), clock).expect("preset profiles are valid")
}

/// Deterministic trace jitter source.
pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// Subscribes a recorder and returns the shared event log.
pub fn record_events(store: &mut ProfileStore) -> Arc<Mutex<Vec<StoreEvent>>> {
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    store.subscribe(move |event| sink.lock().expect("log lock").push(event.clone()));
    log
}
