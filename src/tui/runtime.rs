//! Dashboard session and TUI application state.

use std::sync::mpsc::{self, Receiver};
use std::time::Instant;

use rand::rngs::StdRng;

use crate::clock::ClockContext;
use crate::config::ClockConfig;
use crate::dashboard::DashboardView;
use crate::error::EngineError;
use crate::profile::{Preset, ProfileStore, StoreEvent};
use crate::reporting::{narrate, summary_announcements};

/// How often the clock is re-read (milliseconds).
pub const REFRESH_INTERVAL_MS: u64 = 1000;

/// TUI application state.
pub struct App {
    store: ProfileStore,
    rng: StdRng,
    clock: ClockConfig,
    events: Receiver<StoreEvent>,
    /// Snapshot currently on screen.
    pub view: DashboardView,
    /// Label of the last preset loaded, or `"custom"` after other edits.
    pub preset_label: &'static str,
    /// Latest announcement shown in the status line.
    pub status: String,
    /// Whether the user has requested quit.
    pub quit: bool,
    /// When the clock was last re-read.
    pub last_tick: Instant,
}

impl App {
    /// Creates the app around an existing store.
    ///
    /// # Arguments
    ///
    /// * `store` - Profile store to display and mutate
    /// * `rng` - Trace jitter source
    /// * `clock` - Pinned calendar fields; unset fields follow the system clock
    ///
    /// # Errors
    ///
    /// Propagates model validation errors from the first snapshot.
    pub fn new(
        mut store: ProfileStore,
        mut rng: StdRng,
        clock: ClockConfig,
    ) -> Result<Self, EngineError> {
        let (tx, events) = mpsc::channel();
        store.subscribe(move |event| {
            // receiver lives as long as the app; a send error only happens on teardown
            let _ = tx.send(event.clone());
        });
        let view = DashboardView::build(&store, &mut rng)?;
        let status = summary_announcements(&view.summary)[0].clone();
        Ok(Self {
            store,
            rng,
            clock,
            events,
            view,
            preset_label: "custom",
            status,
            quit: false,
            last_tick: Instant::now(),
        })
    }

    pub fn store(&self) -> &ProfileStore {
        &self.store
    }

    /// Loads a preset and refreshes the snapshot.
    pub fn switch_preset(&mut self, preset: Preset) {
        let result = self.store.apply_preset(preset);
        if result.is_ok() {
            self.preset_label = preset.name();
        }
        self.finish(result);
    }

    /// Accepts the recommendation at `index` in the on-screen list.
    ///
    /// Out-of-range indexes are ignored.
    pub fn apply_recommendation(&mut self, index: usize) {
        let Some(rec) = self.view.recommendations.get(index).cloned() else {
            return;
        };
        let result = self.store.apply_recommendation(&rec);
        if result.is_ok() {
            self.preset_label = "custom";
        }
        self.finish(result);
    }

    /// Redraws the trace with fresh jitter.
    pub fn resample(&mut self) {
        self.finish(Ok(()));
    }

    /// Re-reads the clock and rebuilds the snapshot when the reading changed.
    pub fn tick(&mut self) {
        match self.clock.resolve(ClockContext::now()) {
            Ok(clock) if clock != *self.store.clock() => {
                let result = self.store.set_clock(clock);
                self.finish(result);
            }
            Ok(_) => {}
            Err(e) => self.status = format!("error: {e}"),
        }
        self.last_tick = Instant::now();
    }

    /// Rebuilds the snapshot after a mutation and updates the status line.
    fn finish(&mut self, result: Result<(), EngineError>) {
        let result = result.and_then(|()| DashboardView::build(&self.store, &mut self.rng));
        match result {
            Ok(view) => self.view = view,
            Err(e) => {
                self.status = format!("error: {e}");
                return;
            }
        }
        if let Some(event) = self.events.try_iter().last() {
            self.status = narrate(&event);
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;
    use crate::profile::UserProfile;

    fn make_app(hour: u8) -> App {
        let clock = ClockContext::new(hour, 6, 4).expect("valid clock");
        let store = ProfileStore::new(UserProfile::default(), clock).expect("store");
        let pinned = ClockConfig {
            hour: Some(hour),
            month: Some(6),
            day_of_week: Some(4),
        };
        App::new(store, StdRng::seed_from_u64(8), pinned).expect("app")
    }

    #[test]
    fn app_starts_with_full_snapshot() {
        let app = make_app(11);
        assert_eq!(app.view.trace.len(), 24);
        assert_eq!(app.view.weekly.len(), 7);
        assert!(app.status.starts_with("Current predicted power consumption"));
        assert!(!app.quit);
    }

    #[test]
    fn switch_preset_narrates_and_refreshes() {
        let mut app = make_app(11);
        app.switch_preset(Preset::HighUsage);
        assert_eq!(app.preset_label, "high_usage");
        assert_eq!(app.status, "Applied high consumption scenario for testing");
        assert_eq!(app.view.recommendations.len(), 3);
        assert_eq!(app.view.scores, *app.store().scores());
    }

    #[test]
    fn apply_recommendation_by_position() {
        let mut app = make_app(11);
        app.switch_preset(Preset::HighUsage);
        let laundry = app.view.scores.laundry;
        app.apply_recommendation(1);
        assert_eq!(app.status, "Applied recommendation: Optimize Laundry Schedule");
        assert!((app.view.scores.laundry - (laundry + 0.1)).abs() < 1e-9);
        assert_eq!(app.preset_label, "custom");
    }

    #[test]
    fn missing_recommendation_is_ignored() {
        let mut app = make_app(11);
        let before = app.status.clone();
        app.apply_recommendation(2);
        assert_eq!(app.status, before);
    }

    #[test]
    fn resample_keeps_deterministic_series() {
        let mut app = make_app(19);
        let weekly = app.view.weekly.clone();
        let trace = app.view.trace.clone();
        app.resample();
        assert_eq!(app.view.weekly, weekly);
        assert_ne!(app.view.trace, trace);
    }

    #[test]
    fn tick_with_pinned_clock_is_stable() {
        let mut app = make_app(19);
        let view = app.view.clone();
        app.tick();
        assert_eq!(app.view, view);
    }
}
