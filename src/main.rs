//! GreenSense entry point: CLI wiring and config-driven store construction.

use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use tracing::{debug, info};

use greensense::clock::ClockContext;
use greensense::config::DashboardConfig;
use greensense::dashboard::DashboardView;
use greensense::io::export::{export_trace_csv, export_weekly_csv};
use greensense::profile::ProfileStore;
use greensense::reporting::{
    describe_recommendation, model_status, narrate, summary_announcements,
};

/// Parsed CLI arguments.
#[derive(Parser, Debug)]
#[command(
    name = "greensense",
    about = "Household energy dashboard: efficiency scores, consumption forecast and tips",
    after_help = "If neither --config nor --preset is given, the default preset is used."
)]
struct CliArgs {
    /// Load settings from a TOML config file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Start from a built-in preset (default, high_usage, optimal)
    #[arg(long, value_name = "NAME")]
    preset: Option<String>,

    /// Pin the hour of day (0-23)
    #[arg(long)]
    hour: Option<u8>,

    /// Pin the month (1-12)
    #[arg(long)]
    month: Option<u8>,

    /// Pin the day of week (0 = Sunday)
    #[arg(long)]
    day_of_week: Option<u8>,

    /// Seed the historical trace jitter
    #[arg(long)]
    seed: Option<u64>,

    /// Edit one profile field, e.g. `kitchen.usage=wasteful` (repeatable)
    #[arg(long = "set", value_name = "PATH=VALUE")]
    set: Vec<String>,

    /// Apply a recommendation by id before printing (repeatable)
    #[arg(long = "apply", value_name = "ID")]
    apply: Vec<u8>,

    /// Export the 24-hour trace to CSV
    #[arg(long, value_name = "PATH")]
    trace_out: Option<PathBuf>,

    /// Export the 7-day forecast to CSV
    #[arg(long, value_name = "PATH")]
    weekly_out: Option<PathBuf>,

    /// Start the REST API server after printing the dashboard
    #[cfg(feature = "api")]
    #[arg(long)]
    serve: bool,

    /// API server port (overrides the config file)
    #[cfg(feature = "api")]
    #[arg(long)]
    port: Option<u16>,

    /// Open the live terminal dashboard instead of printing a report
    #[cfg(feature = "tui")]
    #[arg(long)]
    tui: bool,
}

/// Installs the stderr log subscriber. `quiet` turns logging off so nothing
/// draws over the terminal dashboard.
fn init_tracing(quiet: bool) {
    let filter = if quiet {
        tracing_subscriber::EnvFilter::new("off")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the config: `--config` first, then `--preset`, then the default preset.
/// A `--preset` given together with `--config` replaces the file's preset.
fn load_config(cli: &CliArgs) -> DashboardConfig {
    let loaded = match (&cli.config, &cli.preset) {
        (Some(path), preset) => DashboardConfig::from_toml_file(path).and_then(|mut cfg| {
            if let Some(name) = preset {
                cfg.preset = DashboardConfig::from_preset(name)?.preset;
            }
            Ok(cfg)
        }),
        (None, Some(name)) => DashboardConfig::from_preset(name),
        (None, None) => Ok(DashboardConfig::default()),
    };
    loaded.unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(1);
    })
}

fn apply_overrides(cfg: &mut DashboardConfig, cli: &CliArgs) {
    if cli.hour.is_some() {
        cfg.clock.hour = cli.hour;
    }
    if cli.month.is_some() {
        cfg.clock.month = cli.month;
    }
    if cli.day_of_week.is_some() {
        cfg.clock.day_of_week = cli.day_of_week;
    }
    if cli.seed.is_some() {
        cfg.forecast.seed = cli.seed;
    }
    cfg.profile.set.extend(cli.set.iter().cloned());
    #[cfg(feature = "api")]
    if let Some(port) = cli.port {
        cfg.api.port = port;
    }
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("error: {message}");
    process::exit(1);
}

fn main() {
    let cli = CliArgs::parse();
    #[cfg(feature = "tui")]
    init_tracing(cli.tui);
    #[cfg(not(feature = "tui"))]
    init_tracing(false);

    let mut cfg = load_config(&cli);
    apply_overrides(&mut cfg, &cli);

    // Validate
    let errors = cfg.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    let profile = cfg.initial_profile().unwrap_or_else(|e| fail(e));
    let clock = cfg
        .clock
        .resolve(ClockContext::now())
        .unwrap_or_else(|e| fail(e));
    let mut store = ProfileStore::new(profile, clock).unwrap_or_else(|e| fail(e));
    store.subscribe(|event| info!("{}", narrate(event)));
    info!(
        preset = cfg.preset.name(),
        prediction_kw = store.current_prediction_kw(),
        "profile loaded"
    );

    for id in &cli.apply {
        if let Err(e) = store.apply_recommendation_id(*id) {
            fail(e);
        }
    }

    let mut rng = cfg.forecast.rng();

    #[cfg(feature = "tui")]
    if cli.tui {
        run_tui(store, rng, &cfg);
        return;
    }

    let view = DashboardView::build(&store, &mut rng).unwrap_or_else(|e| fail(e));
    println!("{view}");
    for line in summary_announcements(&view.summary) {
        info!("{line}");
    }
    info!("{}", model_status(view.summary.current_kw, &view.scores));
    for rec in &view.recommendations {
        debug!("{}", describe_recommendation(rec));
    }

    // Export CSV if requested
    if let Some(ref path) = cli.trace_out {
        export(path, "Trace", |p| export_trace_csv(&view.trace, p));
    }
    if let Some(ref path) = cli.weekly_out {
        export(path, "Weekly forecast", |p| export_weekly_csv(&view.weekly, p));
    }

    // Start API server if requested
    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        let state = Arc::new(greensense::api::AppState::new(store, rng, cfg.clock));
        let addr = SocketAddr::from(([0, 0, 0, 0], cfg.api.port));
        let rt = tokio::runtime::Runtime::new()
            .unwrap_or_else(|e| fail(format!("failed to create tokio runtime: {e}")));
        if let Err(e) = rt.block_on(greensense::api::serve(state, addr)) {
            fail(format!("API server stopped: {e}"));
        }
    }
}

fn export(path: &Path, what: &str, write: impl FnOnce(&Path) -> std::io::Result<()>) {
    if let Err(e) = write(path) {
        fail(format!("failed to write CSV: {e}"));
    }
    eprintln!("{what} written to {}", path.display());
}

#[cfg(feature = "tui")]
fn run_tui(store: ProfileStore, rng: rand::rngs::StdRng, cfg: &DashboardConfig) {
    let mut app = greensense::tui::App::new(store, rng, cfg.clock).unwrap_or_else(|e| fail(e));
    app.preset_label = preset_label(cfg);
    if let Err(e) = greensense::tui::run(&mut app) {
        fail(format!("terminal dashboard failed: {e}"));
    }
}

/// Header label: the preset name unless the config edits the profile.
#[cfg(feature = "tui")]
fn preset_label(cfg: &DashboardConfig) -> &'static str {
    let p = &cfg.profile;
    let edited =
        p.kitchen.is_some() || p.laundry.is_some() || p.climate.is_some() || !p.set.is_empty();
    if edited { "custom" } else { cfg.preset.name() }
}
