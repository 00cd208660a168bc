//! Meter simulator entry point: CLI wiring, runtime setup, and run modes.

use std::path::Path;
use std::process;
use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info, warn};

use meter_sim::cli::{CliOptions, parse_args};
use meter_sim::config::ScenarioConfig;
use meter_sim::io::export::export_csv;
use meter_sim::logging;
use meter_sim::sim::scheduler::Scheduler;
use meter_sim::sim::store::StateStore;
use meter_sim::sim::summary::Summary;

fn main() -> anyhow::Result<()> {
    let cli = parse_args();

    let scenario = match cli.load_scenario() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{e}");
            process::exit(1);
        }
    };

    let errors = scenario.validate();
    if !errors.is_empty() {
        for e in &errors {
            eprintln!("{e}");
        }
        process::exit(1);
    }

    // The dashboard owns the terminal; log output would corrupt it.
    if !tui_requested(&cli) {
        logging::init(&scenario.logging.filter);
    }

    let store = Arc::new(StateStore::new());
    let scheduler = Arc::new(scenario.scheduler(Arc::clone(&store)));

    if cli.once {
        return run_once(&cli, &scenario, &scheduler);
    }

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    #[cfg(feature = "tui")]
    if cli.tui {
        run_dashboard(&rt, &scenario, &scheduler)?;
        return export_snapshot(&cli, &store);
    }

    if let Err(e) = rt.block_on(run_live(&scenario, Arc::clone(&scheduler))) {
        error!(error = %e, "simulation failed");
        rt.block_on(scheduler.stop());
        return Err(e);
    }

    export_snapshot(&cli, &store)
}

#[cfg(feature = "tui")]
fn tui_requested(cli: &CliOptions) -> bool {
    cli.tui
}

#[cfg(not(feature = "tui"))]
fn tui_requested(_cli: &CliOptions) -> bool {
    false
}

/// Generates one reading per meter, prints it with a summary, and returns.
fn run_once(
    cli: &CliOptions,
    scenario: &ScenarioConfig,
    scheduler: &Scheduler,
) -> anyhow::Result<()> {
    scheduler.generate_once(scenario.simulation.meters);

    let mut readings = scheduler.store().snapshot();
    readings.sort_by(|a, b| a.device_id.cmp(&b.device_id));
    for r in &readings {
        println!("{r}");
    }
    println!("\n{}", Summary::from_readings(&readings, false));

    export_snapshot(cli, scheduler.store())
}

/// Starts the meter tasks and serves until Ctrl-C, then stops them.
async fn run_live(scenario: &ScenarioConfig, scheduler: Arc<Scheduler>) -> anyhow::Result<()> {
    let sim = &scenario.simulation;
    if sim.warm_start {
        scheduler.generate_once(sim.meters);
    }
    scheduler
        .start(sim.meters, sim.interval())
        .context("failed to start simulation")?;

    #[cfg(feature = "api")]
    {
        let addr = scenario.server.address();
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        let state = meter_sim::api::AppState::new(Arc::clone(&scheduler));
        meter_sim::api::serve(state, listener, shutdown_signal())
            .await
            .context("API server failed")?;
    }

    #[cfg(not(feature = "api"))]
    {
        info!("API disabled at build time; press Ctrl-C to stop");
        shutdown_signal().await;
    }

    scheduler.stop().await;
    Ok(())
}

/// Runs the terminal dashboard with the meter tasks on `rt`.
#[cfg(feature = "tui")]
fn run_dashboard(
    rt: &tokio::runtime::Runtime,
    scenario: &ScenarioConfig,
    scheduler: &Arc<Scheduler>,
) -> anyhow::Result<()> {
    let sim = &scenario.simulation;
    if sim.warm_start {
        scheduler.generate_once(sim.meters);
    }
    {
        let _guard = rt.enter();
        scheduler
            .start(sim.meters, sim.interval())
            .context("failed to start simulation")?;
    }

    let result = meter_sim::tui::run(Arc::clone(scheduler));
    rt.block_on(scheduler.stop());
    result.context("dashboard failed")
}

/// Resolves on Ctrl-C.
async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("shutdown requested"),
        Err(e) => warn!(error = %e, "failed to listen for Ctrl-C; shutting down"),
    }
}

/// Writes the store's final snapshot if `--telemetry-out` was given.
fn export_snapshot(cli: &CliOptions, store: &StateStore) -> anyhow::Result<()> {
    let Some(path) = cli.telemetry_out.as_deref() else {
        return Ok(());
    };
    let readings = store.snapshot();
    export_csv(&readings, path)
        .with_context(|| format!("failed to write CSV to {}", path.display()))?;
    report_export(path, readings.len());
    Ok(())
}

fn report_export(path: &Path, rows: usize) {
    info!(path = %path.display(), rows, "telemetry written");
    eprintln!("Telemetry written to {}", path.display());
}
