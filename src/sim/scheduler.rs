//! Meter lifecycle: one periodic task per meter, plus a synchronous one-shot pass.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, info, trace, warn};

use super::clock::{Clock, SystemClock};
use super::store::StateStore;
use crate::error::{Error, Result};
use crate::meter::{DEFAULT_ID_PREFIX, LoadProfile, meter_ids};

/// Longest tick interval [`Scheduler::start`] accepts (one day).
pub const MAX_TICK_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Drives simulated meters against a shared [`StateStore`].
///
/// [`Scheduler::start`] spawns one tokio task per meter. Each task waits one
/// interval, then on every tick asks the clock for the time, generates a
/// reading and overwrites that meter's entry. All tasks watch the same stop
/// channel, so [`Scheduler::stop`] reaches every one of them at once.
///
/// Only one run may be active at a time: a second `start` without an
/// intervening `stop` returns [`Error::AlreadyRunning`] and leaves the
/// running tasks alone. [`Scheduler::generate_once`] may be used at any
/// time, including while a run is active; both paths write whole readings
/// keyed by id, so whichever lands last for a meter wins.
///
/// Dropping the scheduler drops the stop sender, which also ends every task.
pub struct Scheduler {
    store: Arc<StateStore>,
    clock: Arc<dyn Clock>,
    profile: LoadProfile,
    prefix: String,
    run: Mutex<Option<ActiveRun>>,
}

/// Handles for the tasks of the current run.
struct ActiveRun {
    stop_tx: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
    interval: Duration,
}

/// Everything one meter task needs to produce and store readings.
struct MeterTask {
    device_id: String,
    store: Arc<StateStore>,
    clock: Arc<dyn Clock>,
    profile: LoadProfile,
}

impl Scheduler {
    /// Creates a scheduler over `store` using the system clock, the default
    /// load profile and the [`DEFAULT_ID_PREFIX`].
    pub fn new(store: Arc<StateStore>) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            profile: LoadProfile::default(),
            prefix: DEFAULT_ID_PREFIX.to_string(),
            run: Mutex::new(None),
        }
    }

    /// Replaces the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the load profile used for every meter.
    pub fn with_profile(mut self, profile: LoadProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Replaces the meter id prefix (`METER` gives `METER-001`, ...).
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// The store this scheduler writes into.
    pub fn store(&self) -> &Arc<StateStore> {
        &self.store
    }

    /// The meter id prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The load profile applied to every meter.
    pub fn profile(&self) -> &LoadProfile {
        &self.profile
    }

    /// Returns `true` while a started run has not been stopped.
    pub fn is_running(&self) -> bool {
        self.run.lock().is_some()
    }

    /// Number of meter tasks in the active run (0 when stopped).
    pub fn active_meters(&self) -> usize {
        self.run.lock().as_ref().map_or(0, |run| run.tasks.len())
    }

    /// Tick interval of the active run, if any.
    pub fn interval(&self) -> Option<Duration> {
        self.run.lock().as_ref().map(|run| run.interval)
    }

    /// Spawns `count` meter tasks ticking every `interval`.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidArgument`] if `count` is zero, or `interval` is zero
    ///   or longer than [`MAX_TICK_INTERVAL`].
    /// - [`Error::AlreadyRunning`] if a previous run has not been stopped.
    /// - [`Error::Runtime`] if no tokio runtime is available.
    pub fn start(&self, count: usize, interval: Duration) -> Result<()> {
        if count == 0 {
            return Err(Error::InvalidArgument("meter count must be > 0".into()));
        }
        if interval.is_zero() {
            return Err(Error::InvalidArgument("tick interval must be > 0".into()));
        }
        if interval > MAX_TICK_INTERVAL {
            return Err(Error::InvalidArgument(format!(
                "tick interval must be at most {MAX_TICK_INTERVAL:?}, got {interval:?}"
            )));
        }

        let mut run = self.run.lock();
        if run.is_some() {
            return Err(Error::AlreadyRunning);
        }
        let handle = Handle::try_current()?;

        info!(
            meters = count,
            ?interval,
            prefix = %self.prefix,
            "starting simulation"
        );

        let (stop_tx, stop_rx) = watch::channel(false);
        let tasks = meter_ids(&self.prefix, count)
            .map(|device_id| {
                let task = MeterTask {
                    device_id,
                    store: Arc::clone(&self.store),
                    clock: Arc::clone(&self.clock),
                    profile: self.profile,
                };
                handle.spawn(run_meter(task, interval, stop_rx.clone()))
            })
            .collect();

        *run = Some(ActiveRun {
            stop_tx,
            tasks,
            interval,
        });
        Ok(())
    }

    /// Signals every meter task of the active run to stop and waits for them.
    ///
    /// Ticks already in progress finish their write; once this returns no
    /// further writes come from the stopped run. Calling it with no active
    /// run, or again while another caller is stopping, returns immediately.
    pub async fn stop(&self) {
        let run = self.run.lock().take();
        let Some(run) = run else {
            debug!("stop requested with no active run");
            return;
        };

        let _ = run.stop_tx.send(true);
        let count = run.tasks.len();
        for task in run.tasks {
            if let Err(err) = task.await {
                warn!(error = %err, "meter task join error");
            }
        }
        info!(meters = count, "simulation stopped");
    }

    /// Writes exactly one reading per meter `1..=count`, synchronously.
    ///
    /// Every reading in the pass carries the same timestamp, taken from the
    /// clock once before the pass begins.
    pub fn generate_once(&self, count: usize) {
        let now = self.clock.now();
        for device_id in meter_ids(&self.prefix, count) {
            let reading = self.profile.reading(&device_id, now);
            self.store.write(&device_id, reading);
        }
        debug!(meters = count, timestamp = %now, "one-shot generation complete");
    }
}

/// Per-meter loop: tick, generate, write, until the stop signal arrives.
async fn run_meter(task: MeterTask, period: Duration, mut stop: watch::Receiver<bool>) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut ticks: u64 = 0;

    loop {
        tokio::select! {
            biased;
            changed = stop.changed() => {
                // A dropped sender means the scheduler is gone.
                if changed.is_err() || *stop.borrow() {
                    break;
                }
            }
            _ = ticker.tick() => {
                ticks += 1;
                let reading = task.profile.reading(&task.device_id, task.clock.now());
                trace!(device = %task.device_id, tick = ticks, value = reading.value, "meter tick");
                task.store.write(&task.device_id, reading);
            }
        }
    }
    debug!(device = %task.device_id, ticks, "meter task stopped");
}
