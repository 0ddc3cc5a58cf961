//! Multi-rate tick scheduler over one shared world.
//!
//! Tick methods run on independent periods, driven by a uniform table of
//! `(name, period, method)` entries: one Tokio task per entry runs
//! `lock world; run; record elapsed; sleep(period)` forever. The world
//! lock (`tokio::sync::RwLock`) is held for the whole of each tick
//! method, so every method observes and produces a consistent snapshot;
//! broadcasters take the same lock read-side and copy out what they
//! serialize.
//!
//! A failing tick is logged and skipped; the task continues on its next
//! period. Execution times accumulate in [`TickStats`] and a slow task
//! logs the averages once a minute and clears the counters.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{error, info};

use crate::error::GameError;
use crate::game::Game;

/// The shared world handle every scheduled task operates on.
pub type SharedGame = Arc<RwLock<Game>>;

/// A scheduled tick method.
pub type TickFn = Box<dyn FnMut(&mut Game) -> Result<(), GameError> + Send>;

/// Period of the attack-movement tick.
pub const ATTACK_MOVEMENTS_PERIOD: Duration = Duration::from_millis(100);
/// Period of the resource tick.
pub const RESOURCES_PERIOD: Duration = Duration::from_millis(100);
/// Period of the center-of-mass tick.
pub const CENTERS_OF_MASS_PERIOD: Duration = Duration::from_millis(2000);
/// Period of the attack-proposal tick.
pub const NEW_ATTACK_MOVEMENTS_PERIOD: Duration = Duration::from_millis(2000);
/// Period of the area/elimination tick.
pub const SQUARE_AREAS_PERIOD: Duration = Duration::from_millis(1000);
/// Period of the neighbor-discovery tick.
pub const NEIGHBORS_PERIOD: Duration = Duration::from_millis(5000);
/// Period of the boat tick.
pub const BOATS_PERIOD: Duration = Duration::from_millis(100);
/// Period of the grid-update broadcast.
pub const GRID_UPDATE_PERIOD: Duration = Duration::from_millis(200);
/// Period of the square-info broadcast.
pub const SQUARE_INFO_PERIOD: Duration = Duration::from_millis(500);
/// Period of the boat broadcast.
pub const BOAT_BROADCAST_PERIOD: Duration = Duration::from_millis(100);
/// Period of the execution-time report.
pub const STATS_LOG_PERIOD: Duration = Duration::from_secs(60);

/// One entry of the scheduler table.
pub struct TickTask {
    /// Task name used in stats and logs.
    pub name: &'static str,
    /// Sleep between invocations.
    pub period: Duration,
    /// The tick method itself.
    pub run: TickFn,
}

impl TickTask {
    /// Build a table entry.
    pub fn new(
        name: &'static str,
        period: Duration,
        run: impl FnMut(&mut Game) -> Result<(), GameError> + Send + 'static,
    ) -> Self {
        Self {
            name,
            period,
            run: Box::new(run),
        }
    }
}

impl core::fmt::Debug for TickTask {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TickTask")
            .field("name", &self.name)
            .field("period", &self.period)
            .finish_non_exhaustive()
    }
}

/// Per-task execution time accumulator.
#[derive(Debug, Default)]
pub struct TickStats {
    samples: Mutex<BTreeMap<&'static str, Vec<f64>>>,
}

/// Averaged execution times for one task between two drains.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskTiming {
    /// Task name.
    pub name: &'static str,
    /// Mean execution time in seconds.
    pub average_seconds: f64,
    /// Number of recorded invocations.
    pub invocations: usize,
}

impl TickStats {
    /// Record one invocation's execution time.
    pub fn record(&self, name: &'static str, seconds: f64) {
        if let Ok(mut samples) = self.samples.lock() {
            samples.entry(name).or_default().push(seconds);
        }
    }

    /// Return per-task averages and clear the counters.
    pub fn drain(&self) -> Vec<TaskTiming> {
        let Ok(mut samples) = self.samples.lock() else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for (&name, times) in samples.iter_mut() {
            if times.is_empty() {
                continue;
            }
            let total: f64 = times.iter().sum();
            out.push(TaskTiming {
                name,
                average_seconds: total / times.len() as f64,
                invocations: times.len(),
            });
            times.clear();
        }
        out
    }
}

/// Spawn one Tokio task per table entry.
///
/// Each task loops forever: take the world write lock, run the tick
/// method, record its execution time, sleep for the period. Errors are
/// logged and the loop continues.
pub fn spawn_tick_tasks(
    game: &SharedGame,
    tasks: Vec<TickTask>,
    stats: &Arc<TickStats>,
) -> Vec<JoinHandle<()>> {
    let mut handles = Vec::with_capacity(tasks.len());
    for task in tasks {
        let game = Arc::clone(game);
        let stats = Arc::clone(stats);
        let TickTask {
            name,
            period,
            mut run,
        } = task;
        handles.push(tokio::spawn(async move {
            loop {
                let started = Instant::now();
                {
                    let mut world = game.write().await;
                    if let Err(e) = run(&mut world) {
                        error!(task = name, error = %e, "Tick failed, skipping to next period");
                    }
                }
                stats.record(name, started.elapsed().as_secs_f64());
                tokio::time::sleep(period).await;
            }
        }));
    }
    handles
}

/// Spawn the periodic execution-time report.
pub fn spawn_stats_logger(stats: &Arc<TickStats>, period: Duration) -> JoinHandle<()> {
    let stats = Arc::clone(stats);
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(period).await;
            for timing in stats.drain() {
                info!(
                    task = timing.name,
                    average_seconds = timing.average_seconds,
                    invocations = timing.invocations,
                    "Tick timing"
                );
            }
        }
    })
}

/// The simulation half of the scheduler table (broadcast entries are
/// contributed by the observer).
pub fn simulation_tasks() -> Vec<TickTask> {
    vec![
        TickTask::new("attack_movements", ATTACK_MOVEMENTS_PERIOD, |game| {
            game.update_attack_movements();
            Ok(())
        }),
        TickTask::new("resources", RESOURCES_PERIOD, |game| {
            game.update_resources();
            Ok(())
        }),
        TickTask::new("centers_of_mass", CENTERS_OF_MASS_PERIOD, |game| {
            game.update_centers_of_mass();
            Ok(())
        }),
        TickTask::new("new_attack_movements", NEW_ATTACK_MOVEMENTS_PERIOD, |game| {
            game.get_new_attack_movements();
            Ok(())
        }),
        TickTask::new("square_areas", SQUARE_AREAS_PERIOD, |game| {
            game.update_square_areas();
            Ok(())
        }),
        TickTask::new("neighbors", NEIGHBORS_PERIOD, |game| {
            game.update_neighbors();
            Ok(())
        }),
        TickTask::new("boats", BOATS_PERIOD, |game| {
            game.update_boats();
            Ok(())
        }),
    ]
}
