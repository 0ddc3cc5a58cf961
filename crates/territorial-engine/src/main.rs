//! Engine binary for the Territorial simulation.
//!
//! Wires together world generation, the game, the tick scheduler, and
//! the observer server. Loads configuration, initializes all
//! subsystems, and serves until terminated.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `territorial-config.yaml`
//! 3. Build the world map (cache, assets, or seeded synthesis)
//! 4. Load the city index when one is configured
//! 5. Construct the game (spawn squares on accessible cells)
//! 6. Spawn the scheduler tasks (simulation + broadcast) and the
//!    execution-time reporter
//! 7. Spawn the observer server and park on its handle

mod config;
mod error;

use std::path::Path;
use std::sync::Arc;

use territorial_core::scheduler::{
    self, STATS_LOG_PERIOD, TickStats, spawn_stats_logger, spawn_tick_tasks,
};
use territorial_core::Game;
use territorial_observer::{AppState, ObserverConfig, broadcast_tasks, spawn_observer};
use territorial_world::CityIndex;
use tokio::sync::RwLock;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::SimulationConfig;
use crate::error::EngineError;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if any initialization step fails or the server
/// exits abnormally.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("territorial-engine starting");

    // 2. Load configuration.
    let config = load_config()?;
    info!(
        width = config.world.width,
        height = config.world.height,
        seed = config.world.seed,
        num_squares = config.world.num_squares,
        "Configuration loaded"
    );

    // 3. Build the world map.
    let map = territorial_world::build_world(
        config.world.width,
        config.world.height,
        config.world.seed,
        config.assets.data_dir.as_deref(),
        config.assets.cache_dir.as_deref(),
    )
    .map_err(EngineError::from)?;
    info!(
        accessible_cells = map.accessibility_mask.count(),
        water_cells = map.water_mask.count(),
        "World map ready"
    );

    // 4. Load the city index when configured.
    let cities = load_cities(&config)?;

    // 5. Construct the game.
    let game = Game::new(map, config.world.num_squares, config.world.seed, &cities)
        .map_err(EngineError::from)?;
    info!(squares = game.square_count(), "Game initialized");
    let shared = Arc::new(RwLock::new(game));

    // 6. Spawn scheduler tasks: simulation ticks, broadcast ticks, and
    //    the execution-time reporter.
    let app_state = AppState::new(Arc::clone(&shared));
    let stats = Arc::new(TickStats::default());

    let mut tasks = scheduler::simulation_tasks();
    tasks.extend(broadcast_tasks(&app_state));
    let task_count = tasks.len();
    let _task_handles = spawn_tick_tasks(&shared, tasks, &stats);
    let _stats_handle = spawn_stats_logger(&stats, STATS_LOG_PERIOD);
    info!(task_count, "Scheduler tasks spawned");

    // 7. Serve the observer API until terminated.
    let observer_config = ObserverConfig {
        host: config.server.host,
        port: config.server.port,
    };
    let observer_handle = spawn_observer(observer_config, Arc::new(app_state))
        .await
        .map_err(EngineError::from)?;
    observer_handle.await?;

    Ok(())
}

/// Load the simulation configuration from `territorial-config.yaml`,
/// falling back to defaults when the file is absent.
fn load_config() -> Result<SimulationConfig, EngineError> {
    let config_path = Path::new("territorial-config.yaml");
    if config_path.exists() {
        Ok(SimulationConfig::from_file(config_path)?)
    } else {
        info!("Config file not found, using defaults");
        Ok(SimulationConfig::default())
    }
}

/// Load the city index when one is configured.
///
/// A configured but unreadable cities file is fatal, like any other
/// asset; no configured file means generated square names.
fn load_cities(config: &SimulationConfig) -> Result<CityIndex, EngineError> {
    match &config.assets.cities_file {
        Some(path) => Ok(CityIndex::from_csv_path(path).map_err(EngineError::from)?),
        None => {
            info!("No cities file configured, using generated square names");
            Ok(CityIndex::empty())
        }
    }
}
