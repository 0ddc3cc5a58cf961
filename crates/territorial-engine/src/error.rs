//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during startup, providing a single type `main` can
//! propagate with `?`.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: crate::config::ConfigError,
    },

    /// World generation or asset loading failed.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: territorial_world::WorldError,
    },

    /// Game construction failed.
    #[error("game error: {source}")]
    Game {
        /// The underlying game error.
        #[from]
        source: territorial_core::GameError,
    },

    /// Observer server failed to start.
    #[error("observer error: {source}")]
    Observer {
        /// The underlying startup error.
        #[from]
        source: territorial_observer::StartupError,
    },
}
