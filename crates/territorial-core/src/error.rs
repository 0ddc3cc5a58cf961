//! Error types for the `territorial-core` crate.

/// Errors that can occur while constructing or ticking a game.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    /// The world has no accessible cells to spawn squares on.
    #[error("world has no accessible cells to spawn on")]
    NoAccessibleCells,

    /// The world map shape does not match the requested grid shape.
    #[error("world map is {map_width}x{map_height}, game wants {width}x{height}")]
    DimensionMismatch {
        /// World map width.
        map_width: usize,
        /// World map height.
        map_height: usize,
        /// Requested grid width.
        width: usize,
        /// Requested grid height.
        height: usize,
    },
}
