//! Shared type definitions for the Territorial simulation.
//!
//! This crate holds the vocabulary types every other crate speaks:
//! square identifiers, grid cell labels, RGBA colors, and the wire
//! messages pushed to observers. It deliberately has no dependency on
//! the simulation kernel so the observer and engine crates can exchange
//! payloads without pulling in grid internals.

pub mod color;
pub mod ids;
pub mod label;
pub mod messages;

pub use color::Rgba;
pub use ids::SquareId;
pub use label::CellLabel;
pub use messages::{BoatInfo, SquareInfo, WireMessage};

/// Default playfield width in grid cells.
pub const GAME_WIDTH: usize = 1200;

/// Default playfield height in grid cells.
pub const GAME_HEIGHT: usize = 800;

/// Default number of squares spawned at game init.
pub const NUM_SQUARES: usize = 250;
