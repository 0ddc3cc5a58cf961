//! Wire messages pushed to observers.
//!
//! Every message is a JSON text frame with a `type` field and a payload.
//! Grid-shaped payloads (`map`, `grid_update`) carry a hex string of the
//! zlib-compressed flattened RGBA bytes; the codec lives in the observer
//! crate, this module only defines the frames.

use serde::{Deserialize, Serialize};

use crate::color::Rgba;

/// A JSON text frame sent to every subscriber.
///
/// The `type` tag takes the values `map`, `grid_update`, `square_info`
/// and `boat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireMessage {
    /// The static biome color map, sent once per subscriber at connect.
    Map {
        /// Hex string of the zlib-compressed row-major RGBA bytes.
        grid: String,
    },
    /// The current ownership color grid, sent every 0.2 s.
    GridUpdate {
        /// Hex string of the zlib-compressed row-major RGBA bytes.
        grid: String,
    },
    /// Per-square statistics, sent every 0.5 s.
    SquareInfo {
        /// One record per live square.
        square_info: Vec<SquareInfo>,
    },
    /// Boat positions, sent every 0.1 s.
    Boat {
        /// One record per boat in flight.
        boats: Vec<BoatInfo>,
    },
}

/// Per-square statistics record for the `square_info` frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SquareInfo {
    /// The square's id.
    pub id: i32,
    /// The square's display name (nearest populated city to its spawn).
    pub name: String,
    /// Current resource stock.
    pub resources: i64,
    /// Center of mass as `[y, x]` in grid coordinates.
    pub center_of_mass: [f64; 2],
    /// Number of owned cells.
    pub area: i64,
    /// Current resource cap.
    pub max_resources: i64,
    /// Mean livability over owned cells, in `[0, 1]`.
    pub average_land_value: f64,
    /// Current per-tick interest rate.
    pub interest_rate: f64,
}

/// Boat record for the `boat` frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoatInfo {
    /// Owning square id.
    pub source: i32,
    /// Carried investment.
    pub investment: i64,
    /// Position as `[y, x]` (floating point).
    pub pos: [f64; 2],
    /// Velocity as `[dy, dx]` per tick.
    pub speed: [f64; 2],
    /// Owner color.
    pub color: Rgba,
}
