//! Boats: free-moving projectiles carrying an investment across water.
//!
//! A boat launches from a random cell of its owner's coastline, heading
//! directly away from the owner's center of mass at a fixed speed. It
//! sails until it reaches land (spawning an attack on whatever it hits),
//! returns home (refunding its cargo), or leaves the map vertically
//! (sinking with its cargo).

use rand::Rng;
use territorial_types::label::WATER;
use territorial_types::{BoatInfo, Rgba, SquareId};

use crate::grid::Grid;
use crate::square::Square;

/// Euclidean speed of every boat, cells per tick.
pub const TOTAL_SPEED: f64 = 2.0;

/// An investment in transit across water.
#[derive(Debug, Clone)]
pub struct Boat {
    /// Owning square id.
    pub source: SquareId,
    /// Carried resources, delivered as an attack on landfall.
    pub investment: i64,
    /// Position `(y, x)`, floating point.
    pub pos: (f64, f64),
    /// Velocity `(dy, dx)` per tick, magnitude [`TOTAL_SPEED`].
    pub speed: (f64, f64),
    /// Owner color, mirrored for rendering.
    pub color: Rgba,
}

impl Boat {
    /// Launch a boat from the square's coastline.
    ///
    /// The coastline is the set of water cells 4-adjacent to the
    /// square's territory; one is picked uniformly as the starting
    /// position, and the heading is the unit vector from the square's
    /// center of mass to that cell, scaled to [`TOTAL_SPEED`].
    ///
    /// Returns `None` when the square has no coastline or the heading
    /// is degenerate (spawn cell exactly on the center of mass); the
    /// caller keeps the investment in that case.
    pub fn from_square(square: &Square, investment: i64, grid: &Grid, rng: &mut impl Rng) -> Option<Self> {
        let coastline = grid.frontier(WATER, square.id.raw());
        if coastline.is_empty() {
            return None;
        }
        let (y, x) = coastline[rng.random_range(0..coastline.len())];

        let (center_y, center_x) = square.center_of_mass;
        let direction_y = y as f64 - center_y;
        let direction_x = x as f64 - center_x;
        let magnitude = (direction_y * direction_y + direction_x * direction_x).sqrt();
        if magnitude == 0.0 {
            return None;
        }

        Some(Self {
            source: square.id,
            investment,
            pos: (y as f64, x as f64),
            speed: (
                direction_y / magnitude * TOTAL_SPEED,
                direction_x / magnitude * TOTAL_SPEED,
            ),
            color: square.color,
        })
    }

    /// Advance one tick along the velocity vector.
    pub fn advance(&mut self) {
        self.pos = (self.pos.0 + self.speed.0, self.pos.1 + self.speed.1);
    }

    /// Whether the position contains a non-finite coordinate.
    pub fn is_position_invalid(&self) -> bool {
        !self.pos.0.is_finite() || !self.pos.1.is_finite()
    }

    /// Wire record for the `boat` frame.
    pub fn to_info(&self) -> BoatInfo {
        BoatInfo {
            source: self.source.raw(),
            investment: self.investment,
            pos: [self.pos.0, self.pos.1],
            speed: [self.speed.0, self.speed.1],
            color: self.color,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    /// An island of `id`-owned cells surrounded by water.
    fn island_grid(id: i32) -> Grid {
        let mut g = Grid::new(5, 5);
        for y in 0..5 {
            for x in 0..5 {
                g.set(y, x, WATER);
            }
        }
        for y in 1..4 {
            for x in 1..4 {
                g.set(y, x, id);
            }
        }
        g
    }

    fn island_square() -> Square {
        let mut sq = Square::new(
            SquareId::new(1).unwrap(),
            Rgba::new(50, 60, 70, 175),
            String::from("Atoll"),
            2,
            2,
        );
        sq.center_of_mass = (2.0, 2.0);
        sq
    }

    #[test]
    fn launches_from_coastline_with_fixed_speed() {
        let grid = island_grid(1);
        let sq = island_square();
        let mut rng = SmallRng::seed_from_u64(42);
        let boat = Boat::from_square(&sq, 250, &grid, &mut rng).unwrap();

        // Started on a water cell adjacent to the island.
        let (y, x) = (boat.pos.0 as usize, boat.pos.1 as usize);
        assert_eq!(grid.get(y, x), WATER);

        // Euclidean speed is exactly TOTAL_SPEED.
        let magnitude = (boat.speed.0 * boat.speed.0 + boat.speed.1 * boat.speed.1).sqrt();
        assert!((magnitude - TOTAL_SPEED).abs() < 1e-9);

        // Heading points away from the center of mass.
        let dot = (boat.pos.0 - 2.0) * boat.speed.0 + (boat.pos.1 - 2.0) * boat.speed.1;
        assert!(dot > 0.0);
    }

    #[test]
    fn no_coastline_no_boat() {
        // Landlocked: all land, no water anywhere.
        let grid = Grid::new(3, 3);
        let sq = island_square();
        let mut rng = SmallRng::seed_from_u64(1);
        assert!(Boat::from_square(&sq, 100, &grid, &mut rng).is_none());
    }

    #[test]
    fn advance_moves_euclidean_distance_two() {
        let mut boat = Boat {
            source: SquareId::new(1).unwrap(),
            investment: 10,
            pos: (5.0, 5.0),
            speed: (1.2, 1.6),
            color: Rgba::new(0, 0, 0, 175),
        };
        boat.advance();
        let dy = boat.pos.0 - 5.0;
        let dx = boat.pos.1 - 5.0;
        assert!(((dy * dy + dx * dx).sqrt() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn invalid_position_detected() {
        let mut boat = Boat {
            source: SquareId::new(1).unwrap(),
            investment: 10,
            pos: (f64::NAN, 1.0),
            speed: (0.0, 2.0),
            color: Rgba::new(0, 0, 0, 175),
        };
        assert!(boat.is_position_invalid());
        boat.pos = (1.0, 1.0);
        assert!(!boat.is_position_invalid());
    }

    #[test]
    fn to_info_mirrors_fields() {
        let boat = Boat {
            source: SquareId::new(9).unwrap(),
            investment: 321,
            pos: (1.5, 2.5),
            speed: (0.0, 2.0),
            color: Rgba::new(4, 5, 6, 175),
        };
        let info = boat.to_info();
        assert_eq!(info.source, 9);
        assert_eq!(info.investment, 321);
        assert_eq!(info.pos, [1.5, 2.5]);
        assert_eq!(info.speed, [0.0, 2.0]);
        assert_eq!(info.color, Rgba::new(4, 5, 6, 175));
    }
}
