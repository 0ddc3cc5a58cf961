//! Attack movements: live frontiers advancing into a target's pixels.
//!
//! A movement starts from the set of target-owned cells touching the
//! source's territory, then widens one ring per tick, paying for every
//! captured cell out of its investment while draining the defender. The
//! cost model keys off the defender's resource density and the terrain's
//! traversability, and always charges the attacker twice what it drains
//! from the defender.

use std::collections::BTreeSet;

use territorial_types::SquareId;
use territorial_world::Raster;

use crate::grid::Grid;
use crate::square::Square;

/// Offsets a frontier grows through each step: stay plus the 4-neighborhood.
const GROWTH_OFFSETS: [(i64, i64); 5] = [(0, 0), (-1, 0), (1, 0), (0, -1), (0, 1)];

/// A live attack from `source` into `target`'s pixels.
///
/// `target` is a raw label: a positive id for a live defender, `0` for
/// unowned land (also the rewrite applied when a defender dies
/// mid-attack). Water targets never become movements; they spawn boats.
#[derive(Debug, Clone)]
pub struct AttackMovement {
    /// Attacking square id.
    pub source: SquareId,
    /// Defending label (`0` for neutral land).
    pub target: i32,
    /// Resources the attack can still spend.
    pub investment: i64,
    /// Current frontier cells.
    pub border_pixels: Vec<(usize, usize)>,
    /// Whether the initial frontier has been computed.
    pub is_started: bool,
}

impl AttackMovement {
    /// Create a not-yet-started movement.
    pub const fn new(source: SquareId, target: i32, investment: i64) -> Self {
        Self {
            source,
            target,
            investment,
            border_pixels: Vec::new(),
            is_started: false,
        }
    }

    /// Create a movement from a boat landing: the frontier is the single
    /// landing cell and the movement is already started.
    pub fn from_landing(
        source: SquareId,
        target: i32,
        investment: i64,
        landing: (usize, usize),
    ) -> Self {
        Self {
            source,
            target,
            investment,
            border_pixels: vec![landing],
            is_started: true,
        }
    }

    /// Compute the initial frontier: target-labeled cells 4-adjacent to
    /// source-labeled cells.
    pub fn start(&mut self, grid: &Grid) {
        self.border_pixels = grid.frontier(self.target, self.source.raw());
        self.is_started = true;
    }

    /// The cells this movement captures next: the frontier widened by
    /// one ring, deduplicated, clipped to bounds, and filtered to cells
    /// still labeled `target`.
    pub fn next_pixels(&self, grid: &Grid) -> Vec<(usize, usize)> {
        let mut candidates = BTreeSet::new();
        for &(y, x) in &self.border_pixels {
            for &(dy, dx) in &GROWTH_OFFSETS {
                let ny = y as i64 + dy;
                let nx = x as i64 + dx;
                if grid.in_bounds(ny, nx) {
                    candidates.insert((ny as usize, nx as usize));
                }
            }
        }
        candidates
            .into_iter()
            .filter(|&(y, x)| grid.get(y, x) == self.target)
            .collect()
    }

    /// Cost of capturing `next` cells, as `(source_cost, target_cost)`.
    ///
    /// With a live defender the base cost scales with the defender's
    /// resource density (`resources / area`) and the terrain resistance
    /// `1 + (1 - traversability)`, multiplied up as the defender's stock
    /// approaches its cap. Costs are capped by what each side can pay,
    /// rebalanced so the attacker always pays exactly twice the drain,
    /// and floored at one resource per captured cell.
    ///
    /// Without a defender (neutral land, or a defender killed
    /// mid-attack) only the terrain term applies and nothing is drained.
    pub fn capture_costs(
        &self,
        next: &[(usize, usize)],
        target: Option<&Square>,
        traversability: &Raster,
    ) -> (i64, i64) {
        let n = next.len() as i64;
        if n == 0 {
            return (0, 0);
        }
        let tau = next
            .iter()
            .map(|&(y, x)| f64::from(traversability.get(y, x)))
            .sum::<f64>()
            / n as f64;
        let resistance = 1.0 + (1.0 - tau);

        let Some(defender) = target else {
            let source_cost = (n as f64 * resistance) as i64;
            return (source_cost.max(n), 0);
        };

        let density = defender.resources as f64 / defender.area.max(1) as f64;
        let base = n as f64 * density * resistance;
        let ratio = defender.resources as f64 / (defender.max_resources() as f64 + 1.0);
        let multiplier = 1.0 + ratio;

        let mut source_cost = (2.0 * base * multiplier) as i64;
        let mut target_cost = (base * multiplier) as i64;

        source_cost = source_cost.min(self.investment);
        target_cost = target_cost.min(defender.resources);

        // Keep the attacker paying exactly double the drain.
        if source_cost < 2 * target_cost {
            target_cost = source_cost / 2;
        } else if source_cost > 2 * target_cost {
            source_cost = 2 * target_cost;
        }

        if source_cost < n {
            source_cost = n;
        }

        (source_cost, target_cost)
    }
}
