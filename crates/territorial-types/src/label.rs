//! Typed view of grid cell labels.
//!
//! The grid itself stores raw `i32` labels for throughput; this enum is
//! the typed seam used wherever code branches on what a cell *is* rather
//! than shuffling pixels in bulk.

use crate::ids::SquareId;

/// Raw label for unclaimed land.
pub const UNCLAIMED: i32 = 0;

/// Raw label for water (impassable to ground movement, sailable by boats).
pub const WATER: i32 = -1;

/// Raw label for mountains (permanently impassable).
pub const MOUNTAIN: i32 = -2;

/// Semantic meaning of a single grid cell label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellLabel {
    /// Land not owned by any square (`0`).
    Unclaimed,
    /// Water (`-1`): traversable by boats only.
    Water,
    /// Mountain (`-2`): never traversable, never relabeled.
    Mountain,
    /// Land owned by the square with the given id (`> 0`).
    Owned(SquareId),
}

impl CellLabel {
    /// Decode a raw grid value.
    ///
    /// Any value that is neither `0`, `-1`, `-2`, nor positive (i.e. a
    /// negative value below `-2`) decodes as [`CellLabel::Mountain`];
    /// such values never appear in a well-formed grid.
    pub const fn from_raw(raw: i32) -> Self {
        match raw {
            UNCLAIMED => Self::Unclaimed,
            WATER => Self::Water,
            _ => {
                if let Some(id) = SquareId::new(raw) {
                    Self::Owned(id)
                } else {
                    Self::Mountain
                }
            }
        }
    }

    /// Encode back to the raw grid value.
    pub const fn raw(self) -> i32 {
        match self {
            Self::Unclaimed => UNCLAIMED,
            Self::Water => WATER,
            Self::Mountain => MOUNTAIN,
            Self::Owned(id) => id.raw(),
        }
    }

    /// Whether this label belongs to terrain that never changes after
    /// world generation (water or mountain).
    pub const fn is_permanent_terrain(self) -> bool {
        matches!(self, Self::Water | Self::Mountain)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn raw_round_trip() {
        for raw in [-2, -1, 0, 1, 250] {
            assert_eq!(CellLabel::from_raw(raw).raw(), raw);
        }
    }

    #[test]
    fn ownership_decodes() {
        let id = SquareId::new(9).unwrap();
        assert_eq!(CellLabel::from_raw(9), CellLabel::Owned(id));
    }

    #[test]
    fn terrain_permanence_flags() {
        assert!(CellLabel::Water.is_permanent_terrain());
        assert!(CellLabel::Mountain.is_permanent_terrain());
        assert!(!CellLabel::Unclaimed.is_permanent_terrain());
    }
}
