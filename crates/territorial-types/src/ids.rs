//! Type-safe square identifiers.
//!
//! Squares are identified by dense positive integers assigned by the game
//! at init (1, 2, 3, ...). Ids are never reused after a square is
//! eliminated. The same integer doubles as the ownership label in the
//! grid, so the wrapper keeps the raw value reachable via [`SquareId::raw`].

use serde::{Deserialize, Serialize};

/// Unique identifier for a square (territorial actor).
///
/// Always strictly positive; the zero and negative values of the label
/// space are reserved for unclaimed land, water, and mountains (see
/// [`CellLabel`](crate::label::CellLabel)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SquareId(i32);

impl SquareId {
    /// The first id the game assigns.
    pub const FIRST: Self = Self(1);

    /// Wrap a raw label value, returning `None` unless it is positive.
    pub const fn new(raw: i32) -> Option<Self> {
        if raw > 0 { Some(Self(raw)) } else { None }
    }

    /// Return the raw grid-label value of this id.
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// The id after this one. Saturates at `i32::MAX`, so the result is
    /// always a valid positive id.
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl core::fmt::Display for SquareId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}
