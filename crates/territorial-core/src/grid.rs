//! The ownership grid, its color mirror, and the 4-neighbor scans the
//! frontier algorithms are built from.
//!
//! Labels are raw `i32`: `0` unclaimed, `-1` water, `-2` mountain,
//! positive ids for owners (see [`CellLabel`](territorial_types::CellLabel)).
//! The "convolutions" of the source design are expressed as direct
//! 4-neighbor scans; a hand-rolled pass over the grid is all the kernel
//! `[[0,1,0],[1,0,1],[0,1,0]]` amounts to.

use std::collections::{BTreeMap, BTreeSet};

use territorial_types::Rgba;
use territorial_types::label::{MOUNTAIN, UNCLAIMED};

/// Downsample stride used by neighbor discovery.
pub const NEIGHBOR_STRIDE: usize = 2;

/// Downsample stride used by center-of-mass updates.
pub const CENTER_OF_MASS_STRIDE: usize = 5;

/// The 4-neighborhood offsets (up, down, left, right).
const ORTHOGONAL: [(i64, i64); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// A dense row-major grid of `i32` ownership labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    height: usize,
    width: usize,
    cells: Vec<i32>,
}

impl Grid {
    /// Create a grid of unclaimed cells.
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            cells: vec![UNCLAIMED; height * width],
        }
    }

    /// Grid height in rows.
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Grid width in columns.
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Whether signed coordinates fall inside the grid.
    pub const fn in_bounds(&self, y: i64, x: i64) -> bool {
        y >= 0 && x >= 0 && (y as usize) < self.height && (x as usize) < self.width
    }

    /// The label at `(y, x)`.
    pub fn get(&self, y: usize, x: usize) -> i32 {
        self.cells[y * self.width + x]
    }

    /// Overwrite the label at `(y, x)`.
    pub fn set(&mut self, y: usize, x: usize, label: i32) {
        self.cells[y * self.width + x] = label;
    }

    /// All cell coordinates carrying the given label, row-major order.
    pub fn cells_with(&self, label: i32) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                if self.cells[y * self.width + x] == label {
                    out.push((y, x));
                }
            }
        }
        out
    }

    /// Histogram of label occurrences over the whole grid.
    pub fn label_counts(&self) -> BTreeMap<i32, i64> {
        let mut counts = BTreeMap::new();
        for &label in &self.cells {
            *counts.entry(label).or_insert(0) += 1;
        }
        counts
    }

    /// Cells labeled `target` that are 4-adjacent to a cell labeled
    /// `source`, row-major order.
    ///
    /// This is the grid-mask convolution of the source design: convolve
    /// `grid == source` with the orthogonal kernel, then mask by
    /// `grid == target`.
    pub fn frontier(&self, target: i32, source: i32) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                if self.cells[y * self.width + x] != target {
                    continue;
                }
                let touches_source = ORTHOGONAL.iter().any(|&(dy, dx)| {
                    let ny = y as i64 + dy;
                    let nx = x as i64 + dx;
                    self.in_bounds(ny, nx) && self.get(ny as usize, nx as usize) == source
                });
                if touches_source {
                    out.push((y, x));
                }
            }
        }
        out
    }

    /// Every-`stride`-th cell in both dimensions.
    pub fn downsample(&self, stride: usize) -> Self {
        let stride = stride.max(1);
        let height = self.height.div_ceil(stride);
        let width = self.width.div_ceil(stride);
        let mut cells = Vec::with_capacity(height * width);
        for y in (0..self.height).step_by(stride) {
            for x in (0..self.width).step_by(stride) {
                cells.push(self.cells[y * self.width + x]);
            }
        }
        Self {
            height,
            width,
            cells,
        }
    }

    /// Mean `(y, x)` coordinate of cells carrying the label, or `None`
    /// when the label is absent.
    pub fn center_of_mass(&self, label: i32) -> Option<(f64, f64)> {
        let mut count = 0_u64;
        let mut sum_y = 0.0_f64;
        let mut sum_x = 0.0_f64;
        for y in 0..self.height {
            for x in 0..self.width {
                if self.cells[y * self.width + x] == label {
                    count += 1;
                    sum_y += y as f64;
                    sum_x += x as f64;
                }
            }
        }
        if count == 0 {
            None
        } else {
            Some((sum_y / count as f64, sum_x / count as f64))
        }
    }

    /// Unordered adjacency pairs over a stride-downsampled view.
    ///
    /// Scans the down- and right-shift directions, records each distinct
    /// `(min, max)` label pair, and discards self-pairs and any pair
    /// containing a mountain label. Water (`-1`) and unclaimed (`0`)
    /// labels are kept so they remain proposable targets.
    pub fn adjacency_pairs(&self, stride: usize) -> BTreeSet<(i32, i32)> {
        let coarse = self.downsample(stride);
        let mut pairs = BTreeSet::new();
        let mut insert = |a: i32, b: i32| {
            if a != b && a != MOUNTAIN && b != MOUNTAIN {
                pairs.insert((a.min(b), a.max(b)));
            }
        };
        for y in 0..coarse.height() {
            for x in 0..coarse.width() {
                let here = coarse.get(y, x);
                if y + 1 < coarse.height() {
                    insert(here, coarse.get(y + 1, x));
                }
                if x + 1 < coarse.width() {
                    insert(here, coarse.get(y, x + 1));
                }
            }
        }
        pairs
    }
}

/// Row-major RGBA mirror of the ownership grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorGrid {
    height: usize,
    width: usize,
    bytes: Vec<u8>,
}

impl ColorGrid {
    /// Create a fully transparent color grid.
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            bytes: vec![0; height * width * 4],
        }
    }

    /// Paint one cell.
    pub fn set(&mut self, y: usize, x: usize, color: Rgba) {
        let offset = (y * self.width + x) * 4;
        self.bytes[offset..offset + 4].copy_from_slice(&color.0);
    }

    /// Reset one cell to transparent.
    pub fn clear(&mut self, y: usize, x: usize) {
        self.set(y, x, Rgba::TRANSPARENT);
    }

    /// The color of one cell.
    pub fn get(&self, y: usize, x: usize) -> Rgba {
        let offset = (y * self.width + x) * 4;
        Rgba([
            self.bytes[offset],
            self.bytes[offset + 1],
            self.bytes[offset + 2],
            self.bytes[offset + 3],
        ])
    }

    /// The raw row-major RGBA byte slice.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}
