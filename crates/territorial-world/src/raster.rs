//! Row-major scalar rasters and the resampling operations the
//! world-generation pipeline is built from.
//!
//! A [`Raster`] is a dense `H x W` grid of `f32` samples. The pipeline
//! applies three transforms to every base raster, in order: the
//! Gall-Peters equal-area vertical reprojection, a bilinear resize to the
//! target game dimensions, and a vertical flip so north ends up at row 0.
//!
//! [`Mask`] is the boolean sibling used for the water / mountain /
//! accessibility fields.

use serde::{Deserialize, Serialize};

use crate::error::WorldError;

/// A dense row-major `f32` raster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Raster {
    height: usize,
    width: usize,
    data: Vec<f32>,
}

impl Raster {
    /// Create a zero-filled raster.
    pub fn zeros(height: usize, width: usize) -> Self {
        Self {
            height,
            width,
            data: vec![0.0; height * width],
        }
    }

    /// Create a raster from row-major values.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidDimensions`] if `values.len()` is not
    /// `height * width`.
    pub fn from_vec(height: usize, width: usize, values: Vec<f32>) -> Result<Self, WorldError> {
        if values.len() != height * width {
            return Err(WorldError::InvalidDimensions {
                height,
                width,
                len: values.len(),
            });
        }
        Ok(Self {
            height,
            width,
            data: values,
        })
    }

    /// Build a raster by evaluating `f(y, x)` at every cell.
    pub fn from_fn(height: usize, width: usize, mut f: impl FnMut(usize, usize) -> f32) -> Self {
        let mut data = Vec::with_capacity(height * width);
        for y in 0..height {
            for x in 0..width {
                data.push(f(y, x));
            }
        }
        Self {
            height,
            width,
            data,
        }
    }

    /// Raster height in rows.
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Raster width in columns.
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Sample at `(y, x)`. Out-of-range coordinates are clamped to the
    /// nearest edge.
    pub fn get(&self, y: usize, x: usize) -> f32 {
        let y = y.min(self.height.saturating_sub(1));
        let x = x.min(self.width.saturating_sub(1));
        self.data[y * self.width + x]
    }

    /// Overwrite the sample at `(y, x)`. Ignored when out of range.
    pub fn set(&mut self, y: usize, x: usize, value: f32) {
        if y < self.height && x < self.width {
            self.data[y * self.width + x] = value;
        }
    }

    /// Borrow one row of samples.
    pub fn row(&self, y: usize) -> &[f32] {
        let y = y.min(self.height.saturating_sub(1));
        &self.data[y * self.width..(y + 1) * self.width]
    }

    /// The raw row-major sample slice.
    pub fn values(&self) -> &[f32] {
        &self.data
    }

    /// Minimum and maximum sample value.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::EmptyRaster`] for a zero-size raster.
    pub fn min_max(&self) -> Result<(f32, f32), WorldError> {
        let mut iter = self.data.iter().copied();
        let first = iter.next().ok_or(WorldError::EmptyRaster)?;
        let mut min = first;
        let mut max = first;
        for v in iter {
            min = min.min(v);
            max = max.max(v);
        }
        Ok((min, max))
    }

    /// Apply the Gall-Peters equal-area reprojection along the vertical
    /// axis.
    ///
    /// Each source row `y` at latitude `lat = pi * (y/H - 0.5)` lands on
    /// destination row `floor((sin(lat) + 1) * H / 2)`; rows that receive
    /// no source are filled by linear interpolation between the nearest
    /// populated rows above and below (edge rows copy their single
    /// neighbor).
    pub fn equal_area_reproject(&self) -> Self {
        let h = self.height;
        let w = self.width;
        if h == 0 || w == 0 {
            return self.clone();
        }

        let mut rows: Vec<Option<Vec<f32>>> = vec![None; h];
        for y in 0..h {
            let lat = core::f32::consts::PI * (y as f32 / h as f32 - 0.5);
            let dest = (((lat.sin() + 1.0) * h as f32) / 2.0).floor() as usize;
            let dest = dest.min(h - 1);
            rows[dest] = Some(self.row(y).to_vec());
        }

        let mut data = Vec::with_capacity(h * w);
        for y in 0..h {
            if let Some(row) = &rows[y] {
                data.extend_from_slice(row);
                continue;
            }
            let above = (0..y).rev().find(|&i| rows[i].is_some());
            let below = (y + 1..h).find(|&i| rows[i].is_some());
            match (above, below) {
                (Some(a), Some(b)) => {
                    let t = (y - a) as f32 / (b - a) as f32;
                    let (row_a, row_b) = (&rows[a], &rows[b]);
                    if let (Some(ra), Some(rb)) = (row_a, row_b) {
                        for x in 0..w {
                            data.push(ra[x] + (rb[x] - ra[x]) * t);
                        }
                    }
                }
                (Some(a), None) => {
                    if let Some(ra) = &rows[a] {
                        data.extend_from_slice(ra);
                    }
                }
                (None, Some(b)) => {
                    if let Some(rb) = &rows[b] {
                        data.extend_from_slice(rb);
                    }
                }
                // Unreachable for non-empty rasters: at least one source
                // row always lands somewhere.
                (None, None) => data.extend(core::iter::repeat_n(0.0, w)),
            }
        }

        Self {
            height: h,
            width: w,
            data,
        }
    }

    /// Bilinearly resample to `(height, width)`.
    pub fn resize_bilinear(&self, height: usize, width: usize) -> Self {
        if height == 0 || width == 0 || self.height == 0 || self.width == 0 {
            return Self::zeros(height, width);
        }
        let sy = self.height as f32 / height as f32;
        let sx = self.width as f32 / width as f32;
        Self::from_fn(height, width, |y, x| {
            let src_y = ((y as f32 + 0.5) * sy - 0.5).clamp(0.0, (self.height - 1) as f32);
            let src_x = ((x as f32 + 0.5) * sx - 0.5).clamp(0.0, (self.width - 1) as f32);
            let y0 = src_y.floor() as usize;
            let x0 = src_x.floor() as usize;
            let y1 = (y0 + 1).min(self.height - 1);
            let x1 = (x0 + 1).min(self.width - 1);
            let ty = src_y - y0 as f32;
            let tx = src_x - x0 as f32;
            let top = self.get(y0, x0) * (1.0 - tx) + self.get(y0, x1) * tx;
            let bottom = self.get(y1, x0) * (1.0 - tx) + self.get(y1, x1) * tx;
            top * (1.0 - ty) + bottom * ty
        })
    }

    /// Reverse the row order (north ends up at row 0).
    pub fn flip_vertical(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for y in (0..self.height).rev() {
            data.extend_from_slice(self.row(y));
        }
        Self {
            height: self.height,
            width: self.width,
            data,
        }
    }
}

/// A dense row-major boolean raster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mask {
    height: usize,
    width: usize,
    bits: Vec<bool>,
}

impl Mask {
    /// Build a mask by evaluating a predicate over a raster.
    pub fn from_raster(raster: &Raster, mut pred: impl FnMut(f32) -> bool) -> Self {
        Self {
            height: raster.height(),
            width: raster.width(),
            bits: raster.values().iter().map(|&v| pred(v)).collect(),
        }
    }

    /// Mask height in rows.
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Mask width in columns.
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Whether the bit at `(y, x)` is set. Out of range reads as `false`.
    pub fn get(&self, y: usize, x: usize) -> bool {
        if y < self.height && x < self.width {
            self.bits[y * self.width + x]
        } else {
            false
        }
    }

    /// Number of set bits.
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// All `(y, x)` coordinates with a set bit, row-major order.
    pub fn indices(&self) -> Vec<(usize, usize)> {
        let mut out = Vec::new();
        for y in 0..self.height {
            for x in 0..self.width {
                if self.bits[y * self.width + x] {
                    out.push((y, x));
                }
            }
        }
        out
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn from_vec_checks_dimensions() {
        assert!(Raster::from_vec(2, 2, vec![1.0, 2.0, 3.0]).is_err());
        assert!(Raster::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).is_ok());
    }

    #[test]
    fn get_clamps_to_edges() {
        let r = Raster::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(r.get(0, 0), 1.0);
        assert_eq!(r.get(5, 5), 4.0);
    }

    #[test]
    fn resize_identity_preserves_values() {
        let r = Raster::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let same = r.resize_bilinear(2, 2);
        assert_eq!(same, r);
    }

    #[test]
    fn resize_upscale_stays_in_range() {
        let r = Raster::from_vec(2, 2, vec![0.0, 1.0, 0.0, 1.0]).unwrap();
        let big = r.resize_bilinear(8, 8);
        let (min, max) = big.min_max().unwrap();
        assert!(min >= 0.0 && max <= 1.0);
    }

    #[test]
    fn flip_reverses_rows() {
        let r = Raster::from_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let flipped = r.flip_vertical();
        assert_eq!(flipped.row(0), &[3.0, 4.0]);
        assert_eq!(flipped.row(1), &[1.0, 2.0]);
    }

    #[test]
    fn reprojection_preserves_shape_and_fills_all_rows() {
        let r = Raster::from_fn(16, 4, |y, _| y as f32);
        let projected = r.equal_area_reproject();
        assert_eq!(projected.height(), 16);
        assert_eq!(projected.width(), 4);
        // Every row holds finite values (gap filling left no holes).
        for y in 0..16 {
            for &v in projected.row(y) {
                assert!(v.is_finite());
            }
        }
    }

    #[test]
    fn reprojection_is_monotone_for_monotone_input() {
        // Row index increases with latitude; the equal-area shuffle plus
        // interpolation must keep the column monotonically non-decreasing.
        let r = Raster::from_fn(32, 1, |y, _| y as f32);
        let projected = r.equal_area_reproject();
        let mut prev = f32::MIN;
        for y in 0..32 {
            let v = projected.get(y, 0);
            assert!(v >= prev - 1e-3);
            prev = v;
        }
    }

    #[test]
    fn mask_counts_and_indices() {
        let r = Raster::from_vec(2, 2, vec![-1.0, 1.0, 2.0, -3.0]).unwrap();
        let m = Mask::from_raster(&r, |v| v > 0.0);
        assert_eq!(m.count(), 2);
        assert_eq!(m.indices(), vec![(0, 1), (1, 0)]);
        assert!(!m.get(9, 9));
    }
}
