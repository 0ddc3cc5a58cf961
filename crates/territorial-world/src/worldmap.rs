//! The derived world map: every per-cell field the simulation reads.
//!
//! [`WorldMap::generate`] runs the full pipeline over the four base
//! rasters: Gall-Peters equal-area reprojection, bilinear resize to the
//! game dimensions, vertical flip, temperature derivation, biome
//! classification, and the color / traversability / livability / mask
//! fields. The result is cacheable by `(width, height, seed)` -- see
//! [`crate::cache`].

use serde::{Deserialize, Serialize};
use territorial_types::Rgba;

use crate::assets::BaseRasters;
use crate::biome::{ACCESSIBLE_ELEVATION, Biome, MOUNTAIN_ELEVATION};
use crate::raster::{Mask, Raster};

/// Warmest possible sea-level temperature, deg C (at the equator).
const MAX_TEMP: f32 = 40.0;

/// Coldest possible sea-level temperature, deg C (at the poles).
const MIN_TEMP: f32 = -15.0;

/// Temperature drop per meter of elevation, deg C.
const LAPSE_RATE: f32 = 0.006;

/// Elevation at which shading reaches full white, meters.
const SHADING_CEILING: f32 = 5000.0;

/// All derived per-cell fields of a generated world.
///
/// Every raster and mask has the same `height x width` shape. The color
/// map is row-major RGBA, four bytes per cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldMap {
    /// Grid width in cells.
    pub width: usize,
    /// Grid height in cells.
    pub height: usize,
    /// Seed the base rasters were synthesized or cached under.
    pub seed: u64,
    /// Elevation in meters, north at row 0.
    pub elevation_map: Raster,
    /// Rainfall in mm/yr.
    pub rainfall_map: Raster,
    /// Derived temperature in deg C.
    pub temperature_map: Raster,
    /// Latitude of each cell in degrees.
    pub lat_grid: Raster,
    /// Longitude of each cell in degrees.
    pub lon_grid: Raster,
    /// Biome render colors, row-major RGBA bytes.
    pub color_map: Vec<u8>,
    /// Crossing ease per cell, `[0, 1]`, higher is easier.
    pub traversability_map: Raster,
    /// Economic value per cell, `[0, 1]`.
    pub livability_map: Raster,
    /// Cells at or below sea level.
    pub water_mask: Mask,
    /// Cells at or above the mountain threshold.
    pub mountain_mask: Mask,
    /// Cells where squares may spawn (land below the accessibility
    /// elevation).
    pub accessibility_mask: Mask,
}

impl WorldMap {
    /// Run the full derivation pipeline over base rasters.
    pub fn generate(width: usize, height: usize, seed: u64, base: &BaseRasters) -> Self {
        let project = |r: &Raster| {
            r.equal_area_reproject()
                .resize_bilinear(height, width)
                .flip_vertical()
        };

        let elevation_map = project(&base.elevation);
        let rainfall_map = project(&base.rainfall);
        let lat_grid = project(&base.lat);
        let lon_grid = project(&base.lon);

        let temperature_map = Raster::from_fn(height, width, |y, x| {
            let lat = lat_grid.get(y, x);
            let elev = elevation_map.get(y, x);
            MAX_TEMP - (MAX_TEMP - MIN_TEMP) * (lat / 90.0).abs() - elev.max(0.0) * LAPSE_RATE
        });

        let mut color_map = vec![0_u8; height * width * 4];
        let mut traversability_map = Raster::zeros(height, width);
        let mut livability_map = Raster::zeros(height, width);

        for y in 0..height {
            for x in 0..width {
                let elev = elevation_map.get(y, x);
                let biome = Biome::classify(
                    temperature_map.get(y, x),
                    rainfall_map.get(y, x),
                    elev,
                );
                let mut color = biome.color();
                if elev > 0.0 {
                    color = color.lighten((elev / SHADING_CEILING).min(1.0));
                }
                let offset = (y * width + x) * 4;
                color_map[offset..offset + 4].copy_from_slice(&color.0);
                traversability_map.set(y, x, biome.traversability());
                livability_map.set(y, x, biome.livability());
            }
        }

        let water_mask = Mask::from_raster(&elevation_map, |e| e <= 0.0);
        let mountain_mask = Mask::from_raster(&elevation_map, |e| e >= MOUNTAIN_ELEVATION);
        let accessibility_mask =
            Mask::from_raster(&elevation_map, |e| e > 0.0 && e < ACCESSIBLE_ELEVATION);

        Self {
            width,
            height,
            seed,
            elevation_map,
            rainfall_map,
            temperature_map,
            lat_grid,
            lon_grid,
            color_map,
            traversability_map,
            livability_map,
            water_mask,
            mountain_mask,
            accessibility_mask,
        }
    }

    /// Generate a world from seeded synthetic base rasters.
    pub fn synthetic(width: usize, height: usize, seed: u64) -> Self {
        let base = crate::assets::synthesize_base_rasters(height, width, seed);
        Self::generate(width, height, seed, &base)
    }

    /// The render color of one cell.
    pub fn color_at(&self, y: usize, x: usize) -> Rgba {
        let offset = (y.min(self.height.saturating_sub(1)) * self.width
            + x.min(self.width.saturating_sub(1)))
            * 4;
        Rgba([
            self.color_map[offset],
            self.color_map[offset + 1],
            self.color_map[offset + 2],
            self.color_map[offset + 3],
        ])
    }
}
