//! Base raster assets: on-disk loading and seeded synthesis.
//!
//! The world is derived from four pre-projection rasters: elevation (m),
//! rainfall (mm/yr), latitude (deg) and longitude (deg). In a deployed
//! game they are shipped as bincode-encoded [`Raster`] files; for
//! development and tests they are synthesized from the seed with fractal
//! noise so the pipeline is hermetic.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};
use serde::{Deserialize, Serialize};

use crate::error::WorldError;
use crate::raster::Raster;

/// File stem of the elevation asset.
pub const ELEVATION_ASSET: &str = "world_elevation";
/// File stem of the rainfall asset.
pub const RAINFALL_ASSET: &str = "world_rainfall";
/// File stem of the latitude asset.
pub const LAT_ASSET: &str = "world_lat";
/// File stem of the longitude asset.
pub const LON_ASSET: &str = "world_lon";

/// Noise sampling scale: cells-to-noise-space factor, tuned so a
/// 1200x800 world shows continents rather than speckle.
const NOISE_SCALE: f64 = 0.007;

/// The four pre-projection base rasters the pipeline consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaseRasters {
    /// Elevation in meters (negative below sea level).
    pub elevation: Raster,
    /// Rainfall in mm per year.
    pub rainfall: Raster,
    /// Latitude in degrees, south at row 0 (the pipeline flips at the end).
    pub lat: Raster,
    /// Longitude in degrees.
    pub lon: Raster,
}

/// Load all four base rasters from `data_dir`.
///
/// Each raster lives at `<data_dir>/<stem>.bin` as a bincode-encoded
/// [`Raster`]. A missing file is fatal ([`WorldError::AssetMissing`]);
/// a present but undecodable file is [`WorldError::AssetFormat`].
pub fn load_base_rasters(data_dir: &Path) -> Result<BaseRasters, WorldError> {
    Ok(BaseRasters {
        elevation: load_raster(data_dir, ELEVATION_ASSET)?,
        rainfall: load_raster(data_dir, RAINFALL_ASSET)?,
        lat: load_raster(data_dir, LAT_ASSET)?,
        lon: load_raster(data_dir, LON_ASSET)?,
    })
}

/// Load one bincode raster asset.
fn load_raster(data_dir: &Path, stem: &str) -> Result<Raster, WorldError> {
    let path = data_dir.join(format!("{stem}.bin"));
    if !path.exists() {
        return Err(WorldError::AssetMissing { path });
    }
    let file = File::open(&path)?;
    bincode::deserialize_from(BufReader::new(file)).map_err(|e| WorldError::AssetFormat {
        path,
        message: e.to_string(),
    })
}

/// Synthesize the four base rasters from a seed.
///
/// Elevation and rainfall are fractal Perlin noise normalized to fixed
/// physical ranges; latitude and longitude are linear grids matching the
/// pipeline's pre-projection orientation (south at row 0).
pub fn synthesize_base_rasters(height: usize, width: usize, seed: u64) -> BaseRasters {
    let elevation_noise = Fbm::<Perlin>::new(seed as u32).set_octaves(5);
    let rainfall_noise = Fbm::<Perlin>::new(seed.wrapping_add(1) as u32).set_octaves(4);

    // Raw noise first, then normalize to [0, 1] so the physical scaling
    // below is stable across seeds.
    let raw_elevation = Raster::from_fn(height, width, |y, x| {
        elevation_noise.get([x as f64 * NOISE_SCALE, y as f64 * NOISE_SCALE]) as f32
    });
    let raw_rainfall = Raster::from_fn(height, width, |y, x| {
        rainfall_noise.get([x as f64 * NOISE_SCALE, y as f64 * NOISE_SCALE]) as f32
    });

    // Noise in [0,1] maps to -1500..4500 m, putting roughly the lowest
    // quarter of the range under water and the highest eighth above the
    // mountain threshold.
    let elevation = scale_normalized(&raw_elevation, -1500.0, 4500.0);
    let rainfall = scale_normalized(&raw_rainfall, 0.0, 3000.0);

    let h = height.max(2) as f32;
    let w = width.max(2) as f32;
    let lat = Raster::from_fn(height, width, |y, _| (y as f32 / (h - 1.0)) * 180.0 - 90.0);
    let lon = Raster::from_fn(height, width, |_, x| (x as f32 / (w - 1.0)) * 360.0 - 180.0);

    BaseRasters {
        elevation,
        rainfall,
        lat,
        lon,
    }
}

/// Normalize a raster to `[0, 1]` and rescale into `[lo, hi]`.
fn scale_normalized(raster: &Raster, lo: f32, hi: f32) -> Raster {
    let (min, max) = match raster.min_max() {
        Ok(bounds) => bounds,
        Err(_) => return raster.clone(),
    };
    let span = max - min;
    Raster::from_fn(raster.height(), raster.width(), |y, x| {
        let norm = if span > 0.0 {
            (raster.get(y, x) - min) / span
        } else {
            0.5
        };
        lo + norm * (hi - lo)
    })
}
