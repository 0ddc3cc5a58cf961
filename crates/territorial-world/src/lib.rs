//! World generation for the Territorial simulation.
//!
//! This crate turns four base rasters (elevation, rainfall, latitude,
//! longitude) into everything the simulation kernel reads per cell:
//! biome colors, traversability, livability, and the water / mountain /
//! accessibility masks. Base rasters load from bincode assets on disk or
//! are synthesized from the seed; the derived bundle is cached by
//! `(width, height, seed)` so restarts skip regeneration.

pub mod assets;
pub mod biome;
pub mod cache;
pub mod cities;
pub mod error;
pub mod raster;
pub mod worldmap;

pub use assets::{BaseRasters, load_base_rasters, synthesize_base_rasters};
pub use biome::Biome;
pub use cities::{City, CityIndex};
pub use error::WorldError;
pub use raster::{Mask, Raster};
pub use worldmap::WorldMap;

use std::path::Path;

use tracing::info;

/// Build the world for a game: cache, then assets or synthesis.
///
/// Order of precedence:
/// 1. a cached derived bundle for `(width, height, seed)`,
/// 2. base rasters from `data_dir` when one is configured (a missing
///    file there is fatal),
/// 3. seeded synthetic base rasters.
///
/// The freshly derived bundle is saved back to the cache when a cache
/// directory is configured.
///
/// # Errors
///
/// Returns [`WorldError`] when a configured `data_dir` is missing or
/// holds malformed assets.
pub fn build_world(
    width: usize,
    height: usize,
    seed: u64,
    data_dir: Option<&Path>,
    cache_dir: Option<&Path>,
) -> Result<WorldMap, WorldError> {
    if let Some(dir) = cache_dir
        && let Some(map) = cache::load(dir, width, height, seed)
    {
        info!(width, height, seed, "World map loaded from cache");
        return Ok(map);
    }

    let map = match data_dir {
        Some(dir) => {
            let base = load_base_rasters(dir)?;
            info!(dir = %dir.display(), "Base rasters loaded from assets");
            WorldMap::generate(width, height, seed, &base)
        }
        None => {
            info!(width, height, seed, "Synthesizing base rasters from seed");
            WorldMap::synthetic(width, height, seed)
        }
    };

    if let Some(dir) = cache_dir {
        cache::save(dir, &map);
    }

    Ok(map)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn builds_synthetic_world_without_dirs() {
        let map = build_world(16, 10, 42, None, None).unwrap();
        assert_eq!(map.width, 16);
        assert_eq!(map.height, 10);
    }

    #[test]
    fn missing_data_dir_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let result = build_world(16, 10, 42, Some(dir.path()), None);
        assert!(matches!(result, Err(WorldError::AssetMissing { .. })));
    }

    #[test]
    fn second_build_hits_cache() {
        let dir = tempfile::tempdir().unwrap();
        let first = build_world(16, 10, 42, None, Some(dir.path())).unwrap();
        let second = build_world(16, 10, 42, None, Some(dir.path())).unwrap();
        assert_eq!(first.color_map, second.color_map);
        // The cache file exists after the first build.
        assert!(dir.path().join("worldmap-16x10-42.bin").exists());
    }
}
