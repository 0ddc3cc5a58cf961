//! On-disk cache of derived world maps.
//!
//! Generating a full-size world is the most expensive part of startup,
//! so the derived bundle is persisted keyed by `(width, height, seed)`.
//! Cache faults are never fatal: a failed load logs a warning and falls
//! through to regeneration, and a failed save logs and is ignored.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::worldmap::WorldMap;

/// Cache file path for a `(width, height, seed)` key.
fn cache_path(cache_dir: &Path, width: usize, height: usize, seed: u64) -> PathBuf {
    cache_dir.join(format!("worldmap-{width}x{height}-{seed}.bin"))
}

/// Try to load a cached world map for the given key.
///
/// Returns `None` (after logging) on any miss or decode failure.
pub fn load(cache_dir: &Path, width: usize, height: usize, seed: u64) -> Option<WorldMap> {
    let path = cache_path(cache_dir, width, height, seed);
    if !path.exists() {
        debug!(path = %path.display(), "World map cache miss");
        return None;
    }
    let file = match File::open(&path) {
        Ok(f) => f,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "World map cache unreadable, regenerating");
            return None;
        }
    };
    match bincode::deserialize_from::<_, WorldMap>(BufReader::new(file)) {
        Ok(map) if map.width == width && map.height == height && map.seed == seed => {
            debug!(path = %path.display(), "World map cache hit");
            Some(map)
        }
        Ok(_) => {
            warn!(path = %path.display(), "World map cache key mismatch, regenerating");
            None
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "World map cache corrupt, regenerating");
            None
        }
    }
}

/// Persist a derived world map under its key.
///
/// Failures are logged and swallowed; the simulation runs fine without a
/// cache, the next start just pays generation again.
pub fn save(cache_dir: &Path, map: &WorldMap) {
    if let Err(e) = std::fs::create_dir_all(cache_dir) {
        warn!(dir = %cache_dir.display(), error = %e, "Cannot create cache dir, skipping save");
        return;
    }
    let path = cache_path(cache_dir, map.width, map.height, map.seed);
    let file = match File::create(&path) {
        Ok(f) => f,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Cannot create cache file, skipping save");
            return;
        }
    };
    if let Err(e) = bincode::serialize_into(BufWriter::new(file), map) {
        warn!(path = %path.display(), error = %e, "World map cache save failed");
    }
}
