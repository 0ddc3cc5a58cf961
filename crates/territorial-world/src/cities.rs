//! City name lookup for square naming.
//!
//! Squares are named after the nearest populated city to their spawn
//! coordinates. The table loads from a `world_cities.csv` with at least
//! `city`, `lat`, `lng` and `population` columns (extra columns are
//! ignored); only cities above 100k inhabitants are kept.

use std::path::Path;

use serde::Deserialize;
use tracing::info;

use crate::error::WorldError;

/// Population floor below which cities are dropped from the index.
const MIN_POPULATION: f64 = 100_000.0;

/// One populated city.
#[derive(Debug, Clone, Deserialize)]
pub struct City {
    /// City name.
    pub city: String,
    /// Latitude in degrees.
    pub lat: f64,
    /// Longitude in degrees.
    pub lng: f64,
    /// Population count.
    #[serde(default)]
    pub population: f64,
}

/// Nearest-city index over the filtered city table.
///
/// The table is a few thousand rows after filtering, so queries are a
/// linear scan over squared lat/lng distance.
#[derive(Debug, Clone, Default)]
pub struct CityIndex {
    cities: Vec<City>,
}

impl CityIndex {
    /// An empty index; every lookup returns `None`.
    ///
    /// Used for synthetic worlds shipped without a city table, where the
    /// game falls back to generated names.
    pub const fn empty() -> Self {
        Self { cities: Vec::new() }
    }

    /// Load and filter the city table from a CSV file.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::AssetMissing`] if the file is absent, or
    /// [`WorldError::Cities`] if a row fails to parse.
    pub fn from_csv_path(path: &Path) -> Result<Self, WorldError> {
        if !path.exists() {
            return Err(WorldError::AssetMissing {
                path: path.to_path_buf(),
            });
        }
        let mut reader = csv::Reader::from_path(path)?;
        let mut cities = Vec::new();
        for record in reader.deserialize::<City>() {
            let city = record?;
            if city.population > MIN_POPULATION {
                cities.push(city);
            }
        }
        info!(count = cities.len(), "City index loaded");
        Ok(Self { cities })
    }

    /// Number of indexed cities.
    pub fn len(&self) -> usize {
        self.cities.len()
    }

    /// Whether the index holds no cities.
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// The city closest to `(lat, lon)` by squared degree distance.
    pub fn nearest(&self, lat: f64, lon: f64) -> Option<&City> {
        let mut best: Option<(&City, f64)> = None;
        for city in &self.cities {
            let dy = city.lat - lat;
            let dx = city.lng - lon;
            let dist = dy * dy + dx * dx;
            let closer = best.is_none_or(|(_, d)| dist < d);
            if closer {
                best = Some((city, dist));
            }
        }
        best.map(|(city, _)| city)
    }
}
