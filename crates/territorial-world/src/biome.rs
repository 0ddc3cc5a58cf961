//! Biome classification from (temperature, rainfall, elevation).
//!
//! Thirteen biomes, each with half-open threshold intervals over the
//! three inputs. Classification walks the declared order and takes the
//! first biome whose three intervals all contain the cell; ocean
//! short-circuits on non-positive elevation and a fallback chain catches
//! cells no interval set claims.

use serde::{Deserialize, Serialize};
use territorial_types::Rgba;

/// Discrete biome classification of a land or ocean cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Biome {
    /// Open water (elevation at or below sea level).
    Ocean,
    /// Permanent ice sheet.
    Ice,
    /// Cold, treeless plain.
    Tundra,
    /// Cold desert (dry, wide temperature band).
    ColdDesert,
    /// Boreal conifer forest.
    Taiga,
    /// Mid-latitude grassland.
    TemperateGrassland,
    /// Mid-latitude broadleaf forest.
    TemperateForest,
    /// Wet coastal mid-latitude forest.
    TemperateRainforest,
    /// Hot grassland with a dry season.
    TropicalSavanna,
    /// Hot seasonal forest.
    TropicalForest,
    /// Hot evergreen rainforest.
    TropicalRainforest,
    /// Hot desert.
    HotDesert,
    /// High terrain above the treeline.
    Mountain,
}

/// Half-open interval `[lo, hi)`.
#[derive(Debug, Clone, Copy)]
struct Band {
    lo: f32,
    hi: f32,
}

impl Band {
    const fn new(lo: f32, hi: f32) -> Self {
        Self { lo, hi }
    }

    fn contains(self, v: f32) -> bool {
        v >= self.lo && v < self.hi
    }
}

/// One row of the classification table: a biome plus its three bands.
struct Rule {
    biome: Biome,
    temp: Band,
    rain: Band,
    elev: Band,
}

const NO_TEMP_LIMIT: Band = Band::new(f32::MIN, f32::MAX);
const ANY_RAIN: Band = Band::new(0.0, f32::MAX);
const LOWLAND: Band = Band::new(0.0, 3000.0);

/// Elevation (meters) at or above which terrain is mountain.
pub const MOUNTAIN_ELEVATION: f32 = 3000.0;

/// Elevation (meters) above which land stops being accessible to spawns.
pub const ACCESSIBLE_ELEVATION: f32 = 2000.0;

/// The classification table, in declared priority order.
///
/// Intervals are over temperature (deg C), rainfall (mm/yr) and elevation
/// (m). Non-mountain rules stop below [`MOUNTAIN_ELEVATION`] so peaks fall
/// through to the mountain rule at the end.
const RULES: [Rule; 12] = [
    Rule {
        biome: Biome::Ice,
        temp: Band::new(f32::MIN, -10.0),
        rain: ANY_RAIN,
        elev: LOWLAND,
    },
    Rule {
        biome: Biome::Tundra,
        temp: Band::new(-10.0, 0.0),
        rain: Band::new(250.0, f32::MAX),
        elev: LOWLAND,
    },
    Rule {
        biome: Biome::ColdDesert,
        temp: Band::new(-10.0, 20.0),
        rain: Band::new(0.0, 250.0),
        elev: LOWLAND,
    },
    Rule {
        biome: Biome::Taiga,
        temp: Band::new(0.0, 7.0),
        rain: Band::new(250.0, f32::MAX),
        elev: LOWLAND,
    },
    Rule {
        biome: Biome::TemperateGrassland,
        temp: Band::new(7.0, 20.0),
        rain: Band::new(250.0, 600.0),
        elev: LOWLAND,
    },
    Rule {
        biome: Biome::TemperateForest,
        temp: Band::new(7.0, 20.0),
        rain: Band::new(600.0, 1200.0),
        elev: LOWLAND,
    },
    Rule {
        biome: Biome::TemperateRainforest,
        temp: Band::new(7.0, 20.0),
        rain: Band::new(1200.0, f32::MAX),
        elev: LOWLAND,
    },
    Rule {
        biome: Biome::TropicalSavanna,
        temp: Band::new(20.0, f32::MAX),
        rain: Band::new(250.0, 1000.0),
        elev: LOWLAND,
    },
    Rule {
        biome: Biome::TropicalForest,
        temp: Band::new(20.0, f32::MAX),
        rain: Band::new(1000.0, 2000.0),
        elev: LOWLAND,
    },
    Rule {
        biome: Biome::TropicalRainforest,
        temp: Band::new(20.0, f32::MAX),
        rain: Band::new(2000.0, f32::MAX),
        elev: LOWLAND,
    },
    Rule {
        biome: Biome::HotDesert,
        temp: Band::new(20.0, f32::MAX),
        rain: Band::new(0.0, 250.0),
        elev: LOWLAND,
    },
    Rule {
        biome: Biome::Mountain,
        temp: NO_TEMP_LIMIT,
        rain: ANY_RAIN,
        elev: Band::new(MOUNTAIN_ELEVATION, f32::MAX),
    },
];

impl Biome {
    /// Classify a cell from temperature (deg C), rainfall (mm/yr) and
    /// elevation (m).
    pub fn classify(temp: f32, rain: f32, elev: f32) -> Self {
        if elev <= 0.0 {
            return Self::Ocean;
        }
        for rule in &RULES {
            if rule.temp.contains(temp) && rule.rain.contains(rain) && rule.elev.contains(elev) {
                return rule.biome;
            }
        }
        // Fallback chain for cells no interval set claims.
        if elev >= MOUNTAIN_ELEVATION {
            Self::Mountain
        } else if temp < -10.0 {
            Self::Ice
        } else if temp < 20.0 {
            Self::ColdDesert
        } else {
            Self::HotDesert
        }
    }

    /// Base render color (before elevation shading).
    pub const fn color(self) -> Rgba {
        match self {
            Self::Ocean => Rgba::new(10, 40, 120, 255),
            Self::Ice => Rgba::new(235, 240, 250, 255),
            Self::Tundra => Rgba::new(150, 160, 140, 255),
            Self::ColdDesert => Rgba::new(190, 180, 150, 255),
            Self::Taiga => Rgba::new(30, 90, 60, 255),
            Self::TemperateGrassland => Rgba::new(110, 160, 70, 255),
            Self::TemperateForest => Rgba::new(40, 120, 50, 255),
            Self::TemperateRainforest => Rgba::new(20, 100, 60, 255),
            Self::TropicalSavanna => Rgba::new(180, 170, 80, 255),
            Self::TropicalForest => Rgba::new(30, 130, 40, 255),
            Self::TropicalRainforest => Rgba::new(10, 110, 30, 255),
            Self::HotDesert => Rgba::new(230, 200, 120, 255),
            Self::Mountain => Rgba::new(130, 125, 120, 255),
        }
    }

    /// How cheap the biome is to cross, in `[0, 1]` (higher is easier).
    pub const fn traversability(self) -> f32 {
        match self {
            Self::Ocean => 0.0,
            Self::Ice => 0.2,
            Self::Tundra => 0.5,
            Self::ColdDesert => 0.6,
            Self::Taiga => 0.55,
            Self::TemperateGrassland => 0.9,
            Self::TemperateForest => 0.7,
            Self::TemperateRainforest => 0.55,
            Self::TropicalSavanna => 0.85,
            Self::TropicalForest => 0.6,
            Self::TropicalRainforest => 0.4,
            Self::HotDesert => 0.65,
            Self::Mountain => 0.1,
        }
    }

    /// How much value the biome yields per owned cell, in `[0, 1]`.
    pub const fn livability(self) -> f32 {
        match self {
            Self::Ocean => 0.0,
            Self::Ice => 0.05,
            Self::Tundra => 0.2,
            Self::ColdDesert => 0.25,
            Self::Taiga => 0.45,
            Self::TemperateGrassland => 0.9,
            Self::TemperateForest => 0.85,
            Self::TemperateRainforest => 0.75,
            Self::TropicalSavanna => 0.65,
            Self::TropicalForest => 0.7,
            Self::TropicalRainforest => 0.6,
            Self::HotDesert => 0.15,
            Self::Mountain => 0.05,
        }
    }
}
