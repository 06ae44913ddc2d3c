//! Biome tags.
//!
//! A plot world paints every column with one configured biome. The tag is
//! carried through the generator untouched, so the core only needs a stable
//! identifier with a numeric form for chunk payloads and a string form for
//! settings files.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Stable identifier for a column biome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum BiomeId {
    /// Open grassland.
    Plains = 0,
    /// Temperate forest.
    Forest = 1,
    /// Sand desert.
    Desert = 2,
    /// Cold conifer forest.
    Taiga = 3,
    /// Wetland.
    Swamp = 4,
    /// Dense tropical forest.
    Jungle = 5,
    /// Dry grassland.
    Savanna = 6,
    /// Mushroom fields.
    Mushroom = 7,
    /// Open water.
    Ocean = 8,
    /// Empty void.
    Void = 9,
}

/// Error returned when a biome key is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown biome `{0}`")]
pub struct UnknownBiome(pub String);

impl BiomeId {
    /// Biome used when settings do not name one.
    pub const DEFAULT: Self = Self::Forest;

    /// Every biome, in numeric order.
    pub const ALL: [Self; 10] = [
        Self::Plains,
        Self::Forest,
        Self::Desert,
        Self::Taiga,
        Self::Swamp,
        Self::Jungle,
        Self::Savanna,
        Self::Mushroom,
        Self::Ocean,
        Self::Void,
    ];

    /// Convert to a stable numeric representation.
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Try to convert from the stable numeric representation.
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Plains),
            1 => Some(Self::Forest),
            2 => Some(Self::Desert),
            3 => Some(Self::Taiga),
            4 => Some(Self::Swamp),
            5 => Some(Self::Jungle),
            6 => Some(Self::Savanna),
            7 => Some(Self::Mushroom),
            8 => Some(Self::Ocean),
            9 => Some(Self::Void),
            _ => None,
        }
    }

    /// Canonical string key used in configs/logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plains => "plains",
            Self::Forest => "forest",
            Self::Desert => "desert",
            Self::Taiga => "taiga",
            Self::Swamp => "swamp",
            Self::Jungle => "jungle",
            Self::Savanna => "savanna",
            Self::Mushroom => "mushroom",
            Self::Ocean => "ocean",
            Self::Void => "void",
        }
    }
}

impl Default for BiomeId {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for BiomeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BiomeId {
    type Err = UnknownBiome;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|biome| biome.as_str() == key)
            .ok_or_else(|| UnknownBiome(s.to_string()))
    }
}
