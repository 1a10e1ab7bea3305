use bunker_core::constants::{
    CHUNK_SIZE, DIRT_BLOCK_ID, GRASS_BLOCK_ID, LEAVES_BLOCK_ID, LOG_BLOCK_ID, STONE_BLOCK_ID,
};
use serde::{Deserialize, Serialize};

use crate::error::WorldGenError;
use crate::store::WorldDims;

/// Block ids the generation steps write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StandardBlocks {
    pub stone: String,
    pub dirt: String,
    pub grass: String,
    pub log: String,
    pub leaves: String,
}

impl Default for StandardBlocks {
    fn default() -> Self {
        Self {
            stone: STONE_BLOCK_ID.to_string(),
            dirt: DIRT_BLOCK_ID.to_string(),
            grass: GRASS_BLOCK_ID.to_string(),
            log: LOG_BLOCK_ID.to_string(),
            leaves: LEAVES_BLOCK_ID.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaveSettings {
    pub enabled: bool,
    /// Cells whose cave noise is above this value are carved.
    pub threshold: f64,
    pub frequency_multiplier: f64,
    /// Cells within this many blocks of the bottom slice are kept.
    pub floor_margin: i32,
    /// Cells within this many blocks of the surface are kept.
    pub surface_margin: i32,
}

impl Default for CaveSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: 0.6,
            frequency_multiplier: 7.0,
            floor_margin: 5,
            surface_margin: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VegetationSettings {
    pub enabled: bool,
    /// Columns whose eligibility noise exceeds this get vegetation.
    pub eligibility_threshold: f64,
    pub eligibility_frequency_multiplier: f64,
    /// Eligible columns whose density noise exceeds this get a tree.
    pub tree_threshold: f64,
    pub tree_frequency_multiplier: f64,
    /// Minimum spacing between trunks, and minimum distance from the world edge.
    pub tree_radius: i32,
    pub min_trunk_height: i32,
    /// Exclusive.
    pub max_trunk_height: i32,
    /// Leaves fill a cube of this radius centred one block above the trunk.
    pub leaf_radius: i32,
    /// Leaves are placed where |dx| + |dy| + |dz| is at most this.
    pub leaf_manhattan: i32,
}

impl Default for VegetationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            eligibility_threshold: 0.0,
            eligibility_frequency_multiplier: 4.0,
            tree_threshold: 0.0,
            tree_frequency_multiplier: 12.0,
            tree_radius: 5,
            min_trunk_height: 4,
            max_trunk_height: 9,
            leaf_radius: 2,
            leaf_manhattan: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HedgeSettings {
    pub enabled: bool,
    pub count: u32,
    pub min_length: u32,
    /// Exclusive.
    pub max_length: u32,
    /// Chance per step of picking a new direction.
    pub turn_chance: f64,
    /// Walks start at least this far from the world edge.
    pub edge_margin: i32,
}

impl Default for HedgeSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            count: 30,
            min_length: 10,
            max_length: 40,
            turn_chance: 0.3,
            edge_margin: 4,
        }
    }
}

/// Everything the generation pipeline needs besides block data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldGenSettings {
    pub max_x: u32,
    pub max_y: i32,
    pub max_z: u32,
    pub min_elevation: i32,
    pub max_terrain_height: i32,
    pub frequency: f64,
    pub seed: u32,
    /// Blocks of dirt under the surface block before stone begins.
    pub dirt_depth: i32,
    pub surface_variation_threshold: f64,
    pub surface_variation_frequency_multiplier: f64,
    pub blocks: StandardBlocks,
    pub caves: CaveSettings,
    pub vegetation: VegetationSettings,
    pub hedges: HedgeSettings,
}

impl Default for WorldGenSettings {
    fn default() -> Self {
        Self {
            max_x: 64,
            max_y: 48,
            max_z: 64,
            min_elevation: -16,
            max_terrain_height: 24,
            frequency: 0.02,
            seed: 42,
            dirt_depth: 8,
            surface_variation_threshold: 0.4,
            surface_variation_frequency_multiplier: 5.0,
            blocks: StandardBlocks::default(),
            caves: CaveSettings::default(),
            vegetation: VegetationSettings::default(),
            hedges: HedgeSettings::default(),
        }
    }
}

impl WorldGenSettings {
    pub fn from_ron_str(src: &str) -> Result<Self, WorldGenError> {
        ron::Options::default()
            .from_str(src)
            .map_err(|e| WorldGenError::SettingsParseError(e.to_string()))
    }

    /// Settings with the given dimensions and everything else defaulted.
    pub fn with_dims(max_x: u32, max_y: i32, max_z: u32, min_elevation: i32) -> Self {
        Self {
            max_x,
            max_y,
            max_z,
            min_elevation,
            ..Self::default()
        }
    }

    pub fn dims(&self) -> WorldDims {
        WorldDims::new(self.max_x, self.max_y, self.max_z, self.min_elevation)
    }

    /// Check the fatal conditions. Nothing has been written when this fails.
    pub fn validate(&self) -> Result<(), WorldGenError> {
        for (axis, value) in [("X", self.max_x), ("Z", self.max_z)] {
            if value == 0 {
                return Err(WorldGenError::EmptyDimension(axis));
            }
            if value % CHUNK_SIZE != 0 {
                return Err(WorldGenError::NotChunkAligned {
                    axis,
                    value,
                    chunk_size: CHUNK_SIZE,
                });
            }
        }
        if self.min_elevation >= self.max_y {
            return Err(WorldGenError::InvalidElevation {
                min: self.min_elevation,
                max: self.max_y,
            });
        }
        if self.max_terrain_height < 0 {
            return Err(WorldGenError::InvalidSetting(format!(
                "max_terrain_height must not be negative, got {}",
                self.max_terrain_height
            )));
        }
        if !self.frequency.is_finite() || self.frequency <= 0.0 {
            return Err(WorldGenError::InvalidSetting(format!(
                "frequency must be positive, got {}",
                self.frequency
            )));
        }
        let veg = &self.vegetation;
        if veg.min_trunk_height < 1 || veg.max_trunk_height <= veg.min_trunk_height {
            return Err(WorldGenError::InvalidSetting(format!(
                "trunk height range {}..{} is empty",
                veg.min_trunk_height, veg.max_trunk_height
            )));
        }
        let hedges = &self.hedges;
        if hedges.enabled && hedges.max_length <= hedges.min_length {
            return Err(WorldGenError::InvalidSetting(format!(
                "hedge length range {}..{} is empty",
                hedges.min_length, hedges.max_length
            )));
        }
        Ok(())
    }
}
