use serde::{Deserialize, Serialize};

use crate::constants::STONE_BLOCK_ID;

/// Placement rule for one ore type.
///
/// Depth is measured downward from the column's surface height: the topmost
/// solid block has depth 1. Elevation is the absolute world Y.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OreConfig {
    pub ore_block_id: String,
    /// Only blocks of this definition are converted.
    #[serde(default = "default_replace")]
    pub replace_block_id: String,
    /// Noise must exceed this value. Clamped to [0, 1] on load.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Multiplies the world frequency for this ore's noise field.
    #[serde(default = "default_frequency_multiplier")]
    pub frequency_multiplier: f64,
    /// Added to the world seed for this ore's noise field.
    #[serde(default = "default_seed_offset")]
    pub seed_offset: u32,
    #[serde(default)]
    pub min_depth: i32,
    #[serde(default = "default_max")]
    pub max_depth: i32,
    #[serde(default = "default_min")]
    pub min_elevation: i32,
    #[serde(default = "default_max")]
    pub max_elevation: i32,
}

fn default_replace() -> String {
    STONE_BLOCK_ID.to_string()
}

fn default_threshold() -> f64 {
    0.5
}

fn default_frequency_multiplier() -> f64 {
    10.0
}

fn default_seed_offset() -> u32 {
    1
}

fn default_min() -> i32 {
    i32::MIN
}

fn default_max() -> i32 {
    i32::MAX
}

impl OreConfig {
    pub fn new(ore_block_id: &str) -> Self {
        Self {
            ore_block_id: ore_block_id.to_string(),
            replace_block_id: default_replace(),
            threshold: default_threshold(),
            frequency_multiplier: default_frequency_multiplier(),
            seed_offset: default_seed_offset(),
            min_depth: 0,
            max_depth: default_max(),
            min_elevation: default_min(),
            max_elevation: default_max(),
        }
    }

    /// Seed of this ore's noise field.
    pub fn seed_for(&self, world_seed: u32) -> u32 {
        world_seed.wrapping_add(self.seed_offset)
    }

    /// Whether a block at elevation `y` in a column whose surface is `surface`
    /// lies inside both configured bands.
    pub fn in_band(&self, y: i32, surface: i32) -> bool {
        if y < self.min_elevation || y > self.max_elevation {
            return false;
        }
        let depth = surface.saturating_sub(y);
        depth >= self.min_depth && depth <= self.max_depth
    }

    /// Clamp `threshold` into [0, 1]. Returns true if it changed.
    pub fn clamp_threshold(&mut self) -> bool {
        let clamped = if self.threshold.is_nan() {
            default_threshold()
        } else {
            self.threshold.clamp(0.0, 1.0)
        };
        let changed = clamped != self.threshold || self.threshold.is_nan();
        self.threshold = clamped;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_ron() {
        let cfg: OreConfig =
            ron::from_str(r#"(ore_block_id: "bunker:coal_ore_block")"#).expect("should parse");
        assert_eq!(cfg.replace_block_id, STONE_BLOCK_ID);
        assert_eq!(cfg.threshold, 0.5);
        assert_eq!(cfg.frequency_multiplier, 10.0);
        assert_eq!(cfg.seed_offset, 1);
        assert_eq!(cfg.max_depth, i32::MAX);
    }

    #[test]
    fn test_depth_band_excludes_deep_blocks() {
        let mut cfg = OreConfig::new("bunker:coal_ore_block");
        cfg.min_depth = 0;
        cfg.max_depth = 30;
        assert!(cfg.in_band(20, 30));
        assert!(cfg.in_band(0, 30));
        assert!(!cfg.in_band(-10, 30), "depth 40 is outside 0..=30");
    }

    #[test]
    fn test_elevation_band() {
        let mut cfg = OreConfig::new("bunker:iron_ore_block");
        cfg.min_elevation = -32;
        cfg.max_elevation = 50;
        assert!(cfg.in_band(-32, 60));
        assert!(cfg.in_band(50, 60));
        assert!(!cfg.in_band(51, 60));
        assert!(!cfg.in_band(-33, 60));
    }

    #[test]
    fn test_clamp_threshold() {
        let mut cfg = OreConfig::new("x");
        cfg.threshold = 1.7;
        assert!(cfg.clamp_threshold());
        assert_eq!(cfg.threshold, 1.0);
        cfg.threshold = -0.2;
        assert!(cfg.clamp_threshold());
        assert_eq!(cfg.threshold, 0.0);
        cfg.threshold = 0.4;
        assert!(!cfg.clamp_threshold());
        cfg.threshold = f64::NAN;
        assert!(cfg.clamp_threshold());
        assert_eq!(cfg.threshold, 0.5);
    }

    #[test]
    fn test_seed_wraps() {
        let mut cfg = OreConfig::new("x");
        cfg.seed_offset = 3;
        assert_eq!(cfg.seed_for(u32::MAX), 2);
    }
}
