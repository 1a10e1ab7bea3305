use std::collections::HashSet;

use bunker_core::block::{BlockDefinition, TextureSlot};
use bunker_core::ore::OreConfig;
use thiserror::Error;

use crate::registry::BlockRegistry;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Block definition has an empty id")]
    EmptyBlockId,
    #[error("Duplicate block id '{0}'")]
    DuplicateBlockId(String),
    #[error("Block '{id}' has an empty {slot:?} texture name")]
    EmptyTextureName { id: String, slot: TextureSlot },
    #[error("Block '{id}' has negative {field} ({value})")]
    NegativeProperty {
        id: String,
        field: &'static str,
        value: f32,
    },
    #[error("Block '{id}' drop '{drop}' has chance {chance} outside [0, 1]")]
    DropChanceOutOfRange {
        id: String,
        drop: String,
        chance: f32,
    },
    #[error("Air definition must not be solid")]
    SolidAir,
    #[error("Ore config has an empty ore block id")]
    EmptyOreId,
    #[error("Ore '{id}' has frequency multiplier {value}, expected > 0")]
    BadFrequencyMultiplier { id: String, value: f64 },
    #[error("Ore '{id}' has inverted {band} band [{min}, {max}]")]
    InvertedBand {
        id: String,
        band: &'static str,
        min: i32,
        max: i32,
    },
    #[error("Ore '{ore}' references unknown block '{block}'")]
    UnknownBlockRef { ore: String, block: String },
}

/// Check a single block definition. Duplicate ids are checked by
/// [`validate_blocks`].
pub fn validate_block(def: &BlockDefinition) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if def.id.trim().is_empty() {
        errors.push(ValidationError::EmptyBlockId);
    }
    if def.is_air() && def.is_solid {
        errors.push(ValidationError::SolidAir);
    }

    if let Some(textures) = &def.textures {
        for slot in [TextureSlot::Top, TextureSlot::Bottom, TextureSlot::Side] {
            if textures.get(slot).trim().is_empty() {
                errors.push(ValidationError::EmptyTextureName {
                    id: def.id.clone(),
                    slot,
                });
            }
        }
    }

    let numeric = [
        ("movement_cost", def.movement_cost),
        ("mining_time", def.mining_time),
        ("hardness", def.hardness),
        ("thermal_conductivity", def.thermal_conductivity),
        ("ignition_temperature", def.ignition_temperature),
    ];
    for (field, value) in numeric {
        if value < 0.0 {
            errors.push(ValidationError::NegativeProperty {
                id: def.id.clone(),
                field,
                value,
            });
        }
    }

    for drop in &def.drops {
        if !(0.0..=1.0).contains(&drop.chance) {
            errors.push(ValidationError::DropChanceOutOfRange {
                id: def.id.clone(),
                drop: drop.block_id.clone(),
                chance: drop.chance,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check a whole definition list, including id uniqueness.
pub fn validate_blocks(defs: &[BlockDefinition]) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mut seen = HashSet::new();
    for def in defs {
        if !seen.insert(def.id.as_str()) {
            errors.push(ValidationError::DuplicateBlockId(def.id.clone()));
        }
        if let Err(mut errs) = validate_block(def) {
            errors.append(&mut errs);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check an ore config, clamping its threshold into [0, 1].
///
/// A clamped threshold is a warning, not an error.
pub fn validate_ore(cfg: &mut OreConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if cfg.ore_block_id.trim().is_empty() {
        errors.push(ValidationError::EmptyOreId);
    }
    if cfg.frequency_multiplier <= 0.0 || !cfg.frequency_multiplier.is_finite() {
        errors.push(ValidationError::BadFrequencyMultiplier {
            id: cfg.ore_block_id.clone(),
            value: cfg.frequency_multiplier,
        });
    }
    if cfg.min_depth > cfg.max_depth {
        errors.push(ValidationError::InvertedBand {
            id: cfg.ore_block_id.clone(),
            band: "depth",
            min: cfg.min_depth,
            max: cfg.max_depth,
        });
    }
    if cfg.min_elevation > cfg.max_elevation {
        errors.push(ValidationError::InvertedBand {
            id: cfg.ore_block_id.clone(),
            band: "elevation",
            min: cfg.min_elevation,
            max: cfg.max_elevation,
        });
    }

    if errors.is_empty() {
        let before = cfg.threshold;
        if cfg.clamp_threshold() {
            log::warn!(
                "Ore '{}': threshold {} clamped to {}",
                cfg.ore_block_id,
                before,
                cfg.threshold
            );
        }
        Ok(())
    } else {
        Err(errors)
    }
}

/// Ore configs whose ore or replace target is not registered.
pub fn validate_ore_references(ores: &[OreConfig], registry: &BlockRegistry) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for ore in ores {
        for block in [&ore.ore_block_id, &ore.replace_block_id] {
            if !registry.has_block(block) {
                errors.push(ValidationError::UnknownBlockRef {
                    ore: ore.ore_block_id.clone(),
                    block: block.clone(),
                });
            }
        }
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use bunker_core::block::{DropEntry, TextureSet};

    #[test]
    fn test_valid_block_passes() {
        let def = BlockDefinition::new("bunker:stone_block").with_textures(TextureSet::uniform("stone"));
        assert!(validate_block(&def).is_ok());
    }

    #[test]
    fn test_empty_id_rejected() {
        let def = BlockDefinition::new("  ");
        let errors = validate_block(&def).expect_err("empty id should fail");
        assert!(errors.contains(&ValidationError::EmptyBlockId));
    }

    #[test]
    fn test_solid_air_rejected() {
        let mut air = BlockDefinition::air();
        air.is_solid = true;
        let errors = validate_block(&air).expect_err("solid air should fail");
        assert_eq!(errors, vec![ValidationError::SolidAir]);
    }

    #[test]
    fn test_empty_texture_and_negative_values() {
        let mut def = BlockDefinition::new("bunker:odd").with_textures(TextureSet {
            top: "a".into(),
            bottom: "".into(),
            side: "c".into(),
        });
        def.hardness = -1.0;
        def.drops.push(DropEntry {
            block_id: "bunker:odd".into(),
            chance: 1.5,
            min_quantity: 1,
            max_quantity: 1,
        });
        let errors = validate_block(&def).expect_err("should fail");
        assert_eq!(errors.len(), 3, "got {:?}", errors);
    }

    #[test]
    fn test_duplicate_ids_detected() {
        let defs = vec![
            BlockDefinition::new("bunker:a"),
            BlockDefinition::new("bunker:b"),
            BlockDefinition::new("bunker:a"),
        ];
        let errors = validate_blocks(&defs).expect_err("duplicate should fail");
        assert_eq!(errors, vec![ValidationError::DuplicateBlockId("bunker:a".into())]);
    }

    #[test]
    fn test_ore_threshold_clamped() {
        let mut cfg = OreConfig::new("bunker:coal_ore_block");
        cfg.threshold = 3.0;
        assert!(validate_ore(&mut cfg).is_ok());
        assert_eq!(cfg.threshold, 1.0);
    }

    #[test]
    fn test_ore_empty_id_rejected() {
        let mut cfg = OreConfig::new("");
        let errors = validate_ore(&mut cfg).expect_err("should fail");
        assert_eq!(errors, vec![ValidationError::EmptyOreId]);
    }

    #[test]
    fn test_ore_inverted_bands_rejected() {
        let mut cfg = OreConfig::new("bunker:iron_ore_block");
        cfg.min_depth = 40;
        cfg.max_depth = 10;
        cfg.frequency_multiplier = 0.0;
        let errors = validate_ore(&mut cfg).expect_err("should fail");
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_ore_references() {
        let registry = BlockRegistry::from_definitions(vec![
            BlockDefinition::air(),
            BlockDefinition::new("bunker:stone_block"),
            BlockDefinition::new("bunker:coal_ore_block"),
        ]);
        let ores = vec![
            OreConfig::new("bunker:coal_ore_block"),
            OreConfig::new("bunker:mithril_ore_block"),
        ];
        let errors = validate_ore_references(&ores, &registry);
        assert_eq!(
            errors,
            vec![ValidationError::UnknownBlockRef {
                ore: "bunker:mithril_ore_block".into(),
                block: "bunker:mithril_ore_block".into(),
            }]
        );
    }
}
