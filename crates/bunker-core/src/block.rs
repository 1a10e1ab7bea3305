use serde::{Deserialize, Serialize};

use crate::constants::{AIR_BLOCK_ID, DEFAULT_MOVEMENT_COST};

/// Texture slot of a block face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureSlot {
    Top,
    Bottom,
    Side,
}

/// Texture names for the three face groups of a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextureSet {
    pub top: String,
    pub bottom: String,
    pub side: String,
}

impl TextureSet {
    /// Same texture on every face.
    pub fn uniform(name: &str) -> Self {
        Self {
            top: name.to_string(),
            bottom: name.to_string(),
            side: name.to_string(),
        }
    }

    pub fn get(&self, slot: TextureSlot) -> &str {
        match slot {
            TextureSlot::Top => &self.top,
            TextureSlot::Bottom => &self.bottom,
            TextureSlot::Side => &self.side,
        }
    }

    pub fn names(&self) -> [&str; 3] {
        [&self.top, &self.bottom, &self.side]
    }
}

/// One row of a drop table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropEntry {
    /// String id of the dropped block or item.
    pub block_id: String,
    /// Probability in [0, 1] that this entry drops at all.
    #[serde(default = "default_chance")]
    pub chance: f32,
    #[serde(default = "default_quantity")]
    pub min_quantity: u32,
    #[serde(default = "default_quantity")]
    pub max_quantity: u32,
}

fn default_chance() -> f32 {
    1.0
}

fn default_quantity() -> u32 {
    1
}

fn default_true() -> bool {
    true
}

fn default_movement_cost() -> f32 {
    DEFAULT_MOVEMENT_COST
}

/// A block type loaded from RON data. Identity is the namespaced `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockDefinition {
    /// Namespaced string id, e.g. `"bunker:stone_block"`.
    pub id: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_true")]
    pub is_solid: bool,
    #[serde(default = "default_true")]
    pub is_mineable: bool,
    #[serde(default)]
    pub is_flammable: bool,
    /// Pathfinding cost for walking across this block.
    #[serde(default = "default_movement_cost")]
    pub movement_cost: f32,
    /// Seconds to mine with bare hands.
    #[serde(default)]
    pub mining_time: f32,
    #[serde(default)]
    pub hardness: f32,
    #[serde(default)]
    pub thermal_conductivity: f32,
    /// Kelvin. Only meaningful when `is_flammable`.
    #[serde(default)]
    pub ignition_temperature: f32,
    /// `None` for blocks that are never drawn (air).
    #[serde(default)]
    pub textures: Option<TextureSet>,
    #[serde(default)]
    pub drops: Vec<DropEntry>,
}

impl BlockDefinition {
    /// Minimal solid definition with every optional field defaulted.
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_string(),
            display_name: String::new(),
            description: String::new(),
            is_solid: true,
            is_mineable: true,
            is_flammable: false,
            movement_cost: DEFAULT_MOVEMENT_COST,
            mining_time: 0.0,
            hardness: 0.0,
            thermal_conductivity: 0.0,
            ignition_temperature: 0.0,
            textures: None,
            drops: Vec::new(),
        }
    }

    /// Built-in air definition used when the data files do not provide one.
    pub fn air() -> Self {
        Self {
            display_name: "Air".to_string(),
            is_solid: false,
            is_mineable: false,
            ..Self::new(AIR_BLOCK_ID)
        }
    }

    pub fn with_textures(mut self, textures: TextureSet) -> Self {
        self.textures = Some(textures);
        self
    }

    pub fn is_air(&self) -> bool {
        self.id == AIR_BLOCK_ID
    }

    /// Whether the mesher should draw this block.
    pub fn is_renderable(&self) -> bool {
        self.textures.is_some()
    }

    pub fn texture(&self, slot: TextureSlot) -> Option<&str> {
        self.textures.as_ref().map(|t| t.get(slot))
    }

    /// Roll this block's drop table. Returns `(block_id, quantity)` pairs.
    pub fn roll_drops(&self, rng: &mut fastrand::Rng) -> Vec<(String, u32)> {
        let mut out = Vec::new();
        for entry in &self.drops {
            if rng.f32() >= entry.chance {
                continue;
            }
            let max = entry.max_quantity.max(entry.min_quantity);
            let quantity = rng.u32(entry.min_quantity..=max);
            if quantity > 0 {
                out.push((entry.block_id.clone(), quantity));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_ron() {
        let src = r#"(id: "bunker:stone_block")"#;
        let def: BlockDefinition = ron::from_str(src).expect("should parse");
        assert!(def.is_solid);
        assert!(def.is_mineable);
        assert!(!def.is_flammable);
        assert_eq!(def.movement_cost, 1.0);
        assert!(def.textures.is_none());
        assert!(def.drops.is_empty());
    }

    #[test]
    fn test_air_definition() {
        let air = BlockDefinition::air();
        assert!(air.is_air());
        assert!(!air.is_solid);
        assert!(!air.is_renderable());
    }

    #[test]
    fn test_texture_lookup() {
        let def = BlockDefinition::new("bunker:grass_block").with_textures(TextureSet {
            top: "grass_top".into(),
            bottom: "dirt".into(),
            side: "grass_side".into(),
        });
        assert!(def.is_renderable());
        assert_eq!(def.texture(TextureSlot::Top), Some("grass_top"));
        assert_eq!(def.texture(TextureSlot::Bottom), Some("dirt"));
        assert_eq!(def.texture(TextureSlot::Side), Some("grass_side"));
    }

    #[test]
    fn test_roll_drops_certain_and_never() {
        let mut def = BlockDefinition::new("bunker:stone_block");
        def.drops = vec![
            DropEntry {
                block_id: "bunker:stone_block".into(),
                chance: 1.0,
                min_quantity: 2,
                max_quantity: 4,
            },
            DropEntry {
                block_id: "bunker:gem".into(),
                chance: 0.0,
                min_quantity: 1,
                max_quantity: 1,
            },
        ];
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..50 {
            let drops = def.roll_drops(&mut rng);
            assert_eq!(drops.len(), 1);
            assert_eq!(drops[0].0, "bunker:stone_block");
            assert!((2..=4).contains(&drops[0].1));
        }
    }

    #[test]
    fn test_roll_drops_inverted_range() {
        let mut def = BlockDefinition::new("bunker:log");
        def.drops = vec![DropEntry {
            block_id: "bunker:log".into(),
            chance: 1.0,
            min_quantity: 3,
            max_quantity: 1,
        }];
        let mut rng = fastrand::Rng::with_seed(1);
        let drops = def.roll_drops(&mut rng);
        assert_eq!(drops, vec![("bunker:log".to_string(), 3)]);
    }
}
