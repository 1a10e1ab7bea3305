use std::collections::{BTreeSet, HashMap, HashSet};

use bunker_core::block::BlockDefinition;
use bunker_core::constants::{AIR_BLOCK_ID, DEFAULT_MOVEMENT_COST, UNKNOWN_BLOCK_NAME};
use bunker_core::types::BlockId;

/// All block definitions of one load, indexed by dense numeric id.
///
/// Numeric ids are assigned once: the air definition gets 0, every other
/// definition gets the next id in load order starting at 1. Ids are only
/// stable for the lifetime of the registry.
#[derive(Debug, Clone)]
pub struct BlockRegistry {
    definitions: Vec<BlockDefinition>,
    by_id: HashMap<String, BlockId>,
    /// Solidity per numeric id, read on every mesher neighbour lookup.
    solid: Vec<bool>,
}

impl BlockRegistry {
    /// Build a registry from definitions in load order. Duplicate string ids
    /// are logged and skipped (first wins). If no air definition is present
    /// a built-in one is registered.
    pub fn from_definitions(defs: impl IntoIterator<Item = BlockDefinition>) -> Self {
        let mut air: Option<BlockDefinition> = None;
        let mut others: Vec<BlockDefinition> = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for def in defs {
            if !seen.insert(def.id.clone()) {
                log::warn!("Duplicate block ID found: '{}', keeping first", def.id);
                continue;
            }
            if def.is_air() {
                air = Some(def);
            } else {
                others.push(def);
            }
        }

        let air = air.unwrap_or_else(|| {
            log::warn!("No '{}' definition loaded, using built-in air", AIR_BLOCK_ID);
            BlockDefinition::air()
        });

        let max_blocks = u16::MAX as usize;
        if others.len() >= max_blocks {
            log::warn!(
                "{} block definitions exceed the id space, dropping {}",
                others.len() + 1,
                others.len() + 1 - max_blocks
            );
            others.truncate(max_blocks - 1);
        }

        let mut definitions = Vec::with_capacity(others.len() + 1);
        definitions.push(air);
        definitions.extend(others);

        let by_id = definitions
            .iter()
            .enumerate()
            .map(|(i, def)| (def.id.clone(), BlockId(i as u16)))
            .collect();
        let solid = definitions.iter().map(|d| d.is_solid).collect();

        log::info!("Block registry built with {} definitions", definitions.len());

        Self {
            definitions,
            by_id,
            solid,
        }
    }

    pub fn get_by_string(&self, id: &str) -> Option<&BlockDefinition> {
        self.by_id.get(id).map(|n| &self.definitions[n.index()])
    }

    pub fn get_by_numeric(&self, id: BlockId) -> Option<&BlockDefinition> {
        self.definitions.get(id.index())
    }

    /// Numeric id for a string id, or air (0) with a warning if unknown.
    pub fn numeric_of(&self, id: &str) -> BlockId {
        match self.by_id.get(id) {
            Some(n) => *n,
            None => {
                log::warn!("Unknown block id '{}', using air", id);
                BlockId::AIR
            }
        }
    }

    /// Numeric id for a string id without the unknown-id warning.
    pub fn lookup(&self, id: &str) -> Option<BlockId> {
        self.by_id.get(id).copied()
    }

    /// String id for a numeric id, or `"unknown"`.
    pub fn string_of(&self, id: BlockId) -> &str {
        self.definitions
            .get(id.index())
            .map(|d| d.id.as_str())
            .unwrap_or(UNKNOWN_BLOCK_NAME)
    }

    /// Definition for a numeric id, falling back to air with a warning.
    pub fn resolve(&self, id: BlockId) -> &BlockDefinition {
        match self.definitions.get(id.index()) {
            Some(def) => def,
            None => {
                log::warn!("Unknown numeric block id {}, using air", id.0);
                self.air()
            }
        }
    }

    pub fn air(&self) -> &BlockDefinition {
        &self.definitions[0]
    }

    pub fn is_solid(&self, id: BlockId) -> bool {
        self.solid.get(id.index()).copied().unwrap_or(false)
    }

    pub fn has_block(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Pathfinding cost of a block, 1 for unknown ids.
    pub fn movement_cost(&self, id: &str) -> f32 {
        self.get_by_string(id)
            .map(|d| d.movement_cost)
            .unwrap_or(DEFAULT_MOVEMENT_COST)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Definitions in numeric id order.
    pub fn iter(&self) -> impl Iterator<Item = (BlockId, &BlockDefinition)> {
        self.definitions
            .iter()
            .enumerate()
            .map(|(i, d)| (BlockId(i as u16), d))
    }

    /// Every texture name referenced by a renderable definition, sorted.
    pub fn texture_names(&self) -> BTreeSet<String> {
        self.definitions
            .iter()
            .filter_map(|d| d.textures.as_ref())
            .flat_map(|t| t.names())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bunker_core::block::TextureSet;

    fn sample() -> BlockRegistry {
        BlockRegistry::from_definitions(vec![
            BlockDefinition::new("bunker:stone_block").with_textures(TextureSet::uniform("stone")),
            BlockDefinition::air(),
            BlockDefinition::new("bunker:dirt_block").with_textures(TextureSet::uniform("dirt")),
            BlockDefinition::new("bunker:grass_block").with_textures(TextureSet {
                top: "grass_top".into(),
                bottom: "dirt".into(),
                side: "grass_side".into(),
            }),
        ])
    }

    #[test]
    fn test_air_gets_zero_others_in_load_order() {
        let reg = sample();
        assert_eq!(reg.numeric_of(AIR_BLOCK_ID), BlockId::AIR);
        assert_eq!(reg.numeric_of("bunker:stone_block"), BlockId(1));
        assert_eq!(reg.numeric_of("bunker:dirt_block"), BlockId(2));
        assert_eq!(reg.numeric_of("bunker:grass_block"), BlockId(3));
        assert_eq!(reg.len(), 4);
    }

    #[test]
    fn test_numeric_id_bijection() {
        let reg = sample();
        for (n, def) in reg.iter() {
            assert_eq!(reg.numeric_of(reg.string_of(n)), n);
            assert_eq!(reg.string_of(reg.numeric_of(&def.id)), def.id);
        }
    }

    #[test]
    fn test_duplicate_keeps_first() {
        let mut second = BlockDefinition::new("bunker:stone_block");
        second.hardness = 99.0;
        let reg = BlockRegistry::from_definitions(vec![
            BlockDefinition::air(),
            BlockDefinition::new("bunker:stone_block"),
            second,
        ]);
        assert_eq!(reg.len(), 2);
        let stone = reg.get_by_string("bunker:stone_block").expect("stone registered");
        assert_eq!(stone.hardness, 0.0);
    }

    #[test]
    fn test_missing_air_is_synthesized() {
        let reg = BlockRegistry::from_definitions(vec![BlockDefinition::new("bunker:stone_block")]);
        assert!(reg.air().is_air());
        assert!(!reg.is_solid(BlockId::AIR));
        assert_eq!(reg.numeric_of("bunker:stone_block"), BlockId(1));
    }

    #[test]
    fn test_unknown_lookups_fall_back() {
        let reg = sample();
        assert_eq!(reg.numeric_of("bunker:nope"), BlockId::AIR);
        assert_eq!(reg.string_of(BlockId(400)), UNKNOWN_BLOCK_NAME);
        assert!(reg.resolve(BlockId(400)).is_air());
        assert!(reg.get_by_numeric(BlockId(400)).is_none());
        assert!(reg.get_by_string("bunker:nope").is_none());
        assert!(reg.lookup("bunker:nope").is_none());
        assert!(!reg.is_solid(BlockId(400)));
    }

    #[test]
    fn test_solidity_cache() {
        let reg = sample();
        assert!(!reg.is_solid(BlockId::AIR));
        assert!(reg.is_solid(reg.numeric_of("bunker:stone_block")));
    }

    #[test]
    fn test_movement_cost_default() {
        let mut mud = BlockDefinition::new("bunker:mud");
        mud.movement_cost = 3.5;
        let reg = BlockRegistry::from_definitions(vec![BlockDefinition::air(), mud]);
        assert_eq!(reg.movement_cost("bunker:mud"), 3.5);
        assert_eq!(reg.movement_cost("bunker:missing"), 1.0);
    }

    #[test]
    fn test_texture_names_unique_sorted() {
        let reg = sample();
        let names: Vec<String> = reg.texture_names().into_iter().collect();
        assert_eq!(names, vec!["dirt", "grass_side", "grass_top", "stone"]);
    }
}
