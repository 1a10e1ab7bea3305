use bunker_blocks::{BlockRegistry, TextureAtlas, UvRect};
use bunker_core::block::TextureSlot;
use bunker_core::face::Face;
use bunker_core::types::BlockId;

const SLOTS: [TextureSlot; 3] = [TextureSlot::Top, TextureSlot::Bottom, TextureSlot::Side];

fn slot_index(slot: TextureSlot) -> usize {
    match slot {
        TextureSlot::Top => 0,
        TextureSlot::Bottom => 1,
        TextureSlot::Side => 2,
    }
}

/// Atlas rects per numeric block id and texture slot, resolved once so the
/// mesher never does a string lookup per face.
#[derive(Debug, Clone, Default)]
pub struct BlockUvTable {
    rects: Vec<[UvRect; 3]>,
}

impl BlockUvTable {
    pub fn build(registry: &BlockRegistry, atlas: &TextureAtlas) -> Self {
        let mut missing = 0usize;
        let rects = registry
            .iter()
            .map(|(_, def)| {
                SLOTS.map(|slot| match def.texture(slot) {
                    Some(name) => {
                        let rect = atlas.uv(name);
                        if rect.is_zero() {
                            missing += 1;
                        }
                        rect
                    }
                    None => UvRect::ZERO,
                })
            })
            .collect();
        if missing > 0 {
            log::warn!("{} block texture slots have no atlas entry and will render untextured", missing);
        }
        Self { rects }
    }

    pub fn get(&self, block: BlockId, slot: TextureSlot) -> UvRect {
        self.rects
            .get(block.index())
            .map(|r| r[slot_index(slot)])
            .unwrap_or(UvRect::ZERO)
    }

    pub fn for_face(&self, block: BlockId, face: Face) -> UvRect {
        self.get(block, face.texture_slot())
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bunker_core::block::{BlockDefinition, TextureSet};
    use image::{Rgba, RgbaImage};
    use std::collections::BTreeMap;

    #[test]
    fn test_slots_resolve_per_face() {
        let registry = BlockRegistry::from_definitions(vec![
            BlockDefinition::air(),
            BlockDefinition::new("bunker:grass_block").with_textures(TextureSet {
                top: "grass_top".into(),
                bottom: "dirt".into(),
                side: "grass_side".into(),
            }),
            BlockDefinition::new("bunker:ghost_block").with_textures(TextureSet::uniform("missing")),
        ]);
        let textures: BTreeMap<String, RgbaImage> = ["dirt", "grass_side", "grass_top"]
            .into_iter()
            .map(|n| (n.to_string(), RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 255]))))
            .collect();
        let atlas = TextureAtlas::build(&textures, 1).expect("atlas");
        let table = BlockUvTable::build(&registry, &atlas);

        let grass = registry.numeric_of("bunker:grass_block");
        assert_eq!(table.for_face(grass, Face::Up), atlas.uv("grass_top"));
        assert_eq!(table.for_face(grass, Face::Down), atlas.uv("dirt"));
        assert_eq!(table.for_face(grass, Face::East), atlas.uv("grass_side"));
        assert!(table.for_face(BlockId::AIR, Face::Up).is_zero());

        let ghost = registry.numeric_of("bunker:ghost_block");
        assert!(table.for_face(ghost, Face::North).is_zero());
        assert!(table.for_face(BlockId(999), Face::Up).is_zero());
    }
}
