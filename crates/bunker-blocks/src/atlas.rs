//! Texture atlas packing.
//!
//! Tiles are laid out row-major on a square grid in sorted texture-name
//! order. Every tile is surrounded by `padding` pixels copied from its own
//! edge so bilinear sampling never reads a neighbouring tile.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use image::imageops::{self, FilterType};
use image::RgbaImage;
use thiserror::Error;

use crate::registry::BlockRegistry;

/// Padding in pixels on each side of a tile.
pub const DEFAULT_PADDING: u32 = 2;

#[derive(Debug, Error)]
pub enum AtlasError {
    #[error("Texture '{0}' has zero size")]
    ZeroTileSize(String),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Normalized texture rectangle inside the atlas. `v` is measured from the
/// top row of the atlas image.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UvRect {
    pub u: f32,
    pub v: f32,
    pub width: f32,
    pub height: f32,
}

impl UvRect {
    /// Returned for textures that are not in the atlas.
    pub const ZERO: UvRect = UvRect {
        u: 0.0,
        v: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub fn is_zero(&self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }

    /// Strict interior overlap. Rects that only share an edge do not overlap.
    pub fn overlaps(&self, other: &UvRect) -> bool {
        self.u < other.u + other.width
            && other.u < self.u + self.width
            && self.v < other.v + other.height
            && other.v < self.v + self.height
    }

    /// Quad corner UVs in the order the mesher emits vertices:
    /// (min, min), (min, max), (max, max), (max, min).
    pub fn corners(&self) -> [[f32; 2]; 4] {
        let (u0, v0) = (self.u, self.v);
        let (u1, v1) = (self.u + self.width, self.v + self.height);
        [[u0, v0], [u0, v1], [u1, v1], [u1, v0]]
    }
}

/// Packed atlas image plus the UV rect of every texture in it.
#[derive(Debug, Clone)]
pub struct TextureAtlas {
    image: RgbaImage,
    rects: HashMap<String, UvRect>,
    tile_size: u32,
    padding: u32,
    tiles_per_row: u32,
}

impl TextureAtlas {
    /// Atlas with no textures. Every lookup yields [`UvRect::ZERO`].
    pub fn empty() -> Self {
        Self {
            image: RgbaImage::new(1, 1),
            rects: HashMap::new(),
            tile_size: 0,
            padding: 0,
            tiles_per_row: 0,
        }
    }

    /// Pack named textures. The tile size is the width of the first texture
    /// in name order; other sizes are resized to it with a warning.
    pub fn build(textures: &BTreeMap<String, RgbaImage>, padding: u32) -> Result<Self, AtlasError> {
        let Some((first_name, first)) = textures.iter().next() else {
            log::warn!("No textures to pack, atlas is empty");
            return Ok(Self::empty());
        };
        let tile_size = first.width();
        if tile_size == 0 || first.height() == 0 {
            return Err(AtlasError::ZeroTileSize(first_name.clone()));
        }

        let count = textures.len() as u32;
        let tiles_per_row = (count as f64).sqrt().ceil() as u32;
        let cell = tile_size + 2 * padding;
        let atlas_size = tiles_per_row * cell;
        let mut image = RgbaImage::new(atlas_size, atlas_size);
        let mut rects = HashMap::with_capacity(textures.len());

        for (i, (name, texture)) in textures.iter().enumerate() {
            let i = i as u32;
            let origin_x = (i % tiles_per_row) * cell;
            let origin_y = (i / tiles_per_row) * cell;

            let resized;
            let tile = if texture.width() != tile_size || texture.height() != tile_size {
                log::warn!(
                    "Texture '{}' is {}x{}, resizing to {}x{}",
                    name,
                    texture.width(),
                    texture.height(),
                    tile_size,
                    tile_size
                );
                resized = imageops::resize(texture, tile_size, tile_size, FilterType::Nearest);
                &resized
            } else {
                texture
            };

            blit_padded(&mut image, tile, origin_x, origin_y, padding);

            let scale = atlas_size as f32;
            rects.insert(
                name.clone(),
                UvRect {
                    u: (origin_x + padding) as f32 / scale,
                    v: (origin_y + padding) as f32 / scale,
                    width: tile_size as f32 / scale,
                    height: tile_size as f32 / scale,
                },
            );
        }

        log::info!(
            "Packed {} textures into a {}x{} atlas ({} px tiles)",
            count,
            atlas_size,
            atlas_size,
            tile_size
        );

        Ok(Self {
            image,
            rects,
            tile_size,
            padding,
            tiles_per_row,
        })
    }

    /// Load every texture the registry references from `dir` and pack them.
    /// Missing or unreadable textures are logged and left out.
    pub fn from_registry(registry: &BlockRegistry, dir: &Path) -> Result<Self, AtlasError> {
        let names = registry.texture_names();
        let textures = load_textures(dir, names.iter().map(String::as_str));
        Self::build(&textures, DEFAULT_PADDING)
    }

    /// UV rect of a texture, or [`UvRect::ZERO`] if it was not packed.
    pub fn uv(&self, name: &str) -> UvRect {
        self.rects.get(name).copied().unwrap_or(UvRect::ZERO)
    }

    pub fn get(&self, name: &str) -> Option<UvRect> {
        self.rects.get(name).copied()
    }

    pub fn rects(&self) -> impl Iterator<Item = (&str, &UvRect)> {
        self.rects.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn size(&self) -> u32 {
        self.image.width()
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn padding(&self) -> u32 {
        self.padding
    }

    pub fn tiles_per_row(&self) -> u32 {
        self.tiles_per_row
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    pub fn save_png(&self, path: &Path) -> Result<(), AtlasError> {
        self.image.save(path)?;
        Ok(())
    }
}

/// Copy `tile` into `atlas` at the cell origin, extending its edge pixels
/// outward by `padding`.
fn blit_padded(atlas: &mut RgbaImage, tile: &RgbaImage, origin_x: u32, origin_y: u32, padding: u32) {
    let size = tile.width();
    let cell = size + 2 * padding;
    for py in 0..cell {
        let sy = py.saturating_sub(padding).min(size - 1);
        for px in 0..cell {
            let sx = px.saturating_sub(padding).min(size - 1);
            atlas.put_pixel(origin_x + px, origin_y + py, *tile.get_pixel(sx, sy));
        }
    }
}

/// Read `<dir>/<name>.png` for every name. Failures are logged and skipped.
pub fn load_textures<'a>(dir: &Path, names: impl IntoIterator<Item = &'a str>) -> BTreeMap<String, RgbaImage> {
    let mut out = BTreeMap::new();
    for name in names {
        let path = dir.join(format!("{}.png", name));
        if !path.is_file() {
            log::warn!("Texture '{}' not found at {}, skipping", name, path.display());
            continue;
        }
        match image::open(&path) {
            Ok(img) => {
                out.insert(name.to_string(), img.to_rgba8());
            }
            Err(e) => log::warn!("Texture '{}' failed to load: {}", name, e),
        }
    }
    out
}
