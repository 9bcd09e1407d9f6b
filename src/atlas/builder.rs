use anyhow::Result;
use image::imageops;
use log::{debug, info};

use super::Atlas;
use crate::error::{InvalidInput, PackError, SpritePackError};
use crate::packing::{DEFAULT_MAX_DIMENSION, Layout, RectSet, SearchPolicy, WidthSearch};
use crate::sprite::{PackedSprite, SourceSprite};

/// Configuration for atlas building
#[derive(Debug, Clone, Copy)]
pub struct AtlasBuilder {
    pub max_dimension: u32,
    pub search_policy: SearchPolicy,
    pub parallel: bool,
}

impl Default for AtlasBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DIMENSION)
    }
}

impl AtlasBuilder {
    pub fn new(max_dimension: u32) -> Self {
        Self {
            max_dimension,
            search_policy: SearchPolicy::Linear,
            parallel: true,
        }
    }

    pub fn search_policy(mut self, policy: SearchPolicy) -> Self {
        self.search_policy = policy;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Lay out the sprites and composite them into one atlas image
    pub fn build(&self, sprites: Vec<SourceSprite>) -> Result<Atlas> {
        if sprites.is_empty() {
            return Err(SpritePackError::NoImages.into());
        }

        let layout = self.layout(&sprites)?;
        Ok(self.apply_layout(sprites, &layout))
    }

    /// Find the packed layout without rendering anything
    pub fn layout(&self, sprites: &[SourceSprite]) -> Result<Layout> {
        let sizes: Vec<(u32, u32)> = sprites.iter().map(|s| (s.width(), s.height())).collect();
        let rects = RectSet::new(&sizes).map_err(|e| describe_pack_error(e, sprites))?;

        let layout = WidthSearch::new(self.max_dimension)
            .policy(self.search_policy)
            .parallel(self.parallel)
            .run(&rects)
            .map_err(|e| describe_pack_error(e, sprites))?;

        Ok(layout)
    }

    /// Composite every sprite at its packed position.
    ///
    /// Layout coordinates grow upward from the bottom; the image rows grow
    /// downward, so each sprite's row is flipped against the atlas height.
    fn apply_layout(&self, sprites: Vec<SourceSprite>, layout: &Layout) -> Atlas {
        let mut atlas = Atlas::new(layout.width, layout.height);
        atlas.occupancy = layout.occupancy();

        for (sprite, placement) in sprites.into_iter().zip(&layout.placements) {
            let x = placement.x;
            let y = placement.raster_y(layout.height);
            debug!(
                "{} -> ({}, {}) {}x{}",
                sprite.name, x, y, placement.width, placement.height
            );

            imageops::replace(&mut atlas.image, &sprite.image, i64::from(x), i64::from(y));

            atlas.sprites.push(PackedSprite {
                name: sprite.name,
                x,
                y,
                width: placement.width,
                height: placement.height,
                trim_info: sprite.trim_info,
            });
        }

        atlas.sprites.sort_by(|a, b| a.name.cmp(&b.name));

        info!(
            "Atlas {}x{} with {} sprites ({:.1}% efficiency)",
            atlas.width,
            atlas.height,
            atlas.sprites.len(),
            atlas.occupancy * 100.0,
        );

        atlas
    }
}

/// Attach the sprite name to a packing error that points at one sprite
fn describe_pack_error(err: PackError, sprites: &[SourceSprite]) -> anyhow::Error {
    let index = match &err {
        PackError::InvalidInput(InvalidInput::TooWide { index, .. })
        | PackError::InvalidInput(InvalidInput::ZeroSized { index, .. }) => Some(*index),
        _ => None,
    };

    let name = index.and_then(|i| sprites.get(i)).map(|s| s.name.clone());
    let err = anyhow::Error::from(SpritePackError::from(err));
    match name {
        Some(name) => err.context(format!("sprite '{}' cannot be packed", name)),
        None => err,
    }
}
