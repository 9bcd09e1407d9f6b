use image::RgbaImage;

use crate::sprite::PackedSprite;

/// The composited atlas image and the table of where each sprite landed.
///
/// Sprite positions are image coordinates: `(0, 0)` is the top-left pixel.
#[derive(Debug)]
pub struct Atlas {
    pub width: u32,
    pub height: u32,
    pub image: RgbaImage,
    /// Sorted by name
    pub sprites: Vec<PackedSprite>,
    /// Fraction of the atlas covered by sprites (0.0 to 1.0)
    pub occupancy: f64,
}

impl Atlas {
    /// Blank, fully transparent atlas of the given size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            image: RgbaImage::new(width, height),
            sprites: Vec::new(),
            occupancy: 0.0,
        }
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Look up a packed sprite by name.
    pub fn sprite(&self, name: &str) -> Option<&PackedSprite> {
        self.sprites
            .binary_search_by(|s| s.name.as_str().cmp(name))
            .ok()
            .and_then(|i| self.sprites.get(i))
    }
}
