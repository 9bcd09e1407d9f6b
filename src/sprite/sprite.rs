use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Trimming information to reconstruct original sprite positioning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct TrimInfo {
    /// Pixels trimmed from left edge
    pub offset_x: u32,
    /// Pixels trimmed from top edge
    pub offset_y: u32,
    /// Original width before trimming
    pub source_width: u32,
    /// Original height before trimming
    pub source_height: u32,
    /// Trimmed width
    pub trimmed_width: u32,
    /// Trimmed height
    pub trimmed_height: u32,
}

impl TrimInfo {
    /// Create TrimInfo for an untrimmed sprite
    pub fn untrimmed(width: u32, height: u32) -> Self {
        Self {
            offset_x: 0,
            offset_y: 0,
            source_width: width,
            source_height: height,
            trimmed_width: width,
            trimmed_height: height,
        }
    }

    /// Returns true if the sprite was actually trimmed
    pub fn was_trimmed(&self) -> bool {
        self.trimmed_width != self.source_width || self.trimmed_height != self.source_height
    }

    /// Center of the untrimmed source image, in source pixels
    pub fn center(&self) -> (u32, u32) {
        (self.source_width / 2, self.source_height / 2)
    }
}

/// Represents a source sprite before packing
#[derive(Debug, Clone)]
pub struct SourceSprite {
    /// Original file path
    pub path: PathBuf,
    /// Unique identifier (relative path or file name)
    pub name: String,
    /// Trimmed image data (transparent borders removed if trimming enabled)
    pub image: RgbaImage,
    /// Trim metadata for offset reconstruction
    pub trim_info: TrimInfo,
}

impl SourceSprite {
    /// Width of the sprite (after trimming)
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height of the sprite (after trimming)
    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

/// Result of placing a sprite in the atlas
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackedSprite {
    /// Reference to source sprite name
    pub name: String,
    /// Left edge in the atlas image
    pub x: u32,
    /// Top edge in the atlas image (rows counted from the top)
    pub y: u32,
    /// Width in atlas
    pub width: u32,
    /// Height in atlas
    pub height: u32,
    /// Original trim info for offset calculation
    pub trim_info: TrimInfo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untrimmed_reports_no_trim() {
        let info = TrimInfo::untrimmed(12, 7);

        assert!(!info.was_trimmed());
        assert_eq!(info.center(), (6, 3));
    }

    #[test]
    fn test_center_uses_source_size() {
        let info = TrimInfo {
            offset_x: 2,
            offset_y: 3,
            source_width: 10,
            source_height: 9,
            trimmed_width: 4,
            trimmed_height: 4,
        };

        assert!(info.was_trimmed());
        assert_eq!(info.center(), (5, 4));
    }
}
