use std::fs;
use std::io::Cursor;
use std::path::Path;

use anyhow::Result;
use image::{DynamicImage, ImageFormat, RgbImage};
use log::debug;

use crate::atlas::Atlas;
use crate::cli::CompressionLevel;
use crate::error::SpritePackError;

/// Save atlas image as PNG, optionally with compression
pub fn save_atlas_image(
    atlas: &Atlas,
    path: &Path,
    opaque: bool,
    compress: Option<CompressionLevel>,
) -> Result<()> {
    let png_data = encode_png(atlas, opaque).map_err(|e| SpritePackError::ImageSave {
        path: path.to_path_buf(),
        source: e,
    })?;

    let output_data = match compress {
        Some(level) => {
            let opts = match level {
                CompressionLevel::Level(n) => oxipng::Options::from_preset(n),
                CompressionLevel::Max => oxipng::Options::max_compression(),
            };
            let optimized = oxipng::optimize_from_memory(&png_data, &opts).map_err(|e| {
                SpritePackError::PngCompress {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                }
            })?;
            debug!(
                "Compressed {} from {} to {} bytes",
                path.display(),
                png_data.len(),
                optimized.len()
            );
            optimized
        }
        None => png_data,
    };

    fs::write(path, output_data).map_err(|e| SpritePackError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

fn encode_png(atlas: &Atlas, opaque: bool) -> image::ImageResult<Vec<u8>> {
    let mut png_data = Cursor::new(Vec::new());
    if opaque {
        let rgb: RgbImage = DynamicImage::ImageRgba8(atlas.image.clone()).into_rgb8();
        rgb.write_to(&mut png_data, ImageFormat::Png)?;
    } else {
        atlas.image.write_to(&mut png_data, ImageFormat::Png)?;
    }
    Ok(png_data.into_inner())
}
