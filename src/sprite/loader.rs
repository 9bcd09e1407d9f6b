use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::ImageReader;
use log::{debug, info};
use rayon::prelude::*;

use super::{SourceSprite, TrimInfo, trim_sprite};
use crate::error::SpritePackError;

const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

/// Image path with its base directory for computing relative names
struct ImagePath {
    path: PathBuf,
    base: Option<PathBuf>,
}

/// Load sprites from input paths (files or directories).
///
/// Files found inside a directory input are named by their path relative to
/// that directory; individual files are named by their file name. The result
/// is sorted by name so that the atlas does not depend on directory listing
/// order.
pub fn load_sprites(inputs: &[impl AsRef<Path>], trim: bool) -> Result<Vec<SourceSprite>> {
    let image_paths = collect_image_paths(inputs)?;

    if image_paths.is_empty() {
        return Err(SpritePackError::NoImages.into());
    }

    info!("Loading {} images...", image_paths.len());

    let mut sprites = image_paths
        .par_iter()
        .map(|img_path| load_single_sprite(&img_path.path, img_path.base.as_deref(), trim))
        .collect::<Result<Vec<_>>>()?;

    sprites.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(sprites)
}

fn collect_image_paths(inputs: &[impl AsRef<Path>]) -> Result<Vec<ImagePath>> {
    let mut paths = Vec::new();

    for input in inputs {
        let path = input.as_ref();
        if !path.exists() {
            return Err(SpritePackError::InputNotFound(path.to_path_buf()).into());
        }

        if path.is_file() {
            if is_supported_image(path) {
                paths.push(ImagePath {
                    path: path.to_path_buf(),
                    base: None,
                });
            } else {
                debug!("Skipping unsupported file {}", path.display());
            }
        } else if path.is_dir() {
            collect_from_directory(path, path, &mut paths)?;
        }
    }

    Ok(paths)
}

fn collect_from_directory(base: &Path, dir: &Path, paths: &mut Vec<ImagePath>) -> Result<()> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?;

    for entry in entries {
        let path = entry?.path();

        if path.is_file() && is_supported_image(&path) {
            paths.push(ImagePath {
                path,
                base: Some(base.to_path_buf()),
            });
        } else if path.is_dir() {
            collect_from_directory(base, &path, paths)?;
        }
    }

    Ok(())
}

fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn sprite_name(path: &Path, base: Option<&Path>) -> String {
    match base {
        Some(base_dir) => path
            .strip_prefix(base_dir)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/"),
        None => path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown")
            .to_string(),
    }
}

fn load_single_sprite(path: &Path, base: Option<&Path>, trim: bool) -> Result<SourceSprite> {
    let img = ImageReader::open(path)
        .map_err(|e| SpritePackError::ImageLoad {
            path: path.to_path_buf(),
            source: e.into(),
        })?
        .decode()
        .map_err(|e| SpritePackError::ImageLoad {
            path: path.to_path_buf(),
            source: e,
        })?
        .into_rgba8();

    let (image, trim_info) = if trim {
        trim_sprite(&img)
    } else {
        let (w, h) = img.dimensions();
        (img, TrimInfo::untrimmed(w, h))
    };

    Ok(SourceSprite {
        path: path.to_path_buf(),
        name: sprite_name(path, base),
        image,
        trim_info,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("spritepack-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_png(path: &Path, width: u32, height: u32) {
        let mut img = RgbaImage::new(width, height);
        img.put_pixel(width / 2, height / 2, Rgba([10, 20, 30, 255]));
        img.save(path).unwrap();
    }

    #[test]
    fn test_is_supported_image() {
        assert!(is_supported_image(Path::new("hero.png")));
        assert!(is_supported_image(Path::new("hero.PNG")));
        assert!(is_supported_image(Path::new("dir/hero.webp")));
        assert!(!is_supported_image(Path::new("notes.txt")));
        assert!(!is_supported_image(Path::new("no_extension")));
    }

    #[test]
    fn test_sprite_name_relative_to_base() {
        let path = Path::new("/assets/sprites/enemies/bat.png");

        assert_eq!(
            sprite_name(path, Some(Path::new("/assets/sprites"))),
            "enemies/bat.png"
        );
        assert_eq!(sprite_name(path, None), "bat.png");
    }

    #[test]
    fn test_load_directory_sorted_and_trimmed() {
        let dir = scratch_dir("loader");
        std::fs::create_dir_all(dir.join("sub")).unwrap();
        write_png(&dir.join("b.png"), 8, 4);
        write_png(&dir.join("sub").join("a.png"), 6, 6);
        std::fs::write(dir.join("readme.txt"), "not an image").unwrap();

        let sprites = load_sprites(&[&dir], true).unwrap();

        let names: Vec<_> = sprites.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["b.png", "sub/a.png"]);
        assert_eq!((sprites[0].width(), sprites[0].height()), (1, 1));
        assert_eq!(sprites[0].trim_info.source_width, 8);

        let untrimmed = load_sprites(&[dir.join("b.png")], false).unwrap();
        assert_eq!((untrimmed[0].width(), untrimmed[0].height()), (8, 4));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_input_is_reported() {
        let err = load_sprites(&[Path::new("/definitely/not/here.png")], true).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<SpritePackError>(),
            Some(SpritePackError::InputNotFound(_))
        ));
    }

    #[test]
    fn test_no_images_found() {
        let dir = scratch_dir("empty");

        let err = load_sprites(&[&dir], true).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<SpritePackError>(),
            Some(SpritePackError::NoImages)
        ));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
