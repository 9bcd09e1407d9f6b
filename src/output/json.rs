use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;

use crate::atlas::Atlas;
use crate::error::SpritePackError;
use crate::sprite::PackedSprite;

#[derive(Serialize)]
struct JsonOutput {
    meta: Meta,
    image: String,
    size: Size,
    sprites: Vec<JsonSprite>,
}

#[derive(Serialize)]
struct Meta {
    app: &'static str,
    version: &'static str,
    format: &'static str,
}

#[derive(Serialize)]
struct Size {
    w: u32,
    h: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonSprite {
    name: String,
    frame: Frame,
    trimmed: bool,
    sprite_source_size: Frame,
    source_size: Size,
    center: Point,
}

#[derive(Serialize)]
struct Frame {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

#[derive(Serialize)]
struct Point {
    x: u32,
    y: u32,
}

/// Write the sprite coordinate table next to `<base_name>.png`.
///
/// Frames use top-left image coordinates. Returns the path written.
pub fn write_json(atlas: &Atlas, output_dir: &Path, base_name: &str) -> Result<PathBuf> {
    let output = JsonOutput {
        meta: Meta {
            app: "spritepack",
            version: env!("CARGO_PKG_VERSION"),
            format: "rgba8888",
        },
        image: format!("{}.png", base_name),
        size: Size {
            w: atlas.width,
            h: atlas.height,
        },
        sprites: atlas.sprites.iter().map(sprite_to_json).collect(),
    };

    let json_path = output_dir.join(format!("{}.json", base_name));
    let content = serde_json::to_string_pretty(&output)?;

    fs::write(&json_path, content).map_err(|e| SpritePackError::OutputWrite {
        path: json_path.clone(),
        source: e,
    })?;

    Ok(json_path)
}

fn sprite_to_json(sprite: &PackedSprite) -> JsonSprite {
    let trim = &sprite.trim_info;
    let (center_x, center_y) = trim.center();

    JsonSprite {
        name: sprite.name.clone(),
        frame: Frame {
            x: sprite.x,
            y: sprite.y,
            w: sprite.width,
            h: sprite.height,
        },
        trimmed: trim.was_trimmed(),
        sprite_source_size: Frame {
            x: trim.offset_x,
            y: trim.offset_y,
            w: trim.trimmed_width,
            h: trim.trimmed_height,
        },
        source_size: Size {
            w: trim.source_width,
            h: trim.source_height,
        },
        center: Point {
            x: center_x,
            y: center_y,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite::TrimInfo;

    #[test]
    fn test_write_json_layout() {
        let mut atlas = Atlas::new(16, 8);
        atlas.sprites.push(PackedSprite {
            name: "hero.png".to_string(),
            x: 4,
            y: 2,
            width: 6,
            height: 5,
            trim_info: TrimInfo {
                offset_x: 1,
                offset_y: 3,
                source_width: 10,
                source_height: 9,
                trimmed_width: 6,
                trimmed_height: 5,
            },
        });

        let dir = std::env::temp_dir().join(format!("spritepack-json-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        let path = write_json(&atlas, &dir, "sheet").unwrap();
        assert_eq!(path, dir.join("sheet.json"));

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["image"], "sheet.png");
        assert_eq!(value["size"]["w"], 16);
        assert_eq!(value["size"]["h"], 8);

        let sprite = &value["sprites"][0];
        assert_eq!(sprite["name"], "hero.png");
        assert_eq!(sprite["frame"]["x"], 4);
        assert_eq!(sprite["frame"]["y"], 2);
        assert_eq!(sprite["trimmed"], true);
        assert_eq!(sprite["spriteSourceSize"]["x"], 1);
        assert_eq!(sprite["spriteSourceSize"]["y"], 3);
        assert_eq!(sprite["sourceSize"]["w"], 10);
        assert_eq!(sprite["center"]["x"], 5);
        assert_eq!(sprite["center"]["y"], 4);

        fs::remove_dir_all(&dir).unwrap();
    }
}
