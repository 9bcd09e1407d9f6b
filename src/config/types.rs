use serde::{Deserialize, Serialize};

use crate::packing::DEFAULT_MAX_DIMENSION;

/// PNG compression level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompressConfig {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression ("max")
    Max(String),
}

/// Config file structure.
///
/// All paths in the config are relative to the config file location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpritePackConfig {
    /// Config file version (currently 1)
    pub version: u32,
    /// Input file paths or glob patterns
    pub input: Vec<String>,
    /// Output directory for atlas files
    pub output_dir: String,
    /// Base name for output files (atlas.png, atlas.json)
    pub name: String,
    /// Maximum atlas width and height in pixels
    pub max_size: u32,
    /// Width search policy: "linear" or "doubling"
    pub search: String,
    /// Enable sprite trimming (remove transparent borders)
    pub trim: bool,
    /// Try candidate widths in parallel
    pub parallel: bool,
    /// Output RGB instead of RGBA (opaque atlas)
    pub opaque: bool,
    /// PNG compression configuration (optional)
    pub compress: Option<CompressConfig>,
}

impl Default for SpritePackConfig {
    fn default() -> Self {
        Self {
            version: 1,
            input: Vec::new(),
            output_dir: ".".to_string(),
            name: "atlas".to_string(),
            max_size: DEFAULT_MAX_DIMENSION,
            search: "linear".to_string(),
            trim: true,
            parallel: true,
            opaque: false,
            compress: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let config: SpritePackConfig =
            serde_json::from_str(r#"{ "input": ["sprites/*.png"], "search": "doubling" }"#)
                .unwrap();

        assert_eq!(config.input, vec!["sprites/*.png"]);
        assert_eq!(config.search, "doubling");
        assert_eq!(config.max_size, 2048);
        assert_eq!(config.name, "atlas");
        assert!(config.trim);
        assert!(config.parallel);
        assert_eq!(config.compress, None);
    }

    #[test]
    fn test_compress_accepts_level_or_max() {
        let level: SpritePackConfig = serde_json::from_str(r#"{ "compress": 4 }"#).unwrap();
        let max: SpritePackConfig = serde_json::from_str(r#"{ "compress": "max" }"#).unwrap();

        assert_eq!(level.compress, Some(CompressConfig::Level(4)));
        assert_eq!(max.compress, Some(CompressConfig::Max("max".to_string())));
    }
}
