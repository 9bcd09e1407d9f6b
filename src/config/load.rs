use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use log::warn;

use super::types::{CompressConfig, SpritePackConfig};
use crate::cli::CompressionLevel;
use crate::packing::SearchPolicy;

/// Newest config file version this build understands
pub const CONFIG_VERSION: u32 = 1;

/// A parsed config file plus the directory its relative paths start from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: SpritePackConfig,
    pub config_dir: PathBuf,
}

impl LoadedConfig {
    /// Read, parse and validate a config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        let config: SpritePackConfig = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;

        if config.version > CONFIG_VERSION {
            bail!(
                "config version {} is newer than supported version {}",
                config.version,
                CONFIG_VERSION
            );
        }
        if config.max_size == 0 {
            bail!("max_size must be at least 1");
        }

        let config_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self { config, config_dir })
    }

    /// Expand the `input` entries into sprite paths.
    ///
    /// Glob matches are sorted; a glob matching nothing is logged and skipped.
    pub fn resolve_inputs(&self) -> Result<Vec<PathBuf>> {
        let mut results = Vec::new();

        for pattern in &self.config.input {
            let full = self.config_dir.join(pattern);
            if !is_glob_pattern(pattern) {
                results.push(full);
                continue;
            }

            let entries = glob::glob(&full.to_string_lossy())
                .with_context(|| format!("invalid glob pattern: {}", pattern))?;
            let mut matched = entries
                .collect::<Result<Vec<_>, _>>()
                .with_context(|| format!("failed to read glob entry: {}", pattern))?;

            if matched.is_empty() {
                warn!("Pattern '{}' matched no files", pattern);
            }
            matched.sort();
            results.append(&mut matched);
        }

        Ok(results)
    }

    pub fn resolve_output_dir(&self) -> PathBuf {
        self.config_dir.join(&self.config.output_dir)
    }

    pub fn search_policy(&self) -> Result<SearchPolicy> {
        self.config.search.parse::<SearchPolicy>().map_err(|_e| {
            anyhow::anyhow!(
                "unknown search '{}' in config file. Valid values: linear, doubling",
                self.config.search
            )
        })
    }

    pub fn compression(&self) -> Result<Option<CompressionLevel>> {
        let Some(compress) = &self.config.compress else {
            return Ok(None);
        };
        let level = match compress {
            CompressConfig::Level(n) => n.to_string().parse::<CompressionLevel>(),
            CompressConfig::Max(s) => s.parse::<CompressionLevel>(),
        };
        level
            .map(Some)
            .map_err(|e| anyhow::anyhow!("invalid compress value in config file: {}", e))
    }
}

fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?') || pattern.contains('[')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("spritepack-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_load_resolves_paths_against_config_dir() {
        let dir = scratch_dir("config");
        std::fs::create_dir_all(dir.join("art")).unwrap();
        std::fs::write(dir.join("art").join("a.png"), b"").unwrap();
        std::fs::write(dir.join("art").join("b.png"), b"").unwrap();
        std::fs::write(dir.join("art").join("c.txt"), b"").unwrap();

        let config_path = dir.join("pack.json");
        std::fs::write(
            &config_path,
            r#"{ "input": ["art/*.png", "extra/hero.png"], "output_dir": "build" }"#,
        )
        .unwrap();

        let loaded = LoadedConfig::load(&config_path).unwrap();
        let mut inputs = loaded.resolve_inputs().unwrap();
        inputs.sort();

        assert_eq!(
            inputs,
            vec![
                dir.join("art").join("a.png"),
                dir.join("art").join("b.png"),
                dir.join("extra/hero.png"),
            ]
        );
        assert_eq!(loaded.resolve_output_dir(), dir.join("build"));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let dir = scratch_dir("bad-config");
        let config_path = dir.join("pack.json");
        std::fs::write(&config_path, "{ not json").unwrap();

        let err = LoadedConfig::load(&config_path).unwrap_err();
        assert!(format!("{:#}", err).contains("failed to parse config file"));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_is_glob_pattern() {
        assert!(is_glob_pattern("*.png"));
        assert!(is_glob_pattern("sprites/*.png"));
        assert!(is_glob_pattern("sprites/**/*.png"));
        assert!(is_glob_pattern("sprite?.png"));
        assert!(is_glob_pattern("sprite[0-9].png"));
        assert!(!is_glob_pattern("sprite.png"));
        assert!(!is_glob_pattern("sprites/hero.png"));
    }

    #[test]
    fn test_load_rejects_newer_version() {
        let dir = scratch_dir("future-config");
        let config_path = dir.join("pack.json");
        std::fs::write(&config_path, r#"{ "version": 7, "input": ["a.png"] }"#).unwrap();

        let err = LoadedConfig::load(&config_path).unwrap_err();
        assert!(err.to_string().contains("newer than supported"));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_search_and_compression_from_config() {
        let mut loaded = LoadedConfig {
            config: SpritePackConfig::default(),
            config_dir: PathBuf::from("."),
        };
        assert_eq!(loaded.search_policy().unwrap(), SearchPolicy::Linear);
        assert_eq!(loaded.compression().unwrap(), None);

        loaded.config.search = "doubling".to_string();
        loaded.config.compress = Some(CompressConfig::Max("max".to_string()));
        assert_eq!(loaded.search_policy().unwrap(), SearchPolicy::Doubling);
        assert_eq!(loaded.compression().unwrap(), Some(CompressionLevel::Max));

        loaded.config.search = "spiral".to_string();
        loaded.config.compress = Some(CompressConfig::Level(9));
        assert!(loaded.search_policy().is_err());
        assert!(loaded.compression().is_err());
    }
}
