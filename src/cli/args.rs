use clap::Parser;
use std::path::PathBuf;

pub use crate::packing::SearchPolicy;

#[derive(Parser, Debug, Clone)]
#[command(name = "spritepack")]
#[command(version, about = "Pack images into a single texture atlas", long_about = None)]
pub struct CliArgs {
    /// Input image files or directories
    #[arg(required_unless_present = "config")]
    pub input: Vec<PathBuf>,

    /// Load settings from a JSON config file
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output directory for the atlas files [default: .]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Base name for output files (atlas.png, atlas.json) [default: atlas]
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    /// Maximum atlas width and height in pixels [default: 2048]
    #[arg(long, value_name = "PIXELS")]
    pub max_size: Option<u32>,

    /// How candidate atlas widths are explored [default: linear]
    #[arg(long, value_enum)]
    pub search: Option<SearchPolicy>,

    /// Disable sprite trimming (remove transparent borders)
    #[arg(long)]
    pub no_trim: bool,

    /// Try candidate widths one at a time instead of in parallel
    #[arg(long)]
    pub sequential: bool,

    /// Output RGB instead of RGBA (opaque atlas)
    #[arg(long)]
    pub opaque: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Compress PNG output (0-6 or 'max'). Default level is 2 if flag is present without value.
    #[arg(long, value_name = "LEVEL", default_missing_value = "2", num_args = 0..=1)]
    pub compress: Option<CompressionLevel>,
}

/// PNG compression level (0-6 or max)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionLevel {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression
    Max,
}

impl std::str::FromStr for CompressionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("max") {
            Ok(CompressionLevel::Max)
        } else {
            s.parse::<u8>()
                .map_err(|_e| format!("invalid compression level: {}", s))
                .and_then(|n| {
                    if n <= 6 {
                        Ok(CompressionLevel::Level(n))
                    } else {
                        Err(format!("compression level must be 0-6 or 'max', got {}", n))
                    }
                })
        }
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        CompressionLevel::Level(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compression_level_parse() {
        assert_eq!("max".parse(), Ok(CompressionLevel::Max));
        assert_eq!("MAX".parse(), Ok(CompressionLevel::Max));
        assert_eq!("0".parse(), Ok(CompressionLevel::Level(0)));
        assert_eq!("6".parse(), Ok(CompressionLevel::Level(6)));
        assert!("7".parse::<CompressionLevel>().is_err());
        assert!("fast".parse::<CompressionLevel>().is_err());
    }

    #[test]
    fn test_cli_defaults_are_unset() {
        let args = CliArgs::try_parse_from(["spritepack", "a.png", "b.png"]).unwrap();

        assert_eq!(args.input.len(), 2);
        assert_eq!(args.max_size, None);
        assert_eq!(args.search, None);
        assert_eq!(args.compress, None);
        assert!(!args.no_trim);
        assert!(!args.sequential);
    }

    #[test]
    fn test_cli_flags() {
        let args = CliArgs::try_parse_from([
            "spritepack",
            "sprites",
            "--max-size",
            "1024",
            "--search",
            "doubling",
            "--no-trim",
            "--compress",
            "-o",
            "out",
        ])
        .unwrap();

        assert_eq!(args.max_size, Some(1024));
        assert_eq!(args.search, Some(SearchPolicy::Doubling));
        assert_eq!(args.compress, Some(CompressionLevel::Level(2)));
        assert_eq!(args.output, Some(PathBuf::from("out")));
        assert!(args.no_trim);
    }

    #[test]
    fn test_cli_requires_input_or_config() {
        assert!(CliArgs::try_parse_from(["spritepack"]).is_err());
        assert!(CliArgs::try_parse_from(["spritepack", "--config", "pack.json"]).is_ok());
    }
}
