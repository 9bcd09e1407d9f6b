use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use spritepack::atlas::AtlasBuilder;
use spritepack::cli::{CliArgs, CompressionLevel, SearchPolicy};
use spritepack::config::LoadedConfig;
use spritepack::output::{save_atlas_image, write_json};
use spritepack::packing::DEFAULT_MAX_DIMENSION;
use spritepack::sprite::load_sprites;

#[allow(clippy::print_stderr)]
fn main() {
    if let Err(e) = run() {
        // Use eprintln instead of error! because logger may not be initialized
        // (e.g., config loading fails before logger init)
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = CliArgs::parse();

    // Load config if specified and merge with CLI args
    let merged = merge_config_with_args(&args)?;

    env_logger::Builder::new()
        .filter_level(if merged.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .format_timestamp(None)
        .format_target(false)
        .init();

    info!("spritepack v{}", env!("CARGO_PKG_VERSION"));

    if !merged.output.exists() {
        fs::create_dir_all(&merged.output).with_context(|| {
            format!("failed to create output directory {}", merged.output.display())
        })?;
    }

    let sprites = load_sprites(&merged.input, merged.trim)?;
    info!("Loaded {} sprites", sprites.len());

    let atlas = AtlasBuilder::new(merged.max_size)
        .search_policy(merged.search)
        .parallel(merged.parallel)
        .build(sprites)?;

    let image_path = merged.output.join(format!("{}.png", merged.name));
    save_atlas_image(&atlas, &image_path, merged.opaque, merged.compress)?;
    info!("Saved {}", image_path.display());

    let json_path = write_json(&atlas, &merged.output, &merged.name)?;
    info!("Saved {}", json_path.display());

    Ok(())
}

/// Merged configuration from CLI args and optional config file.
struct MergedConfig {
    input: Vec<PathBuf>,
    output: PathBuf,
    name: String,
    max_size: u32,
    search: SearchPolicy,
    trim: bool,
    parallel: bool,
    opaque: bool,
    verbose: bool,
    compress: Option<CompressionLevel>,
}

/// Merge config file values with CLI arguments.
/// CLI arguments always take precedence over config values.
fn merge_config_with_args(args: &CliArgs) -> Result<MergedConfig> {
    let loaded_config = if let Some(config_path) = &args.config {
        Some(
            LoadedConfig::load(config_path)
                .with_context(|| format!("failed to load config: {}", config_path.display()))?,
        )
    } else {
        None
    };

    // Determine input files: CLI args override config
    let input = if !args.input.is_empty() {
        args.input.clone()
    } else if let Some(ref lc) = loaded_config {
        lc.resolve_inputs()
            .context("failed to resolve input files from config")?
    } else {
        // This shouldn't happen due to clap's required_unless_present
        Vec::new()
    };

    // Determine output directory: CLI > config > default
    let output = args.output.clone().unwrap_or_else(|| {
        loaded_config
            .as_ref()
            .map(|lc| lc.resolve_output_dir())
            .unwrap_or_else(|| PathBuf::from("."))
    });

    let name = args.name.clone().unwrap_or_else(|| {
        loaded_config
            .as_ref()
            .map(|lc| lc.config.name.clone())
            .unwrap_or_else(|| "atlas".to_string())
    });

    let max_size = args.max_size.unwrap_or_else(|| {
        loaded_config
            .as_ref()
            .map(|lc| lc.config.max_size)
            .unwrap_or(DEFAULT_MAX_DIMENSION)
    });

    let search = match (args.search, &loaded_config) {
        (Some(policy), _) => policy,
        (None, Some(lc)) => lc.search_policy()?,
        (None, None) => SearchPolicy::Linear,
    };

    // Boolean flags: CLI presence wins, otherwise use config
    let trim = if args.no_trim {
        false
    } else if let Some(ref lc) = loaded_config {
        lc.config.trim
    } else {
        true
    };

    let parallel = if args.sequential {
        false
    } else if let Some(ref lc) = loaded_config {
        lc.config.parallel
    } else {
        true
    };

    let opaque = if args.opaque {
        true
    } else if let Some(ref lc) = loaded_config {
        lc.config.opaque
    } else {
        false
    };

    let compress = match (args.compress, &loaded_config) {
        (Some(level), _) => Some(level),
        (None, Some(lc)) => lc.compression()?,
        (None, None) => None,
    };

    Ok(MergedConfig {
        input,
        output,
        name,
        max_size,
        search,
        trim,
        parallel,
        opaque,
        verbose: args.verbose,
        compress,
    })
}
