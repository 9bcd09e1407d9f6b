use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the packing engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PackError {
    #[error("Invalid input: {0}")]
    InvalidInput(InvalidInput),

    #[error("No atlas width fits within {max_dimension}x{max_dimension}")]
    NoFeasibleWidth { max_dimension: u32 },
}

/// Why a set of rectangles was rejected before packing.
///
/// Indices refer to the caller's original input order.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidInput {
    #[error("no rectangles to pack")]
    Empty,

    #[error("packing width must be positive")]
    ZeroWidth,

    #[error("rectangle {index} has zero size ({width}x{height})")]
    ZeroSized { index: usize, width: u32, height: u32 },

    #[error("rectangle {index} is {width} wide, which exceeds the available width {limit}")]
    TooWide { index: usize, width: u32, limit: u32 },

    #[error("stacked rectangles exceed the largest representable height at width {width}")]
    HeightOverflow { width: u32 },
}

impl From<InvalidInput> for PackError {
    fn from(err: InvalidInput) -> Self {
        PackError::InvalidInput(err)
    }
}

#[derive(Error, Debug)]
pub enum SpritePackError {
    #[error("Failed to load image '{path}': {source}")]
    ImageLoad {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to save image '{path}': {source}")]
    ImageSave {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("No valid images found in input")]
    NoImages,

    #[error("Failed to pack sprites: {0}")]
    Pack(#[from] PackError),

    #[error("Failed to write output file '{path}': {source}")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to compress PNG '{path}': {message}")]
    PngCompress { path: PathBuf, message: String },

    #[error("Input path does not exist: {0}")]
    InputNotFound(PathBuf),
}
