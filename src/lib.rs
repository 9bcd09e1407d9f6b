pub mod atlas;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod packing;
pub mod sprite;

pub use atlas::{Atlas, AtlasBuilder};
pub use cli::{CliArgs, CompressionLevel, SearchPolicy};
pub use error::{InvalidInput, PackError, SpritePackError};
pub use packing::{Layout, Placement, RectSet, WidthSearch, pack};
pub use sprite::{PackedSprite, SourceSprite, TrimInfo};
