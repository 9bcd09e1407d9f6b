mod args;

pub use args::{CliArgs, CompressionLevel, SearchPolicy};
