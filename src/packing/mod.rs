mod heap;
mod packer;
mod rect;
mod search;
mod skyline;

pub use heap::HeightIndex;
pub use packer::{Item, Layout, Placement, RectSet, pack};
pub use rect::Rect;
pub use search::{DEFAULT_MAX_DIMENSION, SearchPolicy, WidthSearch};
pub use skyline::{Edge, Skyline};
