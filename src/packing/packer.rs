use super::{Rect, Skyline};
use crate::error::{InvalidInput, PackError};

/// One rectangle waiting to be placed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Item {
    pub width: u32,
    pub height: u32,
    /// Position in the caller's input
    pub index: usize,
}

/// Rectangles sorted ascending by width, then height.
///
/// Equal sizes keep their input order. The set is built once and reused for
/// every width tried by the search.
#[derive(Debug, Clone)]
pub struct RectSet {
    items: Vec<Item>,
}

impl RectSet {
    /// Validate and sort `(width, height)` pairs.
    pub fn new(sizes: &[(u32, u32)]) -> Result<Self, PackError> {
        if sizes.is_empty() {
            return Err(InvalidInput::Empty.into());
        }

        let mut items = Vec::with_capacity(sizes.len());
        for (index, &(width, height)) in sizes.iter().enumerate() {
            if width == 0 || height == 0 {
                return Err(InvalidInput::ZeroSized {
                    index,
                    width,
                    height,
                }
                .into());
            }
            items.push(Item {
                width,
                height,
                index,
            });
        }
        items.sort_by_key(|item| (item.width, item.height));

        Ok(Self { items })
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The widest rectangle (last in sort order)
    pub fn widest(&self) -> Item {
        // RectSet::new rejects empty input
        self.items.last().copied().unwrap_or(Item {
            width: 0,
            height: 0,
            index: 0,
        })
    }

    /// Sum of all widths, i.e. the width of laying everything side by side
    pub fn total_width(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.width)).sum()
    }

    pub fn total_area(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.width) * u64::from(item.height))
            .sum()
    }

    /// Reject a packing width that some rectangle cannot fit into.
    pub fn check_width(&self, width: u32) -> Result<(), PackError> {
        if width == 0 {
            return Err(InvalidInput::ZeroWidth.into());
        }
        let widest = self.widest();
        if widest.width > width {
            return Err(InvalidInput::TooWide {
                index: widest.index,
                width: widest.width,
                limit: width,
            }
            .into());
        }
        Ok(())
    }
}

/// Where one rectangle ended up.
///
/// `(x, y)` is the bottom-left corner, with `y` growing upward from the
/// baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Placement {
    pub index: usize,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Placement {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Row of the rectangle's top edge in a top-left-origin raster of
    /// `atlas_height` rows
    pub fn raster_y(&self, atlas_height: u32) -> u32 {
        atlas_height - self.y - self.height
    }
}

/// Result of packing a rectangle set at one width
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    /// One placement per input rectangle, in input order
    pub placements: Vec<Placement>,
}

impl Layout {
    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Fraction of the atlas covered by rectangles (0.0 to 1.0)
    pub fn occupancy(&self) -> f64 {
        let area = self.area();
        if area == 0 {
            return 0.0;
        }
        let used: u64 = self.placements.iter().map(|p| p.rect().area()).sum();
        used as f64 / area as f64
    }
}

/// Pack every rectangle onto a skyline of the given width.
pub fn pack(rects: &RectSet, width: u32) -> Result<Layout, PackError> {
    rects.check_width(width)?;
    pack_unchecked(rects, width, u32::MAX, |_| {})
        .ok_or_else(|| InvalidInput::HeightOverflow { width }.into())
}

/// Packing loop for a width already known to hold every rectangle.
///
/// Gives up with `None` as soon as a rectangle would reach above
/// `height_limit`. `observe` sees the skyline after every merge, split and
/// raise.
pub(crate) fn pack_unchecked(
    rects: &RectSet,
    width: u32,
    height_limit: u32,
    mut observe: impl FnMut(&Skyline),
) -> Option<Layout> {
    let mut skyline = Skyline::new(width);
    let mut queue: Vec<Item> = rects.items().to_vec();
    let mut placements = vec![Placement::default(); queue.len()];

    while let Some(smallest) = queue.first().map(|item| item.width) {
        while skyline.lowest().width() < smallest {
            skyline.merge_lowest();
            observe(&skyline);
        }

        let edge = *skyline.lowest();
        let fitting = queue
            .iter()
            .take_while(|item| item.width <= edge.width())
            .count();
        debug_assert!(fitting > 0);
        let item = queue.remove(fitting - 1);

        match edge.height.checked_add(item.height) {
            Some(top) if top <= height_limit => {}
            _ => return None,
        }

        if item.width < edge.width() {
            skyline.split_lowest(item.width);
            observe(&skyline);
        }

        placements[item.index] = Placement {
            index: item.index,
            x: edge.left_x,
            y: edge.height,
            width: item.width,
            height: item.height,
        };

        skyline.raise_lowest(item.height);
        observe(&skyline);
    }

    Some(Layout {
        width,
        height: skyline.max_height(),
        placements,
    })
}
