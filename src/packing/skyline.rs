use super::HeightIndex;

/// One horizontal segment of the packing frontier.
///
/// Bounds are inclusive, so an edge is never empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub left_x: u32,
    pub right_x: u32,
    pub height: u32,
    prev: Option<usize>,
    next: Option<usize>,
}

impl Edge {
    pub fn width(&self) -> u32 {
        self.right_x - self.left_x + 1
    }
}

/// The frontier of one packing run.
///
/// Edges live in an arena and are addressed by index; the left-to-right
/// chain and the height index both refer to those indices. Merged edges are
/// unlinked from both views but keep their arena slot until the run ends.
#[derive(Debug, Clone)]
pub struct Skyline {
    width: u32,
    edges: Vec<Edge>,
    head: usize,
    live: usize,
    index: HeightIndex,
}

impl Skyline {
    /// A flat skyline spanning `width` columns at height 0. `width` must be
    /// positive.
    pub fn new(width: u32) -> Self {
        debug_assert!(width > 0, "skyline width must be positive");

        let mut index = HeightIndex::new();
        index.push(0, |_| 0);

        Self {
            width,
            edges: vec![Edge {
                left_x: 0,
                right_x: width - 1,
                height: 0,
                prev: None,
                next: None,
            }],
            head: 0,
            live: 1,
            index,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    /// Number of edges currently in the chain
    pub fn len(&self) -> usize {
        self.live
    }

    /// A skyline always holds at least one edge.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The globally lowest edge
    pub fn lowest(&self) -> &Edge {
        &self.edges[self.lowest_id()]
    }

    fn lowest_id(&self) -> usize {
        // The index is never empty: merges only remove an edge that has a
        // neighbour to absorb it.
        self.index.peek().unwrap_or(self.head)
    }

    /// Edges from left to right
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        let mut cursor = Some(self.head);
        std::iter::from_fn(move || {
            let edge = &self.edges[cursor?];
            cursor = edge.next;
            Some(edge)
        })
    }

    pub fn max_height(&self) -> u32 {
        self.edges().map(|e| e.height).max().unwrap_or(0)
    }

    /// Fold the lowest edge into a neighbour.
    ///
    /// The taller neighbour takes over its span; on equal heights the right
    /// neighbour does. A lone edge already covers the full width and is left
    /// alone.
    pub fn merge_lowest(&mut self) {
        let id = self.lowest_id();
        let Edge {
            left_x,
            right_x,
            prev,
            next,
            ..
        } = self.edges[id];

        if prev.is_none() && next.is_none() {
            return;
        }

        let edges = &self.edges;
        self.index.pop(|h| edges[h].height);
        self.live -= 1;

        match (prev, next) {
            (Some(left), None) => {
                self.edges[left].right_x = right_x;
                self.edges[left].next = None;
            }
            (None, Some(right)) => {
                self.edges[right].left_x = left_x;
                self.edges[right].prev = None;
                self.head = right;
            }
            (Some(left), Some(right)) => {
                if self.edges[left].height > self.edges[right].height {
                    self.edges[left].right_x = right_x;
                } else {
                    self.edges[right].left_x = left_x;
                }
                self.edges[left].next = Some(right);
                self.edges[right].prev = Some(left);
            }
            (None, None) => {}
        }
    }

    /// Cut the lowest edge so that it is exactly `width` wide. The
    /// remainder becomes a new edge to its right at the same height.
    pub fn split_lowest(&mut self, width: u32) {
        let id = self.lowest_id();
        let edge = self.edges[id];
        debug_assert!(width > 0 && width < edge.width());

        let new_id = self.edges.len();
        self.edges.push(Edge {
            left_x: edge.left_x + width,
            right_x: edge.right_x,
            height: edge.height,
            prev: Some(id),
            next: edge.next,
        });
        if let Some(next) = edge.next {
            self.edges[next].prev = Some(new_id);
        }
        self.edges[id].right_x = edge.left_x + width - 1;
        self.edges[id].next = Some(new_id);
        self.live += 1;

        let edges = &self.edges;
        self.index.push(new_id, |h| edges[h].height);
    }

    /// Build `height` units on top of the lowest edge.
    pub fn raise_lowest(&mut self, height: u32) {
        let id = self.lowest_id();
        self.edges[id].height = self.edges[id].height.saturating_add(height);

        let edges = &self.edges;
        self.index.sift_down_root(|h| edges[h].height);
    }

    /// True when the chain covers `[0, width - 1]` with no gaps or overlaps
    /// and the height index holds exactly the chained edges.
    pub fn is_partition(&self) -> bool {
        let mut expected_left = 0u32;
        let mut prev = None;
        let mut count = 0usize;
        let mut cursor = Some(self.head);

        while let Some(id) = cursor {
            let edge = &self.edges[id];
            if edge.prev != prev || edge.left_x != expected_left || edge.right_x < edge.left_x {
                return false;
            }
            expected_left = edge.right_x + 1;
            prev = Some(id);
            count += 1;
            cursor = edge.next;
        }

        expected_left == self.width && count == self.live && self.index.len() == self.live
    }
}
