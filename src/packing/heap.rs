/// Array-backed binary min-heap of edge handles.
///
/// The heap stores only handles; heights are looked up through a key function
/// supplied on every call, so the edge arena stays the single owner of the
/// data. Heights only ever grow for the root, which is why the only repair
/// operation is a sift-down from the root.
#[derive(Debug, Clone)]
pub struct HeightIndex {
    slots: Vec<usize>,
}

const INITIAL_CAPACITY: usize = 4;

impl HeightIndex {
    pub fn new() -> Self {
        Self {
            slots: Vec::with_capacity(INITIAL_CAPACITY),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Handle with the lowest key
    pub fn peek(&self) -> Option<usize> {
        self.slots.first().copied()
    }

    pub fn push(&mut self, handle: usize, key: impl Fn(usize) -> u32) {
        if self.slots.len() == self.slots.capacity() {
            // grow by doubling
            self.slots.reserve_exact(self.slots.capacity().max(INITIAL_CAPACITY));
        }
        self.slots.push(handle);

        let height = key(handle);
        let mut idx = self.slots.len() - 1;
        while idx > 0 {
            let parent = (idx - 1) / 2;
            if key(self.slots[parent]) <= height {
                break;
            }
            self.slots.swap(idx, parent);
            idx = parent;
        }
    }

    /// Remove and return the root.
    pub fn pop(&mut self, key: impl Fn(usize) -> u32) -> Option<usize> {
        if self.slots.is_empty() {
            return None;
        }
        let root = self.slots.swap_remove(0);
        self.sift_down_root(key);
        Some(root)
    }

    /// Restore heap order after the root's key has grown.
    ///
    /// On a heap that is already ordered this leaves every slot untouched.
    pub fn sift_down_root(&mut self, key: impl Fn(usize) -> u32) {
        let len = self.slots.len();
        let mut idx = 0;
        loop {
            let left = 2 * idx + 1;
            let right = left + 1;
            if left >= len {
                break;
            }

            let mut lowest = left;
            if right < len && key(self.slots[right]) < key(self.slots[left]) {
                lowest = right;
            }
            if key(self.slots[idx]) <= key(self.slots[lowest]) {
                break;
            }

            self.slots.swap(idx, lowest);
            idx = lowest;
        }
    }

    /// Handles in heap (array) order
    pub fn as_slice(&self) -> &[usize] {
        &self.slots
    }

    #[cfg(test)]
    fn is_ordered(&self, key: impl Fn(usize) -> u32) -> bool {
        (1..self.slots.len()).all(|i| key(self.slots[(i - 1) / 2]) <= key(self.slots[i]))
    }
}

impl Default for HeightIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(heights: &[u32]) -> HeightIndex {
        let mut heap = HeightIndex::new();
        for handle in 0..heights.len() {
            heap.push(handle, |h| heights[h]);
        }
        heap
    }

    #[test]
    fn test_peek_returns_lowest() {
        let heights = [7, 3, 9, 1, 4];
        let heap = build(&heights);

        assert_eq!(heap.peek(), Some(3));
        assert!(heap.is_ordered(|h| heights[h]));
    }

    #[test]
    fn test_pop_drains_in_height_order() {
        let heights = [5, 2, 8, 2, 6, 0, 3];
        let mut heap = build(&heights);

        let mut drained = Vec::new();
        while let Some(handle) = heap.pop(|h| heights[h]) {
            drained.push(heights[handle]);
        }

        assert_eq!(drained, vec![0, 2, 2, 3, 5, 6, 8]);
        assert!(heap.is_empty());
    }

    #[test]
    fn test_grows_past_initial_capacity() {
        let heights: Vec<u32> = (0..37).rev().collect();
        let heap = build(&heights);

        assert_eq!(heap.len(), 37);
        assert_eq!(heap.peek(), Some(36));
    }

    #[test]
    fn test_sift_down_after_root_grows() {
        let mut heights = vec![1, 4, 2, 6, 5];
        let mut heap = build(&heights);
        assert_eq!(heap.peek(), Some(0));

        heights[0] = 10;
        heap.sift_down_root(|h| heights[h]);

        assert_eq!(heap.peek(), Some(2));
        assert!(heap.is_ordered(|h| heights[h]));
    }

    #[test]
    fn test_sift_down_on_valid_heap_is_noop() {
        let heights = [3, 8, 1, 1, 9, 4, 4, 0];
        let mut heap = build(&heights);
        let before = heap.as_slice().to_vec();

        heap.sift_down_root(|h| heights[h]);
        heap.sift_down_root(|h| heights[h]);

        assert_eq!(heap.as_slice(), before.as_slice());
    }

    #[test]
    fn test_equal_keys_do_not_displace_root() {
        let heights = [0, 0, 0];
        let heap = build(&heights);

        assert_eq!(heap.peek(), Some(0));
    }
}
