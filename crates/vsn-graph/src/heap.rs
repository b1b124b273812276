//! Indexed binary min-heap.
//!
//! The standard-library `BinaryHeap` cannot decrease a key in place, which
//! the shortest-path engine needs (one element per vertex, relaxed while
//! queued).  This is the textbook 1-indexed array heap instead: for a node
//! at index `i`, the parent is `i / 2` and the children are `2i` and
//! `2i + 1`.  Indices in the public API are 1-based; index 0 is never valid.
//!
//! # Finding an element
//!
//! [`MinHeap::position`] is a linear scan of the live heap.  That makes the
//! relaxation step of Dijkstra O(n) per edge — the dominant cost term —
//! which is acceptable for the road-network sizes this simulator targets.
//! An implementation wanting sub-quadratic routing should maintain a
//! vertex → heap-index map updated on every swap instead.

use crate::error::{GraphError, GraphResult};

/// An element with a sortable distance key.
pub trait Keyed {
    fn key(&self) -> f64;
    fn set_key(&mut self, key: f64);
}

/// 1-indexed binary min-heap over [`Keyed`] elements.
pub struct MinHeap<T: Keyed> {
    /// Slot `i - 1` holds heap index `i`.
    items: Vec<T>,
}

impl<T: Keyed> MinHeap<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Heapify `items` bottom-up in O(n).
    pub fn build(items: Vec<T>) -> Self {
        let mut heap = Self { items };
        let n = heap.len();
        for i in (1..=n / 2).rev() {
            heap.sift_down(i);
        }
        heap
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The element at 1-based heap index `i`.
    pub fn get(&self, i: usize) -> Option<&T> {
        if i == 0 {
            return None;
        }
        self.items.get(i - 1)
    }

    /// Mutable access to the element at heap index `i`.
    ///
    /// The callback must not change the sort key — use
    /// [`decrease_key`](Self::decrease_key) for that.
    pub fn get_mut(&mut self, i: usize) -> Option<&mut T> {
        if i == 0 {
            return None;
        }
        self.items.get_mut(i - 1)
    }

    /// 1-based index of the first element matching `pred`, scanning the
    /// live heap linearly.
    pub fn position<P: Fn(&T) -> bool>(&self, pred: P) -> Option<usize> {
        self.items.iter().position(|t| pred(t)).map(|p| p + 1)
    }

    /// Insert an element, restoring the heap property by sifting up.
    pub fn insert(&mut self, item: T) {
        self.items.push(item);
        self.sift_up(self.items.len());
    }

    /// Remove and return the minimum-key element.
    ///
    /// Swaps the root with the last element, shrinks, and sifts the new
    /// root down.  Fails with `Underflow` on an empty heap.
    pub fn extract_min(&mut self) -> GraphResult<T> {
        if self.items.is_empty() {
            return Err(GraphError::Underflow);
        }
        let last = self.items.len() - 1;
        self.items.swap(0, last);
        let min = self.items.pop().unwrap();
        if !self.items.is_empty() {
            self.sift_down(1);
        }
        Ok(min)
    }

    /// Lower the key of the element at heap index `i` to `new_key` and sift
    /// it up.  Fails with `KeyIncreased` if `new_key` exceeds the current
    /// key (the heap is left untouched).
    pub fn decrease_key(&mut self, i: usize, new_key: f64) -> GraphResult<()> {
        let current = self
            .get(i)
            .map(Keyed::key)
            .ok_or(GraphError::Underflow)?;
        if new_key > current {
            return Err(GraphError::KeyIncreased { index: i, current, requested: new_key });
        }
        self.items[i - 1].set_key(new_key);
        self.sift_up(i);
        Ok(())
    }

    // ── Internal sifting (1-based indices) ────────────────────────────────

    fn key_at(&self, i: usize) -> f64 {
        self.items[i - 1].key()
    }

    fn sift_up(&mut self, mut i: usize) {
        while i > 1 && self.key_at(i / 2) > self.key_at(i) {
            self.items.swap(i - 1, i / 2 - 1);
            i /= 2;
        }
    }

    fn sift_down(&mut self, i: usize) {
        let n = self.items.len();
        let left = 2 * i;
        let right = 2 * i + 1;

        let mut smallest = i;
        if left <= n && self.key_at(left) < self.key_at(smallest) {
            smallest = left;
        }
        if right <= n && self.key_at(right) < self.key_at(smallest) {
            smallest = right;
        }
        if smallest != i {
            self.items.swap(i - 1, smallest - 1);
            self.sift_down(smallest);
        }
    }
}

impl<T: Keyed> Default for MinHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}
