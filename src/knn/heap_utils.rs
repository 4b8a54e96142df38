//! This module contains a bounded max-heap that keeps the k closest reference indices.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use ordered_float::OrderedFloat; // For using f64 in BinaryHeap

/// A candidate neighbor: distance to the query plus the reference index.
#[derive(Debug, Clone, Copy)]
pub struct HeapElement {
    pub distance: OrderedFloat<f64>,
    pub index: usize,
}

impl PartialEq for HeapElement {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for HeapElement {}

impl PartialOrd for HeapElement {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapElement {
    fn cmp(&self, other: &Self) -> Ordering {
        // Ties on distance fall back to the reference index, so the worst
        // element on top is the one with the larger index.
        self.distance
            .cmp(&other.distance)
            .then_with(|| self.index.cmp(&other.index))
    }
}

/// Keeps the `capacity` smallest (distance, index) pairs seen so far.
#[derive(Debug)]
pub struct KBestNeighbors {
    capacity: usize,
    heap: BinaryHeap<HeapElement>,
}

impl KBestNeighbors {
    pub fn new(capacity: usize) -> Self {
        KBestNeighbors {
            capacity,
            heap: BinaryHeap::with_capacity(capacity + 1), // +1 for easier logic
        }
    }

    pub fn add(&mut self, distance: f64, index: usize) {
        if self.capacity == 0 { return; }
        let item = HeapElement { distance: OrderedFloat(distance), index };
        if self.heap.len() < self.capacity {
            self.heap.push(item);
        } else if self.heap.peek().is_some_and(|top| item < *top) {
            self.heap.pop();
            self.heap.push(item);
        }
    }

    /// Indices ordered by ascending (distance, index).
    pub fn into_sorted_indices(self) -> Vec<usize> {
        self.heap.into_sorted_vec().into_iter().map(|elem| elem.index).collect()
    }

    /// Returns the current number of neighbors stored.
    pub fn len(&self) -> usize {
        self.heap.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keeps_smallest_in_order() {
        let mut best = KBestNeighbors::new(3);
        for (i, d) in [5.0, 1.0, 4.0, 2.0, 3.0].iter().enumerate() {
            best.add(*d, i);
        }
        assert_eq!(best.len(), 3);
        assert_eq!(best.into_sorted_indices(), vec![1, 3, 4]);
    }

    #[test]
    fn test_ties_prefer_lower_index() {
        let mut best = KBestNeighbors::new(2);
        best.add(1.0, 4);
        best.add(1.0, 2);
        best.add(1.0, 0);
        best.add(1.0, 3);
        assert_eq!(best.into_sorted_indices(), vec![0, 2]);
    }

    #[test]
    fn test_zero_capacity_stores_nothing() {
        let mut best = KBestNeighbors::new(0);
        best.add(0.0, 0);
        assert_eq!(best.len(), 0);
    }
}
