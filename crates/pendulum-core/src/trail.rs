//! Bounded history of recent positions for drawing motion trails.

use std::collections::VecDeque;

use itertools::Itertools;

use crate::Vec2;

/// A fixed-capacity ring buffer of points, newest first.
///
/// Once full, pushing a new point discards the oldest one.
#[derive(Clone, Debug)]
pub struct Trail {
    points: VecDeque<Vec2>,
    capacity: usize,
}

impl Default for Trail {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

impl Trail {
    /// Capacity of a trail created with [`Default`].
    pub const DEFAULT_CAPACITY: usize = 60;

    /// Create an empty trail holding at most `capacity` points.
    pub fn new(capacity: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Record a new point, dropping the oldest if the trail is full.
    pub fn push(&mut self, point: Vec2) {
        if self.capacity == 0 {
            return;
        }
        self.points.push_front(point);
        if self.points.len() > self.capacity {
            self.points.pop_back();
        }
    }

    /// Remove all points.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Maximum number of points held.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of points currently held.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the trail has no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The most recently pushed point.
    pub fn newest(&self) -> Option<&Vec2> {
        self.points.front()
    }

    /// Iterate over the points from newest to oldest.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Vec2> + DoubleEndedIterator + '_ {
        self.points.iter()
    }

    /// The polyline from `head` through the trail, newest first.
    ///
    /// `head` is usually the drawn position of the bob,
    /// which may lie between recorded points when drawing interpolated frames.
    /// Repeated consecutive points are merged,
    /// so a head equal to the newest point is not doubled.
    pub fn polyline_from(&self, head: Vec2) -> impl Iterator<Item = Vec2> + '_ {
        std::iter::once(head)
            .chain(self.points.iter().copied())
            .dedup()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(i: usize) -> Vec2 {
        Vec2::new(i as f64, -(i as f64))
    }

    #[test]
    fn newest_first_and_bounded() {
        let mut trail = Trail::default();
        assert!(trail.is_empty());
        for i in 0..200 {
            trail.push(pt(i));
            assert_eq!(trail.len(), usize::min(i + 1, 60));
            assert_eq!(trail.newest(), Some(&pt(i)));
        }
        assert_eq!(trail.len(), Trail::DEFAULT_CAPACITY);
        itertools::assert_equal(trail.iter().copied(), (140..200).rev().map(pt));
    }

    #[test]
    fn polyline_starts_at_head() {
        let mut trail = Trail::new(4);
        for i in 0..3 {
            trail.push(pt(i));
        }
        itertools::assert_equal(trail.polyline_from(pt(7)), [pt(7), pt(2), pt(1), pt(0)]);
        // a head on the newest point isn't repeated
        itertools::assert_equal(trail.polyline_from(pt(2)), [pt(2), pt(1), pt(0)]);
        trail.clear();
        itertools::assert_equal(trail.polyline_from(pt(7)), [pt(7)]);
    }

    #[test]
    fn zero_capacity_stays_empty() {
        let mut trail = Trail::new(0);
        trail.push(pt(1));
        assert!(trail.is_empty());
        assert_eq!(trail.capacity(), 0);
    }
}
