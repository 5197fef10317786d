//! Canonical edge identifiers for traversal bookkeeping.
//!
//! A directed primal edge and its symmetric counterpart describe the same
//! segment of the triangulation. Graph searches over the quad-edge structure
//! need to treat the two as one when marking edges visited, without changing
//! what handle equality means. [`EdgeKey`]:
//!
//! - identifies an edge purely by its two endpoint sites
//! - canonicalizes endpoint ordering so `(a, b)` and `(b, a)` map to the same key
//! - is `Copy`/`Hash`/`Ord` for fast use in sets and maps
//!
//! Two distinct edges joining duplicate sites collapse onto one key. Sites are
//! expected to be distinct; deduplication is the caller's job.

use crate::geometry::point::Point;

/// Canonical identifier for an (undirected) primal edge.
///
/// # Examples
///
/// ```rust
/// use voronoi_quadedge::core::edge::EdgeKey;
/// use voronoi_quadedge::geometry::point::Point;
///
/// let a = Point::new([0.0, 0.0]);
/// let b = Point::new([1.0, 0.0]);
/// assert_eq!(EdgeKey::new(a, b), EdgeKey::new(b, a));
/// assert_eq!(EdgeKey::new(b, a).endpoints(), (a, b));
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    v0: Point,
    v1: Point,
}

impl EdgeKey {
    /// Creates a new canonical edge key; endpoints are reordered so `v0 <= v1`.
    #[must_use]
    pub fn new(a: Point, b: Point) -> Self {
        if a <= b {
            Self { v0: a, v1: b }
        } else {
            Self { v0: b, v1: a }
        }
    }

    /// Returns the lexicographically smaller endpoint.
    #[inline]
    #[must_use]
    pub const fn v0(self) -> Point {
        self.v0
    }

    /// Returns the lexicographically larger endpoint.
    #[inline]
    #[must_use]
    pub const fn v1(self) -> Point {
        self.v1
    }

    /// Returns the two endpoints as a tuple.
    #[inline]
    #[must_use]
    pub const fn endpoints(self) -> (Point, Point) {
        (self.v0, self.v1)
    }
}

impl From<(Point, Point)> for EdgeKey {
    #[inline]
    fn from((a, b): (Point, Point)) -> Self {
        Self::new(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::collections::FastHashSet;

    #[test]
    fn edge_key_is_canonical() {
        let a = Point::new([2.0, 1.0]);
        let b = Point::new([-1.0, 5.0]);

        let e1 = EdgeKey::new(a, b);
        let e2 = EdgeKey::new(b, a);

        assert_eq!(e1, e2);
        assert!(e1.v0() <= e1.v1());
        assert_eq!(e1.v0(), b);
    }

    #[test]
    fn edge_key_deduplicates_in_sets() {
        let a = Point::new([0.0, 0.0]);
        let b = Point::new([0.0, 1.0]);
        let c = Point::new([1.0, 0.0]);

        let mut set = FastHashSet::default();
        set.insert(EdgeKey::new(a, b));
        set.insert(EdgeKey::new(b, a));
        set.insert(EdgeKey::from((a, c)));
        assert_eq!(set.len(), 2);
    }
}
