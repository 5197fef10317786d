//! Two-dimensional sites and Voronoi vertices.
//!
//! # Special Floating-Point Equality Semantics
//!
//! Equality, hashing and ordering of [`Point`] go through
//! [`OrderedFloat`], which differs from IEEE 754 comparison:
//! - `NaN` compares equal to itself, so a [`Point`] can be a hash-set key
//! - `-0.0` and `0.0` compare equal
//! - ordering is total and lexicographic by `(x, y)`
//!
//! Sites handed to the Delaunay builder are expected to be sorted under this
//! ordering. If you need IEEE semantics, compare the coordinates directly.

#![forbid(unsafe_code)]

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Sub};
use thiserror::Error;

/// Errors raised when a point is unusable as a triangulation site.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum PointValidationError {
    /// A coordinate is NaN or infinite.
    #[error("Invalid coordinate at index {coordinate_index}: {coordinate_value}")]
    NonFiniteCoordinate {
        /// Which coordinate (0 = x, 1 = y) failed.
        coordinate_index: usize,
        /// The offending value, formatted.
        coordinate_value: String,
    },
}

/// An immutable point in the plane.
///
/// Sites of the triangulation and vertices of the Voronoi diagram share this
/// type. Serialized as a two-element array `[x, y]`.
///
/// # Examples
///
/// ```rust
/// use voronoi_quadedge::geometry::point::Point;
///
/// let p = Point::new([1.0, 2.0]);
/// assert_eq!(p.coords(), &[1.0, 2.0]);
/// assert_eq!((p.x(), p.y()), (1.0, 2.0));
/// ```
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Point {
    coords: [f64; 2],
}

impl Point {
    /// Create a point from its `[x, y]` coordinates.
    #[inline]
    #[must_use]
    pub const fn new(coords: [f64; 2]) -> Self {
        Self { coords }
    }

    /// The point used for a dual vertex that lies at infinity.
    #[inline]
    #[must_use]
    pub const fn at_infinity() -> Self {
        Self::new([f64::INFINITY, f64::INFINITY])
    }

    /// Read-only access to the coordinates.
    #[inline]
    #[must_use]
    pub const fn coords(&self) -> &[f64; 2] {
        &self.coords
    }

    /// The x coordinate.
    #[inline]
    #[must_use]
    pub const fn x(&self) -> f64 {
        self.coords[0]
    }

    /// The y coordinate.
    #[inline]
    #[must_use]
    pub const fn y(&self) -> f64 {
        self.coords[1]
    }

    /// Returns `true` when both coordinates are finite.
    #[inline]
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        self.coords[0].is_finite() && self.coords[1].is_finite()
    }

    /// Check that both coordinates are finite.
    ///
    /// # Errors
    ///
    /// Returns [`PointValidationError::NonFiniteCoordinate`] naming the first
    /// coordinate that is NaN or infinite.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use voronoi_quadedge::geometry::point::Point;
    ///
    /// assert!(Point::new([0.0, 1.0]).validate().is_ok());
    /// assert!(Point::new([f64::NAN, 1.0]).validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), PointValidationError> {
        for (index, &coord) in self.coords.iter().enumerate() {
            if !coord.is_finite() {
                return Err(PointValidationError::NonFiniteCoordinate {
                    coordinate_index: index,
                    coordinate_value: format!("{coord:?}"),
                });
            }
        }
        Ok(())
    }

    fn ordered(&self) -> [OrderedFloat<f64>; 2] {
        [OrderedFloat(self.coords[0]), OrderedFloat(self.coords[1])]
    }
}

impl Hash for Point {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ordered().hash(state);
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.ordered() == other.ordered()
    }
}

impl Eq for Point {}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Point {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ordered().cmp(&other.ordered())
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.coords[0], self.coords[1])
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new([self.coords[0] + rhs.coords[0], self.coords[1] + rhs.coords[1]])
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new([self.coords[0] - rhs.coords[0], self.coords[1] - rhs.coords[1]])
    }
}

impl From<[f64; 2]> for Point {
    #[inline]
    fn from(coords: [f64; 2]) -> Self {
        Self::new(coords)
    }
}

impl From<(f64, f64)> for Point {
    #[inline]
    fn from((x, y): (f64, f64)) -> Self {
        Self::new([x, y])
    }
}

impl From<Point> for [f64; 2] {
    #[inline]
    fn from(point: Point) -> Self {
        point.coords
    }
}

impl From<Point> for (f64, f64) {
    #[inline]
    fn from(point: Point) -> Self {
        (point.coords[0], point.coords[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::collections::FastHashSet;

    #[test]
    fn point_accessors() {
        let p = Point::new([3.5, -1.0]);
        assert_eq!(p.x(), 3.5);
        assert_eq!(p.y(), -1.0);
        assert_eq!(<[f64; 2]>::from(p), [3.5, -1.0]);
        assert_eq!(<(f64, f64)>::from(p), (3.5, -1.0));
        assert_eq!(Point::from((3.5, -1.0)), p);
    }

    #[test]
    fn point_ordering_is_lexicographic() {
        let mut points = vec![
            Point::new([1.0, 2.0]),
            Point::new([0.0, 5.0]),
            Point::new([1.0, -1.0]),
        ];
        points.sort();
        assert_eq!(
            points,
            vec![
                Point::new([0.0, 5.0]),
                Point::new([1.0, -1.0]),
                Point::new([1.0, 2.0]),
            ]
        );
    }

    #[test]
    fn point_nan_equality_and_hashing() {
        let a = Point::new([f64::NAN, 1.0]);
        let b = Point::new([f64::NAN, 1.0]);
        assert_eq!(a, b);

        let mut set = FastHashSet::default();
        set.insert(a);
        set.insert(b);
        set.insert(Point::new([0.0, 0.0]));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn point_validation_reports_first_bad_coordinate() {
        let err = Point::new([0.0, f64::INFINITY]).validate().unwrap_err();
        assert!(matches!(
            err,
            PointValidationError::NonFiniteCoordinate {
                coordinate_index: 1,
                ..
            }
        ));
        assert!(!Point::at_infinity().is_finite());
    }

    #[test]
    fn point_arithmetic() {
        let a = Point::new([1.0, 2.0]);
        let b = Point::new([0.5, 4.0]);
        assert_eq!(a + b, Point::new([1.5, 6.0]));
        assert_eq!(a - b, Point::new([0.5, -2.0]));
    }

    #[test]
    fn point_serializes_as_array() {
        let p = Point::new([1.5, -2.0]);
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, "[1.5,-2.0]");
        let back: Point = serde_json::from_str(&json).unwrap();
        assert_eq!(back, p);
    }
}
