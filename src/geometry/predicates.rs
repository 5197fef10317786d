//! Geometric predicates for the planar Delaunay construction.
//!
//! Both predicates are plain IEEE double evaluations of a determinant sign.
//! There is no adaptive or exact fallback: results near zero are subject to
//! round-off. Exact zeros break ties conservatively, so a collinear triple is
//! never counter-clockwise and a co-circular quadruple is never "inside".

use std::fmt;

use crate::geometry::matrix::{determinant3, in_circle_determinant, orientation_matrix};
use crate::geometry::point::Point;

/// Represents the position of a point relative to an oriented circumcircle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InCircle {
    /// The point is outside the circumcircle
    OUTSIDE,
    /// The determinant is exactly zero, or fewer than four distinct points were given
    BOUNDARY,
    /// The point is strictly inside the circumcircle
    INSIDE,
}

impl fmt::Display for InCircle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OUTSIDE => write!(f, "OUTSIDE"),
            Self::BOUNDARY => write!(f, "BOUNDARY"),
            Self::INSIDE => write!(f, "INSIDE"),
        }
    }
}

/// Represents the orientation of a triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Clockwise (determinant < 0)
    NEGATIVE,
    /// Collinear (determinant == 0)
    DEGENERATE,
    /// Counter-clockwise (determinant > 0)
    POSITIVE,
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NEGATIVE => write!(f, "NEGATIVE"),
            Self::DEGENERATE => write!(f, "DEGENERATE"),
            Self::POSITIVE => write!(f, "POSITIVE"),
        }
    }
}

/// Orientation of the triangle `a, b, c` from the sign of
///
/// ```text
/// | ax  ay  1 |
/// | bx  by  1 |
/// | cx  cy  1 |
/// ```
///
/// # Example
///
/// ```
/// use voronoi_quadedge::geometry::point::Point;
/// use voronoi_quadedge::geometry::predicates::{orientation, Orientation};
///
/// let a = Point::new([0.0, 0.0]);
/// let b = Point::new([1.0, 0.0]);
/// let c = Point::new([0.0, 1.0]);
/// assert_eq!(orientation(a, b, c), Orientation::POSITIVE);
/// assert_eq!(orientation(a, c, b), Orientation::NEGATIVE);
/// ```
#[must_use]
pub fn orientation(a: Point, b: Point, c: Point) -> Orientation {
    let det = determinant3(&orientation_matrix(a, b, c));
    if det > 0.0 {
        Orientation::POSITIVE
    } else if det < 0.0 {
        Orientation::NEGATIVE
    } else {
        Orientation::DEGENERATE
    }
}

/// Returns `true` iff `a, b, c` form a strictly counter-clockwise triangle.
///
/// Collinear triples return `false`.
#[inline]
#[must_use]
pub fn ccw(a: Point, b: Point, c: Point) -> bool {
    orientation(a, b, c) == Orientation::POSITIVE
}

/// Classify `d` against the oriented circle through `a, b, c`.
///
/// The sign is that of the lifted determinant (see
/// [`in_circle_determinant`](crate::geometry::matrix::in_circle_determinant)).
///
/// If fewer than four distinct points are given the determinant is never
/// evaluated and the result is [`InCircle::BOUNDARY`]; round-off on coincident
/// points would otherwise produce an arbitrary sign.
///
/// # Example
///
/// ```
/// use voronoi_quadedge::geometry::point::Point;
/// use voronoi_quadedge::geometry::predicates::{in_circle_classify, InCircle};
///
/// let a = Point::new([0.0, 0.0]);
/// let b = Point::new([1.0, 0.0]);
/// let c = Point::new([0.0, 1.0]);
/// assert_eq!(in_circle_classify(a, b, c, Point::new([0.4, 0.4])), InCircle::INSIDE);
/// assert_eq!(in_circle_classify(a, b, c, Point::new([1.0, 1.0])), InCircle::BOUNDARY);
/// assert_eq!(in_circle_classify(a, b, c, a), InCircle::BOUNDARY);
/// ```
#[must_use]
pub fn in_circle_classify(a: Point, b: Point, c: Point, d: Point) -> InCircle {
    if !all_distinct(&[a, b, c, d]) {
        return InCircle::BOUNDARY;
    }
    let det = in_circle_determinant(a, b, c, d);
    if det > 0.0 {
        InCircle::INSIDE
    } else if det < 0.0 {
        InCircle::OUTSIDE
    } else {
        InCircle::BOUNDARY
    }
}

/// Returns `true` iff `d` lies strictly inside the oriented circumcircle of
/// `a, b, c` (for a counter-clockwise `a, b, c`).
///
/// Returns `false` whenever the four points are not pairwise distinct.
#[inline]
#[must_use]
pub fn in_circle(a: Point, b: Point, c: Point, d: Point) -> bool {
    in_circle_classify(a, b, c, d) == InCircle::INSIDE
}

/// `x` is strictly right of the directed segment `org -> dest`.
#[inline]
#[must_use]
pub fn right_of(x: Point, org: Point, dest: Point) -> bool {
    ccw(x, dest, org)
}

/// `x` is strictly left of the directed segment `org -> dest`.
#[inline]
#[must_use]
pub fn left_of(x: Point, org: Point, dest: Point) -> bool {
    ccw(x, org, dest)
}

fn all_distinct(points: &[Point]) -> bool {
    points
        .iter()
        .enumerate()
        .all(|(i, p)| points[i + 1..].iter().all(|q| p != q))
}
