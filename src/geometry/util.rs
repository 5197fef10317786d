//! Geometric utility functions for triangle and Voronoi vertex calculations.

#![forbid(unsafe_code)]

use crate::geometry::point::Point;

/// Euclidean distance between two points.
///
/// # Examples
///
/// ```rust
/// use voronoi_quadedge::geometry::point::Point;
/// use voronoi_quadedge::geometry::util::distance;
///
/// let d = distance(Point::new([0.0, 0.0]), Point::new([3.0, 4.0]));
/// assert!((d - 5.0).abs() < 1e-12);
/// ```
#[inline]
#[must_use]
pub fn distance(a: Point, b: Point) -> f64 {
    (b.x() - a.x()).hypot(b.y() - a.y())
}

/// Interior angle at `a` of the triangle `a, b, c`, in radians, by the law of
/// cosines.
///
/// The cosine is clamped to `[-1, 1]` before `acos` so that round-off on
/// nearly flat triangles yields `0` or `π` rather than NaN. A zero-length side
/// still produces NaN.
#[must_use]
pub fn interior_angle(a: Point, b: Point, c: Point) -> f64 {
    let opposite = distance(b, c);
    let side_b = distance(a, c);
    let side_c = distance(a, b);
    let cosine = side_c.mul_add(side_c, side_b.mul_add(side_b, -(opposite * opposite)))
        / (2.0 * side_b * side_c);
    cosine.clamp(-1.0, 1.0).acos()
}

/// Circumcenter of the triangle `a, b, c` in trigonometric (barycentric) form.
///
/// With interior angles `α, β, γ` at `a, b, c`, each coordinate is
///
/// ```text
/// (a·sin 2α + b·sin 2β + c·sin 2γ) / (sin 2α + sin 2β + sin 2γ)
/// ```
///
/// The denominator equals `4·sin α·sin β·sin γ`, so it tends to zero as the
/// triangle degenerates and the result loses precision accordingly. Collinear
/// input yields a meaningless point and coincident vertices yield NaN; callers
/// decide what to do with either.
///
/// # Examples
///
/// ```rust
/// use voronoi_quadedge::geometry::point::Point;
/// use voronoi_quadedge::geometry::util::circumcenter;
///
/// let center = circumcenter(
///     Point::new([0.0, 0.0]),
///     Point::new([2.0, 0.0]),
///     Point::new([1.0, 3.0_f64.sqrt()]),
/// );
/// assert!((center.x() - 1.0).abs() < 1e-9);
/// assert!((center.y() - 3.0_f64.sqrt() / 3.0).abs() < 1e-9);
/// ```
#[must_use]
pub fn circumcenter(a: Point, b: Point, c: Point) -> Point {
    let weights = [
        (2.0 * interior_angle(a, b, c)).sin(),
        (2.0 * interior_angle(b, c, a)).sin(),
        (2.0 * interior_angle(c, a, b)).sin(),
    ];
    let total: f64 = weights.iter().sum();
    let weighted = |coord: fn(&Point) -> f64| {
        [a, b, c]
            .iter()
            .zip(weights)
            .map(|(p, w)| coord(p) * w)
            .sum::<f64>()
            / total
    };
    Point::new([weighted(Point::x), weighted(Point::y)])
}

/// The vector `v` rotated a quarter turn counter-clockwise.
#[inline]
#[must_use]
pub fn perpendicular(v: Point) -> Point {
    Point::new([-v.y(), v.x()])
}
