//! Matrix operations.
//!
//! Small, stack-allocated homogeneous matrices used by the geometric
//! predicates. Both predicates are the sign of a determinant:
//!
//! ```text
//! orientation            in-circle (lifted paraboloid)
//! | ax  ay  1 |          | ax  ay  ax²+ay²  1 |
//! | bx  by  1 |          | bx  by  bx²+by²  1 |
//! | cx  cy  1 |          | cx  cy  cx²+cy²  1 |
//!                        | dx  dy  dx²+dy²  1 |
//! ```

#![forbid(unsafe_code)]

use nalgebra as na;

use crate::geometry::point::Point;

/// 3×3 matrix for the orientation determinant.
pub type Matrix3 = na::Matrix3<f64>;

/// Squared distance from the origin, the "lift" onto the paraboloid `z = x² + y²`.
#[inline]
#[must_use]
pub fn lift(p: Point) -> f64 {
    p.x().mul_add(p.x(), p.y() * p.y())
}

/// Build the homogeneous orientation matrix for `a, b, c`.
///
/// # Examples
///
/// ```rust
/// use voronoi_quadedge::geometry::matrix::{determinant3, orientation_matrix};
/// use voronoi_quadedge::geometry::point::Point;
///
/// let m = orientation_matrix(
///     Point::new([0.0, 0.0]),
///     Point::new([1.0, 0.0]),
///     Point::new([0.0, 1.0]),
/// );
/// assert!((determinant3(&m) - 1.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn orientation_matrix(a: Point, b: Point, c: Point) -> Matrix3 {
    Matrix3::new(
        a.x(), a.y(), 1.0, //
        b.x(), b.y(), 1.0, //
        c.x(), c.y(), 1.0,
    )
}

/// Determinant of a 3×3 matrix.
#[inline]
#[must_use]
pub fn determinant3(m: &Matrix3) -> f64 {
    m.determinant()
}

/// Lifted in-circle determinant (see the module docs) for `a, b, c, d`,
/// evaluated by first subtracting the `d` row from the others.
///
/// The last column then reduces to `(0, 0, 0, 1)`, leaving the 3×3 minor
///
/// ```text
/// | ax-dx  ay-dy  |a-d|² |
/// | bx-dx  by-dy  |b-d|² |
/// | cx-dx  cy-dy  |c-d|² |
/// ```
///
/// which has the same value as the 4×4 determinant (the lift differs from
/// `|a|² - |d|²` only by a combination of the first two columns) but avoids
/// the LU round-off of the general 4×4 path.
#[must_use]
pub fn in_circle_determinant(a: Point, b: Point, c: Point, d: Point) -> f64 {
    let (ad, bd, cd) = (a - d, b - d, c - d);
    let minor = Matrix3::new(
        ad.x(), ad.y(), lift(ad), //
        bd.x(), bd.y(), lift(bd), //
        cd.x(), cd.y(), lift(cd),
    );
    determinant3(&minor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn orientation_determinant_is_twice_signed_area() {
        let m = orientation_matrix(
            Point::new([0.0, 0.0]),
            Point::new([4.0, 0.0]),
            Point::new([0.0, 3.0]),
        );
        assert_relative_eq!(determinant3(&m), 12.0, epsilon = 1e-12);

        let flipped = orientation_matrix(
            Point::new([0.0, 0.0]),
            Point::new([0.0, 3.0]),
            Point::new([4.0, 0.0]),
        );
        assert_relative_eq!(determinant3(&flipped), -12.0, epsilon = 1e-12);
    }

    fn lifted_matrix(a: Point, b: Point, c: Point, d: Point) -> na::Matrix4<f64> {
        na::Matrix4::new(
            a.x(), a.y(), lift(a), 1.0, //
            b.x(), b.y(), lift(b), 1.0, //
            c.x(), c.y(), lift(c), 1.0, //
            d.x(), d.y(), lift(d), 1.0,
        )
    }

    #[test]
    fn in_circle_determinant_sign() {
        let a = Point::new([0.0, 0.0]);
        let b = Point::new([1.0, 0.0]);
        let c = Point::new([0.0, 1.0]);
        let inside = in_circle_determinant(a, b, c, Point::new([0.4, 0.4]));
        let outside = in_circle_determinant(a, b, c, Point::new([2.0, 2.0]));
        assert!(inside > 0.0);
        assert!(outside < 0.0);
    }

    #[test]
    fn reduced_in_circle_determinant_matches_full_matrix() {
        let a = Point::new([0.5, -1.0]);
        let b = Point::new([3.0, 0.25]);
        let c = Point::new([-1.0, 2.0]);
        let d = Point::new([0.75, 0.5]);
        let full = lifted_matrix(a, b, c, d).determinant();
        assert_relative_eq!(in_circle_determinant(a, b, c, d), full, epsilon = 1e-9);
    }

    #[test]
    fn reduced_in_circle_determinant_is_exact_on_cocircular_grid_points() {
        let det = in_circle_determinant(
            Point::new([0.0, 0.0]),
            Point::new([1.0, 0.0]),
            Point::new([1.0, 1.0]),
            Point::new([0.0, 1.0]),
        );
        assert_eq!(det, 0.0);
    }

    #[test]
    fn lift_is_squared_norm() {
        assert_relative_eq!(lift(Point::new([3.0, 4.0])), 25.0);
    }
}
