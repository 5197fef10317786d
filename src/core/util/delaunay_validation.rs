//! Delaunay empty-circumcircle property validation utilities.

#![forbid(unsafe_code)]

use thiserror::Error;

use crate::core::quad_edge::QuadEdge;
use crate::core::util::{bounded_triangles, collect_sites};
use crate::geometry::point::Point;
use crate::geometry::predicates::in_circle;

/// Errors that can occur during Delaunay property validation.
///
/// # Examples
///
/// ```rust
/// use voronoi_quadedge::core::util::DelaunayValidationError;
/// use voronoi_quadedge::geometry::point::Point;
///
/// let err = DelaunayValidationError::DelaunayViolation {
///     triangle: [Point::new([0.0, 0.0]), Point::new([1.0, 0.0]), Point::new([0.0, 1.0])],
///     site: Point::new([0.4, 0.4]),
/// };
/// assert!(err.to_string().contains("inside circumcircle"));
/// ```
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DelaunayValidationError {
    /// A site lies strictly inside the circumcircle of a triangle.
    #[error(
        "Triangle ({}, {}, {}) violates Delaunay property: site {site} is inside circumcircle",
        .triangle[0],
        .triangle[1],
        .triangle[2]
    )]
    DelaunayViolation {
        /// The offending triangle, counter-clockwise.
        triangle: [Point; 3],
        /// A site inside its circumcircle.
        site: Point,
    },
}

/// A triangle together with one site inside its circumcircle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DelaunayViolation {
    /// The offending triangle, counter-clockwise.
    pub triangle: [Point; 3],
    /// A site strictly inside its circumcircle.
    pub site: Point,
}

impl From<DelaunayViolation> for DelaunayValidationError {
    fn from(violation: DelaunayViolation) -> Self {
        Self::DelaunayViolation {
            triangle: violation.triangle,
            site: violation.site,
        }
    }
}

/// Every `(triangle, site)` pair where the site lies strictly inside the
/// triangle's circumcircle.
///
/// Checks each bounded triangle against every site, so the cost is
/// `O(triangles × sites)`. Co-circular sites are never reported.
#[must_use]
pub fn find_delaunay_violations(graph: &QuadEdge) -> Vec<DelaunayViolation> {
    let sites = collect_sites(graph);
    let triangles = bounded_triangles(graph);
    tracing::debug!(
        triangles = triangles.len(),
        sites = sites.len(),
        "checking empty-circumcircle property"
    );

    let mut violations = Vec::new();
    for triangle in triangles {
        let [a, b, c] = triangle;
        for &site in &sites {
            if in_circle(a, b, c, site) {
                tracing::debug!(%a, %b, %c, %site, "Delaunay violation");
                violations.push(DelaunayViolation { triangle, site });
            }
        }
    }
    violations
}

/// Check that no site lies inside the circumcircle of any bounded triangle.
///
/// # Errors
///
/// Returns the first violation found as
/// [`DelaunayValidationError::DelaunayViolation`].
pub fn validate_delaunay(graph: &QuadEdge) -> Result<(), DelaunayValidationError> {
    match find_delaunay_violations(graph).into_iter().next() {
        Some(violation) => Err(violation.into()),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::algorithms::divide_and_conquer::delaunay;

    fn p(x: f64, y: f64) -> Point {
        Point::new([x, y])
    }

    #[test]
    fn delaunay_output_has_no_violations() {
        let sites = [
            p(0.0, 0.0),
            p(0.5, 3.0),
            p(1.0, 1.0),
            p(2.0, -1.0),
            p(2.5, 2.0),
            p(3.0, 0.5),
        ];
        let mut graph = QuadEdge::new();
        delaunay(&mut graph, &sites);
        assert!(find_delaunay_violations(&graph).is_empty());
        assert_eq!(validate_delaunay(&graph), Ok(()));
    }

    #[test]
    fn flipped_diagonal_is_reported() {
        // Thin quad with the long diagonal: each triangle's circumcircle
        // swallows the opposite site.
        let (a, b, c, d) = (p(0.0, 0.0), p(2.0, -0.5), p(4.0, 0.0), p(2.0, 0.5));
        let mut graph = QuadEdge::new();
        let ab = graph.make_edge_between(a, b);
        let bc = graph.make_edge_between(b, c);
        graph.splice(ab.sym(), bc);
        let ca = graph.connect(bc, ab);
        let cd = graph.make_edge_between(c, d);
        graph.splice(bc.sym(), cd);
        graph.connect(cd, ca.sym());

        let violations = find_delaunay_violations(&graph);
        assert_eq!(violations.len(), 2);
        assert!(matches!(
            validate_delaunay(&graph),
            Err(DelaunayValidationError::DelaunayViolation { .. })
        ));
    }
}
