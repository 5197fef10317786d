//! General helper utilities

pub mod delaunay_validation;

pub use delaunay_validation::*;

use crate::core::collections::{FastHashSet, fast_hash_set_with_capacity};
use crate::core::quad_edge::{EdgeRef, QuadEdge};
use crate::geometry::point::Point;
use crate::geometry::predicates::ccw;

/// Bounded triangular faces of `graph`, each as its three sites in
/// counter-clockwise order, one entry per face.
///
/// A face counts when its `lnext` orbit has length three and winds
/// counter-clockwise; the unbounded face of a three-site hull winds clockwise
/// and is skipped.
///
/// # Examples
///
/// ```rust
/// use voronoi_quadedge::core::quad_edge::QuadEdge;
/// use voronoi_quadedge::core::util::bounded_triangles;
/// use voronoi_quadedge::geometry::point::Point;
///
/// let mut graph = QuadEdge::new();
/// let a = graph.make_edge_between(Point::new([0.0, 0.0]), Point::new([1.0, 0.0]));
/// let b = graph.make_edge_between(Point::new([1.0, 0.0]), Point::new([0.0, 1.0]));
/// graph.splice(a.sym(), b);
/// graph.connect(b, a);
///
/// assert_eq!(bounded_triangles(&graph).len(), 1);
/// ```
#[must_use]
pub fn bounded_triangles(graph: &QuadEdge) -> Vec<[Point; 3]> {
    let mut seen: FastHashSet<EdgeRef> = fast_hash_set_with_capacity(2 * graph.number_of_quads());
    let mut triangles = Vec::new();
    for e in graph.edges().flat_map(|e| [e, e.sym()]) {
        if seen.contains(&e) {
            continue;
        }
        let ring = graph.lnext_orbit(e);
        seen.extend(ring.iter().copied());
        if let [a, b, c] = *ring.as_slice() {
            let triangle = [graph.site(a), graph.site(b), graph.site(c)];
            if ccw(triangle[0], triangle[1], triangle[2]) {
                triangles.push(triangle);
            }
        }
    }
    triangles
}

/// All sites referenced by `graph`, sorted by `(x, y)` and deduplicated.
#[must_use]
pub fn collect_sites(graph: &QuadEdge) -> Vec<Point> {
    let mut sites: Vec<Point> = graph
        .edges()
        .flat_map(|e| [graph.site(e), graph.dest_site(e)])
        .collect();
    sites.sort_unstable();
    sites.dedup();
    sites
}
