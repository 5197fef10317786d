//! Euler characteristic of a planar subdivision.
//!
//! For a connected subdivision of the plane, χ = V − E + F = 2, where F counts
//! the unbounded face. Faces are the `lnext` orbits of the primal edge records,
//! so an open chain of collinear sites has exactly one face.
//!
//! # Examples
//!
//! ```rust
//! use voronoi_quadedge::core::algorithms::divide_and_conquer::delaunay;
//! use voronoi_quadedge::core::quad_edge::QuadEdge;
//! use voronoi_quadedge::geometry::point::Point;
//! use voronoi_quadedge::topology::characteristics::euler;
//!
//! let sites = [
//!     Point::new([0.0, 0.0]),
//!     Point::new([1.0, 2.0]),
//!     Point::new([2.0, 0.0]),
//! ];
//! let mut graph = QuadEdge::new();
//! delaunay(&mut graph, &sites);
//!
//! let counts = euler::count_elements(&graph);
//! assert_eq!((counts.vertices, counts.edges, counts.faces), (3, 3, 2));
//! assert_eq!(euler::euler_characteristic(&counts), 2);
//! ```

use crate::core::collections::{FastHashSet, fast_hash_set_with_capacity};
use crate::core::quad_edge::{EdgeRef, QuadEdge};
use crate::geometry::point::Point;

/// Euler characteristic of a connected planar subdivision, counting the
/// unbounded face.
pub const PLANAR_EULER_CHARACTERISTIC: isize = 2;

/// Element counts of a planar subdivision.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SubdivisionCounts {
    /// Distinct sites.
    pub vertices: usize,
    /// Undirected edges (quads).
    pub edges: usize,
    /// Faces, including the unbounded one.
    pub faces: usize,
}

/// Count sites, edges and faces of `graph`.
///
/// # Panics
///
/// Panics if a primal record has no site.
#[must_use]
pub fn count_elements(graph: &QuadEdge) -> SubdivisionCounts {
    let directed: Vec<EdgeRef> = graph.edges().flat_map(|e| [e, e.sym()]).collect();

    let vertices: FastHashSet<Point> = directed.iter().map(|&e| graph.site(e)).collect();

    let mut seen: FastHashSet<EdgeRef> = fast_hash_set_with_capacity(directed.len());
    let mut faces = 0;
    for &e in &directed {
        if seen.contains(&e) {
            continue;
        }
        faces += 1;
        seen.extend(graph.lnext_orbit(e));
    }

    SubdivisionCounts {
        vertices: vertices.len(),
        edges: graph.number_of_quads(),
        faces,
    }
}

/// χ = V − E + F.
#[must_use]
pub fn euler_characteristic(counts: &SubdivisionCounts) -> isize {
    let signed = |n: usize| isize::try_from(n).unwrap_or(isize::MAX);
    signed(counts.vertices) - signed(counts.edges) + signed(counts.faces)
}
