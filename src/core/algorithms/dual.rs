//! Voronoi diagram as the dual of a finished Delaunay triangulation.
//!
//! The dual records of each quad already encode the Voronoi topology: the
//! dual record at a face is a Voronoi vertex, and the `onext` orbit of a site
//! walks the faces around it. [`compute_dual`] only attaches geometry:
//!
//! 1. The unbounded face (the right face of the hull ring) starts at infinity
//!    and remembers the hull sites.
//! 2. Every bounded face gets the circumcenter of its first three sites.
//! 3. Each hull edge's outer record is replaced by a finite point: the inner
//!    circumcenter pushed outward by the hull edge vector turned a quarter
//!    turn. The offset is one edge length, enough to carry the cell to the
//!    drawing boundary for typical layouts but not an exact asymptote.
//! 4. Every directed primal edge stores the polygon traced by the left-face
//!    vertices around its origin.

#![forbid(unsafe_code)]

use thiserror::Error;

use crate::core::collections::FaceVertexBuffer;
use crate::core::quad_edge::{DualVertex, EdgeRef, QuadEdge};
use crate::geometry::point::Point;
use crate::geometry::util::{circumcenter, perpendicular};

/// Errors from dual construction and queries on the dual.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DualError {
    /// The origin edge was deleted.
    #[error("Edge {edge:?} is not part of the subdivision")]
    StaleEdge {
        /// The stale handle.
        edge: EdgeRef,
    },
    /// A primal edge was required.
    #[error("Edge {edge:?} is a dual edge; a primal edge is required")]
    NotPrimal {
        /// The dual handle.
        edge: EdgeRef,
    },
    /// The dual has already been attached to this triangulation.
    #[error("Voronoi dual has already been computed")]
    AlreadyComputed,
    /// A dual query was made before the dual was computed.
    #[error("Voronoi dual has not been computed yet")]
    NotComputed,
}

/// Attach the Voronoi dual to the triangulation containing `origin`.
///
/// `origin` must be a primal edge whose right face is the unbounded face, such
/// as the `ldo` edge returned by
/// [`delaunay`](crate::core::algorithms::divide_and_conquer::delaunay).
///
/// Afterwards every dual record reachable from `origin` has a
/// [`DualVertex`] and face sites, and every primal record has its cell
/// polygon (see [`QuadEdge::cell`]). Rerunning on the same graph reproduces the
/// same values.
///
/// A fully collinear input has no bounded face; its dual records all stay
/// [`DualVertex::AtInfinity`].
///
/// # Errors
///
/// Returns [`DualError::StaleEdge`] if `origin` was deleted and
/// [`DualError::NotPrimal`] if it is a dual record.
///
/// # Examples
///
/// ```rust
/// use voronoi_quadedge::core::algorithms::divide_and_conquer::delaunay;
/// use voronoi_quadedge::core::algorithms::dual::compute_dual;
/// use voronoi_quadedge::core::quad_edge::{DualVertex, QuadEdge};
/// use voronoi_quadedge::geometry::point::Point;
///
/// let sites = [
///     Point::new([0.0, 0.0]),
///     Point::new([2.0, 2.0]),
///     Point::new([4.0, 0.0]),
/// ];
/// let mut graph = QuadEdge::new();
/// let (ldo, _) = delaunay(&mut graph, &sites);
/// compute_dual(&mut graph, ldo)?;
///
/// // The only bounded face: right angle at (2, 2), so the center is (2, 0).
/// let Some(DualVertex::Finite(center)) = graph.dual_org(graph.left(ldo)) else {
///     panic!("bounded face without a circumcenter");
/// };
/// assert!((center.x() - 2.0).abs() < 1e-9);
/// assert!(center.y().abs() < 1e-9);
/// # Ok::<(), voronoi_quadedge::core::algorithms::dual::DualError>(())
/// ```
pub fn compute_dual(graph: &mut QuadEdge, origin: EdgeRef) -> Result<(), DualError> {
    if !graph.contains(origin) {
        return Err(DualError::StaleEdge { edge: origin });
    }
    if !origin.is_primal() {
        return Err(DualError::NotPrimal { edge: origin });
    }

    let hull = graph.rnext_orbit(origin);
    mark_unbounded_face(graph, &hull);

    let mut faces = 0usize;
    for e in graph.reachable_edges(origin) {
        for side in [e, e.sym()] {
            if graph.dual_org(graph.left(side)).is_none() {
                fill_bounded_face(graph, side);
                faces += 1;
            }
        }
    }

    extrapolate_unbounded_face(graph, &hull);

    let primal: Vec<EdgeRef> = graph
        .edges()
        .flat_map(|e| [e, e.sym()])
        .collect();
    for &e in &primal {
        let cell = trace_cell(graph, e);
        graph.set_cell(e, cell);
    }

    tracing::debug!(
        hull = hull.len(),
        faces,
        edges = primal.len(),
        "computed Voronoi dual"
    );
    Ok(())
}

fn mark_unbounded_face(graph: &mut QuadEdge, hull: &[EdgeRef]) {
    let sites: FaceVertexBuffer = hull.iter().map(|&e| graph.site(e)).collect();
    for &e in hull {
        let outer = graph.right(e);
        graph.set_dual_org(outer, DualVertex::AtInfinity);
        graph.set_face_vertices(outer, sites.clone());
    }
}

/// Assign the circumcenter of the left face of `e` to every record of that
/// face.
fn fill_bounded_face(graph: &mut QuadEdge, e: EdgeRef) {
    let ring = graph.lnext_orbit(e);
    let sites: FaceVertexBuffer = ring.iter().map(|&edge| graph.site(edge)).collect();

    let vertex = match *sites.as_slice() {
        [a, b, c, ..] => {
            let center = circumcenter(a, b, c);
            if center.is_finite() {
                DualVertex::Finite(center)
            } else {
                tracing::warn!(%a, %b, %c, "degenerate face has no finite circumcenter");
                DualVertex::AtInfinity
            }
        }
        _ => DualVertex::AtInfinity,
    };
    tracing::trace!(?vertex, sites = sites.len(), "bounded face");

    for edge in ring {
        let face = graph.left(edge);
        graph.set_dual_org(face, vertex);
        graph.set_face_vertices(face, sites.clone());
    }
}

fn extrapolate_unbounded_face(graph: &mut QuadEdge, hull: &[EdgeRef]) {
    // Read every inner vertex before writing so hull edges that border the
    // unbounded face on both sides see the same inputs regardless of order.
    let endpoints: Vec<(EdgeRef, Option<DualVertex>)> = hull
        .iter()
        .map(|&e| {
            let inner = graph.dual_org(graph.left(e));
            let outward = perpendicular(graph.site(e) - graph.dest_site(e));
            let endpoint = match inner {
                Some(DualVertex::Finite(center)) => Some(DualVertex::Finite(center + outward)),
                _ => None,
            };
            (e, endpoint)
        })
        .collect();

    for (e, endpoint) in endpoints {
        if let Some(vertex) = endpoint {
            graph.set_dual_org(graph.right(e), vertex);
        }
    }
}

/// Relative tolerance under which two circumcenters are the same Voronoi
/// vertex. Co-circular faces rarely produce bit-identical centers.
const VERTEX_MERGE_TOLERANCE: f64 = 1e-9;

fn same_vertex(a: Point, b: Point) -> bool {
    let close = |u: f64, v: f64| {
        approx::relative_eq!(
            u,
            v,
            epsilon = VERTEX_MERGE_TOLERANCE,
            max_relative = VERTEX_MERGE_TOLERANCE
        )
    };
    close(a.x(), b.x()) && close(a.y(), b.y())
}

/// Left-face vertices around the origin of `e`, counter-clockwise from `e`.
///
/// Faces sharing a circumcenter (co-circular sites) contribute it once.
fn trace_cell(graph: &QuadEdge, e: EdgeRef) -> Vec<Point> {
    let mut cell: Vec<Point> = Vec::new();
    for edge in graph.onext_orbit(e) {
        let vertex = graph
            .dual_org(graph.left(edge))
            .map_or_else(Point::at_infinity, DualVertex::point);
        if !cell.iter().any(|&seen| same_vertex(seen, vertex)) {
            cell.push(vertex);
        }
    }
    cell
}
