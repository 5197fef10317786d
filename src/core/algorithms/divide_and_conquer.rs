//! Divide-and-conquer Delaunay triangulation on the quad-edge structure.
//!
//! # Algorithm Overview
//!
//! Sites arrive sorted by `(x, y)`. The list is split at its midpoint, each
//! half is triangulated recursively, and the two results are stitched together:
//!
//! 1. **Base cases**: two sites become one edge; three sites become a triangle,
//!    or an open chain of two edges when they are collinear.
//! 2. **Lower common tangent**: walk the facing hull chains downward until the
//!    edge joining them has both halves on its left. That edge is the first
//!    cross edge, `base`.
//! 3. **Merge**: repeatedly pick the next cross edge above `base`. Candidates
//!    are the first edges counter-clockwise (left half) and clockwise (right
//!    half) from `base`; edges whose circumcircle test fails against the
//!    following candidate are deleted first. The merge stops at the upper
//!    common tangent, where neither candidate lies above `base`.
//!
//! Every call returns `(ldo, rdo)`: the counter-clockwise hull edge out of the
//! leftmost site and the clockwise hull edge out of the rightmost site. The
//! unbounded face lies to the right of `ldo` and to the left of `rdo`.
//!
//! Recursion depth is `O(log n)`; total work is `O(n log n)`.
//!
//! # Degenerate input
//!
//! Collinear runs stay open chains. Exactly co-circular quadruples never
//! trigger a deletion (see [`in_circle`]), so ties resolve deterministically.
//! Duplicate sites are not detected here.
//!
//! # References
//!
//! - **Guibas, L. & Stolfi, J.** "Primitives for the Manipulation of General
//!   Subdivisions and the Computation of Voronoi Diagrams." *ACM Transactions on
//!   Graphics* 4.2 (1985): 74-123.
//!   DOI: [10.1145/282918.282923](https://doi.org/10.1145/282918.282923)

#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};

use crate::core::collections::FastHashSet;
use crate::core::edge::EdgeKey;
use crate::core::quad_edge::{EdgeRef, QuadEdge};
use crate::geometry::point::Point;
use crate::geometry::predicates::{ccw, in_circle, left_of, right_of};

// =============================================================================
// OPERATION RECORDING
// =============================================================================

/// One structural change made while building a triangulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EdgeOperation {
    /// An edge from `org` to `dest` was created.
    Added {
        /// Origin site.
        org: Point,
        /// Destination site.
        dest: Point,
    },
    /// The edge from `org` to `dest` was deleted.
    Removed {
        /// Origin site.
        org: Point,
        /// Destination site.
        dest: Point,
    },
}

impl EdgeOperation {
    /// The `(org, dest)` pair the operation applies to.
    #[must_use]
    pub const fn endpoints(self) -> (Point, Point) {
        match self {
            Self::Added { org, dest } | Self::Removed { org, dest } => (org, dest),
        }
    }

    /// `true` for [`EdgeOperation::Added`].
    #[must_use]
    pub const fn is_addition(self) -> bool {
        matches!(self, Self::Added { .. })
    }
}

/// Ordered record of the edge additions and removals performed by
/// [`delaunay_recorded`].
///
/// Replaying the log from an empty plane reproduces the final edge set, which
/// makes it suitable for step-by-step visualization of the merge.
///
/// # Examples
///
/// ```rust
/// use voronoi_quadedge::core::algorithms::divide_and_conquer::{delaunay_recorded, OperationLog};
/// use voronoi_quadedge::core::quad_edge::QuadEdge;
/// use voronoi_quadedge::geometry::point::Point;
///
/// let sites = [
///     Point::new([0.0, 0.0]),
///     Point::new([1.0, 2.0]),
///     Point::new([2.0, 0.0]),
/// ];
/// let mut graph = QuadEdge::new();
/// let mut log = OperationLog::new();
/// delaunay_recorded(&mut graph, &sites, &mut log);
///
/// assert_eq!(log.len(), 3);
/// assert_eq!(log.surviving_edges().len(), graph.number_of_quads());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationLog {
    operations: Vec<EdgeOperation>,
}

impl OperationLog {
    /// An empty log.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            operations: Vec::new(),
        }
    }

    /// Append an operation.
    pub fn record(&mut self, operation: EdgeOperation) {
        self.operations.push(operation);
    }

    /// All operations in the order they happened.
    #[must_use]
    pub fn operations(&self) -> &[EdgeOperation] {
        &self.operations
    }

    /// Number of recorded operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// `true` if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Iterate over the operations in order.
    pub fn iter(&self) -> std::slice::Iter<'_, EdgeOperation> {
        self.operations.iter()
    }

    /// Discard all operations.
    pub fn clear(&mut self) {
        self.operations.clear();
    }

    /// Undirected edges left after replaying every operation in order.
    #[must_use]
    pub fn surviving_edges(&self) -> FastHashSet<EdgeKey> {
        let mut edges = FastHashSet::default();
        for operation in &self.operations {
            let (org, dest) = operation.endpoints();
            let key = EdgeKey::new(org, dest);
            if operation.is_addition() {
                edges.insert(key);
            } else {
                edges.remove(&key);
            }
        }
        edges
    }
}

impl<'a> IntoIterator for &'a OperationLog {
    type Item = &'a EdgeOperation;
    type IntoIter = std::slice::Iter<'a, EdgeOperation>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// =============================================================================
// ENTRY POINTS
// =============================================================================

/// Triangulate `sites` into `graph` and return `(ldo, rdo)`, the hull edges out
/// of the leftmost and rightmost sites.
///
/// `sites` must be sorted ascending by `(x, y)` and hold at least two sites.
/// Neither is checked here; use
/// [`Triangulation`](crate::core::triangulation::Triangulation) for validated
/// construction.
///
/// # Panics
///
/// Panics if fewer than two sites are given.
///
/// # Examples
///
/// ```rust
/// use voronoi_quadedge::core::algorithms::divide_and_conquer::delaunay;
/// use voronoi_quadedge::core::quad_edge::QuadEdge;
/// use voronoi_quadedge::geometry::point::Point;
///
/// let sites = [
///     Point::new([0.0, 0.0]),
///     Point::new([0.0, 1.0]),
///     Point::new([1.0, 0.0]),
///     Point::new([1.0, 1.0]),
/// ];
/// let mut graph = QuadEdge::new();
/// let (ldo, rdo) = delaunay(&mut graph, &sites);
///
/// assert_eq!(graph.org(ldo), Some(sites[0]));
/// assert_eq!(graph.org(rdo), Some(sites[3]));
/// assert_eq!(graph.number_of_quads(), 5);
/// ```
pub fn delaunay(graph: &mut QuadEdge, sites: &[Point]) -> (EdgeRef, EdgeRef) {
    tracing::debug!(sites = sites.len(), "divide-and-conquer triangulation");
    Builder { graph, log: None }.triangulate(sites)
}

/// [`delaunay`], additionally appending every edge addition and removal to
/// `log`.
///
/// # Panics
///
/// Panics if fewer than two sites are given.
pub fn delaunay_recorded(
    graph: &mut QuadEdge,
    sites: &[Point],
    log: &mut OperationLog,
) -> (EdgeRef, EdgeRef) {
    tracing::debug!(
        sites = sites.len(),
        "divide-and-conquer triangulation (recording operations)"
    );
    Builder {
        graph,
        log: Some(log),
    }
    .triangulate(sites)
}

// =============================================================================
// BUILDER
// =============================================================================

struct Builder<'a> {
    graph: &'a mut QuadEdge,
    log: Option<&'a mut OperationLog>,
}

impl Builder<'_> {
    fn record(&mut self, operation: EdgeOperation) {
        if let Some(log) = self.log.as_deref_mut() {
            log.record(operation);
        }
    }

    fn make_edge(&mut self, org: Point, dest: Point) -> EdgeRef {
        let e = self.graph.make_edge_between(org, dest);
        self.record(EdgeOperation::Added { org, dest });
        e
    }

    fn connect(&mut self, a: EdgeRef, b: EdgeRef) -> EdgeRef {
        let e = self.graph.connect(a, b);
        let (org, dest) = (self.org(e), self.dest(e));
        self.record(EdgeOperation::Added { org, dest });
        e
    }

    fn delete(&mut self, e: EdgeRef) {
        let (org, dest) = (self.org(e), self.dest(e));
        self.graph.delete_edge(e);
        self.record(EdgeOperation::Removed { org, dest });
    }

    fn org(&self, e: EdgeRef) -> Point {
        self.graph.site(e)
    }

    fn dest(&self, e: EdgeRef) -> Point {
        self.graph.dest_site(e)
    }

    fn left_of(&self, x: Point, e: EdgeRef) -> bool {
        left_of(x, self.org(e), self.dest(e))
    }

    fn right_of(&self, x: Point, e: EdgeRef) -> bool {
        right_of(x, self.org(e), self.dest(e))
    }

    /// A candidate is usable while its destination lies strictly above `base`.
    fn valid(&self, candidate: EdgeRef, base: EdgeRef) -> bool {
        self.right_of(self.dest(candidate), base)
    }

    fn triangulate(&mut self, sites: &[Point]) -> (EdgeRef, EdgeRef) {
        match *sites {
            [] | [_] => panic!(
                "triangulation needs at least two sites, got {}",
                sites.len()
            ),
            [s1, s2] => {
                let a = self.make_edge(s1, s2);
                (a, a.sym())
            }
            [s1, s2, s3] => self.triangle(s1, s2, s3),
            _ => {
                let (left, right) = sites.split_at(sites.len() / 2);
                let (ldo, ldi) = self.triangulate(left);
                let (rdi, rdo) = self.triangulate(right);
                self.merge(ldo, ldi, rdi, rdo)
            }
        }
    }

    fn triangle(&mut self, s1: Point, s2: Point, s3: Point) -> (EdgeRef, EdgeRef) {
        let a = self.make_edge(s1, s2);
        let b = self.make_edge(s2, s3);
        self.graph.splice(a.sym(), b);

        if ccw(s1, s2, s3) {
            self.connect(b, a);
            (a, b.sym())
        } else if ccw(s1, s3, s2) {
            let c = self.connect(b, a);
            (c.sym(), c)
        } else {
            tracing::trace!(%s1, %s2, %s3, "collinear base case left open");
            (a, b.sym())
        }
    }

    fn merge(
        &mut self,
        mut ldo: EdgeRef,
        mut ldi: EdgeRef,
        mut rdi: EdgeRef,
        mut rdo: EdgeRef,
    ) -> (EdgeRef, EdgeRef) {
        // Lower common tangent.
        loop {
            if self.left_of(self.org(rdi), ldi) {
                ldi = self.graph.lnext(ldi);
            } else if self.right_of(self.org(ldi), rdi) {
                rdi = self.graph.rprev(rdi);
            } else {
                break;
            }
        }

        let mut base = self.connect(rdi.sym(), ldi);
        if self.org(ldi) == self.org(ldo) {
            ldo = base.sym();
        }
        if self.org(rdi) == self.org(rdo) {
            rdo = base;
        }
        tracing::trace!(
            org = %self.org(base),
            dest = %self.dest(base),
            "lower common tangent"
        );

        loop {
            let l_cand = self.left_candidate(base);
            let r_cand = self.right_candidate(base);

            let l_valid = self.valid(l_cand, base);
            let r_valid = self.valid(r_cand, base);
            if !l_valid && !r_valid {
                break;
            }

            base = if !l_valid
                || (r_valid
                    && in_circle(
                        self.dest(l_cand),
                        self.org(l_cand),
                        self.org(r_cand),
                        self.dest(r_cand),
                    )) {
                self.connect(r_cand, base.sym())
            } else {
                self.connect(base.sym(), l_cand.sym())
            };
        }

        (ldo, rdo)
    }

    /// First edge counter-clockwise from `base` out of its destination, after
    /// deleting the edges that fail the circumcircle test.
    fn left_candidate(&mut self, base: EdgeRef) -> EdgeRef {
        let mut cand = self.graph.onext(base.sym());
        if self.valid(cand, base) {
            loop {
                let next = self.graph.onext(cand);
                if !in_circle(
                    self.dest(base),
                    self.org(base),
                    self.dest(cand),
                    self.dest(next),
                ) {
                    break;
                }
                self.delete(cand);
                cand = next;
            }
        }
        cand
    }

    /// Mirror image of [`left_candidate`](Self::left_candidate) on the right
    /// half, walking clockwise out of the origin of `base`.
    fn right_candidate(&mut self, base: EdgeRef) -> EdgeRef {
        let mut cand = self.graph.oprev(base);
        if self.valid(cand, base) {
            loop {
                let next = self.graph.oprev(cand);
                if !in_circle(
                    self.dest(base),
                    self.org(base),
                    self.dest(cand),
                    self.dest(next),
                ) {
                    break;
                }
                self.delete(cand);
                cand = next;
            }
        }
        cand
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point {
        Point::new([x, y])
    }

    fn edge_keys(graph: &QuadEdge) -> FastHashSet<EdgeKey> {
        graph.edges().map(|e| graph.edge_key(e)).collect()
    }

    #[test]
    fn two_sites_make_one_edge() {
        let mut graph = QuadEdge::new();
        let (ldo, rdo) = delaunay(&mut graph, &[p(0.0, 0.0), p(1.0, 1.0)]);
        assert_eq!(graph.number_of_quads(), 1);
        assert_eq!(rdo, ldo.sym());
        assert_eq!(graph.org(ldo), Some(p(0.0, 0.0)));
        assert_eq!(graph.org(rdo), Some(p(1.0, 1.0)));
    }

    #[test]
    fn counter_clockwise_triple_closes_triangle() {
        let (s1, s2, s3) = (p(0.0, 0.0), p(1.0, 0.0), p(2.0, 1.0));
        let mut graph = QuadEdge::new();
        let (ldo, rdo) = delaunay(&mut graph, &[s1, s2, s3]);

        assert_eq!(graph.number_of_quads(), 3);
        assert_eq!(graph.org(ldo), Some(s1));
        assert_eq!(graph.dest(ldo), Some(s2));
        assert_eq!(graph.org(rdo), Some(s3));
        assert_eq!(graph.lnext_orbit(ldo).len(), 3);
        assert_eq!(graph.rnext_orbit(ldo).len(), 3);
        assert!(graph.validate().is_ok());
    }

    #[test]
    fn clockwise_triple_swaps_outer_edges() {
        let (s1, s2, s3) = (p(0.0, 0.0), p(1.0, 1.0), p(2.0, 0.0));
        let mut graph = QuadEdge::new();
        let (ldo, rdo) = delaunay(&mut graph, &[s1, s2, s3]);

        assert_eq!(graph.number_of_quads(), 3);
        assert_eq!(rdo, ldo.sym());
        assert_eq!(graph.org(ldo), Some(s1));
        assert_eq!(graph.dest(ldo), Some(s3));
        // The triangle lies on the left of the hull edge out of s1.
        assert!(ccw(s1, s3, graph.dest_site(graph.lnext(ldo))));
        assert!(graph.validate().is_ok());
    }

    #[test]
    fn collinear_triple_stays_open() {
        let (s1, s2, s3) = (p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0));
        let mut graph = QuadEdge::new();
        let (ldo, rdo) = delaunay(&mut graph, &[s1, s2, s3]);

        assert_eq!(graph.number_of_quads(), 2);
        assert_eq!(graph.org(ldo), Some(s1));
        assert_eq!(graph.org(rdo), Some(s3));
        // One face, walked along both sides of the chain.
        assert_eq!(graph.lnext_orbit(ldo).len(), 4);
    }

    #[test]
    fn collinear_run_becomes_chain() {
        let sites: Vec<Point> = (0..7).map(|i| p(f64::from(i), 0.0)).collect();
        let mut graph = QuadEdge::new();
        let (ldo, rdo) = delaunay(&mut graph, &sites);

        assert_eq!(graph.number_of_quads(), 6);
        assert_eq!(graph.org(ldo), Some(sites[0]));
        assert_eq!(graph.org(rdo), Some(sites[6]));
        for window in sites.windows(2) {
            assert!(edge_keys(&graph).contains(&EdgeKey::new(window[0], window[1])));
        }
        assert!(graph.validate().is_ok());
    }

    #[test]
    fn unit_square_has_five_edges() {
        let sites = [p(0.0, 0.0), p(0.0, 1.0), p(1.0, 0.0), p(1.0, 1.0)];
        let mut graph = QuadEdge::new();
        let (ldo, _) = delaunay(&mut graph, &sites);

        assert_eq!(graph.number_of_quads(), 5);
        assert_eq!(graph.rnext_orbit(ldo).len(), 4);
        assert!(graph.validate().is_ok());
    }

    #[test]
    fn hull_ring_visits_every_hull_site() {
        let sites = [p(0.0, 0.0), p(0.0, 4.0), p(2.0, 2.0), p(4.0, 0.0), p(4.0, 4.0)];
        let mut graph = QuadEdge::new();
        let (ldo, rdo) = delaunay(&mut graph, &sites);

        let hull: Vec<Point> = graph
            .rnext_orbit(ldo)
            .into_iter()
            .map(|e| graph.site(e))
            .collect();
        assert_eq!(hull.len(), 4);
        assert!(!hull.contains(&p(2.0, 2.0)));
        assert!(graph.rnext_orbit(ldo).contains(&rdo.sym()));
        assert_eq!(graph.number_of_quads(), 8);
    }

    #[test]
    fn recorded_operations_replay_to_final_edges() {
        let sites = [
            p(0.0, 0.0),
            p(0.5, 3.0),
            p(1.0, 1.0),
            p(2.0, -1.0),
            p(2.5, 2.0),
            p(3.0, 0.5),
            p(4.0, 3.5),
            p(5.0, 0.0),
        ];
        let mut graph = QuadEdge::new();
        let mut log = OperationLog::new();
        delaunay_recorded(&mut graph, &sites, &mut log);

        let added = log.iter().filter(|op| op.is_addition()).count();
        let removed = log.len() - added;
        assert_eq!(added - removed, graph.number_of_quads());
        assert_eq!(log.surviving_edges(), edge_keys(&graph));
    }

    #[test]
    fn operation_log_serializes_with_kind_tag() {
        let mut log = OperationLog::new();
        log.record(EdgeOperation::Added {
            org: p(0.0, 0.0),
            dest: p(1.0, 0.0),
        });
        let json = serde_json::to_string(&log).unwrap();
        assert!(json.contains("\"kind\":\"added\""));
        let back: OperationLog = serde_json::from_str(&json).unwrap();
        assert_eq!(back, log);
    }

    #[test]
    #[should_panic(expected = "at least two sites")]
    fn single_site_panics() {
        let mut graph = QuadEdge::new();
        let _ = delaunay(&mut graph, &[p(0.0, 0.0)]);
    }
}
