//! Quad-edge representation of a planar subdivision and its dual.
//!
//! Every undirected edge of the subdivision is stored as one [`Quad`]: four
//! directed edge records that are rotations of one another. Rotation index 0 is
//! the primal edge, 2 is its reverse (`sym`), and 1 and 3 are the dual edges
//! crossing it from right face to left face and back. Each record stores a
//! single successor pointer, `onext`: the next edge counter-clockwise around
//! the record's origin. All other navigation (`lnext`, `rprev`, ...) is a
//! composition of `rot` and `onext`.
//!
//! # Ownership
//!
//! Quads live in a generation-checked arena ([`StorageMap`]). Edge handles
//! ([`EdgeRef`]) are `(QuadKey, rotation)` pairs and own nothing. Deleting an
//! edge frees its quad immediately; every handle into it becomes stale, which
//! [`QuadEdge::contains`] reports and every accessor turns into a panic rather
//! than a read of a recycled slot.
//!
//! # Payloads
//!
//! Primal records carry a site ([`PrimalData`]); dual records carry a Voronoi
//! vertex and the sites bounding their face ([`DualData`]). The two are kept in
//! separate arrays so a primal handle can never read dual data.
//!
//! Reference: Guibas, L. & Stolfi, J. (1985). Primitives for the Manipulation
//! of General Subdivisions and the Computation of Voronoi Diagrams. ACM
//! Transactions on Graphics 4(2), 74-123.

#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;
use thiserror::Error;

use crate::core::collections::{FaceVertexBuffer, FastHashSet, StorageMap};
use crate::core::edge::EdgeKey;
use crate::geometry::point::Point;

new_key_type! {
    /// Key type for accessing quads in the arena.
    ///
    /// Keys carry a generation, so a key to a deleted quad stays invalid even
    /// after its slot is reused.
    pub struct QuadKey;
}

// =============================================================================
// EDGE HANDLES
// =============================================================================

/// Handle to one directed edge record: a quad and a rotation index in `0..4`.
///
/// Handle arithmetic that stays inside the quad (`rot`, `sym`) is pure and
/// lives here; anything that follows a stored `onext` pointer needs the
/// [`QuadEdge`] that owns the quad.
///
/// Equality is structural: `e != e.sym()` even though both describe the same
/// segment. Use [`EdgeKey`] when direction should not matter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeRef {
    quad: QuadKey,
    rot: u8,
}

impl EdgeRef {
    /// Handle to rotation `rot` (taken mod 4) of `quad`.
    #[inline]
    #[must_use]
    pub const fn new(quad: QuadKey, rot: u8) -> Self {
        Self { quad, rot: rot & 3 }
    }

    /// The owning quad.
    #[inline]
    #[must_use]
    pub const fn quad(self) -> QuadKey {
        self.quad
    }

    /// The rotation index in `0..4`.
    #[inline]
    #[must_use]
    pub const fn rotation(self) -> u8 {
        self.rot
    }

    /// Rotate `n` quarter turns counter-clockwise within the quad.
    #[inline]
    #[must_use]
    pub const fn rot_by(self, n: u8) -> Self {
        Self::new(self.quad, self.rot.wrapping_add(n))
    }

    /// The dual edge directed from this edge's right face to its left face.
    #[inline]
    #[must_use]
    pub const fn rot(self) -> Self {
        self.rot_by(1)
    }

    /// Inverse of [`rot`](Self::rot).
    #[inline]
    #[must_use]
    pub const fn rot_inv(self) -> Self {
        self.rot_by(3)
    }

    /// The same edge with origin and destination exchanged.
    #[inline]
    #[must_use]
    pub const fn sym(self) -> Self {
        self.rot_by(2)
    }

    /// `true` for rotations 0 and 2 (edges between sites).
    #[inline]
    #[must_use]
    pub const fn is_primal(self) -> bool {
        self.rot & 1 == 0
    }

    #[inline]
    const fn slot(self) -> usize {
        (self.rot >> 1) as usize
    }
}

// =============================================================================
// PAYLOADS
// =============================================================================

/// A Voronoi vertex: the origin of a dual edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DualVertex {
    /// The unbounded face has no finite circumcenter.
    AtInfinity,
    /// A finite vertex, the circumcenter of a bounded face or an extrapolated
    /// ray endpoint for the unbounded face.
    Finite(Point),
}

impl DualVertex {
    /// The vertex as a point; [`DualVertex::AtInfinity`] maps to
    /// [`Point::at_infinity`].
    #[must_use]
    pub const fn point(self) -> Point {
        match self {
            Self::AtInfinity => Point::at_infinity(),
            Self::Finite(p) => p,
        }
    }

    /// `true` for a finite vertex with finite coordinates.
    #[must_use]
    pub const fn is_finite(self) -> bool {
        match self {
            Self::AtInfinity => false,
            Self::Finite(p) => p.is_finite(),
        }
    }
}

/// Payload of a primal edge record.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PrimalData {
    /// The origin site, `None` until assigned.
    pub origin: Option<Point>,
    /// Voronoi cell polygon of the origin site, filled by the dual construction.
    pub cell: Vec<Point>,
}

/// Payload of a dual edge record.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DualData {
    /// The Voronoi vertex at this record's origin, `None` until computed.
    pub origin: Option<DualVertex>,
    /// Sites bounding the face this record originates in.
    pub face: FaceVertexBuffer,
}

/// Four mutually rotated directed edge records, allocated and freed together.
#[derive(Clone, Debug)]
pub struct Quad {
    next: [EdgeRef; 4],
    primal: [PrimalData; 2],
    dual: [DualData; 2],
}

impl Quad {
    /// A lone edge: each primal record is its own `onext` orbit, and the two
    /// dual records (both in the single surrounding face) point at each other.
    fn isolated(key: QuadKey) -> Self {
        Self {
            next: [
                EdgeRef::new(key, 0),
                EdgeRef::new(key, 3),
                EdgeRef::new(key, 2),
                EdgeRef::new(key, 1),
            ],
            primal: [PrimalData::default(), PrimalData::default()],
            dual: [DualData::default(), DualData::default()],
        }
    }
}

// =============================================================================
// ERRORS
// =============================================================================

/// Structural inconsistencies detected by [`QuadEdge::validate`].
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum QuadEdgeValidationError {
    /// An `onext` pointer refers to a quad that is no longer in the arena.
    #[error("Edge {edge:?} has onext {successor:?} pointing at a deleted quad")]
    DanglingSuccessor {
        /// The record holding the pointer.
        edge: EdgeRef,
        /// The stale successor.
        successor: EdgeRef,
    },
    /// An `onext` pointer crosses between primal and dual records.
    #[error("Edge {edge:?} has onext {successor:?} of the wrong kind (primal/dual)")]
    ParityMismatch {
        /// The record holding the pointer.
        edge: EdgeRef,
        /// The successor of the other kind.
        successor: EdgeRef,
    },
    /// `onext(oprev(e)) != e`: the rotated orbits disagree with the stored ones.
    #[error("Edge {edge:?} is not the onext of its own oprev")]
    BrokenOrbit {
        /// The inconsistent record.
        edge: EdgeRef,
    },
    /// A primal record carries no site.
    #[error("Primal edge {edge:?} has no origin site")]
    MissingOrigin {
        /// The record without a site.
        edge: EdgeRef,
    },
}

// =============================================================================
// QUAD-EDGE ARENA
// =============================================================================

/// A planar subdivision in quad-edge form.
///
/// # Examples
///
/// ```rust
/// use voronoi_quadedge::core::quad_edge::QuadEdge;
/// use voronoi_quadedge::geometry::point::Point;
///
/// let mut graph = QuadEdge::new();
/// let a = graph.make_edge_between(Point::new([0.0, 0.0]), Point::new([1.0, 0.0]));
/// let b = graph.make_edge_between(Point::new([1.0, 0.0]), Point::new([0.0, 1.0]));
/// graph.splice(a.sym(), b);
///
/// // Close the triangle; all three edges now share a left face.
/// let c = graph.connect(b, a);
/// assert_eq!(graph.lnext(a), b);
/// assert_eq!(graph.lnext(b), c);
/// assert_eq!(graph.lnext(c), a);
/// assert!(graph.validate().is_ok());
/// ```
#[derive(Clone, Debug, Default)]
pub struct QuadEdge {
    quads: StorageMap<QuadKey, Quad>,
}

impl QuadEdge {
    /// An empty subdivision.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty subdivision with room for `capacity` quads.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            quads: StorageMap::with_capacity_and_key(capacity),
        }
    }

    /// Number of live quads (undirected edges).
    #[must_use]
    pub fn number_of_quads(&self) -> usize {
        self.quads.len()
    }

    /// `true` if no quads are live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    /// `true` if `e`'s quad is still live.
    #[must_use]
    pub fn contains(&self, e: EdgeRef) -> bool {
        self.quads.contains_key(e.quad)
    }

    /// Rotation-0 handle of every live quad, in arena order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeRef> + '_ {
        self.quads.keys().map(|key| EdgeRef::new(key, 0))
    }

    #[inline]
    fn quad(&self, e: EdgeRef) -> &Quad {
        &self.quads[e.quad]
    }

    #[inline]
    fn quad_mut(&mut self, e: EdgeRef) -> &mut Quad {
        &mut self.quads[e.quad]
    }

    // -------------------------------------------------------------------------
    // Navigation
    // -------------------------------------------------------------------------

    /// Next edge counter-clockwise around the origin of `e`.
    ///
    /// # Panics
    ///
    /// Panics if `e` refers to a deleted quad.
    #[inline]
    #[must_use]
    pub fn onext(&self, e: EdgeRef) -> EdgeRef {
        self.quad(e).next[usize::from(e.rot)]
    }

    /// Next edge clockwise around the origin of `e`.
    #[inline]
    #[must_use]
    pub fn oprev(&self, e: EdgeRef) -> EdgeRef {
        self.onext(e.rot()).rot()
    }

    /// Next edge counter-clockwise around the left face of `e`.
    #[inline]
    #[must_use]
    pub fn lnext(&self, e: EdgeRef) -> EdgeRef {
        self.onext(e.rot_inv()).rot()
    }

    /// Previous edge around the left face of `e`.
    #[inline]
    #[must_use]
    pub fn lprev(&self, e: EdgeRef) -> EdgeRef {
        self.onext(e).sym()
    }

    /// Next edge counter-clockwise around the right face of `e`.
    #[inline]
    #[must_use]
    pub fn rnext(&self, e: EdgeRef) -> EdgeRef {
        self.onext(e.rot()).rot_inv()
    }

    /// Previous edge around the right face of `e`.
    #[inline]
    #[must_use]
    pub fn rprev(&self, e: EdgeRef) -> EdgeRef {
        self.onext(e.sym())
    }

    /// Next edge counter-clockwise into the destination of `e`.
    #[inline]
    #[must_use]
    pub fn dnext(&self, e: EdgeRef) -> EdgeRef {
        self.onext(e.sym()).sym()
    }

    /// Next edge clockwise into the destination of `e`.
    #[inline]
    #[must_use]
    pub fn dprev(&self, e: EdgeRef) -> EdgeRef {
        self.onext(e.rot_inv()).rot_inv()
    }

    /// The dual record whose origin is the left face of `e`.
    #[inline]
    #[must_use]
    pub const fn left(&self, e: EdgeRef) -> EdgeRef {
        e.rot_inv()
    }

    /// The dual record whose origin is the right face of `e`.
    #[inline]
    #[must_use]
    pub const fn right(&self, e: EdgeRef) -> EdgeRef {
        e.rot()
    }

    // -------------------------------------------------------------------------
    // Payload access
    // -------------------------------------------------------------------------

    fn primal(&self, e: EdgeRef) -> &PrimalData {
        assert!(e.is_primal(), "dual edge {e:?} has no primal payload");
        &self.quad(e).primal[e.slot()]
    }

    fn primal_mut(&mut self, e: EdgeRef) -> &mut PrimalData {
        assert!(e.is_primal(), "dual edge {e:?} has no primal payload");
        &mut self.quad_mut(e).primal[e.slot()]
    }

    fn dual(&self, e: EdgeRef) -> &DualData {
        assert!(!e.is_primal(), "primal edge {e:?} has no dual payload");
        &self.quad(e).dual[e.slot()]
    }

    fn dual_mut(&mut self, e: EdgeRef) -> &mut DualData {
        assert!(!e.is_primal(), "primal edge {e:?} has no dual payload");
        &mut self.quad_mut(e).dual[e.slot()]
    }

    /// Origin site of a primal edge.
    ///
    /// # Panics
    ///
    /// Panics if `e` is a dual edge or refers to a deleted quad.
    #[inline]
    #[must_use]
    pub fn org(&self, e: EdgeRef) -> Option<Point> {
        self.primal(e).origin
    }

    /// Destination site of a primal edge (the origin of `e.sym()`).
    #[inline]
    #[must_use]
    pub fn dest(&self, e: EdgeRef) -> Option<Point> {
        self.org(e.sym())
    }

    /// Set the origin site of a primal edge.
    pub fn set_org(&mut self, e: EdgeRef, site: Point) {
        self.primal_mut(e).origin = Some(site);
    }

    /// Set the destination site of a primal edge.
    pub fn set_dest(&mut self, e: EdgeRef, site: Point) {
        self.set_org(e.sym(), site);
    }

    /// Origin site of an edge that is known to have one.
    ///
    /// Every primal record built by [`make_edge_between`](Self::make_edge_between)
    /// or [`connect`](Self::connect) carries a site, which is what the
    /// triangulation algorithms rely on.
    ///
    /// # Panics
    ///
    /// Panics if the record has no site.
    #[inline]
    #[must_use]
    pub fn site(&self, e: EdgeRef) -> Point {
        self.org(e)
            .unwrap_or_else(|| unreachable!("primal edge {e:?} has no origin site"))
    }

    /// Destination site of an edge that is known to have one.
    #[inline]
    #[must_use]
    pub fn dest_site(&self, e: EdgeRef) -> Point {
        self.site(e.sym())
    }

    /// Direction-free identity of a primal edge.
    #[inline]
    #[must_use]
    pub fn edge_key(&self, e: EdgeRef) -> EdgeKey {
        EdgeKey::new(self.site(e), self.dest_site(e))
    }

    /// Voronoi vertex at the origin of a dual edge.
    #[inline]
    #[must_use]
    pub fn dual_org(&self, e: EdgeRef) -> Option<DualVertex> {
        self.dual(e).origin
    }

    /// Set the Voronoi vertex at the origin of a dual edge.
    pub fn set_dual_org(&mut self, e: EdgeRef, vertex: DualVertex) {
        self.dual_mut(e).origin = Some(vertex);
    }

    /// Sites bounding the face a dual edge originates in.
    #[must_use]
    pub fn face_vertices(&self, e: EdgeRef) -> &[Point] {
        &self.dual(e).face
    }

    /// Record the sites bounding the face a dual edge originates in.
    pub fn set_face_vertices(&mut self, e: EdgeRef, face: FaceVertexBuffer) {
        self.dual_mut(e).face = face;
    }

    /// Voronoi cell polygon stored on a primal edge.
    #[must_use]
    pub fn cell(&self, e: EdgeRef) -> &[Point] {
        &self.primal(e).cell
    }

    /// Store the Voronoi cell polygon on a primal edge.
    pub fn set_cell(&mut self, e: EdgeRef, cell: Vec<Point>) {
        self.primal_mut(e).cell = cell;
    }

    // -------------------------------------------------------------------------
    // Topological operators
    // -------------------------------------------------------------------------

    /// Allocate a new quad in the isolated-edge configuration and return its
    /// primal edge. No sites are assigned.
    pub fn make_edge(&mut self) -> EdgeRef {
        let key = self.quads.insert_with_key(Quad::isolated);
        EdgeRef::new(key, 0)
    }

    /// [`make_edge`](Self::make_edge) with both endpoint sites assigned.
    pub fn make_edge_between(&mut self, org: Point, dest: Point) -> EdgeRef {
        let e = self.make_edge();
        self.set_org(e, org);
        self.set_dest(e, dest);
        e
    }

    fn set_onext(&mut self, e: EdgeRef, next: EdgeRef) {
        self.quad_mut(e).next[usize::from(e.rot)] = next;
    }

    /// Exchange the `onext` orbits of `a` and `b`.
    ///
    /// If the orbits are distinct they are merged; if they are the same orbit
    /// it is split in two. The dual orbits of the faces between them are
    /// updated to match. Applying `splice(a, b)` twice restores the original
    /// structure.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale. Debug builds also assert that `a` and
    /// `b` are both primal or both dual.
    pub fn splice(&mut self, a: EdgeRef, b: EdgeRef) {
        debug_assert!(self.contains(a), "splice on deleted edge {a:?}");
        debug_assert!(self.contains(b), "splice on deleted edge {b:?}");
        debug_assert_eq!(
            a.is_primal(),
            b.is_primal(),
            "splice mixes primal and dual edges {a:?}, {b:?}"
        );

        let a_next = self.onext(a);
        let b_next = self.onext(b);
        let alpha = a_next.rot();
        let beta = b_next.rot();
        let alpha_next = self.onext(alpha);
        let beta_next = self.onext(beta);

        self.set_onext(a, b_next);
        self.set_onext(b, a_next);
        self.set_onext(alpha, beta_next);
        self.set_onext(beta, alpha_next);
    }

    /// Add an edge from the destination of `a` to the origin of `b`.
    ///
    /// Afterwards `a`, the new edge `e` and `b` share a left face, i.e.
    /// `lnext(a) == e` and `lnext(e) == b`.
    ///
    /// # Panics
    ///
    /// Panics if `a` or `b` is stale or lacks its site.
    pub fn connect(&mut self, a: EdgeRef, b: EdgeRef) -> EdgeRef {
        let org = self.dest_site(a);
        let dest = self.site(b);
        let e = self.make_edge_between(org, dest);
        let a_lnext = self.lnext(a);
        self.splice(e, a_lnext);
        self.splice(e.sym(), b);
        e
    }

    /// Detach `e` from both endpoint orbits and free its quad.
    ///
    /// All handles into the quad (`e`, `e.sym()`, `e.rot()`, ...) are stale
    /// afterwards. Callers that keep walking must read any successor they need
    /// before deleting.
    ///
    /// # Panics
    ///
    /// Panics if `e` is already stale.
    pub fn delete_edge(&mut self, e: EdgeRef) {
        let e_oprev = self.oprev(e);
        self.splice(e, e_oprev);
        let sym = e.sym();
        let sym_oprev = self.oprev(sym);
        self.splice(sym, sym_oprev);
        self.quads.remove(e.quad);
    }

    // -------------------------------------------------------------------------
    // Orbits and traversal
    // -------------------------------------------------------------------------

    /// Edges around the origin of `e`, counter-clockwise, starting at `e`.
    #[must_use]
    pub fn onext_orbit(&self, e: EdgeRef) -> Vec<EdgeRef> {
        self.orbit(e, Self::onext)
    }

    /// Edges around the left face of `e`, counter-clockwise, starting at `e`.
    #[must_use]
    pub fn lnext_orbit(&self, e: EdgeRef) -> Vec<EdgeRef> {
        self.orbit(e, Self::lnext)
    }

    /// Edges around the right face of `e`, starting at `e`.
    #[must_use]
    pub fn rnext_orbit(&self, e: EdgeRef) -> Vec<EdgeRef> {
        self.orbit(e, Self::rnext)
    }

    fn orbit(&self, start: EdgeRef, step: fn(&Self, EdgeRef) -> EdgeRef) -> Vec<EdgeRef> {
        let bound = 4 * self.quads.len() + 1;
        let mut ring = vec![start];
        let mut current = step(self, start);
        while current != start {
            debug_assert!(ring.len() <= bound, "orbit of {start:?} does not close");
            ring.push(current);
            current = step(self, current);
        }
        ring
    }

    /// Depth-first search over all primal edges connected to `origin`.
    ///
    /// The frontier of an edge is `rnext, onext, dnext, lnext`; an edge and
    /// its `sym` share one [`EdgeKey`], so each undirected edge is reported
    /// once, in the direction it was first reached.
    ///
    /// # Panics
    ///
    /// Panics if `origin` is stale, dual, or reaches a record without a site.
    #[must_use]
    pub fn reachable_edges(&self, origin: EdgeRef) -> Vec<EdgeRef> {
        let mut discovered: FastHashSet<EdgeKey> = FastHashSet::default();
        let mut order = Vec::new();
        let mut stack = vec![origin];
        while let Some(e) = stack.pop() {
            if discovered.insert(self.edge_key(e)) {
                order.push(e);
                stack.extend([self.rnext(e), self.onext(e), self.dnext(e), self.lnext(e)]);
            }
        }
        order
    }

    // -------------------------------------------------------------------------
    // Validation
    // -------------------------------------------------------------------------

    /// Check the algebraic invariants of every live record.
    ///
    /// - every `onext` pointer targets a live quad
    /// - `onext` never crosses between primal and dual records
    /// - `onext(oprev(e)) == e` for every record
    /// - every primal record carries a site
    ///
    /// # Errors
    ///
    /// Returns the first [`QuadEdgeValidationError`] found.
    pub fn validate(&self) -> Result<(), QuadEdgeValidationError> {
        for (key, quad) in &self.quads {
            for (rot, &successor) in (0u8..).zip(quad.next.iter()) {
                let edge = EdgeRef::new(key, rot);
                if !self.contains(successor) {
                    return Err(QuadEdgeValidationError::DanglingSuccessor { edge, successor });
                }
                if successor.is_primal() != edge.is_primal() {
                    return Err(QuadEdgeValidationError::ParityMismatch { edge, successor });
                }
            }
        }

        for key in self.quads.keys() {
            for rot in 0..4 {
                let edge = EdgeRef::new(key, rot);
                if self.onext(self.oprev(edge)) != edge {
                    return Err(QuadEdgeValidationError::BrokenOrbit { edge });
                }
                if edge.is_primal() && self.org(edge).is_none() {
                    return Err(QuadEdgeValidationError::MissingOrigin { edge });
                }
            }
        }
        Ok(())
    }
}
