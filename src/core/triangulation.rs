//! Owning triangulation type.
//!
//! [`Triangulation`] couples a [`QuadEdge`] graph with the sites it was built
//! from and the hull edges returned by the divide-and-conquer builder. It is
//! the validated entry point: input preconditions are checked before the
//! builder runs, and the Voronoi dual is attached at most once.
//!
//! # Examples
//!
//! ```rust
//! use voronoi_quadedge::core::triangulation::build_triangulation;
//!
//! let mut tri = build_triangulation(&[(0.0, 0.0), (0.0, 4.0), (2.0, 2.0), (4.0, 0.0), (4.0, 4.0)])?;
//! assert_eq!(tri.number_of_triangles(), 4);
//!
//! tri.compute_dual()?;
//! let cells = tri.voronoi_cells()?;
//! assert_eq!(cells.len(), 2 * tri.number_of_edges());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::algorithms::divide_and_conquer::{OperationLog, delaunay, delaunay_recorded};
use crate::core::algorithms::dual::{DualError, compute_dual};
use crate::core::quad_edge::{DualVertex, EdgeRef, QuadEdge, QuadEdgeValidationError};
use crate::core::util::{DelaunayValidationError, bounded_triangles, validate_delaunay};
use crate::geometry::point::{Point, PointValidationError};
use crate::topology::characteristics::euler::{
    PLANAR_EULER_CHARACTERISTIC, SubdivisionCounts, count_elements, euler_characteristic,
};

// =============================================================================
// ERRORS
// =============================================================================

/// Structural validation failures of a finished triangulation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TriangulationValidationError {
    /// The quad-edge orbits are inconsistent.
    #[error("Quad-edge structure is inconsistent: {source}")]
    Topology {
        /// The underlying structural error.
        #[from]
        source: QuadEdgeValidationError,
    },
    /// V − E + F differs from 2.
    #[error(
        "Euler relation violated: V={} E={} F={} gives χ={chi}, expected 2",
        .counts.vertices,
        .counts.edges,
        .counts.faces
    )]
    EulerViolation {
        /// The element counts.
        counts: SubdivisionCounts,
        /// The computed characteristic.
        chi: isize,
    },
}

/// Errors raised while constructing a [`Triangulation`].
#[derive(Clone, Debug, Error, PartialEq)]
pub enum TriangulationConstructionError {
    /// Fewer than two sites were supplied.
    #[error("At least two sites are required, got {count}")]
    InsufficientSites {
        /// Number of sites supplied.
        count: usize,
    },
    /// `sites[index]` sorts before `sites[index - 1]`.
    #[error("Sites must be sorted by (x, y); site {index} is out of order")]
    UnsortedSites {
        /// Index of the first out-of-order site.
        index: usize,
    },
    /// A site has a NaN or infinite coordinate.
    #[error("Site {index} is not finite: {source}")]
    NonFiniteSite {
        /// Index of the offending site.
        index: usize,
        /// The coordinate check that failed.
        #[source]
        source: PointValidationError,
    },
    /// The built triangulation failed its post-construction check.
    #[error("Triangulation failed validation: {source}")]
    Validation {
        /// The validation failure.
        #[from]
        source: TriangulationValidationError,
    },
}

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Construction options for [`Triangulation::with_options`].
///
/// # Examples
///
/// ```rust
/// use voronoi_quadedge::core::triangulation::TriangulationOptionsBuilder;
///
/// let options = TriangulationOptionsBuilder::default()
///     .record_operations(true)
///     .build()
///     .unwrap();
/// assert!(options.validate_input);
/// assert!(options.record_operations);
/// assert!(!options.validate_topology);
/// ```
#[derive(Builder, Clone, Copy, Debug, PartialEq, Eq)]
#[builder(default)]
pub struct TriangulationOptions {
    /// Reject unsorted or non-finite sites before building.
    pub validate_input: bool,
    /// Keep an [`OperationLog`] of every edge added and removed.
    pub record_operations: bool,
    /// Run [`Triangulation::is_valid`] after building.
    pub validate_topology: bool,
}

impl Default for TriangulationOptions {
    fn default() -> Self {
        Self {
            validate_input: true,
            record_operations: false,
            validate_topology: false,
        }
    }
}

// =============================================================================
// VORONOI OUTPUT
// =============================================================================

/// The Voronoi polygon seen from one directed primal edge.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VoronoiCell {
    /// Origin site of the edge; the polygon is this site's cell.
    pub site: Point,
    /// Polygon vertices, counter-clockwise around `site`.
    pub vertices: Vec<Point>,
}

// =============================================================================
// TRIANGULATION
// =============================================================================

/// A Delaunay triangulation of sorted sites, with an optional Voronoi dual.
#[derive(Clone, Debug)]
pub struct Triangulation {
    graph: QuadEdge,
    sites: Vec<Point>,
    hull: (EdgeRef, EdgeRef),
    operations: Option<OperationLog>,
    dual_computed: bool,
}

impl Triangulation {
    /// Triangulate `sites` with default options.
    ///
    /// # Errors
    ///
    /// See [`with_options`](Self::with_options).
    pub fn new(sites: &[Point]) -> Result<Self, TriangulationConstructionError> {
        Self::with_options(sites, &TriangulationOptions::default())
    }

    /// Triangulate `sites`, which must be sorted by `(x, y)`.
    ///
    /// The site count is always checked. Ordering and finiteness are checked
    /// when `options.validate_input` is set; otherwise unsorted input yields an
    /// unspecified (but memory-safe) subdivision.
    ///
    /// # Errors
    ///
    /// - [`TriangulationConstructionError::InsufficientSites`] for fewer than two sites
    /// - [`TriangulationConstructionError::NonFiniteSite`] and
    ///   [`TriangulationConstructionError::UnsortedSites`] from input validation
    /// - [`TriangulationConstructionError::Validation`] if `validate_topology` is
    ///   set and the result is inconsistent
    pub fn with_options(
        sites: &[Point],
        options: &TriangulationOptions,
    ) -> Result<Self, TriangulationConstructionError> {
        if sites.len() < 2 {
            tracing::debug!(count = sites.len(), "rejecting input: too few sites");
            return Err(TriangulationConstructionError::InsufficientSites { count: sites.len() });
        }
        if options.validate_input {
            validate_sites(sites)?;
        }

        let mut graph = QuadEdge::with_capacity(3 * sites.len());
        let (hull, operations) = if options.record_operations {
            let mut log = OperationLog::new();
            let hull = delaunay_recorded(&mut graph, sites, &mut log);
            (hull, Some(log))
        } else {
            (delaunay(&mut graph, sites), None)
        };

        let triangulation = Self {
            graph,
            sites: sites.to_vec(),
            hull,
            operations,
            dual_computed: false,
        };
        tracing::debug!(
            sites = triangulation.number_of_sites(),
            edges = triangulation.number_of_edges(),
            "triangulation built"
        );

        if options.validate_topology {
            triangulation.is_valid()?;
        }
        Ok(triangulation)
    }

    /// `(ldo, rdo)`: the counter-clockwise hull edge out of the leftmost site
    /// and the clockwise hull edge out of the rightmost site. The unbounded
    /// face is to the right of `ldo` and to the left of `rdo`.
    #[must_use]
    pub const fn hull_edges(&self) -> (EdgeRef, EdgeRef) {
        self.hull
    }

    /// Hull sites in `rnext` order starting at the leftmost site.
    #[must_use]
    pub fn hull_sites(&self) -> Vec<Point> {
        self.graph
            .rnext_orbit(self.hull.0)
            .into_iter()
            .map(|e| self.graph.site(e))
            .collect()
    }

    /// The underlying quad-edge graph.
    #[must_use]
    pub const fn graph(&self) -> &QuadEdge {
        &self.graph
    }

    /// The input sites, in input order.
    #[must_use]
    pub fn sites(&self) -> &[Point] {
        &self.sites
    }

    /// Number of input sites.
    #[must_use]
    pub fn number_of_sites(&self) -> usize {
        self.sites.len()
    }

    /// One primal handle per undirected edge.
    pub fn edges(&self) -> impl Iterator<Item = EdgeRef> + '_ {
        self.graph.edges()
    }

    /// Number of undirected edges.
    #[must_use]
    pub fn number_of_edges(&self) -> usize {
        self.graph.number_of_quads()
    }

    /// Bounded triangles as counter-clockwise site triples.
    #[must_use]
    pub fn triangles(&self) -> Vec<[Point; 3]> {
        bounded_triangles(&self.graph)
    }

    /// Number of bounded triangles.
    #[must_use]
    pub fn number_of_triangles(&self) -> usize {
        self.triangles().len()
    }

    /// Recorded edge operations, if recording was enabled.
    #[must_use]
    pub const fn operations(&self) -> Option<&OperationLog> {
        self.operations.as_ref()
    }

    /// Vertex, edge and face counts (including the unbounded face).
    #[must_use]
    pub fn counts(&self) -> SubdivisionCounts {
        count_elements(&self.graph)
    }

    // -------------------------------------------------------------------------
    // Voronoi dual
    // -------------------------------------------------------------------------

    /// Attach the Voronoi dual.
    ///
    /// # Errors
    ///
    /// Returns [`DualError::AlreadyComputed`] on a second call.
    pub fn compute_dual(&mut self) -> Result<(), DualError> {
        if self.dual_computed {
            return Err(DualError::AlreadyComputed);
        }
        compute_dual(&mut self.graph, self.hull.0)?;
        self.dual_computed = true;
        Ok(())
    }

    /// `true` once [`compute_dual`](Self::compute_dual) has succeeded.
    #[must_use]
    pub const fn is_dual_computed(&self) -> bool {
        self.dual_computed
    }

    fn check_dual(&self, edge: EdgeRef) -> Result<(), DualError> {
        if !self.dual_computed {
            return Err(DualError::NotComputed);
        }
        if !self.graph.contains(edge) {
            return Err(DualError::StaleEdge { edge });
        }
        Ok(())
    }

    /// Voronoi cell polygon of the origin of a directed primal edge.
    ///
    /// # Errors
    ///
    /// [`DualError::NotComputed`] before the dual exists,
    /// [`DualError::StaleEdge`] for a foreign or deleted handle and
    /// [`DualError::NotPrimal`] for a dual handle.
    pub fn cell_vertices(&self, edge: EdgeRef) -> Result<&[Point], DualError> {
        self.check_dual(edge)?;
        if !edge.is_primal() {
            return Err(DualError::NotPrimal { edge });
        }
        Ok(self.graph.cell(edge))
    }

    /// Voronoi vertex at the origin of a dual edge, or at the left face of a
    /// primal edge.
    ///
    /// # Errors
    ///
    /// [`DualError::NotComputed`] before the dual exists and
    /// [`DualError::StaleEdge`] for a foreign or deleted handle.
    pub fn voronoi_vertex(&self, edge: EdgeRef) -> Result<DualVertex, DualError> {
        self.check_dual(edge)?;
        let dual = if edge.is_primal() {
            self.graph.left(edge)
        } else {
            edge
        };
        self.graph.dual_org(dual).ok_or(DualError::NotComputed)
    }

    /// One [`VoronoiCell`] per directed primal edge.
    ///
    /// # Errors
    ///
    /// [`DualError::NotComputed`] before the dual exists.
    pub fn voronoi_cells(&self) -> Result<Vec<VoronoiCell>, DualError> {
        if !self.dual_computed {
            return Err(DualError::NotComputed);
        }
        Ok(self
            .graph
            .edges()
            .flat_map(|e| [e, e.sym()])
            .map(|e| VoronoiCell {
                site: self.graph.site(e),
                vertices: self.graph.cell(e).to_vec(),
            })
            .collect())
    }

    // -------------------------------------------------------------------------
    // Validation
    // -------------------------------------------------------------------------

    /// Check orbit consistency and the planar Euler relation.
    ///
    /// # Errors
    ///
    /// Returns the first [`TriangulationValidationError`] found.
    pub fn is_valid(&self) -> Result<(), TriangulationValidationError> {
        self.graph.validate()?;
        let counts = self.counts();
        let chi = euler_characteristic(&counts);
        if chi != PLANAR_EULER_CHARACTERISTIC {
            return Err(TriangulationValidationError::EulerViolation { counts, chi });
        }
        Ok(())
    }

    /// Check the empty-circumcircle property of every bounded triangle.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate_delaunay(&self) -> Result<(), DelaunayValidationError> {
        validate_delaunay(&self.graph)
    }
}

/// Triangulate `(x, y)` pairs sorted ascending by `(x, y)` with default
/// options.
///
/// # Errors
///
/// See [`Triangulation::with_options`].
pub fn build_triangulation(sites: &[(f64, f64)]) -> Result<Triangulation, TriangulationConstructionError> {
    let points: Vec<Point> = sites.iter().copied().map(Point::from).collect();
    Triangulation::new(&points)
}

fn validate_sites(sites: &[Point]) -> Result<(), TriangulationConstructionError> {
    for (index, site) in sites.iter().enumerate() {
        site.validate().map_err(|source| {
            tracing::debug!(index, %site, "rejecting input: non-finite site");
            TriangulationConstructionError::NonFiniteSite { index, source }
        })?;
    }
    if let Some(index) = sites.windows(2).position(|pair| pair[1] < pair[0]) {
        tracing::debug!(index = index + 1, "rejecting input: sites not sorted");
        return Err(TriangulationConstructionError::UnsortedSites { index: index + 1 });
    }
    Ok(())
}
