//! # voronoi-quadedge
//!
//! Planar Delaunay triangulations and their dual Voronoi diagrams, built on
//! the quad-edge structure of Guibas and Stolfi.
//!
//! # Features
//!
//! - Quad-edge subdivision stored in a generation-checked arena
//! - `O(n log n)` divide-and-conquer Delaunay construction
//! - Optional operation log replaying every edge added or removed
//! - Voronoi vertices and per-site cell polygons from the dual records
//! - Serialization of sites, operations and cells with [serde](https://serde.rs)
//!
//! # Basic Usage
//!
//! Sites must be sorted by `(x, y)`:
//!
//! ```rust
//! use voronoi_quadedge::prelude::*;
//!
//! let sites = [(0.0, 0.0), (0.0, 4.0), (2.0, 2.0), (4.0, 0.0), (4.0, 4.0)];
//! let mut tri = build_triangulation(&sites).unwrap();
//!
//! assert_eq!(tri.number_of_triangles(), 4);
//! assert!(tri.is_valid().is_ok());
//! assert!(tri.validate_delaunay().is_ok());
//!
//! tri.compute_dual().unwrap();
//! let center = Point::new([2.0, 2.0]);
//! let cell = tri
//!     .voronoi_cells()
//!     .unwrap()
//!     .into_iter()
//!     .find(|cell| cell.site == center)
//!     .unwrap();
//! assert_eq!(cell.vertices.len(), 4);
//! ```
//!
//! # Working with the quad-edge graph directly
//!
//! The builder and dual constructor also run on a bare [`QuadEdge`](core::quad_edge::QuadEdge):
//!
//! ```rust
//! use voronoi_quadedge::prelude::*;
//!
//! let sites = [
//!     Point::new([0.0, 0.0]),
//!     Point::new([1.0, 2.0]),
//!     Point::new([2.0, 0.0]),
//! ];
//! let mut graph = QuadEdge::new();
//! let (ldo, rdo) = delaunay(&mut graph, &sites);
//! assert_eq!(graph.org(ldo), Some(sites[0]));
//! assert_eq!(graph.org(rdo), Some(sites[2]));
//!
//! compute_dual(&mut graph, ldo).unwrap();
//! assert_eq!(graph.cell(ldo).len(), 2);
//! ```

// Forbid unsafe code throughout the entire crate
#![forbid(unsafe_code)]

#[macro_use]
extern crate derive_builder;

/// The `core` module contains the quad-edge structure, the triangulation
/// algorithms and the owning [`Triangulation`](core::triangulation::Triangulation) type.
pub mod core {
    /// Triangulation algorithms: construction and dual.
    pub mod algorithms {
        /// Divide-and-conquer Delaunay construction
        pub mod divide_and_conquer;
        /// Voronoi dual of a finished triangulation
        pub mod dual;
    }
    /// Collection aliases used across the crate
    pub mod collections;
    pub mod edge;
    pub mod quad_edge;
    pub mod triangulation;
    pub mod util;
    // Re-export the `core` modules.
    pub use algorithms::divide_and_conquer::*;
    pub use algorithms::dual::*;
    pub use edge::*;
    pub use quad_edge::*;
    pub use triangulation::*;
    pub use util::*;
    // Note: collections module not re-exported here to avoid namespace pollution
    // Import specific types via prelude or use crate::core::collections::
}

/// Contains the `Point` type, determinant helpers and geometric predicates.
pub mod geometry {
    pub mod matrix;
    pub mod point;
    pub mod predicates;
    /// Distances, angles and circumcenters
    pub mod util;
    pub use matrix::*;
    pub use point::*;
    pub use predicates::*;
    pub use util::*;
}

/// Topological invariants of planar subdivisions.
pub mod topology {
    /// Topological characteristics (Euler relation)
    pub mod characteristics {
        pub mod euler;
    }
}

/// A prelude module that re-exports commonly used types and functions.
pub mod prelude {
    // Re-export from core
    pub use crate::core::{
        algorithms::divide_and_conquer::*, algorithms::dual::*, edge::*, quad_edge::*,
        triangulation::*, util::*,
    };

    pub use crate::core::collections::{
        FaceVertexBuffer, FastHashSet, SmallBuffer, fast_hash_set_with_capacity,
    };

    // Re-export from geometry
    pub use crate::geometry::{point::*, predicates::*, util::*};

    pub use crate::topology::characteristics::euler::{
        SubdivisionCounts, count_elements, euler_characteristic,
    };
}

/// The function `is_normal` checks that structs implement `auto` traits.
/// Traits are checked at compile time, so this function is only used for
/// testing.
#[must_use]
pub const fn is_normal<T: Sized + Send + Sync + Unpin>() -> bool {
    true
}

// =============================================================================
// TESTS
// =============================================================================
