//! Property-based tests for divide-and-conquer Delaunay construction.
//!
//! Sites are sorted, deduplicated integer points, which keeps every predicate
//! exact. That lets these tests assert the empty-circumcircle condition and
//! the counting identities without tolerances, even on the co-circular and
//! collinear configurations a small integer box produces constantly.
//!
//! ## Invariants Tested
//! - Structural validity and the planar Euler relation
//! - Empty circumcircle for every bounded triangle
//! - Every site appears as a vertex of the subdivision
//! - `T = 2n - h - 2` and `E = 3n - h - 3` when at least one triangle exists
//! - Replaying the operation log reproduces the final edge set

use proptest::prelude::*;
use voronoi_quadedge::core::edge::EdgeKey;
use voronoi_quadedge::core::triangulation::{Triangulation, TriangulationOptionsBuilder};
use voronoi_quadedge::core::util::collect_sites;
use voronoi_quadedge::geometry::point::Point;

// =============================================================================
// TEST CONFIGURATION
// =============================================================================

fn integer_point() -> impl Strategy<Value = Point> {
    (-50_i32..50, -50_i32..50).prop_map(|(x, y)| Point::new([f64::from(x), f64::from(y)]))
}

/// Sorted, distinct sites.
fn site_set() -> impl Strategy<Value = Vec<Point>> {
    prop::collection::vec(integer_point(), 2..60).prop_map(|mut sites| {
        sites.sort_unstable();
        sites.dedup();
        sites
    })
}

fn build(sites: &[Point]) -> Triangulation {
    let options = TriangulationOptionsBuilder::default()
        .record_operations(true)
        .build()
        .unwrap();
    Triangulation::with_options(sites, &options).unwrap()
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_triangulation_is_valid(sites in site_set()) {
        prop_assume!(sites.len() >= 2);
        let tri = build(&sites);
        prop_assert!(tri.is_valid().is_ok(), "{:?}", tri.is_valid());
    }

    #[test]
    fn prop_empty_circumcircle(sites in site_set()) {
        prop_assume!(sites.len() >= 2);
        let tri = build(&sites);
        prop_assert!(tri.validate_delaunay().is_ok(), "{:?}", tri.validate_delaunay());
    }

    #[test]
    fn prop_every_site_is_a_vertex(sites in site_set()) {
        prop_assume!(sites.len() >= 2);
        let tri = build(&sites);
        prop_assert_eq!(collect_sites(tri.graph()), sites);
    }

    #[test]
    fn prop_counting_identities(sites in site_set()) {
        prop_assume!(sites.len() >= 2);
        let tri = build(&sites);
        let triangles = tri.number_of_triangles();
        if triangles > 0 {
            let n = sites.len();
            let h = tri.hull_sites().len();
            prop_assert_eq!(triangles, 2 * n - h - 2);
            prop_assert_eq!(tri.number_of_edges(), 3 * n - h - 3);
        } else {
            // Only collinear input leaves no triangle: a path through all sites.
            prop_assert_eq!(tri.number_of_edges(), sites.len() - 1);
        }
    }

    #[test]
    fn prop_operation_log_replays_to_final_edges(sites in site_set()) {
        prop_assume!(sites.len() >= 2);
        let tri = build(&sites);
        let log = tri.operations().unwrap();
        let mut replayed: Vec<EdgeKey> = log.surviving_edges().into_iter().collect();
        let mut actual: Vec<EdgeKey> = tri.edges().map(|e| tri.graph().edge_key(e)).collect();
        replayed.sort_unstable();
        actual.sort_unstable();
        prop_assert_eq!(replayed, actual);
    }

    #[test]
    fn prop_dual_covers_every_directed_edge(sites in site_set()) {
        prop_assume!(sites.len() >= 2);
        let mut tri = build(&sites);
        tri.compute_dual().unwrap();
        let cells = tri.voronoi_cells().unwrap();
        prop_assert_eq!(cells.len(), 2 * tri.number_of_edges());
        for cell in &cells {
            prop_assert!(!cell.vertices.is_empty());
        }
    }
}
