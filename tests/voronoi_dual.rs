//! Integration tests for the Voronoi dual attached to a triangulation.

use approx::assert_relative_eq;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use voronoi_quadedge::core::quad_edge::DualVertex;
use voronoi_quadedge::core::triangulation::{Triangulation, VoronoiCell, build_triangulation};
use voronoi_quadedge::geometry::point::Point;
use voronoi_quadedge::geometry::predicates::ccw;
use voronoi_quadedge::geometry::util::distance;

fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

fn p(x: f64, y: f64) -> Point {
    Point::new([x, y])
}

fn random_triangulation(seed: u64, n: usize) -> Triangulation {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut sites: Vec<Point> = (0..n)
        .map(|_| p(rng.random_range(0.0..500.0), rng.random_range(0.0..500.0)))
        .collect();
    sites.sort_unstable();
    sites.dedup();
    let mut tri = Triangulation::new(&sites).unwrap();
    tri.compute_dual().unwrap();
    tri
}

fn close(a: Point, b: Point) -> bool {
    (a.x() - b.x()).abs() < 1e-9 && (a.y() - b.y()).abs() < 1e-9
}

#[test]
fn square_plus_center_cell_is_quadrilateral_of_circumcenters() {
    init_tracing();
    let mut tri =
        build_triangulation(&[(0.0, 0.0), (0.0, 4.0), (2.0, 2.0), (4.0, 0.0), (4.0, 4.0)]).unwrap();
    tri.compute_dual().unwrap();

    let center = p(2.0, 2.0);
    let cells: Vec<VoronoiCell> = tri
        .voronoi_cells()
        .unwrap()
        .into_iter()
        .filter(|cell| cell.site == center)
        .collect();
    // One cell per spoke, all describing the same polygon.
    assert_eq!(cells.len(), 4);

    let expected = [p(2.0, 0.0), p(4.0, 2.0), p(2.0, 4.0), p(0.0, 2.0)];
    for cell in &cells {
        assert_eq!(cell.vertices.len(), 4);
        for want in expected {
            assert!(
                cell.vertices.iter().any(|&v| close(v, want)),
                "{want} missing from {:?}",
                cell.vertices
            );
        }
    }
}

#[test]
fn cell_walk_follows_origin_orbit() {
    init_tracing();
    let mut tri =
        build_triangulation(&[(0.0, 0.0), (0.0, 4.0), (2.0, 2.0), (4.0, 0.0), (4.0, 4.0)]).unwrap();
    tri.compute_dual().unwrap();
    let graph = tri.graph();

    for e in tri.edges().flat_map(|e| [e, e.sym()]) {
        let cell = tri.cell_vertices(e).unwrap();
        let orbit = graph.onext_orbit(e);
        assert_eq!(cell.len(), orbit.len());
        // The polygon starts at the left face of the edge itself.
        assert_eq!(tri.voronoi_vertex(e).unwrap().point(), cell[0]);
    }
}

#[test]
fn interior_cells_have_one_vertex_per_incident_triangle() {
    init_tracing();
    let tri = random_triangulation(11, 150);
    let graph = tri.graph();
    let hull: Vec<Point> = tri.hull_sites();
    let triangles = tri.triangles();

    for e in tri.edges().flat_map(|e| [e, e.sym()]) {
        let site = graph.site(e);
        if hull.contains(&site) {
            continue;
        }
        let incident = triangles.iter().filter(|t| t.contains(&site)).count();
        assert_eq!(tri.cell_vertices(e).unwrap().len(), incident, "cell of {site}");
    }
}

#[test]
fn bounded_voronoi_vertices_are_circumcenters() {
    init_tracing();
    let tri = random_triangulation(5, 80);
    let graph = tri.graph();

    let mut checked = 0;
    for e in tri.edges().flat_map(|e| [e, e.sym()]) {
        let face = graph.face_vertices(graph.left(e));
        // The unbounded face winds clockwise; skip it.
        if face.len() != 3 || !ccw(face[0], face[1], face[2]) {
            continue;
        }
        let DualVertex::Finite(center) = tri.voronoi_vertex(e).unwrap() else {
            panic!("bounded face without a finite circumcenter");
        };
        checked += 1;
        let r = distance(center, face[0]);
        assert_relative_eq!(distance(center, face[1]), r, max_relative = 1e-6);
        assert_relative_eq!(distance(center, face[2]), r, max_relative = 1e-6);
    }
    assert_eq!(checked, 3 * tri.number_of_triangles());
}

#[test]
fn every_cell_vertex_is_finite_for_general_position() {
    init_tracing();
    let tri = random_triangulation(3, 60);
    for cell in tri.voronoi_cells().unwrap() {
        assert!(!cell.vertices.is_empty());
        for v in &cell.vertices {
            assert!(v.is_finite(), "cell of {} has vertex {v}", cell.site);
        }
    }
}

#[test]
fn hull_cells_include_extrapolated_vertex() {
    init_tracing();
    let tri = random_triangulation(21, 40);
    let graph = tri.graph();

    for e in graph.rnext_orbit(tri.hull_edges().0) {
        let DualVertex::Finite(inner) = tri.voronoi_vertex(e).unwrap() else {
            panic!("hull edge without inner circumcenter");
        };
        let DualVertex::Finite(outer) = tri.voronoi_vertex(graph.right(e)).unwrap() else {
            panic!("hull edge was not extrapolated");
        };
        let length = distance(graph.site(e), graph.dest_site(e));
        assert_relative_eq!(distance(inner, outer), length, max_relative = 1e-6);

        // The cell of the hull edge's destination passes through the outer point.
        let cell = tri.cell_vertices(e.sym()).unwrap();
        assert!(cell.contains(&outer));
    }
}

#[test]
fn collinear_sites_produce_unbounded_cells() {
    init_tracing();
    let mut tri = build_triangulation(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]).unwrap();
    tri.compute_dual().unwrap();
    for cell in tri.voronoi_cells().unwrap() {
        assert_eq!(cell.vertices, vec![Point::at_infinity()]);
    }
}

#[test]
fn cells_round_trip_through_json() {
    init_tracing();
    let tri = random_triangulation(8, 25);
    let cells = tri.voronoi_cells().unwrap();
    let json = serde_json::to_string(&cells).unwrap();
    let back: Vec<VoronoiCell> = serde_json::from_str(&json).unwrap();

    assert_eq!(back.len(), cells.len());
    for (read, written) in back.iter().zip(&cells) {
        assert!(close(read.site, written.site));
        assert_eq!(read.vertices.len(), written.vertices.len());
        for (&a, &b) in read.vertices.iter().zip(&written.vertices) {
            assert!(close(a, b), "{a} != {b}");
        }
    }
}
