use std::path::{Path, PathBuf};

use linkroute::config::{AnchorMode, EdgeRoutingConfig, RoutingMode, load_config};
use linkroute::ir::{EdgeId, Graph};
use linkroute::route_dump::{RouteDump, write_route_dump};
use linkroute::routing::{EdgePath, EdgeRouter, Point, RoutedEdge};

const TOL: f64 = 1e-6;

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn load_fixture(rel: &str) -> Graph {
    let path = fixtures_root().join(rel);
    let input = std::fs::read_to_string(&path).expect("fixture read failed");
    Graph::parse(&input).expect("fixture parse failed")
}

fn route(graph: &Graph, config: &EdgeRoutingConfig) -> Vec<RoutedEdge> {
    let router = EdgeRouter::new(graph, config);
    let mut frame = router.frame();
    router.route_all(&mut frame).expect("routing failed")
}

fn assert_well_formed(routes: &[RoutedEdge], fixture: &str) {
    for routed in routes {
        let path = &routed.path;
        assert!(
            path.start().approx_eq(routed.source, TOL),
            "{fixture}: edge {} does not start at its source anchor",
            routed.edge
        );
        assert!(
            path.end().approx_eq(routed.destination, TOL),
            "{fixture}: edge {} does not end at its destination anchor",
            routed.edge
        );
        for p in path.flatten(16) {
            assert!(p.x.is_finite() && p.y.is_finite(), "{fixture}: non-finite point");
        }
        assert!(path.to_svg_path().starts_with("M "), "{fixture}: bad svg path");
    }
}

#[test]
fn route_all_fixtures() {
    // Keep this list explicit so new scenes must be added intentionally.
    let candidates = [
        "crossing.json",
        "crowded_lanes.json",
        "parallel.json",
        "self_loops.json",
        "side_by_side.json",
        "strategies.json5",
    ];

    for rel in candidates {
        let path = fixtures_root().join(rel);
        assert!(path.exists(), "fixture missing: {}", rel);
        let graph = load_fixture(rel);
        for routing_mode in [
            RoutingMode::Direct,
            RoutingMode::Orthogonal,
            RoutingMode::Bezier,
            RoutingMode::Bundling,
        ] {
            for anchor_mode in [
                AnchorMode::Center,
                AnchorMode::Cardinal,
                AnchorMode::Octagonal,
                AnchorMode::Dynamic,
            ] {
                let config = EdgeRoutingConfig {
                    anchor_mode,
                    routing_mode,
                    ..Default::default()
                };
                let routes = route(&graph, &config);
                assert_eq!(routes.len(), graph.edges.len(), "{rel}: missing routes");
                assert_well_formed(&routes, rel);
            }
        }
    }
}

#[test]
fn side_by_side_nodes_meet_at_facing_sides() {
    let graph = load_fixture("side_by_side.json");
    let config = EdgeRoutingConfig {
        anchor_mode: AnchorMode::Cardinal,
        ..Default::default()
    };
    let routes = route(&graph, &config);
    assert_eq!(routes[0].source, Point::new(100.0, 25.0));
    assert_eq!(routes[0].destination, Point::new(200.0, 25.0));
    assert_eq!(routes[0].path.kind(), "cubic");
}

#[test]
fn parallel_edges_fan_out_around_the_shared_anchor() {
    let graph = load_fixture("parallel.json");
    let config = EdgeRoutingConfig {
        anchor_mode: AnchorMode::Cardinal,
        routing_mode: RoutingMode::Direct,
        min_edge_distance: 10.0,
        ..Default::default()
    };
    let routes = route(&graph, &config);
    let ys: Vec<f64> = routes[..3].iter().map(|r| r.source.y).collect();
    assert!((ys[0] - 15.0).abs() < TOL);
    assert!((ys[1] - 25.0).abs() < TOL);
    assert!((ys[2] - 35.0).abs() < TOL);
    for routed in &routes[..3] {
        assert!((routed.source.x - 100.0).abs() < TOL);
        assert!((routed.destination.y - routed.source.y).abs() < TOL);
    }

    // The reverse edge forms its own group of one.
    assert_eq!(routes[3].source, Point::new(200.0, 25.0));
    assert_eq!(routes[3].destination, Point::new(100.0, 25.0));
}

#[test]
fn strategies_override_frame_defaults() {
    let graph = load_fixture("strategies.json5");
    let config = EdgeRoutingConfig {
        anchor_mode: AnchorMode::Center,
        routing_mode: RoutingMode::Bezier,
        ..Default::default()
    };
    let routes = route(&graph, &config);

    assert_eq!(routes[0].path.kind(), "cubic");
    assert_eq!(routes[0].source, Point::new(60.0, 30.0));

    let EdgePath::Orthogonal(manhattan) = &routes[1].path else {
        panic!("expected an orthogonal route, got {}", routes[1].path.kind());
    };
    assert_eq!(routes[1].source, Point::new(380.0, 170.0));
    assert_eq!(routes[1].destination, Point::new(520.0, 30.0));
    for leg in manhattan.points.windows(2) {
        assert!(leg[0].x == leg[1].x || leg[0].y == leg[1].y);
    }

    assert_eq!(routes[2].source, Point::new(120.0, 30.0));
    assert_eq!(routes[2].destination, Point::new(520.0, 30.0));
    assert_eq!(routes[2].path.kind(), "cubic");
}

#[test]
fn self_loops_carry_arrowheads() {
    let graph = load_fixture("self_loops.json");
    let routes = route(&graph, &EdgeRoutingConfig::default());

    let a = &routes[0];
    assert_eq!(a.source, Point::new(100.0, 25.0));
    assert_eq!(a.destination, Point::new(50.0, 0.0));
    let (base, tip) = a.arrow.expect("self-loop arrow");
    assert!(tip.approx_eq(a.destination, TOL));
    assert!(base.distance(tip) > 0.0);
    assert!(base.distance(tip) <= 10.0 + TOL);

    assert!(routes[1].arrow.is_none());

    let b = &routes[2];
    assert_eq!(b.source, Point::new(240.0, 120.0));
    assert_eq!(b.destination, Point::new(220.0, 100.0));
    assert!(b.arrow.is_some());
}

#[test]
fn crowded_lanes_are_pushed_apart() {
    let graph = load_fixture("crowded_lanes.json");
    let config = load_config(Some(&fixtures_root().join("config/repulsion.json5")))
        .expect("config load failed");
    assert!(config.enable_repulsion);
    assert_eq!(config.min_edge_distance, 10.0);

    let routes = route(&graph, &config);
    let top = &routes[0];
    let bottom = &routes[1];
    let far = &routes[2];

    assert!(top.offset.y < 0.0, "top lane offset {:?}", top.offset);
    assert!(bottom.offset.y > 0.0, "bottom lane offset {:?}", bottom.offset);
    assert!(top.offset.x.abs() < TOL && bottom.offset.x.abs() < TOL);
    assert!((top.offset.y + bottom.offset.y).abs() < TOL);
    assert_eq!(top.path.kind(), "quadratic");

    assert_eq!(far.offset, Point::ZERO);
    assert_eq!(far.path.kind(), "line");

    // A second frame over the same scene settles on the same offsets.
    let again = route(&graph, &config);
    for (first, second) in routes.iter().zip(&again) {
        assert_eq!(first.offset, second.offset);
        assert_eq!(first.path, second.path);
    }
}

#[test]
fn crossing_chords_are_reported_in_dump() {
    let graph = load_fixture("crossing.json");
    let config = EdgeRoutingConfig {
        anchor_mode: AnchorMode::Cardinal,
        routing_mode: RoutingMode::Direct,
        ..Default::default()
    };
    let router = EdgeRouter::new(&graph, &config);
    let mut frame = router.frame();
    let routes = router.route_all(&mut frame).expect("routing failed");
    let crossings = router.crossings(frame.edges()).expect("crossings failed");
    assert_eq!(crossings, vec![(EdgeId(0), EdgeId(1))]);

    let dump = RouteDump::from_routes(&router, &routes, &crossings);
    assert_eq!(dump.crossings, vec![[0, 1]]);
    assert_eq!(dump.edges.len(), 3);

    let out = std::env::temp_dir().join(format!("linkroute-dump-{}.json", std::process::id()));
    write_route_dump(Some(&out), &dump).expect("dump write failed");
    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).expect("dump read failed"))
            .expect("dump is not json");
    let _ = std::fs::remove_file(&out);
    assert_eq!(written["edges"][2]["from"], "X");
    assert_eq!(written["edges"][0]["kind"], "line");
    assert_eq!(written["crossings"][0][1], 1);
}

#[test]
fn missing_endpoint_fails_the_frame() {
    let graph = Graph::parse(
        r#"{ "nodes": [ { "id": "A", "x": 0, "y": 0, "width": 10, "height": 10 } ],
             "edges": [ { "from": "A", "to": "ghost" } ] }"#,
    )
    .expect("parse failed");
    let config = EdgeRoutingConfig::default();
    let router = EdgeRouter::new(&graph, &config);
    let mut frame = router.frame();
    let err = router.route_all(&mut frame).expect_err("routing should fail");
    assert!(err.to_string().contains("ghost"), "{err}");
}
