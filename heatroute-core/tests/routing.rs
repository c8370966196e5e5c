use geo::{Point, polygon};
use heatroute_core::{
    Error,
    classify::{FixedScenario, WeatherFeatures},
    model::{
        EdgeGeometry, EvacuationModel, NetworkKind, ParkOverlay, Scenario, Shelter, ShelterIndex,
        StreetEdge, StreetGraph, StudyArea, VulnerabilityAttr, VulnerabilityLevel,
        VulnerabilityOverlay,
    },
    routing::{
        RouteKind, RouteRequest, RoutingInputs, SearchOptions, compute_evacuation_routes,
        plan_evacuation_route,
    },
};
use petgraph::graph::{EdgeIndex, NodeIndex};

fn street(graph: &mut StreetGraph, from: NodeIndex, to: NodeIndex, length: f64) -> EdgeIndex {
    let a = graph.node(from).unwrap().geometry;
    let b = graph.node(to).unwrap().geometry;
    graph.add_edge(from, to, StreetEdge::new(length, EdgeGeometry::straight(a, b)))
}

/// Two one-way alternatives from `a` to `b`: a 100 m park street and a
/// 90 m plain street, plus an isolated node
fn fork() -> (StreetGraph, ParkOverlay, [NodeIndex; 3], [EdgeIndex; 2]) {
    let mut graph = StreetGraph::new(NetworkKind::Walk);
    let a = graph.add_node(1, Point::new(139.770, 35.680));
    let b = graph.add_node(2, Point::new(139.771, 35.680));
    let isolated = graph.add_node(3, Point::new(139.780, 35.690));
    let park = street(&mut graph, a, b, 100.0);
    let plain = street(&mut graph, a, b, 90.0);

    let parks = [park].into_iter().collect();
    (graph, parks, [a, b, isolated], [park, plain])
}

fn inputs<'a>(
    scenario: Scenario,
    graph: &'a StreetGraph,
    parks: &'a ParkOverlay,
    vulnerability: &'a VulnerabilityOverlay,
    start: NodeIndex,
    end: NodeIndex,
) -> RoutingInputs<'a> {
    RoutingInputs {
        scenario,
        walk_graph: graph,
        drive_graph: graph,
        walk_start: start,
        walk_end: end,
        drive_start: start,
        drive_end: end,
        parks,
        vulnerability,
    }
}

#[test]
fn heat_walk_prefers_the_shaded_street() {
    let (graph, parks, [a, b, _], [park, plain]) = fork();
    let vulnerability = VulnerabilityOverlay::new();
    let outcome = compute_evacuation_routes(
        &inputs(Scenario::High, &graph, &parks, &vulnerability, a, b),
        &SearchOptions::default(),
    )
    .unwrap();

    assert_eq!(outcome.paths.walk_heat.edges(), &[park]);
    assert_eq!(outcome.paths.walk_distance.edges(), &[plain]);
    assert_eq!(outcome.paths.drive.edges(), &[plain]);

    let stats = &outcome.statistics;
    assert_eq!(stats.scenario, Scenario::High);
    assert_eq!(stats.heat_hazard, 80.0);
    assert_eq!(stats.distance_walk_heat, 100.0);
    assert_eq!(stats.total_risk_walk_heat, 4000.0);
    assert_eq!(stats.total_risk_walk_distance, 7200.0);
    assert!(stats.total_risk_walk_heat <= stats.total_risk_walk_distance);
    let reduction = stats.heat_risk_reduction_pct.unwrap();
    assert!((reduction - 44.444).abs() < 0.01);
    // 100 m at 3 km/h
    assert!((stats.time_walk_heat - 2.0).abs() < 1e-9);
    assert!((stats.water_needed_liters - 0.06).abs() < 1e-12);
    assert_eq!(stats.distance_drive, Some(90.0));
    assert!((stats.time_drive.unwrap() - 0.18).abs() < 1e-9);
}

#[test]
fn low_scenario_risks_and_rounding() {
    let (graph, parks, [a, b, _], _) = fork();
    let vulnerability = VulnerabilityOverlay::new();
    let outcome = compute_evacuation_routes(
        &inputs(Scenario::Low, &graph, &parks, &vulnerability, a, b),
        &SearchOptions::default(),
    )
    .unwrap();

    // 100 * 20 * 0.5 beats 90 * 20
    assert_eq!(outcome.statistics.total_risk_walk_heat, 1000.0);
    assert_eq!(outcome.statistics.total_risk_walk_distance, 1800.0);

    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["statistics"]["scenario"], "Low");
    assert_eq!(json["statistics"]["time_walk_heat"], 1.2);
    assert_eq!(json["statistics"]["heat_risk_reduction_pct"], 44.44);
    assert!(json.get("paths").is_none());
}

#[test]
fn repeated_requests_give_identical_results() {
    let (graph, parks, [a, b, _], _) = fork();
    let mut vulnerability = VulnerabilityOverlay::new();
    vulnerability.insert(
        EdgeIndex::new(0),
        VulnerabilityAttr {
            level: VulnerabilityLevel::Medium,
            factor: 1.5,
        },
    );

    let run = || {
        compute_evacuation_routes(
            &inputs(Scenario::Moderate, &graph, &parks, &vulnerability, a, b),
            &SearchOptions::default(),
        )
        .unwrap()
    };
    let first = run();
    let second = run();
    assert_eq!(first, second);
    assert_eq!(
        first.statistics.max_vulnerability_level,
        VulnerabilityLevel::Medium
    );
}

#[test]
fn disconnected_destination_fails_the_request() {
    let (graph, parks, [a, _, isolated], _) = fork();
    let vulnerability = VulnerabilityOverlay::new();
    let err = compute_evacuation_routes(
        &inputs(Scenario::High, &graph, &parks, &vulnerability, a, isolated),
        &SearchOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, Error::NoPathFound(RouteKind::HeatWalk)));
}

#[test]
fn start_equal_to_end_has_zero_statistics() {
    let (graph, parks, [a, ..], _) = fork();
    let vulnerability = VulnerabilityOverlay::new();
    let outcome = compute_evacuation_routes(
        &inputs(Scenario::Moderate, &graph, &parks, &vulnerability, a, a),
        &SearchOptions::default(),
    )
    .unwrap();

    let stats = &outcome.statistics;
    assert_eq!(stats.distance_walk_heat, 0.0);
    assert_eq!(stats.time_walk_heat, 0.0);
    assert_eq!(stats.total_risk_walk_heat, 0.0);
    assert_eq!(stats.heat_risk_reduction_pct, None);
    assert_eq!(stats.water_needed_liters, 0.0);
    assert_eq!(stats.max_vulnerability_level, VulnerabilityLevel::Low);
    assert!(stats.vulnerability_summary.is_empty());
    assert_eq!(stats.distance_drive, Some(0.0));
    assert!(outcome.segments.walk.is_empty());
    assert!(outcome.segments.drive.is_empty());

    let json = serde_json::to_string(&outcome.statistics).unwrap();
    assert!(!json.contains("-0.0"), "negative zero in {json}");
    assert!(json.contains("\"distance_walk_heat\":0.0"));
    assert!(json.contains("\"time_drive\":0.0"));
}

fn model() -> EvacuationModel {
    let (walk_graph, parks, _, _) = fork();
    let (drive_graph, _, _, _) = fork();
    let area = StudyArea::from_geometry(geo::Geometry::Polygon(polygon![
        (x: 139.76, y: 35.67),
        (x: 139.79, y: 35.67),
        (x: 139.79, y: 35.70),
        (x: 139.76, y: 35.70),
    ]))
    .unwrap();
    let shelters = ShelterIndex::new(vec![
        Shelter {
            name: "Riverside School".to_string(),
            capacity: 300,
            location: Point::new(139.7711, 35.6801),
        },
        Shelter {
            name: "Community Hall".to_string(),
            capacity: 120,
            location: Point::new(139.785, 35.695),
        },
    ]);
    EvacuationModel {
        walk_graph,
        drive_graph,
        area,
        shelters,
        parks,
        vulnerability: VulnerabilityOverlay::new(),
    }
}

#[test]
fn planner_routes_to_the_chosen_shelter() {
    let model = model();
    let request = RouteRequest {
        origin: Point::new(139.7701, 35.6799),
        shelter_id: 1,
        weather: WeatherFeatures::default(),
    };
    let route = plan_evacuation_route(
        &model,
        &FixedScenario(Scenario::High),
        &request,
        &SearchOptions::default(),
    )
    .unwrap();

    assert_eq!(route.shelter.name, "Riverside School");
    assert_eq!(route.statistics.total_risk_walk_heat, 4000.0);
    assert_eq!(route.walk_path_segments.len(), 1);
    assert_eq!(route.drive_path_segments.len(), 1);

    let json = serde_json::to_value(&route).unwrap();
    assert_eq!(json["scenario"], "High");
    assert_eq!(json["start_point"]["type"], "Point");
    assert_eq!(json["walk_path_segments"][0]["vulnerability_level"], "Low");
}

#[test]
fn planner_rejects_bad_requests() {
    let model = model();
    let mut request = RouteRequest {
        origin: Point::new(139.7701, 35.6799),
        shelter_id: 3,
        weather: WeatherFeatures::default(),
    };
    let classifier = FixedScenario(Scenario::Low);
    let options = SearchOptions::default();

    let err = plan_evacuation_route(&model, &classifier, &request, &options).unwrap_err();
    assert!(matches!(err, Error::InvalidShelter { id: 3, available: 2 }));

    request.shelter_id = 0;
    let err = plan_evacuation_route(&model, &classifier, &request, &options).unwrap_err();
    assert!(matches!(err, Error::InvalidShelter { .. }));

    request.shelter_id = 1;
    request.origin = Point::new(0.0, 0.0);
    let err = plan_evacuation_route(&model, &classifier, &request, &options).unwrap_err();
    assert!(matches!(err, Error::OutsideStudyArea { .. }));
}
