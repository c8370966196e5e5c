//! End-to-end handling of an evacuation request: study area check,
//! shelter choice, scenario classification, node snapping and routing

use geo::Point;
use geojson::{Geometry, Value as GeoJsonValue};
use log::debug;
use petgraph::graph::NodeIndex;
use serde::{Serialize, Serializer};

use super::{
    DriveSegment, RouteStatistics, RoutingInputs, SearchOptions, WalkSegment,
    compute_evacuation_routes,
};
use crate::{
    Error,
    classify::{ScenarioClassifier, WeatherFeatures},
    model::{EvacuationModel, MAX_SHELTER_CANDIDATES, ShelterCandidate, StreetGraph},
};

#[derive(Debug, Clone)]
pub struct RouteRequest {
    /// Starting location, lon/lat
    pub origin: Point<f64>,
    /// 1-based rank among the shelters nearest to `origin`
    pub shelter_id: usize,
    /// Current conditions at the origin
    pub weather: WeatherFeatures,
}

/// Complete answer to an evacuation request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvacuationRoute {
    pub shelter: ShelterCandidate,
    #[serde(flatten)]
    pub statistics: RouteStatistics,
    pub walk_path_segments: Vec<WalkSegment>,
    pub drive_path_segments: Vec<DriveSegment>,
    #[serde(serialize_with = "serialize_point")]
    pub start_point: Point<f64>,
    #[serde(serialize_with = "serialize_point")]
    pub end_point: Point<f64>,
}

fn serialize_point<S: Serializer>(point: &Point<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    Geometry::new(GeoJsonValue::from(point)).serialize(serializer)
}

/// Shelters nearest to `origin`, which must lie inside the study area
///
/// # Errors
///
/// [`Error::OutsideStudyArea`] for origins outside the boundary.
pub fn nearest_shelters(
    model: &EvacuationModel,
    origin: &Point<f64>,
) -> Result<Vec<ShelterCandidate>, Error> {
    if !model.area.contains(origin) {
        return Err(Error::OutsideStudyArea {
            lon: origin.x(),
            lat: origin.y(),
        });
    }
    Ok(model.shelters.nearest(origin, MAX_SHELTER_CANDIDATES))
}

/// Plans walking and driving routes from the request origin to the chosen
/// shelter under the classified heat scenario.
///
/// # Errors
///
/// Fails with [`Error::OutsideStudyArea`], [`Error::InvalidShelter`], the
/// classifier's error, [`Error::NoPointsFound`] for empty graphs, or any
/// routing error of [`compute_evacuation_routes`].
pub fn plan_evacuation_route(
    model: &EvacuationModel,
    classifier: &dyn ScenarioClassifier,
    request: &RouteRequest,
    options: &SearchOptions,
) -> Result<EvacuationRoute, Error> {
    let candidates = nearest_shelters(model, &request.origin)?;
    let available = candidates.len();
    let shelter = request
        .shelter_id
        .checked_sub(1)
        .and_then(|idx| candidates.into_iter().nth(idx))
        .ok_or(Error::InvalidShelter {
            id: request.shelter_id,
            available,
        })?;
    let destination = Point::new(shelter.longitude, shelter.latitude);

    let scenario = classifier.classify(&request.weather)?;
    debug!(
        "Routing to shelter {} ({}) under {scenario} heat scenario",
        shelter.id, shelter.name
    );

    let (walk_start, walk_end) = snap(&model.walk_graph, &request.origin, &destination)?;
    let (drive_start, drive_end) = snap(&model.drive_graph, &request.origin, &destination)?;

    let outcome = compute_evacuation_routes(
        &RoutingInputs {
            scenario,
            walk_graph: &model.walk_graph,
            drive_graph: &model.drive_graph,
            walk_start,
            walk_end,
            drive_start,
            drive_end,
            parks: &model.parks,
            vulnerability: &model.vulnerability,
        },
        options,
    )?;

    Ok(EvacuationRoute {
        shelter,
        statistics: outcome.statistics,
        walk_path_segments: outcome.segments.walk,
        drive_path_segments: outcome.segments.drive,
        start_point: request.origin,
        end_point: destination,
    })
}

fn snap(
    graph: &StreetGraph,
    origin: &Point<f64>,
    destination: &Point<f64>,
) -> Result<(NodeIndex, NodeIndex), Error> {
    let start = graph.nearest_node(origin).ok_or(Error::NoPointsFound)?;
    let end = graph.nearest_node(destination).ok_or(Error::NoPointsFound)?;
    Ok((start, end))
}
