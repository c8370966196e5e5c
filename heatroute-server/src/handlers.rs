//! HTTP endpoints: health check, nearest shelters and evacuation routes

use axum::{
    BoxError, Json, Router,
    error_handling::HandleErrorLayer,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use geo::Point;
use heatroute_core::{
    Error, EvacuationRoute, RouteRequest, SearchOptions, WeatherFeatures,
    model::ShelterCandidate, nearest_shelters, plan_evacuation_route,
};
use serde::{Deserialize, Serialize};
use tower::{ServiceBuilder, limit::GlobalConcurrencyLimitLayer};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, error};

use crate::config::HttpSettings;
use crate::state::SharedState;

/// Builds the API router. The concurrency limit is shared by all routes.
pub fn build_router(state: SharedState, settings: &HttpSettings) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/query-shelters", get(query_shelters))
        .route("/query-routes", get(query_routes))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .layer(GlobalConcurrencyLimitLayer::new(settings.concurrency_limit))
                .timeout(settings.request_timeout()),
        )
        .with_state(state)
}

/// Success envelope
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub data: T,
    pub message: &'static str,
    pub status_code: u16,
}

impl<T: Serialize> ApiResponse<T> {
    fn ok(data: T) -> Json<Self> {
        Json(Self {
            data,
            message: "Success",
            status_code: StatusCode::OK.as_u16(),
        })
    }
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let status = match &err {
            Error::OutsideStudyArea { .. }
            | Error::InvalidShelter { .. }
            | Error::InvalidData(_) => StatusCode::BAD_REQUEST,
            Error::NoPathFound(_) | Error::NoPointsFound => StatusCode::NOT_FOUND,
            Error::GeocodingFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!("Request failed: {err}");
        } else {
            debug!("Request rejected: {err}");
        }
        Self::new(status, err.to_string())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    error_code: u16,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message,
            error_code: self.status.as_u16(),
        };
        (self.status, Json(body)).into_response()
    }
}

async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<tower::timeout::error::Elapsed>() {
        ApiError::new(StatusCode::REQUEST_TIMEOUT, "Request took too long")
    } else {
        ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Unhandled internal error: {err}"),
        )
    }
}

/// Where a request starts: a free-text address or explicit coordinates
#[derive(Debug, Default, Deserialize)]
pub struct LocationQuery {
    pub address: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct RouteQuery {
    pub address: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub shelter_id: usize,
    pub total_precip: Option<f64>,
    pub avg_temp: Option<f64>,
    pub max_temp: Option<f64>,
    pub min_temp: Option<f64>,
    pub avg_humidity: Option<f64>,
    pub avg_wind_speed: Option<f64>,
    pub sunshine: Option<f64>,
    pub solar_rad: Option<f64>,
    pub avg_cloud: Option<f64>,
}

impl RouteQuery {
    fn location(&self) -> LocationQuery {
        LocationQuery {
            address: self.address.clone(),
            lat: self.lat,
            lon: self.lon,
        }
    }

    /// Readings given in the query override the configured defaults
    fn weather(&self, defaults: WeatherFeatures) -> WeatherFeatures {
        WeatherFeatures {
            total_precip: self.total_precip.unwrap_or(defaults.total_precip),
            avg_temp: self.avg_temp.unwrap_or(defaults.avg_temp),
            max_temp: self.max_temp.unwrap_or(defaults.max_temp),
            min_temp: self.min_temp.unwrap_or(defaults.min_temp),
            avg_humidity: self.avg_humidity.unwrap_or(defaults.avg_humidity),
            avg_wind_speed: self.avg_wind_speed.unwrap_or(defaults.avg_wind_speed),
            sunshine: self.sunshine.unwrap_or(defaults.sunshine),
            solar_rad: self.solar_rad.unwrap_or(defaults.solar_rad),
            avg_cloud: self.avg_cloud.unwrap_or(defaults.avg_cloud),
        }
    }
}

fn resolve_location(state: &SharedState, query: &LocationQuery) -> Result<Point<f64>, ApiError> {
    match (query.lat, query.lon, query.address.as_deref()) {
        (Some(lat), Some(lon), _) => {
            if lat.is_finite() && lon.is_finite() {
                Ok(Point::new(lon, lat))
            } else {
                Err(ApiError::bad_request("lat and lon must be finite numbers"))
            }
        }
        (None, None, Some(address)) if !address.trim().is_empty() => {
            let geocoder = state.geocoder.as_ref().ok_or_else(|| {
                Error::GeocodingFailed("no geocoder is configured".to_string())
            })?;
            Ok(geocoder.geocode(address)?)
        }
        _ => Err(ApiError::bad_request(
            "either an address or both lat and lon are required",
        )),
    }
}

/// Nearest shelters together with the resolved search origin
#[derive(Debug, Serialize)]
pub struct ShelterSearch {
    pub search_lat: f64,
    pub search_lon: f64,
    pub shelters: Vec<ShelterCandidate>,
}

async fn health() -> &'static str {
    "The server is running"
}

async fn query_shelters(
    State(state): State<SharedState>,
    query: Result<Query<LocationQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<ShelterSearch>>, ApiError> {
    let Query(query) = query?;
    let origin = resolve_location(&state, &query)?;
    let shelters = nearest_shelters(&state.model, &origin)?;
    Ok(ApiResponse::ok(ShelterSearch {
        search_lat: origin.y(),
        search_lon: origin.x(),
        shelters,
    }))
}

async fn query_routes(
    State(state): State<SharedState>,
    query: Result<Query<RouteQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<EvacuationRoute>>, ApiError> {
    let Query(query) = query?;
    let origin = resolve_location(&state, &query.location())?;
    let request = RouteRequest {
        origin,
        shelter_id: query.shelter_id,
        weather: query.weather(state.default_weather),
    };

    let route = tokio::task::spawn_blocking(move || {
        let options = SearchOptions::with_timeout(state.search_timeout);
        plan_evacuation_route(&state.model, state.classifier.as_ref(), &request, &options)
    })
    .await
    .map_err(|e| {
        ApiError::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Routing task failed: {e}"),
        )
    })??;

    Ok(ApiResponse::ok(route))
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, time::Duration};

    use axum::{body::Body, http::Request};
    use geo::polygon;
    use heatroute_core::{
        FixedScenario, GazetteerGeocoder, Scenario, ScenarioClassifier,
        model::{
            EdgeGeometry, EvacuationModel, NetworkKind, ParkOverlay, Shelter, ShelterIndex,
            StreetEdge, StreetGraph, StudyArea, VulnerabilityOverlay,
        },
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::state::AppState;

    /// Two-way street a-b plus a node with no streets at all
    fn graph(kind: NetworkKind) -> StreetGraph {
        let mut graph = StreetGraph::new(kind);
        let a_pt = Point::new(139.770, 35.680);
        let b_pt = Point::new(139.771, 35.680);
        let a = graph.add_node(1, a_pt);
        let b = graph.add_node(2, b_pt);
        graph.add_node(3, Point::new(139.785, 35.695));
        graph.add_edge(a, b, StreetEdge::new(90.0, EdgeGeometry::straight(a_pt, b_pt)));
        graph.add_edge(b, a, StreetEdge::new(90.0, EdgeGeometry::straight(b_pt, a_pt)));
        graph
    }

    fn model() -> EvacuationModel {
        EvacuationModel {
            walk_graph: graph(NetworkKind::Walk),
            drive_graph: graph(NetworkKind::Drive),
            area: StudyArea::from_geometry(geo::Geometry::Polygon(polygon![
                (x: 139.76, y: 35.67),
                (x: 139.79, y: 35.67),
                (x: 139.79, y: 35.70),
                (x: 139.76, y: 35.70),
            ]))
            .unwrap(),
            shelters: ShelterIndex::new(vec![
                Shelter {
                    name: "Riverside School".to_string(),
                    capacity: 300,
                    location: Point::new(139.7711, 35.6801),
                },
                Shelter {
                    name: "Hillside Hall".to_string(),
                    capacity: 50,
                    location: Point::new(139.7851, 35.6951),
                },
            ]),
            parks: ParkOverlay::new(),
            vulnerability: VulnerabilityOverlay::new(),
        }
    }

    fn app_with(classifier: Box<dyn ScenarioClassifier>, settings: &HttpSettings) -> Router {
        let mut gazetteer = GazetteerGeocoder::new();
        gazetteer.insert("1 Station Road", Point::new(139.7701, 35.6799));

        let state = AppState {
            model: model(),
            classifier,
            geocoder: Some(Box::new(gazetteer)),
            default_weather: WeatherFeatures::default(),
            search_timeout: Duration::from_secs(5),
        };
        build_router(Arc::new(state), settings)
    }

    fn app() -> Router {
        app_with(
            Box::new(FixedScenario(Scenario::Moderate)),
            &HttpSettings::default(),
        )
    }

    async fn send(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        send(app(), uri).await
    }

    #[tokio::test]
    async fn health_responds() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn shelters_by_address_echo_the_search_origin() {
        let (status, body) = get_json("/query-shelters?address=1%20station%20road").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status_code"], 200);
        let data = &body["data"];
        assert_eq!(data["search_lat"], 35.6799);
        assert_eq!(data["search_lon"], 139.7701);
        assert_eq!(data["shelters"][0]["id"], 1);
        assert_eq!(data["shelters"][0]["name"], "Riverside School");
        assert_eq!(data["shelters"][1]["id"], 2);
    }

    #[tokio::test]
    async fn routes_by_coordinates() {
        let (status, body) =
            get_json("/query-routes?lat=35.6799&lon=139.7701&shelter_id=1").await;
        assert_eq!(status, StatusCode::OK);
        let data = &body["data"];
        assert_eq!(data["scenario"], "Moderate");
        assert_eq!(data["distance_walk_heat"], 90.0);
        assert_eq!(data["total_risk_walk_heat"], 4500.0);
        assert_eq!(data["distance_drive"], 90.0);
        assert_eq!(data["end_point"]["type"], "Point");
    }

    #[tokio::test]
    async fn request_errors_map_to_status_codes() {
        let (status, body) = get_json("/query-routes?lat=35.6799&lon=139.7701&shelter_id=4").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_code"], 400);

        let (status, _) = get_json("/query-shelters?lat=0&lon=0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = get_json("/query-shelters?address=nowhere").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error_code"], 422);

        let (status, _) = get_json("/query-routes?lat=35.68&lon=139.77").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get_json("/query-shelters").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unreachable_shelter_is_not_found() {
        // shelter 2 snaps to the node without streets
        let (status, body) =
            get_json("/query-routes?lat=35.6799&lon=139.7701&shelter_id=2").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error_code"], 404);
        assert!(
            body["error"]
                .as_str()
                .is_some_and(|message| message.contains("heat-walk"))
        );
    }

    #[tokio::test]
    async fn slow_requests_time_out() {
        let slow = |_: &WeatherFeatures| -> Result<Scenario, Error> {
            std::thread::sleep(Duration::from_millis(300));
            Ok(Scenario::Low)
        };
        let settings = HttpSettings {
            request_timeout_secs: 0,
            ..HttpSettings::default()
        };
        let (status, body) = send(
            app_with(Box::new(slow), &settings),
            "/query-routes?lat=35.6799&lon=139.7701&shelter_id=1",
        )
        .await;
        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
        assert_eq!(body["error_code"], 408);
    }

    #[tokio::test]
    async fn concurrency_limit_is_shared_between_routes() {
        let settings = HttpSettings {
            concurrency_limit: 1,
            ..HttpSettings::default()
        };
        let app = app_with(Box::new(FixedScenario(Scenario::Low)), &settings);

        // permits are released once each response completes
        let (status, _) = send(app.clone(), "/query-shelters?lat=35.6799&lon=139.7701").await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(
            app.clone(),
            "/query-routes?lat=35.6799&lon=139.7701&shelter_id=1",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(app, "/query-shelters?lat=35.6799&lon=139.7701").await;
        assert_eq!(status, StatusCode::OK);
    }
}
