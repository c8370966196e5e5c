//! Heat-risk-aware evacuation routing.
//!
//! Builds an [`EvacuationModel`] from street networks and overlay layers,
//! then answers route requests with a heat-minimizing walk, a
//! shortest-distance walk for comparison and a drive leg, together with
//! risk statistics for the classified heat scenario.

pub mod classify;
pub mod cost;
mod error;
pub mod geocode;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod routing;

pub use classify::{FixedScenario, HeatIndexClassifier, ScenarioClassifier, WeatherFeatures};
pub use error::Error;
pub use geocode::{GazetteerGeocoder, Geocoder};
pub use loading::{EvacuationModelConfig, create_evacuation_model};
pub use model::{EvacuationModel, MAX_SHELTER_CANDIDATES, Scenario};
pub use routing::{
    EvacuationRoute, RouteRequest, SearchOptions, compute_evacuation_routes, nearest_shelters,
    plan_evacuation_route,
};
