pub use crate::MAX_SHELTER_CANDIDATES;

// Model assembly
pub use crate::loading::{EvacuationModelConfig, create_evacuation_model};
pub use crate::model::{EvacuationModel, ShelterCandidate, StudyArea};

// Hazard inputs
pub use crate::classify::{FixedScenario, HeatIndexClassifier, ScenarioClassifier, WeatherFeatures};
pub use crate::model::{HazardProfile, Scenario, VulnerabilityLevel};

// Routing
pub use crate::routing::{
    EvacuationRoute, RouteOutcome, RouteRequest, RouteStatistics, RoutingInputs, SearchOptions,
    compute_evacuation_routes, nearest_shelters, plan_evacuation_route,
};

// Core types for the street networks
pub use crate::model::{NetworkKind, StreetGraph};
pub use petgraph::graph::{EdgeIndex, NodeIndex};
