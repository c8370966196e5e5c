use std::{sync::Arc, time::Duration};

use heatroute_core::{
    Error, EvacuationModel, GazetteerGeocoder, Geocoder, HeatIndexClassifier, ScenarioClassifier,
    WeatherFeatures,
};

use crate::config::ServerConfig;

/// Data shared by all request handlers
pub struct AppState {
    pub model: EvacuationModel,
    pub classifier: Box<dyn ScenarioClassifier>,
    pub geocoder: Option<Box<dyn Geocoder>>,
    pub default_weather: WeatherFeatures,
    pub search_timeout: Duration,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    /// Wires the heat-index classifier and the optional gazetteer from the configuration
    pub fn from_config(model: EvacuationModel, config: &ServerConfig) -> Result<Self, Error> {
        let geocoder = match &config.gazetteer {
            Some(settings) => {
                Some(Box::new(GazetteerGeocoder::from_csv(&settings.path)?) as Box<dyn Geocoder>)
            }
            None => None,
        };

        Ok(Self {
            model,
            classifier: Box::new(HeatIndexClassifier {
                moderate_threshold: config.routing.heat_index_moderate,
                high_threshold: config.routing.heat_index_high,
            }),
            geocoder,
            default_weather: config.weather,
            search_timeout: config.routing.search_timeout(),
        })
    }
}
