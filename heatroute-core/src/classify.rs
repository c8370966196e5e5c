//! Heat scenario classification from weather readings
//!
//! The router treats the classifier as an injected oracle. A rule-based
//! heat-index classifier is provided, and tests use [`FixedScenario`].

use serde::{Deserialize, Serialize};

use crate::{Error, model::Scenario};

/// Daily weather readings fed to a classifier
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherFeatures {
    /// mm
    pub total_precip: f64,
    /// °C
    pub avg_temp: f64,
    pub max_temp: f64,
    pub min_temp: f64,
    /// Relative humidity, %
    pub avg_humidity: f64,
    /// m/s
    pub avg_wind_speed: f64,
    /// hours
    pub sunshine: f64,
    /// MJ/m²
    pub solar_rad: f64,
    /// oktas
    pub avg_cloud: f64,
}

pub trait ScenarioClassifier: Send + Sync {
    /// # Errors
    ///
    /// [`Error::InvalidScenario`] when the underlying model produces a label
    /// outside `Low`, `Moderate`, `High`.
    fn classify(&self, features: &WeatherFeatures) -> Result<Scenario, Error>;
}

impl<F> ScenarioClassifier for F
where
    F: Fn(&WeatherFeatures) -> Result<Scenario, Error> + Send + Sync,
{
    fn classify(&self, features: &WeatherFeatures) -> Result<Scenario, Error> {
        self(features)
    }
}

/// Always answers the same scenario
#[derive(Debug, Clone, Copy)]
pub struct FixedScenario(pub Scenario);

impl ScenarioClassifier for FixedScenario {
    fn classify(&self, _features: &WeatherFeatures) -> Result<Scenario, Error> {
        Ok(self.0)
    }
}

/// Classifies by the Rothfusz heat index computed from average
/// temperature and humidity: below 80 °F is `Low`, below 90 °F `Moderate`,
/// anything hotter `High`.
#[derive(Debug, Clone, Copy)]
pub struct HeatIndexClassifier {
    pub moderate_threshold: f64,
    pub high_threshold: f64,
}

impl Default for HeatIndexClassifier {
    fn default() -> Self {
        Self {
            moderate_threshold: 80.0,
            high_threshold: 90.0,
        }
    }
}

impl HeatIndexClassifier {
    /// Heat index in °F
    pub fn heat_index(features: &WeatherFeatures) -> f64 {
        let t = features.avg_temp * 9.0 / 5.0 + 32.0;
        let rh = features.avg_humidity;
        -42.379 + 2.049_015_23 * t + 10.143_331_27 * rh
            - 0.224_755_41 * t * rh
            - 0.006_837_83 * t * t
            - 0.054_817_17 * rh * rh
            + 0.001_228_74 * t * t * rh
            + 0.000_852_82 * t * rh * rh
            - 0.000_001_99 * t * t * rh * rh
    }
}

impl ScenarioClassifier for HeatIndexClassifier {
    fn classify(&self, features: &WeatherFeatures) -> Result<Scenario, Error> {
        let index = Self::heat_index(features);
        if !index.is_finite() {
            return Err(Error::InvalidData(format!(
                "Heat index is not finite for {features:?}"
            )));
        }
        Ok(if index < self.moderate_threshold {
            Scenario::Low
        } else if index < self.high_threshold {
            Scenario::Moderate
        } else {
            Scenario::High
        })
    }
}
