//! Heat hazard model: scenario tiers and the overlays that modulate exposure

pub mod overlay;
pub mod scenario;

pub use overlay::{ParkOverlay, VulnerabilityAttr, VulnerabilityLevel, VulnerabilityOverlay};
pub use scenario::{HazardProfile, Scenario};
