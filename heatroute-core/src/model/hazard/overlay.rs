//! Spatial overlays resolved onto street edges: parks and population vulnerability

use std::fmt;

use hashbrown::{HashMap, HashSet};
use petgraph::graph::EdgeIndex;
use serde::{Deserialize, Serialize};

/// Population sensitivity class of a parcel. Ordered `Low < Medium < High`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum VulnerabilityLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl VulnerabilityLevel {
    pub const ALL: [VulnerabilityLevel; 3] = [
        VulnerabilityLevel::Low,
        VulnerabilityLevel::Medium,
        VulnerabilityLevel::High,
    ];

    /// Numeric weighting associated with the level
    pub fn factor(self) -> f64 {
        match self {
            VulnerabilityLevel::Low => 1.0,
            VulnerabilityLevel::Medium => 1.5,
            VulnerabilityLevel::High => 2.0,
        }
    }

    /// Classifies an elderly population count.
    ///
    /// NaN never compares below a threshold, so missing counts land in `High`.
    pub fn from_population(population: f64) -> Self {
        if population <= 5.0 {
            VulnerabilityLevel::Low
        } else if population <= 15.0 {
            VulnerabilityLevel::Medium
        } else {
            VulnerabilityLevel::High
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VulnerabilityLevel::Low => "Low",
            VulnerabilityLevel::Medium => "Medium",
            VulnerabilityLevel::High => "High",
        }
    }
}

impl fmt::Display for VulnerabilityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Level and factor resolved for one edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VulnerabilityAttr {
    pub level: VulnerabilityLevel,
    pub factor: f64,
}

impl Default for VulnerabilityAttr {
    fn default() -> Self {
        Self {
            level: VulnerabilityLevel::Low,
            factor: 1.0,
        }
    }
}

impl VulnerabilityAttr {
    /// Reduces the parcels overlapping one edge.
    ///
    /// Level and factor maxima are taken independently of each other,
    /// so inconsistent input pairs are preserved as given.
    pub fn from_overlaps<I>(overlaps: I) -> Self
    where
        I: IntoIterator<Item = (VulnerabilityLevel, f64)>,
    {
        overlaps
            .into_iter()
            .fold(None, |acc: Option<Self>, (level, factor)| {
                Some(match acc {
                    None => Self { level, factor },
                    Some(current) => Self {
                        level: current.level.max(level),
                        factor: current.factor.max(factor),
                    },
                })
            })
            .unwrap_or_default()
    }
}

/// Edge to vulnerability mapping. Lookups are total: edges without an
/// overlapping parcel resolve to `(Low, 1.0)`.
#[derive(Debug, Clone, Default)]
pub struct VulnerabilityOverlay {
    edges: HashMap<EdgeIndex, VulnerabilityAttr>,
}

impl VulnerabilityOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the overlay from the raw `(level, factor)` overlaps of every edge
    pub fn from_overlaps<I, O>(overlaps: I) -> Self
    where
        I: IntoIterator<Item = (EdgeIndex, O)>,
        O: IntoIterator<Item = (VulnerabilityLevel, f64)>,
    {
        let edges = overlaps
            .into_iter()
            .map(|(edge, parcels)| (edge, VulnerabilityAttr::from_overlaps(parcels)))
            .collect();
        Self { edges }
    }

    pub fn insert(&mut self, edge: EdgeIndex, attr: VulnerabilityAttr) {
        self.edges.insert(edge, attr);
    }

    pub fn get(&self, edge: EdgeIndex) -> VulnerabilityAttr {
        self.edges.get(&edge).copied().unwrap_or_default()
    }

    pub fn level(&self, edge: EdgeIndex) -> VulnerabilityLevel {
        self.get(edge).level
    }

    /// Number of edges with at least one overlapping parcel
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Edges passing through green space
#[derive(Debug, Clone, Default)]
pub struct ParkOverlay {
    edges: HashSet<EdgeIndex>,
}

impl ParkOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, edge: EdgeIndex) -> bool {
        self.edges.contains(&edge)
    }

    pub fn insert(&mut self, edge: EdgeIndex) {
        self.edges.insert(edge);
    }

    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

impl FromIterator<EdgeIndex> for ParkOverlay {
    fn from_iter<T: IntoIterator<Item = EdgeIndex>>(iter: T) -> Self {
        Self {
            edges: iter.into_iter().collect(),
        }
    }
}
