//! Metrics that may be used as numerator or denominator of a ratio.
//!
//! Callers pass metric names as plain strings; they are resolved here into a
//! closed set so an unknown name is rejected before any aggregation runs.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};

use crate::error::{Error, Result};
use crate::types::RegionSnapshot;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Metric {
    Population,
    Area,
    TotalNetNominalCapacity,
    StorageNetNominalCapacity,
    EnergyUnits,
}

impl Metric {
    /// Resolves a metric name as it arrives in a query parameter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownMetric`] when the name is not a known metric.
    pub fn parse(name: &str) -> Result<Self> {
        Self::from_str(name.trim()).map_err(|_| Error::UnknownMetric {
            name: name.to_string(),
        })
    }

    pub fn value(self, snapshot: &RegionSnapshot) -> Option<f64> {
        match self {
            Self::Population => snapshot.population,
            Self::Area => snapshot.area,
            Self::TotalNetNominalCapacity => snapshot.total_net_nominal_capacity,
            Self::StorageNetNominalCapacity => snapshot.storage_net_nominal_capacity,
            Self::EnergyUnits => snapshot.energy_units,
        }
    }

    /// Human-readable column caption.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Population => "Population",
            Self::Area => "Area",
            Self::TotalNetNominalCapacity => "Total net nominal capacity",
            Self::StorageNetNominalCapacity => "Storage net nominal capacity",
            Self::EnergyUnits => "Energy units",
        }
    }
}
