use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

use crate::util::format_capacity;

/// One CSV row of the current-totals export, before cleaning.
#[derive(Debug, Deserialize)]
pub struct RawTotalRow {
    pub municipality_key: Option<String>,
    pub municipality: Option<String>,
    pub county: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub population: Option<String>,
    pub area: Option<String>,
    pub total_net_nominal_capacity: Option<String>,
    pub storage_net_nominal_capacity: Option<String>,
    pub energy_units: Option<String>,
}

/// One CSV row of the monthly-timeline export, before cleaning.
#[derive(Debug, Deserialize)]
pub struct RawTimelineRow {
    pub date: Option<String>,
    pub municipality_key: Option<String>,
    pub municipality: Option<String>,
    pub county: Option<String>,
    pub state: Option<String>,
    pub pv_net_nominal_capacity: Option<String>,
    pub wind_net_nominal_capacity: Option<String>,
    pub biomass_net_nominal_capacity: Option<String>,
    pub hydro_net_nominal_capacity: Option<String>,
}

/// Current statistics of a single municipality.
///
/// The municipality key encodes the hierarchy: a key ending in `000` belongs
/// to a city that is also its own county, a key ending in `000000` to a
/// city-state. Metrics are never negative; a missing value is `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegionSnapshot {
    pub municipality_key: String,
    pub municipality: String,
    pub county: String,
    pub state: String,
    pub zip_code: Option<String>,
    pub population: Option<f64>,
    /// Area in square metres.
    pub area: Option<f64>,
    /// Installed generation capacity in kW.
    pub total_net_nominal_capacity: Option<f64>,
    /// Installed storage capacity in kW.
    pub storage_net_nominal_capacity: Option<f64>,
    pub energy_units: Option<f64>,
}

/// Capacity added on a given date, optionally attributed to a region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub date: NaiveDate,
    pub municipality_key: Option<String>,
    pub municipality: Option<String>,
    pub county: Option<String>,
    pub state: Option<String>,
    pub pv: Option<f64>,
    pub wind: Option<f64>,
    pub biomass: Option<f64>,
    pub hydro: Option<f64>,
}

/// Running totals of installed capacity up to and including `date`.
#[derive(Debug, Clone, PartialEq, Serialize, Tabled)]
pub struct TimelineRow {
    #[serde(rename = "Date")]
    #[tabled(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Photovoltaics")]
    #[tabled(rename = "Photovoltaics", display_with = "format_capacity")]
    pub pv: f64,
    #[serde(rename = "Wind power")]
    #[tabled(rename = "Wind power", display_with = "format_capacity")]
    pub wind: f64,
    #[serde(rename = "Biomass")]
    #[tabled(rename = "Biomass", display_with = "format_capacity")]
    pub biomass: f64,
    #[serde(rename = "Hydropower")]
    #[tabled(rename = "Hydropower", display_with = "format_capacity")]
    pub hydro: f64,
}

/// A single line of a ranking table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingEntry {
    #[serde(rename = "Rank")]
    pub rank: usize,
    #[serde(rename = "Region")]
    pub region_name: String,
    #[serde(rename = "Numerator")]
    pub numerator_sum: f64,
    #[serde(rename = "Denominator")]
    pub denominator_sum: Option<f64>,
    #[serde(rename = "Score")]
    pub score: Option<f64>,
}

/// Ratio of a region and its position among its siblings.
///
/// `rank` is `0` when the region could not be ranked (missing or
/// non-positive numerator or denominator); `ratio` is `None` in that case.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatioRank {
    pub ratio: Option<f64>,
    pub rank: usize,
    pub total_count: usize,
}

impl RatioRank {
    pub const fn unranked(total_count: usize) -> Self {
        Self {
            ratio: None,
            rank: 0,
            total_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Tabled)]
pub struct MunicipalityMatch {
    #[tabled(rename = "Municipality")]
    pub municipality: String,
    #[tabled(rename = "County")]
    pub county: String,
    #[tabled(rename = "State")]
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Tabled)]
pub struct CountyMatch {
    #[tabled(rename = "County")]
    pub county: String,
    #[tabled(rename = "State")]
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Tabled)]
pub struct StateMatch {
    #[tabled(rename = "State")]
    pub state: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    pub municipalities: Vec<MunicipalityMatch>,
    pub counties: Vec<CountyMatch>,
    pub states: Vec<StateMatch>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.municipalities.is_empty() && self.counties.is_empty() && self.states.is_empty()
    }
}
