//! Administrative hierarchy and region filters.
//!
//! Germany is split into states, states into counties and counties into
//! municipalities. Every snapshot row is a municipality that carries the
//! names of all its parents, so any coarser realm is reached by grouping
//! on the matching name column.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum_macros::{AsRefStr, Display, EnumString};

use crate::error::{Error, Result};
use crate::types::{RegionSnapshot, TimelinePoint};

/// Display name used for the country level.
pub const COUNTRY_NAME: &str = "Germany";

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum RealmType {
    Municipality,
    County,
    State,
    Country,
}

/// Finest to coarsest.
pub static REALM_ORDER: [RealmType; 4] = [
    RealmType::Municipality,
    RealmType::County,
    RealmType::State,
    RealmType::Country,
];

impl RealmType {
    /// Parses a realm name as it arrives in a query parameter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownRealm`] for anything that is not one of the
    /// four realm names.
    pub fn parse(name: &str) -> Result<Self> {
        Self::from_str(name.trim()).map_err(|_| Error::UnknownRealm {
            name: name.to_string(),
        })
    }

    /// Column caption for this realm.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Municipality => "Municipality",
            Self::County => "County",
            Self::State => "State",
            Self::Country => "Country",
        }
    }

    fn position(self) -> usize {
        REALM_ORDER
            .iter()
            .position(|r| *r == self)
            .unwrap_or(REALM_ORDER.len() - 1)
    }

    /// The realm directly above this one, `None` for the country.
    pub fn coarser(self) -> Option<Self> {
        REALM_ORDER.get(self.position() + 1).copied()
    }

    /// The realm whose filter selects the siblings of a region at this
    /// level. The country has no parent and is its own scope.
    pub fn default_scope(self) -> Self {
        self.coarser().unwrap_or(self)
    }

    /// This realm followed by every coarser one.
    pub fn and_coarser(self) -> impl Iterator<Item = RealmType> {
        REALM_ORDER[self.position()..].iter().copied()
    }
}

/// Anything that carries region labels a [`RegionFilters`] can test.
pub trait RegionLabels {
    fn key(&self) -> Option<&str>;

    /// Name of the region at `realm`, `None` if the row does not carry it.
    fn label(&self, realm: RealmType) -> Option<&str>;
}

impl RegionLabels for RegionSnapshot {
    fn key(&self) -> Option<&str> {
        Some(&self.municipality_key)
    }

    fn label(&self, realm: RealmType) -> Option<&str> {
        Some(self.name_at(realm))
    }
}

impl RegionLabels for TimelinePoint {
    fn key(&self) -> Option<&str> {
        self.municipality_key.as_deref()
    }

    fn label(&self, realm: RealmType) -> Option<&str> {
        match realm {
            RealmType::Municipality => self.municipality.as_deref(),
            RealmType::County => self.county.as_deref(),
            RealmType::State => self.state.as_deref(),
            RealmType::Country => Some(COUNTRY_NAME),
        }
    }
}

impl RegionSnapshot {
    /// Name of this municipality's region at `realm`.
    pub fn name_at(&self, realm: RealmType) -> &str {
        match realm {
            RealmType::Municipality => &self.municipality,
            RealmType::County => &self.county,
            RealmType::State => &self.state,
            RealmType::Country => COUNTRY_NAME,
        }
    }

    /// City that is its own county ("kreisfreie Stadt").
    pub fn is_county_level_city(&self) -> bool {
        self.municipality_key.ends_with("000")
    }

    /// City that is its own state (Berlin, Hamburg).
    pub fn is_city_state(&self) -> bool {
        self.municipality_key.ends_with("000000")
    }
}

/// Exact-match filters on the region labels. A `None` field does not
/// restrict anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionFilters {
    pub municipality_key: Option<String>,
    pub municipality: Option<String>,
    pub county: Option<String>,
    pub state: Option<String>,
}

impl RegionFilters {
    /// Filters that select the parent region of `subject` as seen from
    /// `realm`, i.e. the set its siblings live in.
    pub fn parent_of(subject: &RegionSnapshot, realm: RealmType) -> Self {
        let mut filters = Self::default();
        for parent in realm.and_coarser().skip(1) {
            let name = Some(subject.name_at(parent).to_string());
            match parent {
                RealmType::County => filters.county = name,
                RealmType::State => filters.state = name,
                RealmType::Municipality | RealmType::Country => {}
            }
        }
        filters
    }

    pub fn value_for(&self, realm: RealmType) -> Option<&str> {
        match realm {
            RealmType::Municipality => self.municipality.as_deref(),
            RealmType::County => self.county.as_deref(),
            RealmType::State => self.state.as_deref(),
            RealmType::Country => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.municipality_key.is_none()
            && self.municipality.is_none()
            && self.county.is_none()
            && self.state.is_none()
    }

    /// True when every present filter equals the row's label.
    pub fn matches<T: RegionLabels>(&self, row: &T) -> bool {
        if let Some(key) = self.municipality_key.as_deref() {
            if row.key() != Some(key) {
                return false;
            }
        }
        REALM_ORDER
            .iter()
            .all(|realm| self.matches_at(row, *realm))
    }

    /// True when the row passes the filters at `scope` and every coarser
    /// level. Finer filters are ignored.
    pub fn matches_from<T: RegionLabels>(&self, row: &T, scope: RealmType) -> bool {
        scope.and_coarser().all(|realm| self.matches_at(row, realm))
    }

    fn matches_at<T: RegionLabels>(&self, row: &T, realm: RealmType) -> bool {
        self.value_for(realm)
            .map_or(true, |wanted| row.label(realm) == Some(wanted))
    }

    /// Realm looked at by the totals view.
    pub fn totals_realm(&self) -> RealmType {
        if self.municipality.is_some() || self.municipality_key.is_some() {
            RealmType::Municipality
        } else if self.county.is_some() {
            RealmType::County
        } else if self.state.is_some() {
            RealmType::State
        } else {
            RealmType::Country
        }
    }

    /// Realm listed by the rankings view. The country page lists states.
    pub fn rankings_realm(&self) -> RealmType {
        if self.municipality.is_some() {
            RealmType::Municipality
        } else if self.county.is_some() {
            RealmType::County
        } else {
            RealmType::State
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(key: &str, municipality: &str, county: &str, state: &str) -> RegionSnapshot {
        RegionSnapshot {
            municipality_key: key.to_string(),
            municipality: municipality.to_string(),
            county: county.to_string(),
            state: state.to_string(),
            ..RegionSnapshot::default()
        }
    }

    #[test]
    fn default_scope_walks_up_one_level() {
        assert_eq!(RealmType::Municipality.default_scope(), RealmType::County);
        assert_eq!(RealmType::County.default_scope(), RealmType::State);
        assert_eq!(RealmType::State.default_scope(), RealmType::Country);
        assert_eq!(RealmType::Country.default_scope(), RealmType::Country);
    }

    #[test]
    fn parses_realm_names_case_insensitively() {
        assert_eq!(RealmType::parse("County").unwrap(), RealmType::County);
        assert_eq!(RealmType::parse(" state ").unwrap(), RealmType::State);
        assert!(matches!(
            RealmType::parse("district"),
            Err(Error::UnknownRealm { .. })
        ));
    }

    #[test]
    fn key_suffix_marks_county_cities_and_city_states() {
        let hamburg = snapshot("02000000", "Hamburg", "Hamburg", "Hamburg");
        let cologne = snapshot("05315000", "Köln", "Köln", "Nordrhein-Westfalen");
        let village = snapshot("09162123", "Dorf", "München", "Bayern");
        assert!(hamburg.is_city_state());
        assert!(hamburg.is_county_level_city());
        assert!(!cologne.is_city_state());
        assert!(cologne.is_county_level_city());
        assert!(!village.is_county_level_city());
    }

    #[test]
    fn realm_comes_from_finest_filter() {
        let mut filters = RegionFilters::default();
        assert_eq!(filters.totals_realm(), RealmType::Country);
        assert_eq!(filters.rankings_realm(), RealmType::State);

        filters.state = Some("Bayern".to_string());
        assert_eq!(filters.totals_realm(), RealmType::State);

        filters.county = Some("München".to_string());
        assert_eq!(filters.totals_realm(), RealmType::County);
        assert_eq!(filters.rankings_realm(), RealmType::County);

        filters.municipality_key = Some("09162000".to_string());
        assert_eq!(filters.totals_realm(), RealmType::Municipality);
        assert_eq!(filters.rankings_realm(), RealmType::County);
    }

    #[test]
    fn matches_from_ignores_finer_filters() {
        let row = snapshot("09162123", "Dorf", "München", "Bayern");
        let filters = RegionFilters {
            municipality: Some("Anderswo".to_string()),
            county: Some("München".to_string()),
            ..RegionFilters::default()
        };
        assert!(!filters.matches(&row));
        assert!(filters.matches_from(&row, RealmType::County));
    }

    #[test]
    fn parent_of_municipality_selects_county_and_state() {
        let row = snapshot("09162123", "Dorf", "München", "Bayern");
        let filters = RegionFilters::parent_of(&row, RealmType::Municipality);
        assert_eq!(filters.county.as_deref(), Some("München"));
        assert_eq!(filters.state.as_deref(), Some("Bayern"));
        assert!(filters.municipality.is_none());
        assert!(RegionFilters::parent_of(&row, RealmType::State).is_empty());
    }
}
