//! Free-text region search.
//!
//! A query either names the whole country (one of a fixed set of aliases) or
//! is matched as a substring against municipality, county and state columns.

use once_cell::sync::Lazy;
use std::collections::HashSet;

use crate::types::{CountyMatch, MunicipalityMatch, RegionSnapshot, SearchResults, StateMatch};

/// Aliases that send the user to the country page.
const COUNTRY_ALIASES: [&str; 6] = [
    "Germany",
    "Deutschland",
    "Bundesrepublik",
    "Schland",
    "alles",
    "BRD",
];

static COUNTRY_ALIASES_LOWER: Lazy<HashSet<String>> =
    Lazy::new(|| COUNTRY_ALIASES.iter().map(|a| a.to_lowercase()).collect());

/// Municipality keys kept out of the county results on top of the
/// city-states. Bremen is a state made of two cities, so the city of Bremen
/// keeps a county-level key although it would duplicate the state entry.
const COUNTY_SEARCH_EXCLUSIONS: &[(&str, &str)] = &[("04011000", "Bremen")];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The query named the whole country.
    Country,
    Regions(SearchResults),
}

pub fn is_country_alias(query: &str) -> bool {
    COUNTRY_ALIASES_LOWER.contains(&query.trim().to_lowercase())
}

fn excluded_from_counties(snapshot: &RegionSnapshot) -> bool {
    snapshot.is_city_state()
        || COUNTY_SEARCH_EXCLUSIONS
            .iter()
            .any(|(key, _)| *key == snapshot.municipality_key)
}

fn contains(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Finds the municipalities, counties and states whose names (or key, or
/// postal code for municipalities) contain `query`, ignoring case.
///
/// Cities that are their own county are only listed as counties, and
/// city-states only as states.
pub fn search_regions(snapshots: &[RegionSnapshot], query: &str) -> SearchOutcome {
    if is_country_alias(query) {
        return SearchOutcome::Country;
    }
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return SearchOutcome::Regions(SearchResults::default());
    }

    let mut results = SearchResults::default();
    let mut seen_municipalities = HashSet::new();
    let mut seen_counties = HashSet::new();
    let mut seen_states = HashSet::new();

    for s in snapshots {
        let municipality_hit = contains(&s.municipality, &needle)
            || contains(&s.municipality_key, &needle)
            || s.zip_code.as_deref().is_some_and(|z| contains(z, &needle));
        if municipality_hit && !s.is_county_level_city() {
            let m = MunicipalityMatch {
                municipality: s.municipality.clone(),
                county: s.county.clone(),
                state: s.state.clone(),
            };
            if seen_municipalities.insert(m.clone()) {
                results.municipalities.push(m);
            }
        }

        if contains(&s.county, &needle) && !excluded_from_counties(s) {
            let c = CountyMatch {
                county: s.county.clone(),
                state: s.state.clone(),
            };
            if seen_counties.insert(c.clone()) {
                results.counties.push(c);
            }
        }

        if contains(&s.state, &needle) {
            let st = StateMatch {
                state: s.state.clone(),
            };
            if seen_states.insert(st.clone()) {
                results.states.push(st);
            }
        }
    }

    log::debug!(
        "search_regions('{}'): {} municipalities, {} counties, {} states",
        query,
        results.municipalities.len(),
        results.counties.len(),
        results.states.len()
    );
    SearchOutcome::Regions(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(key: &str, municipality: &str, county: &str, state: &str, zip: &str) -> RegionSnapshot {
        RegionSnapshot {
            municipality_key: key.to_string(),
            municipality: municipality.to_string(),
            county: county.to_string(),
            state: state.to_string(),
            zip_code: Some(zip.to_string()),
            ..RegionSnapshot::default()
        }
    }

    fn sample() -> Vec<RegionSnapshot> {
        vec![
            snapshot("02000000", "Hamburg", "Hamburg", "Hamburg", "20095"),
            snapshot("04011000", "Bremen", "Bremen", "Bremen", "28195"),
            snapshot("04012000", "Bremerhaven", "Bremerhaven", "Bremen", "27568"),
            snapshot("09162000", "München", "München", "Bayern", "80331"),
            snapshot("09184119", "Unterhaching", "Landkreis München", "Bayern", "82008"),
            snapshot("09184148", "Oberhaching", "Landkreis München", "Bayern", "82041"),
        ]
    }

    fn regions(outcome: SearchOutcome) -> SearchResults {
        match outcome {
            SearchOutcome::Regions(results) => results,
            SearchOutcome::Country => panic!("unexpected country shortcut"),
        }
    }

    #[test]
    fn every_alias_is_the_country_in_any_case() {
        for alias in COUNTRY_ALIASES {
            assert_eq!(search_regions(&sample(), alias), SearchOutcome::Country);
            assert_eq!(
                search_regions(&sample(), &alias.to_uppercase()),
                SearchOutcome::Country
            );
        }
        assert_eq!(search_regions(&sample(), " germany "), SearchOutcome::Country);
    }

    #[test]
    fn county_level_cities_are_not_listed_as_municipalities() {
        let results = regions(search_regions(&sample(), "münchen"));
        assert!(results.municipalities.is_empty());
        let counties: Vec<&str> = results.counties.iter().map(|c| c.county.as_str()).collect();
        assert_eq!(counties, ["München", "Landkreis München"]);
    }

    #[test]
    fn matches_postal_code_and_key() {
        let results = regions(search_regions(&sample(), "8200"));
        assert_eq!(results.municipalities.len(), 1);
        assert_eq!(results.municipalities[0].municipality, "Unterhaching");

        let results = regions(search_regions(&sample(), "09184148"));
        assert_eq!(results.municipalities[0].municipality, "Oberhaching");
    }

    #[test]
    fn city_states_and_bremen_are_not_counties() {
        let results = regions(search_regions(&sample(), "ham"));
        assert!(results.counties.is_empty());
        assert_eq!(results.states.len(), 1);

        let results = regions(search_regions(&sample(), "brem"));
        let counties: Vec<&str> = results.counties.iter().map(|c| c.county.as_str()).collect();
        assert_eq!(counties, ["Bremerhaven"]);
        assert_eq!(results.states, vec![StateMatch { state: "Bremen".to_string() }]);
    }

    #[test]
    fn counties_are_listed_once() {
        let results = regions(search_regions(&sample(), "landkreis"));
        assert_eq!(results.counties.len(), 1);
    }

    #[test]
    fn blank_query_finds_nothing() {
        assert!(regions(search_regions(&sample(), "   ")).is_empty());
    }
}
