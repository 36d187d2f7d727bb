//! Data for the totals and rankings pages.
//!
//! Both views take the raw request parameters, resolve them into typed
//! filters and metrics, and return a serializable report for whatever
//! renders the page.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::metric::Metric;
use crate::ranking::{build_ranking, ratio_and_rank, RankingQuery};
use crate::realm::{RealmType, RegionFilters, COUNTRY_NAME};
use crate::timeline::build_timeline;
use crate::types::{RankingEntry, RatioRank, RegionSnapshot, TimelinePoint, TimelineRow};
use crate::util::{non_blank, sum_present};

/// Request parameters shared by the views. Blank values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewParams {
    pub municipality_key: Option<String>,
    pub municipality: Option<String>,
    pub county: Option<String>,
    pub state: Option<String>,
    pub numerator: Option<String>,
    pub denominator: Option<String>,
    pub scope: Option<String>,
}

impl ViewParams {
    pub fn filters(&self) -> RegionFilters {
        RegionFilters {
            municipality_key: non_blank(self.municipality_key.as_deref()),
            municipality: non_blank(self.municipality.as_deref()),
            county: non_blank(self.county.as_deref()),
            state: non_blank(self.state.as_deref()),
        }
    }

    /// Numerator and optional denominator. Capacity per capita when neither
    /// is given.
    ///
    /// # Errors
    ///
    /// * [`Error::UnknownMetric`] for a name outside the metric catalogue
    /// * [`Error::DenominatorWithoutNumerator`] when only a denominator is set
    pub fn metrics(&self) -> Result<(Metric, Option<Metric>)> {
        let numerator = non_blank(self.numerator.as_deref());
        let denominator = non_blank(self.denominator.as_deref());
        match (numerator, denominator) {
            (None, None) => Ok((Metric::TotalNetNominalCapacity, Some(Metric::Population))),
            (None, Some(_)) => Err(Error::DenominatorWithoutNumerator),
            (Some(numerator), denominator) => Ok((
                Metric::parse(&numerator)?,
                denominator.as_deref().map(Metric::parse).transpose()?,
            )),
        }
    }

    /// # Errors
    ///
    /// Returns [`Error::UnknownRealm`] for an unknown scope name.
    pub fn scope(&self) -> Result<Option<RealmType>> {
        non_blank(self.scope.as_deref())
            .as_deref()
            .map(RealmType::parse)
            .transpose()
    }
}

/// A region label in the breadcrumb from the viewed realm up to the country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HierarchyLevel {
    pub realm: RealmType,
    pub name: String,
}

/// Plain sums over all municipalities inside the viewed region.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Basics {
    pub realm_type: RealmType,
    pub realm_name: String,
    pub total_population: Option<f64>,
    pub total_area: Option<f64>,
    pub total_production_capacity: Option<f64>,
    pub total_storage_capacity: Option<f64>,
    pub count_of_devices: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TotalsReport {
    pub basics: Basics,
    pub hierarchy: Vec<HierarchyLevel>,
    pub capacity_per_capita: RatioRank,
    pub capacity_per_area: RatioRank,
    pub storage_per_capita: RatioRank,
    pub storage_per_area: RatioRank,
    pub timeline: Vec<TimelineRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingsReport {
    pub realm_type: RealmType,
    pub realm_name: String,
    pub scope: RealmType,
    pub hierarchy: Vec<HierarchyLevel>,
    pub numerator: Metric,
    pub denominator: Option<Metric>,
    pub captions: Vec<String>,
    pub rankings: Vec<RankingEntry>,
}

fn sum_metric(rows: &[&RegionSnapshot], metric: Metric) -> Option<f64> {
    sum_present(rows.iter().map(|s| metric.value(s)))
}

/// Builds the totals page for the region selected by `params`.
///
/// The first snapshot matching the filters stands for the region; an
/// unknown region yields empty sums and unranked ratios.
pub fn totals_view(
    snapshots: &[RegionSnapshot],
    points: &[TimelinePoint],
    params: &ViewParams,
) -> TotalsReport {
    let filters = params.filters();
    let realm = filters.totals_realm();
    let matching: Vec<&RegionSnapshot> = snapshots.iter().filter(|s| filters.matches(*s)).collect();
    let subject = matching.first().copied();
    if subject.is_none() {
        log::warn!("totals_view: no region matches {filters:?}");
    }

    let figure = |numerator: Metric, denominator: Metric| {
        subject.map_or(RatioRank::unranked(0), |s| {
            ratio_and_rank(snapshots, s, numerator, denominator, realm)
        })
    };

    let hierarchy: Vec<HierarchyLevel> = realm
        .and_coarser()
        .filter_map(|level| {
            let name = subject
                .map(|s| s.name_at(level).to_string())
                .or_else(|| filters.value_for(level).map(str::to_string))
                .or_else(|| (level == RealmType::Country).then(|| COUNTRY_NAME.to_string()))?;
            Some(HierarchyLevel { realm: level, name })
        })
        .collect();
    let realm_name = hierarchy
        .first()
        .map_or_else(|| COUNTRY_NAME.to_string(), |h| h.name.clone());

    let basics = Basics {
        realm_type: realm,
        realm_name,
        total_population: sum_metric(&matching, Metric::Population),
        total_area: sum_metric(&matching, Metric::Area),
        total_production_capacity: sum_metric(&matching, Metric::TotalNetNominalCapacity),
        total_storage_capacity: sum_metric(&matching, Metric::StorageNetNominalCapacity),
        count_of_devices: sum_metric(&matching, Metric::EnergyUnits),
    };
    log::info!(
        "totals_view: {} '{}' over {} municipalities",
        realm,
        basics.realm_name,
        matching.len()
    );

    TotalsReport {
        capacity_per_capita: figure(Metric::TotalNetNominalCapacity, Metric::Population),
        capacity_per_area: figure(Metric::TotalNetNominalCapacity, Metric::Area),
        storage_per_capita: figure(Metric::StorageNetNominalCapacity, Metric::Population),
        storage_per_area: figure(Metric::StorageNetNominalCapacity, Metric::Area),
        basics,
        hierarchy,
        timeline: build_timeline(points, &filters),
    }
}

/// Builds the rankings table for the parameters.
///
/// # Errors
///
/// Returns [`Error::UnknownMetric`], [`Error::UnknownRealm`] or
/// [`Error::DenominatorWithoutNumerator`] for invalid parameters.
pub fn rankings_view(snapshots: &[RegionSnapshot], params: &ViewParams) -> Result<RankingsReport> {
    let filters = params.filters();
    let (numerator, denominator) = params.metrics()?;
    let realm = filters.rankings_realm();
    let query = RankingQuery::new(realm, numerator)
        .with_denominator(denominator)
        .with_scope(params.scope()?);

    let mut hierarchy: Vec<HierarchyLevel> = [RealmType::Municipality, RealmType::County, RealmType::State]
        .into_iter()
        .filter_map(|level| {
            filters.value_for(level).map(|name| HierarchyLevel {
                realm: level,
                name: name.to_string(),
            })
        })
        .collect();
    hierarchy.push(HierarchyLevel {
        realm: RealmType::Country,
        name: COUNTRY_NAME.to_string(),
    });
    let realm_name = hierarchy[0].name.clone();

    let mut captions = vec![
        "Rank".to_string(),
        realm.label().to_string(),
        numerator.label().to_string(),
    ];
    if let Some(denominator) = denominator {
        captions.push(denominator.label().to_string());
        captions.push("Score".to_string());
    }

    let rankings = build_ranking(snapshots, &query, &filters);
    log::info!(
        "rankings_view: {} {}s ranked by {}{}",
        rankings.len(),
        realm,
        numerator,
        denominator.map_or_else(String::new, |d| format!(" per {d}"))
    );

    Ok(RankingsReport {
        realm_type: realm,
        realm_name,
        scope: query.scope(),
        hierarchy,
        numerator,
        denominator,
        captions,
        rankings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn snapshot(
        key: &str,
        municipality: &str,
        county: &str,
        state: &str,
        population: f64,
        capacity: f64,
    ) -> RegionSnapshot {
        RegionSnapshot {
            municipality_key: key.to_string(),
            municipality: municipality.to_string(),
            county: county.to_string(),
            state: state.to_string(),
            zip_code: None,
            population: Some(population),
            area: Some(population * 10.0),
            total_net_nominal_capacity: Some(capacity),
            storage_net_nominal_capacity: Some(capacity / 10.0),
            energy_units: Some(3.0),
        }
    }

    fn sample() -> Vec<RegionSnapshot> {
        vec![
            snapshot("09184119", "Unterhaching", "Landkreis München", "Bayern", 100.0, 500.0),
            snapshot("09184148", "Oberhaching", "Landkreis München", "Bayern", 50.0, 400.0),
            snapshot("09162000", "München", "München", "Bayern", 1000.0, 2000.0),
            snapshot("06411000", "Darmstadt", "Darmstadt", "Hessen", 100.0, 100.0),
        ]
    }

    fn params_with(f: impl FnOnce(&mut ViewParams)) -> ViewParams {
        let mut params = ViewParams::default();
        f(&mut params);
        params
    }

    #[test]
    fn defaults_to_capacity_per_capita() {
        assert_eq!(
            ViewParams::default().metrics().unwrap(),
            (Metric::TotalNetNominalCapacity, Some(Metric::Population))
        );
    }

    #[test]
    fn denominator_alone_is_rejected() {
        let params = params_with(|p| p.denominator = Some("area".to_string()));
        assert!(matches!(params.metrics(), Err(Error::DenominatorWithoutNumerator)));
    }

    #[test]
    fn unknown_metric_is_rejected_by_the_view() {
        let params = params_with(|p| p.numerator = Some("wind_speed".to_string()));
        assert!(matches!(
            rankings_view(&sample(), &params),
            Err(Error::UnknownMetric { .. })
        ));
    }

    #[test]
    fn blank_filters_are_ignored() {
        let params = params_with(|p| p.county = Some("  ".to_string()));
        assert!(params.filters().is_empty());
    }

    #[test]
    fn country_rankings_list_states() {
        let report = rankings_view(&sample(), &ViewParams::default()).unwrap();
        assert_eq!(report.realm_type, RealmType::State);
        assert_eq!(report.scope, RealmType::Country);
        assert_eq!(report.realm_name, COUNTRY_NAME);
        let names: Vec<&str> = report.rankings.iter().map(|e| e.region_name.as_str()).collect();
        // Bayern: 2900 / 1150, Hessen: 1.0
        assert_eq!(names, ["Bayern", "Hessen"]);
        assert_eq!(
            report.captions,
            ["Rank", "State", "Total net nominal capacity", "Population", "Score"]
        );
    }

    #[test]
    fn numerator_only_rankings_have_short_captions() {
        let params = params_with(|p| {
            p.state = Some("Bayern".to_string());
            p.numerator = Some("energy_units".to_string());
        });
        let report = rankings_view(&sample(), &params).unwrap();
        assert_eq!(report.captions, ["Rank", "State", "Energy units"]);
        // A state is ranked against every other state.
        assert_eq!(report.rankings.len(), 2);
        assert_eq!(report.rankings[0].region_name, "Bayern");
        assert_eq!(report.rankings[0].numerator_sum, 9.0);
        assert_eq!(report.rankings[0].score, None);
        assert_eq!(report.realm_name, "Bayern");
        assert_eq!(report.hierarchy.len(), 2);
    }

    #[test]
    fn county_rankings_within_a_state() {
        let params = params_with(|p| {
            p.county = Some("Landkreis München".to_string());
            p.state = Some("Bayern".to_string());
        });
        let report = rankings_view(&sample(), &params).unwrap();
        assert_eq!(report.realm_type, RealmType::County);
        assert_eq!(report.scope, RealmType::State);
        let names: Vec<&str> = report.rankings.iter().map(|e| e.region_name.as_str()).collect();
        // Landkreis München: 900 / 150 = 6, München: 2
        assert_eq!(names, ["Landkreis München", "München"]);
    }

    #[test]
    fn totals_for_a_municipality() {
        let params = params_with(|p| p.municipality = Some("Oberhaching".to_string()));
        let points = vec![TimelinePoint {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            municipality_key: Some("09184148".to_string()),
            municipality: Some("Oberhaching".to_string()),
            county: Some("Landkreis München".to_string()),
            state: Some("Bayern".to_string()),
            pv: Some(12.0),
            wind: None,
            biomass: None,
            hydro: None,
        }];
        let report = totals_view(&sample(), &points, &params);

        assert_eq!(report.basics.realm_type, RealmType::Municipality);
        assert_eq!(report.basics.realm_name, "Oberhaching");
        assert_eq!(report.basics.total_population, Some(50.0));
        let names: Vec<&str> = report.hierarchy.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, ["Oberhaching", "Landkreis München", "Bayern", COUNTRY_NAME]);

        // Oberhaching 8.0 per head beats Unterhaching 5.0.
        assert_eq!(report.capacity_per_capita.ratio, Some(8.0));
        assert_eq!(report.capacity_per_capita.rank, 1);
        assert_eq!(report.capacity_per_capita.total_count, 2);
        assert_eq!(report.timeline.len(), 1);
        assert_eq!(report.timeline[0].pv, 12.0);
    }

    #[test]
    fn totals_for_the_country() {
        let report = totals_view(&sample(), &[], &ViewParams::default());
        assert_eq!(report.basics.realm_type, RealmType::Country);
        assert_eq!(report.basics.realm_name, COUNTRY_NAME);
        assert_eq!(report.basics.total_population, Some(1250.0));
        assert_eq!(report.basics.count_of_devices, Some(12.0));
        assert_eq!(report.hierarchy.len(), 1);
        assert_eq!(report.capacity_per_capita.rank, 1);
        assert_eq!(report.capacity_per_capita.total_count, 1);
    }

    #[test]
    fn totals_for_an_unknown_region_are_empty() {
        let params = params_with(|p| p.county = Some("Atlantis".to_string()));
        let report = totals_view(&sample(), &[], &params);
        assert_eq!(report.basics.total_population, None);
        assert_eq!(report.basics.realm_name, "Atlantis");
        assert_eq!(report.storage_per_area, RatioRank::unranked(0));
    }
}
