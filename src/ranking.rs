use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::metric::Metric;
use crate::realm::{RealmType, RegionFilters};
use crate::types::{RankingEntry, RatioRank, RegionSnapshot};

/// What to rank and how.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankingQuery {
    /// One output row per distinct region at this realm.
    pub group_by: RealmType,
    /// Level whose filter selects the peer set. Defaults to the realm
    /// directly above `group_by`.
    pub scope: Option<RealmType>,
    pub numerator: Metric,
    pub denominator: Option<Metric>,
}

impl RankingQuery {
    pub const fn new(group_by: RealmType, numerator: Metric) -> Self {
        Self {
            group_by,
            scope: None,
            numerator,
            denominator: None,
        }
    }

    #[must_use]
    pub const fn with_denominator(mut self, denominator: Option<Metric>) -> Self {
        self.denominator = denominator;
        self
    }

    #[must_use]
    pub const fn with_scope(mut self, scope: Option<RealmType>) -> Self {
        self.scope = scope;
        self
    }

    pub fn scope(&self) -> RealmType {
        self.scope.unwrap_or_else(|| self.group_by.default_scope())
    }
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| *v > 0.0)
}

/// Groups the snapshots selected by `filters` and ranks the groups.
///
/// Rows pass when they match the filters at the query's scope and every
/// coarser level and carry a positive numerator (and denominator, when one
/// is set); other rows never reach a group. Numerator and denominator are
/// summed per group; with a denominator the score is
/// `sum(numerator) / sum(denominator)` and the groups are ordered by it,
/// otherwise by the numerator sum. Groups whose sums are not positive are
/// left out. Equal scores are ordered by region name.
pub fn build_ranking(
    snapshots: &[RegionSnapshot],
    query: &RankingQuery,
    filters: &RegionFilters,
) -> Vec<RankingEntry> {
    #[derive(Default)]
    struct Acc {
        numerator: f64,
        denominator: f64,
    }

    let scope = query.scope();
    log::debug!(
        "build_ranking: group_by={} scope={} numerator={} denominator={:?}",
        query.group_by,
        scope,
        query.numerator,
        query.denominator
    );

    let mut groups: BTreeMap<&str, Acc> = BTreeMap::new();
    for snapshot in snapshots
        .iter()
        .filter(|s| filters.matches_from(*s, scope))
    {
        let Some(numerator) = positive(query.numerator.value(snapshot)) else {
            continue;
        };
        let denominator = match query.denominator {
            Some(metric) => match positive(metric.value(snapshot)) {
                Some(v) => v,
                None => continue,
            },
            None => 0.0,
        };
        let acc = groups.entry(snapshot.name_at(query.group_by)).or_default();
        acc.numerator += numerator;
        acc.denominator += denominator;
    }

    let mut scored: Vec<(f64, RankingEntry)> = groups
        .into_iter()
        .filter_map(|(name, acc)| {
            let numerator_sum = positive(Some(acc.numerator))?;
            let (denominator_sum, score) = if query.denominator.is_some() {
                let denominator_sum = positive(Some(acc.denominator))?;
                (Some(denominator_sum), Some(numerator_sum / denominator_sum))
            } else {
                (None, None)
            };
            let entry = RankingEntry {
                rank: 0,
                region_name: name.to_string(),
                numerator_sum,
                denominator_sum,
                score,
            };
            Some((score.unwrap_or(numerator_sum), entry))
        })
        .collect();

    scored.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.1.region_name.cmp(&b.1.region_name))
    });

    scored
        .into_iter()
        .enumerate()
        .map(|(idx, (_, mut entry))| {
            entry.rank = idx + 1;
            entry
        })
        .collect()
}

/// Ratio of the region `subject` belongs to at `realm`, and its rank among
/// the sibling regions that share its parent.
///
/// Siblings are the regions at `realm` inside the parent region of
/// `subject` (municipalities of its county, counties of its state, states of
/// the country). A subject that cannot be ranked gets rank `0`.
pub fn ratio_and_rank(
    snapshots: &[RegionSnapshot],
    subject: &RegionSnapshot,
    numerator: Metric,
    denominator: Metric,
    realm: RealmType,
) -> RatioRank {
    let query = RankingQuery::new(realm, numerator).with_denominator(Some(denominator));
    let filters = RegionFilters::parent_of(subject, realm);
    let ranking = build_ranking(snapshots, &query, &filters);
    let name = subject.name_at(realm);

    ranking
        .iter()
        .find(|entry| entry.region_name == name)
        .map_or_else(
            || RatioRank::unranked(ranking.len()),
            |entry| RatioRank {
                ratio: entry.score,
                rank: entry.rank,
                total_count: ranking.len(),
            },
        )
}
