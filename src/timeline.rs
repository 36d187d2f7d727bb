use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::realm::RegionFilters;
use crate::types::{TimelinePoint, TimelineRow};

/// Cumulative installed capacity per category, one row per distinct date in
/// ascending order.
///
/// Points are filtered first, then all points sharing a date are summed, and
/// only then is the running total taken, so colliding dates never drop data.
/// Missing deltas count as zero. Negative deltas (decommissioned units) are
/// carried through, so a series can go down.
pub fn build_timeline(points: &[TimelinePoint], filters: &RegionFilters) -> Vec<TimelineRow> {
    #[derive(Default)]
    struct Acc {
        pv: f64,
        wind: f64,
        biomass: f64,
        hydro: f64,
    }

    let mut by_date: BTreeMap<NaiveDate, Acc> = BTreeMap::new();
    for point in points.iter().filter(|p| filters.matches(*p)) {
        let e = by_date.entry(point.date).or_default();
        e.pv += point.pv.unwrap_or(0.0);
        e.wind += point.wind.unwrap_or(0.0);
        e.biomass += point.biomass.unwrap_or(0.0);
        e.hydro += point.hydro.unwrap_or(0.0);
    }
    log::debug!(
        "build_timeline: {} points -> {} dates",
        points.len(),
        by_date.len()
    );

    let mut running = Acc::default();
    by_date
        .into_iter()
        .map(|(date, delta)| {
            running.pv += delta.pv;
            running.wind += delta.wind;
            running.biomass += delta.biomass;
            running.hydro += delta.hydro;
            TimelineRow {
                date,
                pv: running.pv,
                wind: running.wind,
                biomass: running.biomass,
                hydro: running.hydro,
            }
        })
        .collect()
}
