use crate::error::Result;
use crate::types::{RawTimelineRow, RawTotalRow, RegionSnapshot, TimelinePoint};
use crate::util::{non_blank, parse_date_safe, parse_f64_safe};
use csv::ReaderBuilder;
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub parse_errors: usize,
    /// Negative metric cells that were dropped to `None`.
    pub invalid_metrics: usize,
    pub duplicate_keys: usize,
}

/// Loads the current-totals export from a CSV file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or its header is unreadable.
pub fn load_totals(path: impl AsRef<Path>) -> Result<(Vec<RegionSnapshot>, LoadReport)> {
    let path = path.as_ref();
    log::info!("Loading current totals from {}", path.display());
    let file = std::fs::File::open(path)?;
    read_totals(file)
}

/// Loads the monthly-timeline export from a CSV file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or its header is unreadable.
pub fn load_timeline(path: impl AsRef<Path>) -> Result<(Vec<TimelinePoint>, LoadReport)> {
    let path = path.as_ref();
    log::info!("Loading monthly timeline from {}", path.display());
    let file = std::fs::File::open(path)?;
    read_timeline(file)
}

/// Metric cell: parsed leniently, negatives dropped and counted.
fn metric(cell: Option<&str>, invalid: &mut usize) -> Option<f64> {
    match parse_f64_safe(cell) {
        Some(v) if v < 0.0 => {
            *invalid += 1;
            None
        }
        other => other,
    }
}

/// Reads current-totals rows. Rows without a municipality key are skipped;
/// only the first row of a repeated key is kept.
///
/// # Errors
///
/// Returns an error if the CSV header cannot be read.
pub fn read_totals<R: Read>(reader: R) -> Result<(Vec<RegionSnapshot>, LoadReport)> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    rdr.headers()?;
    let mut report = LoadReport::default();
    let mut seen_keys: HashSet<String> = HashSet::new();
    let mut snapshots = Vec::new();

    for result in rdr.deserialize::<RawTotalRow>() {
        report.total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                log::warn!("Skipping unreadable totals row {}: {e}", report.total_rows);
                report.parse_errors += 1;
                continue;
            }
        };

        let Some(municipality_key) = non_blank(row.municipality_key.as_deref()) else {
            report.parse_errors += 1;
            continue;
        };
        if !seen_keys.insert(municipality_key.clone()) {
            log::warn!("Duplicate municipality key {municipality_key}, keeping the first row");
            report.duplicate_keys += 1;
            continue;
        }

        let mut invalid = 0usize;
        let snapshot = RegionSnapshot {
            municipality: row.municipality.unwrap_or_default().trim().to_string(),
            county: row.county.unwrap_or_default().trim().to_string(),
            state: row.state.unwrap_or_default().trim().to_string(),
            zip_code: non_blank(row.zip_code.as_deref()),
            population: metric(row.population.as_deref(), &mut invalid),
            area: metric(row.area.as_deref(), &mut invalid),
            total_net_nominal_capacity: metric(row.total_net_nominal_capacity.as_deref(), &mut invalid),
            storage_net_nominal_capacity: metric(row.storage_net_nominal_capacity.as_deref(), &mut invalid),
            energy_units: metric(row.energy_units.as_deref(), &mut invalid),
            municipality_key,
        };
        report.invalid_metrics += invalid;
        snapshots.push(snapshot);
    }

    report.loaded_rows = snapshots.len();
    log::info!(
        "Loaded {} of {} totals rows ({} parse errors, {} duplicate keys, {} negative metrics dropped)",
        report.loaded_rows,
        report.total_rows,
        report.parse_errors,
        report.duplicate_keys,
        report.invalid_metrics
    );
    Ok((snapshots, report))
}

/// Reads monthly-timeline rows. Rows without a valid date are skipped.
/// Negative deltas are kept; they stand for decommissioned units.
///
/// # Errors
///
/// Returns an error if the CSV header cannot be read.
pub fn read_timeline<R: Read>(reader: R) -> Result<(Vec<TimelinePoint>, LoadReport)> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    rdr.headers()?;
    let mut report = LoadReport::default();
    let mut points = Vec::new();

    for result in rdr.deserialize::<RawTimelineRow>() {
        report.total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(e) => {
                log::warn!("Skipping unreadable timeline row {}: {e}", report.total_rows);
                report.parse_errors += 1;
                continue;
            }
        };
        let Some(date) = parse_date_safe(row.date.as_deref()) else {
            report.parse_errors += 1;
            continue;
        };

        points.push(TimelinePoint {
            date,
            municipality_key: non_blank(row.municipality_key.as_deref()),
            municipality: non_blank(row.municipality.as_deref()),
            county: non_blank(row.county.as_deref()),
            state: non_blank(row.state.as_deref()),
            pv: parse_f64_safe(row.pv_net_nominal_capacity.as_deref()),
            wind: parse_f64_safe(row.wind_net_nominal_capacity.as_deref()),
            biomass: parse_f64_safe(row.biomass_net_nominal_capacity.as_deref()),
            hydro: parse_f64_safe(row.hydro_net_nominal_capacity.as_deref()),
        });
    }

    report.loaded_rows = points.len();
    log::info!(
        "Loaded {} of {} timeline rows ({} parse errors)",
        report.loaded_rows,
        report.total_rows,
        report.parse_errors
    );
    Ok((points, report))
}
