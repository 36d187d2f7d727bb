use serde::Serialize;
use std::path::Path;
use tabled::{builder::Builder, settings::Style, Table, Tabled};

use crate::error::Result;
use crate::types::{RankingEntry, RatioRank};
use crate::util::{format_number, format_optional};

pub fn write_csv<T: Serialize>(path: impl AsRef<Path>, rows: &[T]) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path.as_ref())?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    log::info!("Wrote {} rows to {}", rows.len(), path.as_ref().display());
    Ok(())
}

pub fn write_json<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path.as_ref(), s)?;
    log::info!("Wrote {}", path.as_ref().display());
    Ok(())
}

/// Markdown table of the first `max_rows` rows.
pub fn table_rows<T>(rows: &[T], max_rows: usize) -> String
where
    T: Tabled + Clone,
{
    let slice: Vec<T> = rows.iter().take(max_rows).cloned().collect();
    if slice.is_empty() {
        return "(no rows)".to_string();
    }
    Table::new(slice).with(Style::markdown()).to_string()
}

pub fn preview_table_rows<T>(rows: &[T], max_rows: usize)
where
    T: Tabled + Clone,
{
    println!("{}\n", table_rows(rows, max_rows));
}

/// Ranking table with the captions chosen by the rankings view. The
/// denominator and score columns are filled in when `with_score` is set,
/// i.e. the ranking was built with a denominator.
pub fn ranking_table(
    captions: &[String],
    rows: &[RankingEntry],
    with_score: bool,
    max_rows: usize,
) -> String {
    if rows.is_empty() {
        return "(no rows)".to_string();
    }
    let mut builder = Builder::default();
    builder.push_record(captions.iter().cloned());
    for entry in rows.iter().take(max_rows) {
        let mut record = vec![
            entry.rank.to_string(),
            entry.region_name.clone(),
            format_number(entry.numerator_sum, 2),
        ];
        if with_score {
            record.push(format_optional(entry.denominator_sum, 0));
            record.push(format_optional(entry.score, 4));
        }
        builder.push_record(record);
    }
    let mut table = builder.build();
    table.with(Style::markdown());
    table.to_string()
}

/// Two-column table of named ratio figures.
pub fn ratio_table(figures: &[(&str, RatioRank)]) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Figure", "Ratio", "Rank"].map(String::from));
    for (name, figure) in figures {
        let rank = if figure.rank == 0 {
            "-".to_string()
        } else {
            format!("{} of {}", figure.rank, figure.total_count)
        };
        builder.push_record([name.to_string(), format_optional(figure.ratio, 4), rank]);
    }
    let mut table = builder.build();
    table.with(Style::markdown());
    table.to_string()
}
