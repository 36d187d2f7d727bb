//! Command-line front end.
//!
//! Each subcommand loads the CSV exports it needs, runs one view, prints
//! Markdown previews to the console and optionally exports the full result.

use clap::{Args, Parser, Subcommand};
use ee_status::config::DataPaths;
use ee_status::loader::{self, LoadReport};
use ee_status::metric::Metric;
use ee_status::output;
use ee_status::search::{search_regions, SearchOutcome};
use ee_status::timeline::build_timeline;
use ee_status::util::{format_int, format_optional};
use ee_status::views::{rankings_view, totals_view, ViewParams};
use std::path::PathBuf;
use strum::IntoEnumIterator;

#[derive(Parser)]
#[command(name = "ee_status", about = "Renewable energy statistics by German region")]
struct Cli {
    /// Current-totals CSV export (falls back to `EE_STATUS_TOTALS_CSV`)
    #[arg(long, global = true)]
    totals_csv: Option<PathBuf>,
    /// Monthly-timeline CSV export (falls back to `EE_STATUS_TIMELINE_CSV`)
    #[arg(long, global = true)]
    timeline_csv: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Default)]
struct FilterArgs {
    #[arg(long)]
    municipality_key: Option<String>,
    #[arg(long)]
    municipality: Option<String>,
    #[arg(long)]
    county: Option<String>,
    #[arg(long)]
    state: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Totals, per-capita and per-area figures and the capacity timeline of a region
    Totals {
        #[command(flatten)]
        filters: FilterArgs,
        /// Write the full report as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },
    /// Rank regions by a metric or a ratio of two metrics
    Rankings {
        #[command(flatten)]
        filters: FilterArgs,
        /// Metric to sum (see `metrics`)
        #[arg(long)]
        numerator: Option<String>,
        /// Metric to divide by
        #[arg(long)]
        denominator: Option<String>,
        /// Level whose filter selects the ranked regions
        #[arg(long)]
        scope: Option<String>,
        /// Number of rows to print
        #[arg(long, default_value = "20")]
        top: usize,
        /// Write the full ranking as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Cumulative installed capacity over time
    Timeline {
        #[command(flatten)]
        filters: FilterArgs,
        /// Write the full series as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Find municipalities, counties and states by name, key or postal code
    Search { query: String },
    /// List the metric names accepted as numerator or denominator
    Metrics,
}

impl FilterArgs {
    fn into_params(self) -> ViewParams {
        ViewParams {
            municipality_key: self.municipality_key,
            municipality: self.municipality,
            county: self.county,
            state: self.state,
            ..ViewParams::default()
        }
    }
}

fn print_load_report(what: &str, report: &LoadReport) {
    println!(
        "Processing {what}... ({} rows loaded of {})",
        format_int(report.loaded_rows as u64),
        format_int(report.total_rows as u64)
    );
    if report.parse_errors > 0 {
        println!(
            "Note: {} rows skipped due to parse/validation errors.",
            format_int(report.parse_errors as u64)
        );
    }
    println!();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();
    let paths = DataPaths::resolve(cli.totals_csv, cli.timeline_csv);

    match cli.command {
        Commands::Totals { filters, json } => {
            let (snapshots, totals_report) = loader::load_totals(&paths.totals)?;
            print_load_report("current totals", &totals_report);
            let (points, timeline_report) = loader::load_timeline(&paths.timeline)?;
            print_load_report("monthly timeline", &timeline_report);

            let report = totals_view(&snapshots, &points, &filters.into_params());
            let basics = &report.basics;
            let trail: Vec<&str> = report.hierarchy.iter().map(|h| h.name.as_str()).collect();
            println!("{} ({})\n", basics.realm_name, trail.join(" > "));
            println!("Population: {}", format_optional(basics.total_population, 0));
            println!("Area: {}", format_optional(basics.total_area, 0));
            println!(
                "Production capacity: {}",
                format_optional(basics.total_production_capacity, 2)
            );
            println!(
                "Storage capacity: {}",
                format_optional(basics.total_storage_capacity, 2)
            );
            println!("Energy units: {}\n", format_optional(basics.count_of_devices, 0));
            println!(
                "{}\n",
                output::ratio_table(&[
                    ("Capacity per capita", report.capacity_per_capita),
                    ("Capacity per area", report.capacity_per_area),
                    ("Storage per capita", report.storage_per_capita),
                    ("Storage per area", report.storage_per_area),
                ])
            );
            println!("Capacity timeline (latest entries)\n");
            let skip = report.timeline.len().saturating_sub(12);
            output::preview_table_rows(&report.timeline[skip..], 12);

            if let Some(path) = json {
                output::write_json(&path, &report)?;
                println!("(Full report exported to {})\n", path.display());
            }
        }
        Commands::Rankings {
            filters,
            numerator,
            denominator,
            scope,
            top,
            csv,
        } => {
            let (snapshots, load_report) = loader::load_totals(&paths.totals)?;
            print_load_report("current totals", &load_report);

            let params = ViewParams {
                numerator,
                denominator,
                scope,
                ..filters.into_params()
            };
            let report = rankings_view(&snapshots, &params)?;
            println!(
                "{} ranking for {} (scope: {})\n",
                report.realm_type.label(),
                report.realm_name,
                report.scope
            );
            let table = output::ranking_table(
                &report.captions,
                &report.rankings,
                report.denominator.is_some(),
                top,
            );
            println!("{}\n", table);

            if let Some(path) = csv {
                output::write_csv(&path, &report.rankings)?;
                println!("(Full table exported to {})\n", path.display());
            }
        }
        Commands::Timeline { filters, csv } => {
            let (points, load_report) = loader::load_timeline(&paths.timeline)?;
            print_load_report("monthly timeline", &load_report);

            let rows = build_timeline(&points, &filters.into_params().filters());
            output::preview_table_rows(&rows, rows.len());

            if let Some(path) = csv {
                output::write_csv(&path, &rows)?;
                println!("(Full series exported to {})\n", path.display());
            }
        }
        Commands::Search { query } => {
            let (snapshots, _) = loader::load_totals(&paths.totals)?;
            match search_regions(&snapshots, &query) {
                SearchOutcome::Country => println!("'{query}' refers to the whole country."),
                SearchOutcome::Regions(results) if results.is_empty() => {
                    println!("Nothing found for '{query}'.");
                }
                SearchOutcome::Regions(results) => {
                    println!("Municipalities\n");
                    output::preview_table_rows(&results.municipalities, 25);
                    println!("Counties\n");
                    output::preview_table_rows(&results.counties, 25);
                    println!("States\n");
                    output::preview_table_rows(&results.states, 25);
                }
            }
        }
        Commands::Metrics => {
            for metric in Metric::iter() {
                println!("{:<32} {}", metric.as_ref(), metric.label());
            }
        }
    }

    Ok(())
}
