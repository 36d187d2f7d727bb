//! Locations of the two CSV exports.
//!
//! Resolution order: command-line flag, environment variable, file of the
//! default name in the working directory.

use std::env;
use std::path::PathBuf;

pub const TOTALS_ENV: &str = "EE_STATUS_TOTALS_CSV";
pub const TIMELINE_ENV: &str = "EE_STATUS_TIMELINE_CSV";
pub const DEFAULT_TOTALS: &str = "current_totals.csv";
pub const DEFAULT_TIMELINE: &str = "monthly_timeline.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub totals: PathBuf,
    pub timeline: PathBuf,
}

fn from_env(var: &str) -> Option<PathBuf> {
    env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

impl DataPaths {
    pub fn resolve(totals: Option<PathBuf>, timeline: Option<PathBuf>) -> Self {
        let paths = Self {
            totals: totals
                .or_else(|| from_env(TOTALS_ENV))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TOTALS)),
            timeline: timeline
                .or_else(|| from_env(TIMELINE_ENV))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_TIMELINE)),
        };
        log::debug!("Data paths: {paths:?}");
        paths
    }
}
