//! Renewable-energy statistics for German administrative regions.
//!
//! Installed capacity per municipality is aggregated to counties, states
//! and the country, turned into ratios (capacity per capita, per area, ...)
//! and ranked against sibling regions. Cumulative capacity timelines and a
//! free-text region search complete the set of views.

pub mod config;
pub mod error;
pub mod loader;
pub mod metric;
pub mod output;
pub mod ranking;
pub mod realm;
pub mod search;
pub mod timeline;
pub mod types;
pub mod util;
pub mod views;

pub use error::{Error, Result};
