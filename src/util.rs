//! Cell parsing for the CSV exports and number formatting for the console
//! tables.
//!
//! Loader and views only see `Option<f64>`, `NaiveDate` and trimmed labels.

use chrono::NaiveDate;
use num_format::{Locale, ToFormattedString};

/// Metric cell as `f64`. Blank cells, cells containing letters and
/// non-finite values yield `None`; `,` grouping separators are dropped.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(',', "");
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn parse_date_safe(s: Option<&str>) -> Option<NaiveDate> {
    // ISO dates only.
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}

/// Trimmed copy of a label, `None` when missing or blank.
pub fn non_blank(s: Option<&str>) -> Option<String> {
    let s = s?.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Sum that follows SQL `SUM` semantics: missing values are skipped and the
/// result is `None` only when every value is missing.
pub fn sum_present<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    values.into_iter().flatten().fold(None, |acc, v| Some(acc.unwrap_or(0.0) + v))
}

/// `n` rounded to `decimals` places with `,` between thousands.
pub fn format_number(n: f64, decimals: usize) -> String {
    let neg = n.is_sign_negative() && n != 0.0;
    let abs_n = n.abs();
    let s = format!("{:.*}", decimals, abs_n);
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

/// Like [`format_number`] but renders a missing value as `-`.
pub fn format_optional(n: Option<f64>, decimals: usize) -> String {
    n.map_or_else(|| "-".to_string(), |v| format_number(v, decimals))
}

pub fn format_capacity(n: &f64) -> String {
    format_number(*n, 2)
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    n.to_formatted_string(&Locale::en)
}
