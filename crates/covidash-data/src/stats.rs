//! Headline figures from raw provider CSV lines.
//!
//! The provider reports sparsely: the newest rows usually lack deaths and
//! hospital figures. Deaths and hospital cases therefore take the first
//! non-empty value scanning back in time, and malformed or short rows are
//! skipped instead of failing the whole extraction.

use std::ops::Range;

use covidash_core::AreaStatistics;

use crate::csv::{COL_CUM_DEATHS, COL_HOSPITAL_CASES, COL_NEW_CASES};

/// Row layout of a provider response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Local-area export.
    Local,
    /// National export; carries one more leading row than the local one.
    National,
}

impl Layout {
    /// Rows summed for the 7-day case count (zero-indexed, header included).
    pub fn case_window(self) -> Range<usize> {
        match self {
            Layout::Local => 2..9,
            Layout::National => 3..10,
        }
    }
}

/// First row scanned for cumulative deaths.
const DEATHS_SCAN_START: usize = 2;
/// First row scanned for hospital cases.
const HOSPITAL_SCAN_START: usize = 1;

pub fn extract_statistics<S: AsRef<str>>(lines: &[S], layout: Layout) -> AreaStatistics {
    AreaStatistics {
        cases_7_day: seven_day_cases(lines, layout),
        hospital_cases: first_value(lines, HOSPITAL_SCAN_START, COL_HOSPITAL_CASES).unwrap_or(0),
        cumulative_deaths: first_value(lines, DEATHS_SCAN_START, COL_CUM_DEATHS).unwrap_or(0),
    }
}

fn seven_day_cases<S: AsRef<str>>(lines: &[S], layout: Layout) -> u64 {
    let window = layout.case_window();
    let end = window.end.min(lines.len());
    let start = window.start.min(end);
    lines[start..end]
        .iter()
        .filter_map(|line| field(line.as_ref(), COL_NEW_CASES))
        .sum()
}

/// First parseable, non-empty value in column `col` from row `start` onward.
fn first_value<S: AsRef<str>>(lines: &[S], start: usize, col: usize) -> Option<u64> {
    lines
        .iter()
        .skip(start)
        .find_map(|line| field(line.as_ref(), col))
}

fn field(line: &str, col: usize) -> Option<u64> {
    let raw = line.split(',').nth(col)?.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse().ok()
}
