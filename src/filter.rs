//! Provider filters over parsed consumption data.
//!
//! Filters narrow the record sequence only. Parse diagnostics and metadata are
//! carried across untouched so a narrowed result still reports every problem
//! found in the source file.

use clap::ValueEnum;
use std::fmt;

use crate::record::ParseResult;

pub const NATIONAL_GRID: &str = "National Grid";
pub const CON_ED: &str = "ConEd";

/// Utility companies known to appear in the `source` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Provider {
    NationalGrid,
    ConEd,
}

impl Provider {
    pub const ALL: [Provider; 2] = [Provider::NationalGrid, Provider::ConEd];

    /// The exact label used in the dataset.
    pub fn label(self) -> &'static str {
        match self {
            Provider::NationalGrid => NATIONAL_GRID,
            Provider::ConEd => CON_ED,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Keeps the records whose `source` equals `provider` exactly.
pub fn filter_by(result: &ParseResult, provider: &str) -> ParseResult {
    let records = result
        .records
        .iter()
        .filter(|r| r.source == provider)
        .cloned()
        .collect();
    result.with_records(records)
}

pub fn national_only(result: &ParseResult) -> ParseResult {
    filter_by(result, NATIONAL_GRID)
}

pub fn con_ed_only(result: &ParseResult) -> ParseResult {
    filter_by(result, CON_ED)
}

/// Distinct provider labels in the order they first appear.
pub fn providers(result: &ParseResult) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for record in &result.records {
        if !seen.contains(&record.source.as_str()) {
            seen.push(&record.source);
        }
    }
    seen
}
