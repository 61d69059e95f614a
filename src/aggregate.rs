//! Averages over the numeric columns of a record set.
//!
//! Values are parsed from text at this point, not during parsing. Empty sets
//! and unparseable numbers are reported as [`AggregateError`]s, so a caller
//! never receives a NaN average.

use clap::ValueEnum;
use serde::Serialize;
use thiserror::Error;

use crate::record::{ConsumptionRecord, ParseResult};
use crate::utility::{mean, stddev};

/// Numeric columns that can be aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
pub enum Field {
    Therms,
    GigaJoules,
}

impl Field {
    /// Column name as written in the dataset header.
    pub fn column(self) -> &'static str {
        match self {
            Field::Therms => "consumptionTherms",
            Field::GigaJoules => "consumptionGigaJoules",
        }
    }

    fn text(self, record: &ConsumptionRecord) -> &str {
        match self {
            Field::Therms => &record.consumption_therms,
            Field::GigaJoules => &record.consumption_giga_joules,
        }
    }

    fn value(self, record: &ConsumptionRecord) -> Option<f64> {
        let parsed = match self {
            Field::Therms => record.therms(),
            Field::GigaJoules => record.giga_joules(),
        };
        parsed.ok().filter(|v| v.is_finite())
    }
}

/// What to do with a value that does not parse as a finite number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InvalidPolicy {
    /// Stop and report the offending row.
    #[default]
    Fail,
    /// Leave the row out of the sum and the count.
    Skip,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AggregateError {
    #[error("cannot average an empty record set")]
    NoRecords,

    #[error("invalid {field} value '{value}' in row {row} (zip {zip})")]
    InvalidNumber {
        row: usize,
        zip: String,
        field: &'static str,
        value: String,
    },

    #[error("no valid values to average ({skipped} skipped)")]
    NoValidValues { skipped: usize },

    #[error("average of {field} is out of floating-point range")]
    NotFinite { field: &'static str },
}

/// Descriptive statistics for one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSummary {
    pub field: Field,
    pub count: usize,
    pub skipped: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub stddev: f64,
}

/// Mean of `consumptionTherms`, failing on the first unparseable value.
pub fn average_therms(result: &ParseResult) -> Result<f64, AggregateError> {
    average_field(result, Field::Therms, InvalidPolicy::Fail)
}

/// Mean of `consumptionGigaJoules`, failing on the first unparseable value.
pub fn average_giga_joules(result: &ParseResult) -> Result<f64, AggregateError> {
    average_field(result, Field::GigaJoules, InvalidPolicy::Fail)
}

pub fn average_field(
    result: &ParseResult,
    field: Field,
    policy: InvalidPolicy,
) -> Result<f64, AggregateError> {
    Ok(summarize(result, field, policy)?.mean)
}

/// Collects count, mean, range and standard deviation for `field`.
pub fn summarize(
    result: &ParseResult,
    field: Field,
    policy: InvalidPolicy,
) -> Result<FieldSummary, AggregateError> {
    if result.records.is_empty() {
        return Err(AggregateError::NoRecords);
    }

    let (values, skipped) = collect_values(&result.records, field, policy)?;

    let Some(avg) = mean(&values) else {
        return Err(AggregateError::NoValidValues { skipped });
    };
    if !avg.is_finite() {
        return Err(AggregateError::NotFinite {
            field: field.column(),
        });
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    Ok(FieldSummary {
        field,
        count: values.len(),
        skipped,
        mean: avg,
        min,
        max,
        stddev: stddev(&values, avg),
    })
}

fn collect_values(
    records: &[ConsumptionRecord],
    field: Field,
    policy: InvalidPolicy,
) -> Result<(Vec<f64>, usize), AggregateError> {
    let mut values = Vec::with_capacity(records.len());
    let mut skipped = 0;

    for (row, record) in records.iter().enumerate() {
        match (field.value(record), policy) {
            (Some(v), _) => values.push(v),
            (None, InvalidPolicy::Skip) => skipped += 1,
            (None, InvalidPolicy::Fail) => {
                return Err(AggregateError::InvalidNumber {
                    row,
                    zip: record.zip.clone(),
                    field: field.column(),
                    value: field.text(record).to_string(),
                });
            }
        }
    }

    Ok((values, skipped))
}
