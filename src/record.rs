//! Consumption records and the parse result that carries them.

use serde::Serialize;
use std::num::ParseFloatError;

/// One data row of the consumption dataset.
///
/// Every field stays as the text found in the file. Numeric columns are only
/// interpreted when a caller asks for them through [`ConsumptionRecord::therms`]
/// or [`ConsumptionRecord::giga_joules`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumptionRecord {
    pub zip: String,
    pub building_type: String,
    pub consumption_therms: String,
    pub consumption_giga_joules: String,
    pub source: String,
}

impl ConsumptionRecord {
    /// Consumption in therms, parsed on demand.
    pub fn therms(&self) -> Result<f64, ParseFloatError> {
        parse_number(&self.consumption_therms)
    }

    /// Consumption in gigajoules, parsed on demand.
    pub fn giga_joules(&self) -> Result<f64, ParseFloatError> {
        parse_number(&self.consumption_giga_joules)
    }
}

fn parse_number(text: &str) -> Result<f64, ParseFloatError> {
    text.trim().parse::<f64>()
}

/// Column names expected in the header row, in the dataset's usual order.
pub const COLUMNS: [&str; 5] = [
    "zip",
    "buildingType",
    "consumptionTherms",
    "consumptionGigaJoules",
    "source",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseErrorKind {
    /// Row had fewer fields than the header; missing fields are left empty.
    TooFewFields,
    /// Row had more fields than the header; extras are dropped.
    TooManyFields,
    /// Header row lacks one of the expected columns.
    MissingColumn,
    /// Row could not be decoded at all and was skipped.
    Malformed,
}

/// A single diagnostic produced while parsing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// Zero-based data row index, `None` for header diagnostics.
    pub row: Option<usize>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ParseMeta {
    pub delimiter: char,
    pub linebreak: String,
    /// Header names in file order.
    pub fields: Vec<String>,
    /// Data rows seen by the reader, including skipped ones.
    pub rows: usize,
}

/// Records plus the diagnostics and metadata gathered while producing them.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ParseResult {
    pub records: Vec<ConsumptionRecord>,
    pub errors: Vec<ParseError>,
    pub meta: ParseMeta,
}

impl ParseResult {
    /// Builds a result with new records while keeping this result's errors and meta.
    pub fn with_records(&self, records: Vec<ConsumptionRecord>) -> Self {
        ParseResult {
            records,
            errors: self.errors.clone(),
            meta: self.meta.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
