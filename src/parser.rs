//! CSV parser for consumption datasets.
//!
//! The first row names the columns. Every following row becomes one
//! [`ConsumptionRecord`], with fields assigned by header name. Rows that do not
//! fit the header, or are not valid UTF-8, are reported in
//! [`ParseResult::errors`] instead of aborting the parse.

use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use crate::record::{
    COLUMNS, ConsumptionRecord, ParseError, ParseErrorKind, ParseMeta, ParseResult,
};

/// Positions of the expected columns within the header row.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    zip: Option<usize>,
    building_type: Option<usize>,
    therms: Option<usize>,
    giga_joules: Option<usize>,
    source: Option<usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &StringRecord) -> Self {
        let find = |name: &str| headers.iter().position(|h| h == name);
        ColumnIndex {
            zip: find(COLUMNS[0]),
            building_type: find(COLUMNS[1]),
            therms: find(COLUMNS[2]),
            giga_joules: find(COLUMNS[3]),
            source: find(COLUMNS[4]),
        }
    }

    fn missing(&self) -> Vec<&'static str> {
        let slots = [
            self.zip,
            self.building_type,
            self.therms,
            self.giga_joules,
            self.source,
        ];
        COLUMNS
            .iter()
            .zip(slots)
            .filter(|(_, idx)| idx.is_none())
            .map(|(name, _)| *name)
            .collect()
    }

    fn build(&self, row: &StringRecord) -> ConsumptionRecord {
        let field = |idx: Option<usize>| {
            idx.and_then(|i| row.get(i))
                .unwrap_or_default()
                .to_string()
        };
        ConsumptionRecord {
            zip: field(self.zip),
            building_type: field(self.building_type),
            consumption_therms: field(self.therms),
            consumption_giga_joules: field(self.giga_joules),
            source: field(self.source),
        }
    }
}

/// Parses comma-separated input into a [`ParseResult`].
pub fn parse_records(input: impl AsRef<[u8]>) -> ParseResult {
    parse_records_with(input.as_ref(), b',')
}

/// Parses delimited input using `delimiter` between fields.
///
/// Each row is decoded as UTF-8 on its own. A row that fails to decode is
/// skipped with a [`ParseErrorKind::Malformed`] diagnostic.
#[tracing::instrument(skip(input), fields(bytes = input.len()))]
pub fn parse_records_with(input: &[u8], delimiter: u8) -> ParseResult {
    let mut result = ParseResult {
        meta: ParseMeta {
            delimiter: char::from(delimiter),
            linebreak: detect_linebreak(input).to_string(),
            ..Default::default()
        },
        ..Default::default()
    };

    if input.iter().all(u8::is_ascii_whitespace) {
        return result;
    }

    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(input);

    let headers = match reader.byte_headers() {
        Ok(raw) => match StringRecord::from_byte_record(raw.clone()) {
            Ok(headers) => headers,
            Err(e) => {
                result.errors.push(ParseError {
                    kind: ParseErrorKind::Malformed,
                    row: None,
                    message: format!("header row is not valid UTF-8: {e}"),
                });
                return result;
            }
        },
        Err(e) => {
            result.errors.push(ParseError {
                kind: ParseErrorKind::Malformed,
                row: None,
                message: format!("unreadable header row: {e}"),
            });
            return result;
        }
    };

    result.meta.fields = headers.iter().map(str::to_string).collect();

    let columns = ColumnIndex::from_headers(&headers);
    for name in columns.missing() {
        result.errors.push(ParseError {
            kind: ParseErrorKind::MissingColumn,
            row: None,
            message: format!("header has no '{name}' column"),
        });
    }

    for (row, item) in reader.byte_records().enumerate() {
        result.meta.rows += 1;

        let raw = match item {
            Ok(raw) => raw,
            Err(e) => {
                result.errors.push(ParseError {
                    kind: ParseErrorKind::Malformed,
                    row: Some(row),
                    message: e.to_string(),
                });
                continue;
            }
        };

        let line = raw.position().map(|p| p.line()).unwrap_or_default();
        let record = match StringRecord::from_byte_record(raw) {
            Ok(record) => record,
            Err(e) => {
                result.errors.push(ParseError {
                    kind: ParseErrorKind::Malformed,
                    row: Some(row),
                    message: format!("line {line}: row is not valid UTF-8: {e}"),
                });
                continue;
            }
        };

        if record.len() < headers.len() {
            result.errors.push(ParseError {
                kind: ParseErrorKind::TooFewFields,
                row: Some(row),
                message: format!(
                    "line {line}: expected {} fields but parsed {}",
                    headers.len(),
                    record.len()
                ),
            });
        } else if record.len() > headers.len() {
            result.errors.push(ParseError {
                kind: ParseErrorKind::TooManyFields,
                row: Some(row),
                message: format!(
                    "line {line}: expected {} fields but parsed {}",
                    headers.len(),
                    record.len()
                ),
            });
        }

        result.records.push(columns.build(&record));
    }

    debug!(
        records = result.records.len(),
        errors = result.errors.len(),
        "Parsed consumption records"
    );

    result
}

fn detect_linebreak(input: &[u8]) -> &'static str {
    match input.iter().position(|b| matches!(*b, b'\r' | b'\n')) {
        Some(i) if input[i..].starts_with(b"\r\n") => "\r\n",
        Some(i) if input[i] == b'\r' => "\r",
        _ => "\n",
    }
}
