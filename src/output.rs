//! Rendering provider summaries for the console and for CSV history files.

use anyhow::Result;
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::pipeline::ProviderSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SummaryFormat {
    #[default]
    Text,
    Json,
}

/// One console line: provider, record count and average therms.
pub fn render_text(summary: &ProviderSummary) -> String {
    let average = match (summary.average_therms, &summary.error) {
        (Some(avg), _) => format!("average {avg:.2} therms"),
        (None, Some(reason)) => format!("average unavailable: {reason}"),
        (None, None) => "average unavailable".to_string(),
    };
    let noun = if summary.records == 1 { "record" } else { "records" };
    format!("{}: {} {noun}, {average}", summary.provider, summary.records)
}

pub fn render_json(summaries: &[ProviderSummary]) -> Result<String> {
    Ok(serde_json::to_string_pretty(summaries)?)
}

/// Writes every summary to `writer` in the requested format.
pub fn write_summaries<W: Write>(
    writer: &mut W,
    summaries: &[ProviderSummary],
    format: SummaryFormat,
) -> Result<()> {
    match format {
        SummaryFormat::Text => {
            for summary in summaries {
                writeln!(writer, "{}", render_text(summary))?;
            }
        }
        SummaryFormat::Json => writeln!(writer, "{}", render_json(summaries)?)?,
    }
    Ok(())
}

/// Appends one row per summary to a CSV file, writing the header only when
/// the file is new.
pub fn append_summaries(path: impl AsRef<Path>, summaries: &[ProviderSummary]) -> Result<()> {
    let path = path.as_ref();
    let is_new = !path.exists();
    debug!(path = %path.display(), is_new, rows = summaries.len(), "Appending summaries");

    let file = OpenOptions::new().append(true).create(true).open(path)?;
    let mut writer = WriterBuilder::new().has_headers(is_new).from_writer(file);

    for summary in summaries {
        writer.serialize(summary)?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::fs;

    fn summary(provider: &str, records: usize, average: Option<f64>) -> ProviderSummary {
        ProviderSummary {
            timestamp: Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap(),
            provider: provider.to_string(),
            records,
            average_therms: average,
            error: average
                .is_none()
                .then(|| "cannot average an empty record set".to_string()),
        }
    }

    #[test]
    fn test_render_text_with_average() {
        assert_eq!(
            render_text(&summary("National Grid", 2, Some(30.0))),
            "National Grid: 2 records, average 30.00 therms"
        );
        assert_eq!(
            render_text(&summary("ConEd", 1, Some(25.0 / 3.0))),
            "ConEd: 1 record, average 8.33 therms"
        );
    }

    #[test]
    fn test_render_text_without_average() {
        assert_eq!(
            render_text(&summary("ConEd", 0, None)),
            "ConEd: 0 records, average unavailable: cannot average an empty record set"
        );
    }

    #[test]
    fn test_write_summaries_text() {
        let mut out = Vec::new();
        let summaries = [
            summary("National Grid", 2, Some(30.0)),
            summary("ConEd", 1, Some(25.0)),
        ];
        write_summaries(&mut out, &summaries, SummaryFormat::Text).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "National Grid: 2 records, average 30.00 therms\n\
             ConEd: 1 record, average 25.00 therms\n"
        );
    }

    #[test]
    fn test_write_summaries_json() {
        let mut out = Vec::new();
        let summaries = [summary("ConEd", 0, None)];
        write_summaries(&mut out, &summaries, SummaryFormat::Json).unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(parsed[0]["provider"], "ConEd");
        assert_eq!(parsed[0]["records"], 0);
        assert!(parsed[0]["average_therms"].is_null());
        assert_eq!(parsed[0]["error"], "cannot average an empty record set");
        assert_eq!(parsed[0]["timestamp"], "2024-01-15T12:00:00Z");
    }

    #[test]
    fn test_append_summaries_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");

        append_summaries(&path, &[summary("ConEd", 1, Some(25.0))]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "timestamp,provider,records,average_therms,error\n\
             2024-01-15T12:00:00Z,ConEd,1,25.0,\n"
        );
    }

    #[test]
    fn test_append_summaries_writes_header_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");
        let summaries = [
            summary("National Grid", 2, Some(30.0)),
            summary("ConEd", 0, None),
        ];

        append_summaries(&path, &summaries).unwrap();
        append_summaries(&path, &summaries).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines.iter().filter(|l| l.starts_with("timestamp")).count(), 1);
        assert!(lines[2].ends_with("ConEd,0,,cannot average an empty record set"));
    }
}
