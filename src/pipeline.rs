//! End-to-end runs: resolve, load, parse, filter, aggregate, observe.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::aggregate::{Field, InvalidPolicy, average_field};
use crate::filter::{Provider, filter_by, national_only, providers};
use crate::loader::load_bytes;
use crate::observe::log_and_return;
use crate::parser::parse_records;
use crate::paths::{DEFAULT_DATA_FILE, resolve};
use crate::record::ParseResult;

/// Average therms for one provider, as written to summary outputs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderSummary {
    pub timestamp: DateTime<Utc>,
    pub provider: String,
    pub records: usize,
    pub average_therms: Option<f64>,
    pub error: Option<String>,
}

/// Resolves `file_name` against the data directory, then loads and parses it.
///
/// Parse diagnostics are logged but do not fail the load.
#[tracing::instrument]
pub fn load_dataset(file_name: &str) -> Result<ParseResult> {
    let path = resolve(file_name);
    let bytes = load_bytes(&path)?;
    let result = parse_records(&bytes);

    for e in &result.errors {
        warn!(kind = ?e.kind, row = ?e.row, message = %e.message, "Parse diagnostic");
    }
    info!(
        records = result.records.len(),
        errors = result.errors.len(),
        providers = ?providers(&result),
        "Dataset parsed"
    );

    Ok(result)
}

/// Averages therms for `provider`, recording an aggregation failure in the
/// summary instead of returning it.
pub fn provider_summary(
    result: &ParseResult,
    provider: Provider,
    policy: InvalidPolicy,
) -> ProviderSummary {
    let filtered = filter_by(result, provider.label());
    let (average_therms, error) = match average_field(&filtered, Field::Therms, policy) {
        Ok(avg) => (Some(avg), None),
        Err(e) => {
            warn!(provider = %provider, error = %e, "Average unavailable");
            (None, Some(e.to_string()))
        }
    };

    ProviderSummary {
        timestamp: Utc::now(),
        provider: provider.label().to_string(),
        records: filtered.len(),
        average_therms,
        error,
    }
}

/// One summary per known provider, in [`Provider::ALL`] order.
pub fn summarize_providers(result: &ParseResult, policy: InvalidPolicy) -> Vec<ProviderSummary> {
    Provider::ALL
        .iter()
        .map(|p| provider_summary(result, *p, policy))
        .collect()
}

/// Average therms for National Grid in `file_name`, printed on the way out.
pub fn national_average(file_name: &str) -> Result<f64> {
    let dataset = load_dataset(file_name)?;
    let national = national_only(&dataset);
    let avg = average_field(&national, Field::Therms, InvalidPolicy::Fail)?;
    Ok(log_and_return(avg))
}

/// The fixed run over the bundled dataset.
pub fn run_default() -> Result<f64> {
    national_average(DEFAULT_DATA_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: &str = "zip,buildingType,consumptionTherms,consumptionGigaJoules,source\n\
                        10001,Residential,15,1.58,National Grid\n\
                        10002,Commercial,25,2.64,ConEd\n\
                        10003,Residential,45,4.75,National Grid\n";

    #[test]
    fn test_provider_summary() {
        let dataset = parse_records(TEXT);
        let summary = provider_summary(&dataset, Provider::NationalGrid, InvalidPolicy::Fail);

        assert_eq!(summary.provider, "National Grid");
        assert_eq!(summary.records, 2);
        assert_eq!(summary.average_therms, Some(30.0));
        assert!(summary.error.is_none());
    }

    #[test]
    fn test_provider_summary_records_error() {
        let dataset = parse_records(
            "zip,buildingType,consumptionTherms,consumptionGigaJoules,source\n\
             10001,Residential,15,1.58,National Grid\n",
        );
        let summary = provider_summary(&dataset, Provider::ConEd, InvalidPolicy::Fail);

        assert_eq!(summary.records, 0);
        assert_eq!(summary.average_therms, None);
        assert_eq!(
            summary.error.as_deref(),
            Some("cannot average an empty record set")
        );
    }

    #[test]
    fn test_summarize_providers_order() {
        let summaries = summarize_providers(&parse_records(TEXT), InvalidPolicy::Fail);
        let names: Vec<_> = summaries.iter().map(|s| s.provider.as_str()).collect();
        assert_eq!(names, vec!["National Grid", "ConEd"]);
        assert_eq!(summaries[1].average_therms, Some(25.0));
    }

    #[test]
    fn test_load_dataset_missing_file() {
        assert!(load_dataset("no-such-dataset.csv").is_err());
    }

    #[test]
    fn test_run_default_on_bundled_data() {
        let avg = run_default().unwrap();
        assert!(avg.is_finite());
        assert!(avg > 0.0);
    }
}
