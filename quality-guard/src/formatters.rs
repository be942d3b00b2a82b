//! Machine-readable rendering of suite reports and aggregate summaries.
//!
//! # Examples
//!
//! ```rust
//! use quality_guard::core::{Expectation, ExpectationResult, SuiteReport};
//! use quality_guard::formatters::{JsonFormatter, ResultFormatter};
//!
//! let report = SuiteReport::new(
//!     "equipment",
//!     12,
//!     vec![ExpectationResult::from_violations(Expectation::not_null("mine_id"), vec![], vec![])],
//! );
//!
//! let json = JsonFormatter::new().format_report(&report).unwrap();
//! assert!(json.contains("\"overall_success\": true"));
//! ```

use crate::aggregate::AggregateSummary;
use crate::core::SuiteReport;
use crate::prelude::*;
use serde_json::Value as JsonValue;

/// Configuration options for formatting reports.
#[derive(Debug, Clone)]
pub struct FormatterConfig {
    /// Pretty-print the output
    pub pretty: bool,
    /// Keep passing results in the `results` array
    pub include_passed: bool,
    /// Keep the full `violating_rows` list of each result
    pub include_violating_rows: bool,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            include_passed: true,
            include_violating_rows: true,
        }
    }
}

impl FormatterConfig {
    /// Only failing results, compact output.
    pub fn failures_only() -> Self {
        Self {
            pretty: false,
            include_passed: false,
            include_violating_rows: true,
        }
    }

    /// Failing results with samples but without row index lists.
    pub fn minimal() -> Self {
        Self {
            pretty: false,
            include_passed: false,
            include_violating_rows: false,
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

/// Renders engine output to a string.
pub trait ResultFormatter {
    fn format_report(&self, report: &SuiteReport) -> Result<String>;

    fn format_summary(&self, summary: &AggregateSummary) -> Result<String>;

    /// Renders several reports as one document, in the given order.
    fn format_reports(&self, reports: &[SuiteReport]) -> Result<String> {
        let parts = reports
            .iter()
            .map(|r| self.format_report(r))
            .collect::<Result<Vec<_>>>()?;
        Ok(parts.join("\n"))
    }
}

/// Formats reports as JSON using their serde representation.
#[derive(Debug, Clone, Default)]
pub struct JsonFormatter {
    config: FormatterConfig,
}

impl JsonFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FormatterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FormatterConfig {
        &self.config
    }

    fn render(&self, value: &JsonValue) -> Result<String> {
        let out = if self.config.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(out)
    }

    fn filter_report(&self, mut value: JsonValue) -> JsonValue {
        if let Some(results) = value.get_mut("results").and_then(JsonValue::as_array_mut) {
            if !self.config.include_passed {
                results.retain(|r| r.get("success") != Some(&JsonValue::Bool(true)));
            }
            if !self.config.include_violating_rows {
                for result in results.iter_mut() {
                    if let Some(obj) = result.as_object_mut() {
                        obj.remove("violating_rows");
                    }
                }
            }
        }
        value
    }
}

impl ResultFormatter for JsonFormatter {
    fn format_report(&self, report: &SuiteReport) -> Result<String> {
        let value = self.filter_report(serde_json::to_value(report)?);
        self.render(&value)
    }

    fn format_summary(&self, summary: &AggregateSummary) -> Result<String> {
        self.render(&serde_json::to_value(summary)?)
    }

    fn format_reports(&self, reports: &[SuiteReport]) -> Result<String> {
        let values = reports
            .iter()
            .map(|r| Ok(self.filter_report(serde_json::to_value(r)?)))
            .collect::<Result<Vec<_>>>()?;
        self.render(&JsonValue::Array(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::ResultAggregator;
    use crate::core::{Expectation, ExpectationResult, Value};

    fn create_test_report() -> SuiteReport {
        SuiteReport::new(
            "ore_production",
            15,
            vec![
                ExpectationResult::from_violations(
                    Expectation::not_null("production_id"),
                    vec![],
                    vec![],
                ),
                ExpectationResult::from_violations(
                    Expectation::between("fe_content_pct", 0.0, 100.0),
                    vec![2],
                    vec![Value::Float(150.0)],
                ),
                ExpectationResult::table_level(Expectation::row_count_at_least(10), true, 15),
            ],
        )
    }

    #[test]
    fn test_formatter_config() {
        let config = FormatterConfig::default();
        assert!(config.pretty);
        assert!(config.include_passed);

        let config = FormatterConfig::failures_only();
        assert!(!config.include_passed);
        assert!(config.include_violating_rows);
        assert!(!FormatterConfig::minimal().include_violating_rows);
    }

    #[test]
    fn test_json_report() {
        let output = JsonFormatter::new().format_report(&create_test_report()).unwrap();
        let parsed: JsonValue = serde_json::from_str(&output).unwrap();

        assert_eq!(parsed["dataset_name"], "ore_production");
        assert_eq!(parsed["overall_success"], false);
        assert_eq!(parsed["results"].as_array().unwrap().len(), 3);
        assert_eq!(parsed["results"][1]["violating_rows"][0], 2);
        assert_eq!(parsed["results"][1]["sample_violating_values"][0], 150.0);
        assert_eq!(parsed["results"][2]["observed_row_count"], 15);
    }

    #[test]
    fn test_failures_only() {
        let formatter = JsonFormatter::with_config(FormatterConfig::failures_only());
        let output = formatter.format_report(&create_test_report()).unwrap();
        assert!(!output.contains('\n'));

        let parsed: JsonValue = serde_json::from_str(&output).unwrap();
        let results = parsed["results"].as_array().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["kind"], "range");
    }

    #[test]
    fn test_minimal_drops_rows() {
        let formatter = JsonFormatter::with_config(FormatterConfig::minimal());
        let output = formatter.format_report(&create_test_report()).unwrap();
        let parsed: JsonValue = serde_json::from_str(&output).unwrap();
        assert!(parsed["results"][0].get("violating_rows").is_none());
        assert_eq!(parsed["results"][0]["violating_row_count"], 1);
    }

    #[test]
    fn test_summary_and_many_reports() {
        let reports = vec![create_test_report(), create_test_report()];
        let summary = ResultAggregator::aggregate(&reports);
        let formatter = JsonFormatter::with_config(FormatterConfig::default().with_pretty(false));

        let parsed: JsonValue =
            serde_json::from_str(&formatter.format_summary(&summary).unwrap()).unwrap();
        assert_eq!(parsed["all_suites_success"], false);
        assert_eq!(parsed["datasets"][0]["total_count"], 6);

        let parsed: JsonValue =
            serde_json::from_str(&formatter.format_reports(&reports).unwrap()).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);
    }
}
