//! JSON reporter
//!
//! Outputs the contribution scores and corpus statistics as pretty-printed
//! JSON. Useful for machine consumption, piping to jq, or further processing.

use crate::models::{ContributionScore, SkippedContribution};
use crate::pipeline::EvaluationRun;
use crate::stats::CorpusStatistics;
use anyhow::Result;
use chrono::Local;
use serde::Serialize;

#[derive(Serialize)]
struct JsonReport<'a> {
    generated_at: String,
    version: &'static str,
    statistics: &'a CorpusStatistics,
    contributions: &'a [ContributionScore],
    skipped: &'a [SkippedContribution],
}

/// Render a run as JSON
pub fn render(run: &EvaluationRun) -> Result<String> {
    let report = JsonReport {
        generated_at: Local::now().to_rfc3339(),
        version: env!("CARGO_PKG_VERSION"),
        statistics: &run.statistics,
        contributions: &run.scores,
        skipped: &run.skipped,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

/// Render the statistics document on its own
pub fn render_statistics(statistics: &CorpusStatistics) -> Result<String> {
    Ok(serde_json::to_string_pretty(statistics)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_run;

    #[test]
    fn test_json_render_valid() {
        let json_str = render(&test_run()).expect("render JSON");
        let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("parse JSON");
        let contributions = parsed["contributions"].as_array().expect("contributions array");
        assert_eq!(contributions.len(), 2);
        assert_eq!(contributions[1]["tier"], "Fair");
        assert_eq!(contributions[1]["pillar_scores"]["license"], 0.0);
        assert_eq!(parsed["skipped"][0]["index"], 2);
        assert_eq!(parsed["statistics"]["total_properties"], 2);
    }

    #[test]
    fn test_statistics_render() {
        let json_str = render_statistics(&test_run().statistics).expect("render statistics");
        let parsed: serde_json::Value = serde_json::from_str(&json_str).expect("parse JSON");
        assert_eq!(parsed["overall"]["mean"], 75.0);
        assert_eq!(parsed["raw_rates"]["url_accessibility"]["passed"], 0);
        assert_eq!(parsed["property_types"]["url_repo"], 1);
    }
}
