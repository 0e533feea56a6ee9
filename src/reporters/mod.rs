//! Output reporters for reproscore evaluation runs
//!
//! Supports multiple stdout formats:
//! - `text` - Terminal output with colors
//! - `json` - Machine-readable JSON
//! - `latex` - Paper-ready LaTeX tables
//!
//! `evaluate -o <dir>` additionally writes the CSV exports, the statistics
//! document and the LaTeX tables as files.

mod csv;
mod json;
mod latex;
mod text;

use crate::pipeline::EvaluationRun;
use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const SCORES_FILE: &str = "scores.csv";
pub const DETAILED_FILE: &str = "detailed.csv";
pub const STATISTICS_FILE: &str = "statistics.json";
pub const TABLES_FILE: &str = "tables.tex";

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Latex,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "latex" | "tex" => Ok(OutputFormat::Latex),
            _ => Err(anyhow!(
                "Unknown format '{}'. Valid formats: text, json, latex",
                s
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Latex => write!(f, "latex"),
        }
    }
}

/// Render a run using an OutputFormat enum
pub fn report_with_format(run: &EvaluationRun, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render(run),
        OutputFormat::Json => json::render(run),
        OutputFormat::Latex => latex::render(&run.statistics),
    }
}

/// Write every export file into `dir`, creating it if needed
pub fn write_output_files(run: &EvaluationRun, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let files = [
        (SCORES_FILE, csv::render_scores(&run.scores)),
        (DETAILED_FILE, csv::render_detailed(&run.contributions, &run.results)),
        (STATISTICS_FILE, json::render_statistics(&run.statistics)?),
        (TABLES_FILE, latex::render(&run.statistics)?),
    ];

    let mut written = Vec::with_capacity(files.len());
    for (name, content) in files {
        let path = dir.join(name);
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::classify::PropertyClassifier;
    use crate::input::parse_input;
    use crate::pipeline::EvaluationPipeline;
    use crate::probes::StaticProbes;
    use crate::scoring::ProbePolicy;
    use serde_json::json;

    /// Small evaluated corpus: one Excellent, one Fair, one skipped record
    pub(crate) fn test_run() -> EvaluationRun {
        let doc = json!({
            "contributions": [
                {
                    "contribution_id": "R1",
                    "paper_id": "P1",
                    "paper_title": "Deep learning, \"reproduced\"",
                    "reproducibility_properties": [
                        {"object_id": "L1", "predicate_label": "method", "value": "CNN"}
                    ]
                },
                {
                    "contribution_id": "R2",
                    "paper_id": "P2",
                    "paper_title": "Tools",
                    "reproducibility_properties": [
                        {"object_id": "U1", "predicate_id": "P7", "predicate_label": "code",
                         "value": "https://github.com/acme/tool"}
                    ]
                },
                {"paper_id": "P3"}
            ]
        });
        let batch = parse_input(&doc.to_string(), &PropertyClassifier::default())
            .expect("fixture parses");
        let probes = StaticProbes::new()
            .with_status("https://github.com/acme/tool", 404)
            .with_license("https://github.com/acme/tool", None);
        EvaluationPipeline::new(&probes, ProbePolicy::default(), 1)
            .run(batch)
            .expect("fixture evaluates")
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!(OutputFormat::from_str("text").unwrap(), OutputFormat::Text);
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(OutputFormat::from_str("tex").unwrap(), OutputFormat::Latex);
        assert!(OutputFormat::from_str("sarif").is_err());
    }

    #[test]
    fn test_fixture_scores() {
        let run = test_run();
        assert_eq!(run.scores.len(), 2);
        assert_eq!(run.scores[0].overall_score, Some(100.0));
        assert_eq!(run.scores[1].overall_score, Some(50.0));
        assert_eq!(run.skipped.len(), 1);
    }

    #[test]
    fn test_write_output_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("results");
        let written = write_output_files(&test_run(), &out).unwrap();

        assert_eq!(written.len(), 4);
        for name in [SCORES_FILE, DETAILED_FILE, STATISTICS_FILE, TABLES_FILE] {
            assert!(out.join(name).is_file(), "{} missing", name);
        }
        let stats: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(out.join(STATISTICS_FILE)).unwrap())
                .unwrap();
        assert_eq!(stats["scored_contributions"], 2);
    }

    #[test]
    fn test_report_dispatch() {
        let run = test_run();
        for format in [OutputFormat::Text, OutputFormat::Json, OutputFormat::Latex] {
            let rendered = report_with_format(&run, format).unwrap();
            assert!(!rendered.is_empty(), "{} output empty", format);
        }
    }
}
