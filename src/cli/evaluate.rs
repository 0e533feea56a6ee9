//! Evaluate command - score a batch of contributions

use super::resolve_config;
use crate::classify::PropertyClassifier;
use crate::input::load_input;
use crate::pipeline::{EvaluationPipeline, JsonlSink};
use crate::probes::HttpProbes;
use crate::reporters::{self, OutputFormat};
use crate::pipeline::EvaluationRun;
use crate::scoring::{explain, ProbePolicy};
use anyhow::{bail, Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{debug, warn};

const DEFAULT_OUTPUT_DIR: &str = "results";

pub(super) struct EvaluateArgs {
    pub input: PathBuf,
    pub output: Option<PathBuf>,
    pub format: Option<String>,
    pub skip_accessibility: bool,
    pub skip_licenses: bool,
    pub timeout: Option<u64>,
    pub stream: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub workers: Option<usize>,
    pub explain: Option<String>,
}

/// Run the evaluate command
pub(super) fn run(args: EvaluateArgs) -> Result<()> {
    let mut config = resolve_config(&args.input, args.config.as_deref())?;

    // Flags only ever switch checks off; config can't re-enable them
    config.probes.skip_accessibility |= args.skip_accessibility;
    config.probes.skip_licenses |= args.skip_licenses;
    if let Some(timeout) = args.timeout {
        config.probes.timeout_secs = timeout;
    }

    let format_name = args
        .format
        .or_else(|| config.defaults.format.clone())
        .unwrap_or_else(|| "text".to_string());
    let format = OutputFormat::from_str(&format_name)?;
    let output_dir = args
        .output
        .or_else(|| config.defaults.output.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
    let workers = args.workers.or(config.defaults.workers).unwrap_or(0);
    debug!("Effective config: {:?}", config);

    let classifier = PropertyClassifier::new(&config.classifier);
    let batch = load_input(&args.input, &classifier)
        .with_context(|| format!("Failed to load contributions from {}", args.input.display()))?;

    let probes = HttpProbes::new(&config.probes);
    let policy = ProbePolicy::from_config(&config.probes);

    let bar = ProgressBar::new(batch.contributions.len() as u64);
    bar.set_style(create_bar_style());
    bar.set_message("Evaluating contributions...");
    let bar_cb = bar.clone();

    let mut pipeline = EvaluationPipeline::new(&probes, policy, workers).with_progress_callback(
        Box::new(move |_, done, _| bar_cb.set_position(done as u64)),
    );
    if let Some(stream) = &args.stream {
        pipeline = pipeline.with_sink(JsonlSink::create(stream)?);
    }

    let run = pipeline.run(batch)?;
    bar.finish_and_clear();

    let written = reporters::write_output_files(&run, &output_dir)?;

    let rendered = reporters::report_with_format(&run, format)?;
    print!("{}", rendered);

    if let Some(id) = &args.explain {
        if format == OutputFormat::Text {
            println!("\n{}", style("─".repeat(60)).dim());
            println!("{}", explain_contribution(&run, id)?);
        } else {
            warn!("--explain is only shown with the text format");
        }
    }

    // Status lines go to stderr so json/latex stdout stays clean
    eprintln!(
        "{}Evaluated {} contributions ({} skipped)",
        style("✓ ").green(),
        run.scores.len(),
        run.skipped.len()
    );
    let names: Vec<String> = written
        .iter()
        .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .collect();
    eprintln!(
        "{}Saved {} to {}",
        style("✓ ").green(),
        names.join(", "),
        style(output_dir.display()).cyan()
    );
    if let Some(stream) = &args.stream {
        eprintln!(
            "{}Streamed scores to {}",
            style("✓ ").green(),
            style(stream.display()).cyan()
        );
    }

    Ok(())
}

/// Score breakdown for one contribution of the run
fn explain_contribution(run: &EvaluationRun, id: &str) -> Result<String> {
    let Some(score) = run.scores.iter().find(|s| s.contribution_id == id) else {
        bail!("No evaluated contribution with id '{}'", id);
    };
    let results: Vec<_> = run
        .results
        .iter()
        .filter(|r| r.contribution_id == id)
        .cloned()
        .collect();
    Ok(explain(score, &results))
}

/// Create bar progress style
fn create_bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .expect("valid template")
        .progress_chars("█▓▒░  ")
}
