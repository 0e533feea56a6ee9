//! Batch evaluation pipeline
//!
//! Orchestrates a full run over a loaded batch:
//! 1. Score contributions in parallel on a bounded rayon pool
//! 2. Stream each finished score to the optional JSON Lines sink
//! 3. Collect scores and pillar results back in input order
//! 4. Compute corpus statistics

mod sink;

pub use sink::JsonlSink;

use crate::input::InputBatch;
use crate::models::{Contribution, ContributionScore, PillarResult, SkippedContribution};
use crate::probes::Probes;
use crate::scoring::{ContributionEvaluation, ContributionScorer, ProbePolicy};
use crate::stats::CorpusStatistics;
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::info;

/// Upper bound accepted for `--workers`
pub const MAX_WORKERS: usize = 64;

/// Progress callback: (contribution id, completed, total)
pub type ProgressCallback = Box<dyn Fn(&str, usize, usize) + Send + Sync>;

/// Everything a run produces
#[derive(Debug, Clone)]
pub struct EvaluationRun {
    /// One per well-formed contribution, in input order
    pub scores: Vec<ContributionScore>,
    /// Ordered by contribution, then property, then pillar
    pub results: Vec<PillarResult>,
    /// The evaluated contributions, in input order
    pub contributions: Vec<Contribution>,
    pub skipped: Vec<SkippedContribution>,
    pub statistics: CorpusStatistics,
}

pub struct EvaluationPipeline<'a> {
    probes: &'a dyn Probes,
    policy: ProbePolicy,
    workers: usize,
    sink: Option<JsonlSink>,
    progress_callback: Option<ProgressCallback>,
}

impl<'a> EvaluationPipeline<'a> {
    /// Create a pipeline
    ///
    /// # Arguments
    /// * `workers` - Number of worker threads (0 = auto-detect)
    pub fn new(probes: &'a dyn Probes, policy: ProbePolicy, workers: usize) -> Self {
        let workers = if workers == 0 {
            std::thread::available_parallelism()
                .map(|p| p.get())
                .unwrap_or(4)
                .min(16)
        } else {
            workers.min(MAX_WORKERS)
        };

        Self {
            probes,
            policy,
            workers,
            sink: None,
            progress_callback: None,
        }
    }

    pub fn with_sink(mut self, sink: JsonlSink) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Evaluate every contribution in the batch
    pub fn run(&self, batch: InputBatch) -> Result<EvaluationRun> {
        let total = batch.contributions.len();
        info!(
            "Evaluating {} contributions on {} workers (accessibility: {}, licenses: {})",
            total,
            self.workers,
            if self.policy.check_accessibility { "on" } else { "off" },
            if self.policy.check_licenses { "on" } else { "off" },
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
            .context("Failed to build worker pool")?;

        let scorer = ContributionScorer::new(self.probes, self.policy);
        let completed = AtomicUsize::new(0);

        let evaluations: Vec<ContributionEvaluation> = pool.install(|| {
            batch
                .contributions
                .par_iter()
                .map(|contribution| -> Result<ContributionEvaluation> {
                    let evaluation = scorer.score(contribution);
                    if let Some(sink) = &self.sink {
                        sink.write(&evaluation.score)?;
                    }

                    let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                    if let Some(ref callback) = self.progress_callback {
                        callback(&contribution.id, done, total);
                    }
                    Ok(evaluation)
                })
                .collect::<Result<Vec<_>>>()
        })?;

        let mut scores = Vec::with_capacity(evaluations.len());
        let mut results = Vec::new();
        for evaluation in evaluations {
            scores.push(evaluation.score);
            results.extend(evaluation.results);
        }

        let statistics = CorpusStatistics::compute(&scores, &results, &batch.skipped);
        info!(
            "Scored {} of {} contributions ({} skipped, {} excluded)",
            statistics.scored_contributions,
            total,
            batch.skipped.len(),
            statistics.diagnostics.excluded.len()
        );

        Ok(EvaluationRun {
            scores,
            results,
            contributions: batch.contributions,
            skipped: batch.skipped,
            statistics,
        })
    }
}
