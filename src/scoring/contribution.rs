//! Contribution scorer
//!
//! Evaluates every property of a contribution under every pillar, then
//! collapses the results into pillar scores, an overall score and a tier.

use super::aggregate::{mean, trimmed_mean};
use super::evaluator::{PillarEvaluator, ProbePolicy};
use crate::models::{Contribution, ContributionScore, Pillar, PillarResult, Tier};
use crate::probes::Probes;
use std::collections::BTreeMap;
use tracing::debug;

/// A contribution's score together with the pillar results behind it
#[derive(Debug, Clone)]
pub struct ContributionEvaluation {
    pub score: ContributionScore,
    pub results: Vec<PillarResult>,
}

pub struct ContributionScorer<'a> {
    evaluator: PillarEvaluator<'a>,
}

impl<'a> ContributionScorer<'a> {
    pub fn new(probes: &'a dyn Probes, policy: ProbePolicy) -> Self {
        Self {
            evaluator: PillarEvaluator::new(probes, policy),
        }
    }

    /// Score one contribution. Results are ordered by property, then by
    /// pillar in [`Pillar::ALL`] order.
    pub fn score(&self, contribution: &Contribution) -> ContributionEvaluation {
        let results: Vec<PillarResult> = contribution
            .properties
            .iter()
            .enumerate()
            .flat_map(|(index, property)| {
                self.evaluator
                    .evaluate_all(property)
                    .into_iter()
                    .map(move |result| result.at_property(index))
            })
            .map(|result| result.for_contribution(&contribution.id))
            .collect();

        let score = score_from_results(contribution, &results);
        debug!(
            "Contribution {}: {} properties, overall {:?}",
            contribution.id,
            contribution.properties.len(),
            score.overall_score
        );

        ContributionEvaluation { score, results }
    }
}

/// Aggregate pillar results into a [`ContributionScore`].
///
/// Each pillar's score is the trimmed mean of its results; a pillar with no
/// results is undefined and left out of the overall mean. A contribution
/// with no defined pillar gets no overall score and an exclusion reason.
pub fn score_from_results(contribution: &Contribution, results: &[PillarResult]) -> ContributionScore {
    let pillar_scores: BTreeMap<Pillar, Option<f64>> = Pillar::ALL
        .iter()
        .map(|pillar| {
            let scores: Vec<f64> = results
                .iter()
                .filter(|r| r.pillar == *pillar)
                .map(|r| r.score)
                .collect();
            (*pillar, trimmed_mean(&scores))
        })
        .collect();

    let overall_score = overall_score(&pillar_scores);
    let excluded_reason = match overall_score {
        Some(_) => None,
        None if contribution.properties.is_empty() => {
            Some("no reproducibility properties".to_string())
        }
        None => Some("no pillar results".to_string()),
    };

    ContributionScore {
        contribution_id: contribution.id.clone(),
        paper_id: contribution.paper_id.clone(),
        paper_title: contribution.paper_title.clone(),
        num_properties: contribution.properties.len(),
        pillar_scores,
        overall_score,
        tier: overall_score.map(Tier::from_score),
        excluded_reason,
    }
}

/// Unweighted mean of the defined pillar scores
pub fn overall_score(pillar_scores: &BTreeMap<Pillar, Option<f64>>) -> Option<f64> {
    let defined: Vec<f64> = pillar_scores.values().filter_map(|s| *s).collect();
    mean(&defined)
}

/// Human-readable breakdown of one contribution's score
pub fn explain(score: &ContributionScore, results: &[PillarResult]) -> String {
    let mut out = String::new();
    out.push_str(&format!("Contribution {}\n", score.contribution_id));
    if !score.paper_title.is_empty() {
        out.push_str(&format!("Paper: {}\n", score.paper_title));
    }

    match (score.overall_score, score.tier) {
        (Some(overall), Some(tier)) => {
            out.push_str(&format!("Overall: {:.1} ({})\n", overall, tier));
        }
        _ => {
            let reason = score.excluded_reason.as_deref().unwrap_or("not scored");
            out.push_str(&format!("Overall: n/a ({})\n", reason));
        }
    }

    for pillar in Pillar::ALL {
        match score.pillar(pillar) {
            Some(s) => out.push_str(&format!("\n{}: {:.1}\n", pillar.label(), s)),
            None => out.push_str(&format!("\n{}: undefined\n", pillar.label())),
        }
        for result in results.iter().filter(|r| r.pillar == pillar) {
            out.push_str(&format!(
                "  - {} [{}] {}\n",
                result.property_id, result.declared_type, result.reason
            ));
        }
    }

    out
}
