//! Reproducibility Scoring
//!
//! Every property of a contribution is checked against four pillars and
//! each check yields one of three states.
//!
//! # Pillar Rules
//!
//! ```text
//! Availability   Valid if the trimmed value is non-empty and not n/a|none|null
//! Accessibility  url_* only: Valid on a 2xx response (HEAD, GET on 405)
//! Linkability    resource_* only: Valid for resource_onto
//! License        url_repo only: Valid when the host reports a license
//! ```
//!
//! # Scoring Formula
//!
//! ```text
//! state score    = 100 (Valid | Inapplicable), 0 (NotValid)
//! pillar score   = trimmed_mean(state scores of that pillar)
//!                  n >= 4: drop one lowest and one highest, then mean
//!                  n <  4: plain mean, n = 0: undefined
//! overall score  = mean(defined pillar scores)
//! tier           = Excellent >= 80 > Good >= 60 > Fair >= 40 > Poor
//! ```
//!
//! # Example
//!
//! A contribution with one unreachable, unlicensed GitHub URL:
//! - Availability 100, Accessibility 0, Linkability 100 (inapplicable), License 0
//! - Overall = 200 / 4 = 50 (Fair)

mod aggregate;
mod contribution;
mod evaluator;

pub use aggregate::{mean, trimmed_mean, TRIM_MIN_LEN};
pub use contribution::{
    explain, overall_score, score_from_results, ContributionEvaluation, ContributionScorer,
};
pub use evaluator::{has_value, PillarEvaluator, ProbePolicy};
