//! CSV exports
//!
//! `scores.csv` has one row per contribution, `detailed.csv` one row per
//! (contribution, property, pillar) result, joined to the property it was
//! evaluated on. Fields are quoted per RFC 4180 when they contain a comma,
//! quote or line break.

use crate::models::{Contribution, ContributionScore, Pillar, PillarResult, Property};
use std::collections::HashMap;

/// Property values longer than this are cut in `detailed.csv`
const VALUE_MAX_CHARS: usize = 80;

const SCORES_HEADER: &[&str] = &[
    "contribution_id",
    "paper_id",
    "paper_title",
    "num_properties",
    "availability",
    "accessibility",
    "linkability",
    "license",
    "overall",
    "tier",
    "excluded_reason",
];

const DETAILED_HEADER: &[&str] = &[
    "contribution_id",
    "paper_id",
    "property_id",
    "predicate_id",
    "predicate_label",
    "value",
    "pillar",
    "declared_type",
    "state",
    "score",
    "reason",
    "probe_skipped",
    "repo_type",
    "ontology_source",
    "license_name",
];

/// Render the per-contribution summary
pub fn render_scores(scores: &[ContributionScore]) -> String {
    let mut out = row(SCORES_HEADER.iter().map(|h| h.to_string()));
    for score in scores {
        let mut fields = vec![
            score.contribution_id.clone(),
            score.paper_id.clone(),
            score.paper_title.clone(),
            score.num_properties.to_string(),
        ];
        fields.extend(Pillar::ALL.iter().map(|p| format_score(score.pillar(*p))));
        fields.push(format_score(score.overall_score));
        fields.push(score.tier.map(|t| t.to_string()).unwrap_or_default());
        fields.push(score.excluded_reason.clone().unwrap_or_default());
        out.push_str(&row(fields));
    }
    out
}

/// Render one row per pillar result
pub fn render_detailed(contributions: &[Contribution], results: &[PillarResult]) -> String {
    let properties: HashMap<(&str, usize), (&Contribution, &Property)> = contributions
        .iter()
        .flat_map(|c| {
            c.properties
                .iter()
                .enumerate()
                .map(move |(i, p)| ((c.id.as_str(), i), (c, p)))
        })
        .collect();

    let mut out = row(DETAILED_HEADER.iter().map(|h| h.to_string()));
    for r in results {
        let source = properties.get(&(r.contribution_id.as_str(), r.property_index));
        let paper_id = source.map(|(c, _)| c.paper_id.clone()).unwrap_or_default();
        let property = source.map(|(_, p)| *p);
        out.push_str(&row([
            r.contribution_id.clone(),
            paper_id,
            r.property_id.clone(),
            property.map(|p| p.predicate_id.clone()).unwrap_or_default(),
            property.map(|p| p.predicate_label.clone()).unwrap_or_default(),
            property
                .and_then(|p| p.value.as_deref())
                .map(truncate_value)
                .unwrap_or_default(),
            r.pillar.to_string(),
            r.declared_type.to_string(),
            r.state.to_string(),
            format!("{:.0}", r.score),
            r.reason.clone(),
            r.probe_skipped.to_string(),
            property
                .and_then(|p| p.repo.as_ref())
                .map(|repo| repo.host.to_string())
                .unwrap_or_default(),
            property
                .and_then(|p| p.ontology_source.clone())
                .unwrap_or_default(),
            r.license_name.clone().unwrap_or_default(),
        ]));
    }
    out
}

fn truncate_value(value: &str) -> String {
    value.chars().take(VALUE_MAX_CHARS).collect()
}

fn format_score(score: Option<f64>) -> String {
    score.map(|s| format!("{:.1}", s)).unwrap_or_default()
}

fn row(fields: impl IntoIterator<Item = String>) -> String {
    let mut line = fields
        .into_iter()
        .map(|f| escape(&f))
        .collect::<Vec<_>>()
        .join(",");
    line.push('\n');
    line
}

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
