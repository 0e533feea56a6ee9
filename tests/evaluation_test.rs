//! End-to-end evaluation through the library API with canned probe responses

use reproscore::classify::PropertyClassifier;
use reproscore::input::parse_input;
use reproscore::models::{Pillar, PillarState, Tier};
use reproscore::pipeline::EvaluationPipeline;
use reproscore::probes::{ProbeError, StaticProbes};
use reproscore::scoring::ProbePolicy;
use serde_json::json;

const REPO: &str = "https://github.com/acme/tool";
const ZENODO: &str = "https://zenodo.org/records/42";
const DOCS: &str = "https://example.org/docs";

fn corpus() -> String {
    json!({
        "contributions": [
            {
                "contribution_id": "C1",
                "reproducibility_properties": [
                    {"object_id": "U1", "value": REPO},
                    {"object_id": "U2", "value": ZENODO},
                    {"object_id": "U3", "value": DOCS},
                    {"object_id": "wd:Q5", "object_class": "resource", "value": "human"},
                    {"object_id": "L1", "value": "PyTorch 2.1"}
                ]
            },
            {
                "contribution_id": "C2",
                "reproducibility_properties": [
                    {"object_id": "U4", "value": REPO}
                ]
            },
            {"contribution_id": "C3", "reproducibility_properties": []}
        ]
    })
    .to_string()
}

fn probes() -> StaticProbes {
    StaticProbes::new()
        .with_status(REPO, 200)
        .with_status(ZENODO, 200)
        .with_reach_error(DOCS, ProbeError::Timeout)
        .with_license(REPO, Some("MIT License"))
        .with_license(ZENODO, Some("cc-by-4.0"))
}

#[test]
fn test_full_corpus() {
    let batch = parse_input(&corpus(), &PropertyClassifier::default()).unwrap();
    let probes = probes();
    let run = EvaluationPipeline::new(&probes, ProbePolicy::default(), 4)
        .run(batch)
        .unwrap();

    // C1 accessibility: [100, 100, 0, 100, 100] -> trimmed [100, 100, 100]
    let c1 = &run.scores[0];
    assert_eq!(c1.pillar(Pillar::Accessibility), Some(100.0));
    assert_eq!(c1.overall_score, Some(100.0));

    let docs_access = run
        .results
        .iter()
        .find(|r| r.property_id == "U3" && r.pillar == Pillar::Accessibility)
        .unwrap();
    assert_eq!(docs_access.state, PillarState::NotValid);
    assert_eq!(docs_access.reason, "Not Valid: timed out");

    let c2 = &run.scores[1];
    assert_eq!(c2.tier, Some(Tier::Excellent));

    // C3 has no properties and stays out of the aggregates
    let c3 = &run.scores[2];
    assert_eq!(c3.overall_score, None);
    assert_eq!(run.statistics.scored_contributions, 2);
    assert_eq!(run.statistics.diagnostics.excluded[0].contribution_id, "C3");

    let license = &run.statistics.raw_rates.repo_license;
    assert_eq!(license.rate.evaluated, 3);
    assert_eq!(license.rate.rate, Some(100.0));
    assert_eq!(license.license_types.get("MIT License"), Some(&2));
    assert_eq!(license.license_types.get("cc-by-4.0"), Some(&1));

    let access = &run.statistics.raw_rates.url_accessibility;
    assert_eq!((access.passed, access.evaluated), (3, 4));
    assert_eq!(access.rate, Some(75.0));

    // One probe call per applicable property per pillar
    assert_eq!(probes.reachability_calls(), 4);
    assert_eq!(probes.license_calls(), 3);
}

#[test]
fn test_runs_are_reproducible() {
    let probes = probes();
    let first = EvaluationPipeline::new(&probes, ProbePolicy::default(), 1)
        .run(parse_input(&corpus(), &PropertyClassifier::default()).unwrap())
        .unwrap();
    let second = EvaluationPipeline::new(&probes, ProbePolicy::default(), 8)
        .run(parse_input(&corpus(), &PropertyClassifier::default()).unwrap())
        .unwrap();
    assert_eq!(first.scores, second.scores);
    assert_eq!(first.results, second.results);
}

#[test]
fn test_license_only_offline() {
    let probes = probes();
    let policy = ProbePolicy {
        check_accessibility: false,
        check_licenses: true,
    };
    let run = EvaluationPipeline::new(&probes, policy, 2)
        .run(parse_input(&corpus(), &PropertyClassifier::default()).unwrap())
        .unwrap();
    assert_eq!(probes.reachability_calls(), 0);
    assert_eq!(probes.license_calls(), 3);
    assert_eq!(run.statistics.raw_rates.url_accessibility.rate, None);
}
