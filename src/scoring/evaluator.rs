//! Pillar evaluator
//!
//! Decides `Valid` / `Inapplicable` / `NotValid` for one property under one
//! pillar. Inapplicable results score 100 so that structurally irrelevant
//! properties never drag a pillar down.

use crate::config::ProbeConfig;
use crate::models::{Pillar, PillarResult, PillarState, Property, PropertyType};
use crate::probes::Probes;
use tracing::debug;

/// Values that count as "no value" for Availability (compared lowercase)
const NULL_MARKERS: &[&str] = &["n/a", "none", "null"];

/// Which network-backed checks run. Each switch is independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbePolicy {
    pub check_accessibility: bool,
    pub check_licenses: bool,
}

impl Default for ProbePolicy {
    fn default() -> Self {
        Self {
            check_accessibility: true,
            check_licenses: true,
        }
    }
}

impl ProbePolicy {
    pub fn from_config(config: &ProbeConfig) -> Self {
        Self {
            check_accessibility: !config.skip_accessibility,
            check_licenses: !config.skip_licenses,
        }
    }

    /// Policy with every network check disabled
    pub fn offline() -> Self {
        Self {
            check_accessibility: false,
            check_licenses: false,
        }
    }
}

/// True when a raw value carries content
pub fn has_value(value: Option<&str>) -> bool {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => {
            let lower = v.to_lowercase();
            !NULL_MARKERS.contains(&lower.as_str())
        }
        _ => false,
    }
}

/// Evaluates properties against the four pillars
pub struct PillarEvaluator<'a> {
    probes: &'a dyn Probes,
    policy: ProbePolicy,
}

impl<'a> PillarEvaluator<'a> {
    pub fn new(probes: &'a dyn Probes, policy: ProbePolicy) -> Self {
        Self { probes, policy }
    }

    /// Evaluate one (property, pillar) pair
    pub fn evaluate(&self, property: &Property, pillar: Pillar) -> PillarResult {
        match pillar {
            Pillar::Availability => self.availability(property),
            Pillar::Accessibility => self.accessibility(property),
            Pillar::Linkability => self.linkability(property),
            Pillar::License => self.license(property),
        }
    }

    /// Evaluate a property under every pillar, in [`Pillar::ALL`] order
    pub fn evaluate_all(&self, property: &Property) -> Vec<PillarResult> {
        Pillar::ALL
            .iter()
            .map(|pillar| self.evaluate(property, *pillar))
            .collect()
    }

    fn availability(&self, property: &Property) -> PillarResult {
        if has_value(property.value.as_deref()) {
            PillarResult::new(property, Pillar::Availability, PillarState::Valid, "Valid: has value")
        } else {
            PillarResult::new(
                property,
                Pillar::Availability,
                PillarState::NotValid,
                "Not Valid: empty/null",
            )
        }
    }

    fn accessibility(&self, property: &Property) -> PillarResult {
        let pillar = Pillar::Accessibility;
        if !property.declared_type.is_url() {
            return PillarResult::new(property, pillar, PillarState::Inapplicable, "Inapplicable (not URL)");
        }
        if !self.policy.check_accessibility {
            return PillarResult::new(
                property,
                pillar,
                PillarState::Inapplicable,
                "Skipped: accessibility check disabled by configuration",
            )
            .skipped();
        }

        let url = property.value.as_deref().map(str::trim).unwrap_or("");
        match self.probes.reachable(url) {
            Ok(status) => PillarResult::new(
                property,
                pillar,
                PillarState::Valid,
                format!("Valid: HTTP {}", status),
            ),
            Err(e) => {
                debug!("Accessibility probe failed for {}: {}", url, e);
                PillarResult::new(property, pillar, PillarState::NotValid, format!("Not Valid: {}", e))
            }
        }
    }

    fn linkability(&self, property: &Property) -> PillarResult {
        let pillar = Pillar::Linkability;
        match property.declared_type {
            PropertyType::ResourceOnto => {
                let source = property.ontology_source.as_deref().unwrap_or("ontology");
                PillarResult::new(
                    property,
                    pillar,
                    PillarState::Valid,
                    format!("Valid: linked to {}", source),
                )
            }
            PropertyType::ResourceInternal => PillarResult::new(
                property,
                pillar,
                PillarState::NotValid,
                format!("Not Valid: internal resource {}", property.id),
            ),
            _ => PillarResult::new(
                property,
                pillar,
                PillarState::Inapplicable,
                "Inapplicable (not resource)",
            ),
        }
    }

    fn license(&self, property: &Property) -> PillarResult {
        let pillar = Pillar::License;
        if property.declared_type != PropertyType::UrlRepo {
            return PillarResult::new(
                property,
                pillar,
                PillarState::Inapplicable,
                "Inapplicable (not repo URL)",
            );
        }
        if !self.policy.check_licenses {
            return PillarResult::new(
                property,
                pillar,
                PillarState::Inapplicable,
                "Skipped: license check disabled by configuration",
            )
            .skipped();
        }

        let Some(repo) = property.repo.as_ref().filter(|r| r.has_coordinates()) else {
            return PillarResult::new(
                property,
                pillar,
                PillarState::NotValid,
                "Not Valid: no repository coordinates",
            );
        };

        match self.probes.license_of(repo) {
            Ok(Some(name)) => PillarResult::new(
                property,
                pillar,
                PillarState::Valid,
                format!("Valid: license {}", name),
            )
            .with_license(name),
            Ok(None) => PillarResult::new(
                property,
                pillar,
                PillarState::NotValid,
                "Not Valid: no license found",
            ),
            Err(e) => {
                debug!("License probe failed for {}: {}", repo.url, e);
                PillarResult::new(
                    property,
                    pillar,
                    PillarState::NotValid,
                    format!("Not Valid: license lookup failed ({})", e),
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RepoHost, RepoRef};
    use crate::probes::{ProbeError, StaticProbes};

    const REPO_URL: &str = "https://github.com/acme/tool";

    fn property(declared_type: PropertyType, value: Option<&str>) -> Property {
        let repo = (declared_type == PropertyType::UrlRepo).then(|| RepoRef {
            host: RepoHost::GitHub,
            owner: Some("acme".into()),
            name: Some("tool".into()),
            url: value.unwrap_or_default().to_string(),
        });
        Property {
            id: "R1".into(),
            predicate_id: "P1".into(),
            predicate_label: "source code".into(),
            value: value.map(str::to_string),
            declared_type,
            repo,
            ontology_source: (declared_type == PropertyType::ResourceOnto)
                .then(|| "wikidata".to_string()),
        }
    }

    #[test]
    fn test_availability() {
        let probes = StaticProbes::new();
        let eval = PillarEvaluator::new(&probes, ProbePolicy::default());

        let r = eval.evaluate(&property(PropertyType::Literal, Some("x")), Pillar::Availability);
        assert_eq!(r.state, PillarState::Valid);

        for empty in [None, Some(""), Some("   "), Some("N/A"), Some("null"), Some("None")] {
            let r = eval.evaluate(&property(PropertyType::Literal, empty), Pillar::Availability);
            assert_eq!(r.state, PillarState::NotValid, "value {:?}", empty);
            assert_eq!(r.score, 0.0);
        }
    }

    #[test]
    fn test_accessibility_rules() {
        let probes = StaticProbes::new()
            .with_status("https://ok.org", 200)
            .with_status("https://gone.org", 404)
            .with_reach_error("https://slow.org", ProbeError::Timeout);
        let eval = PillarEvaluator::new(&probes, ProbePolicy::default());

        let r = eval.evaluate(&property(PropertyType::UrlOther, Some("https://ok.org")), Pillar::Accessibility);
        assert_eq!((r.state, r.score), (PillarState::Valid, 100.0));
        assert_eq!(r.reason, "Valid: HTTP 200");

        let r = eval.evaluate(&property(PropertyType::UrlOther, Some("https://gone.org")), Pillar::Accessibility);
        assert_eq!((r.state, r.score), (PillarState::NotValid, 0.0));
        assert_eq!(r.reason, "Not Valid: HTTP 404");

        let r = eval.evaluate(&property(PropertyType::UrlOther, Some("https://slow.org")), Pillar::Accessibility);
        assert_eq!(r.state, PillarState::NotValid);
        assert_eq!(r.reason, "Not Valid: timed out");

        let r = eval.evaluate(&property(PropertyType::ResourceOnto, Some("x")), Pillar::Accessibility);
        assert_eq!((r.state, r.score), (PillarState::Inapplicable, 100.0));
        assert_eq!(probes.reachability_calls(), 3);
    }

    #[test]
    fn test_linkability_rules() {
        let probes = StaticProbes::new();
        let eval = PillarEvaluator::new(&probes, ProbePolicy::default());

        let r = eval.evaluate(&property(PropertyType::ResourceOnto, Some("Q42")), Pillar::Linkability);
        assert_eq!(r.state, PillarState::Valid);
        assert_eq!(r.reason, "Valid: linked to wikidata");

        let r = eval.evaluate(&property(PropertyType::ResourceInternal, Some("x")), Pillar::Linkability);
        assert_eq!((r.state, r.score), (PillarState::NotValid, 0.0));

        let r = eval.evaluate(&property(PropertyType::UrlRepo, Some(REPO_URL)), Pillar::Linkability);
        assert_eq!(r.state, PillarState::Inapplicable);
    }

    #[test]
    fn test_license_rules() {
        let probes = StaticProbes::new().with_license(REPO_URL, Some("MIT License"));
        let eval = PillarEvaluator::new(&probes, ProbePolicy::default());

        let r = eval.evaluate(&property(PropertyType::UrlRepo, Some(REPO_URL)), Pillar::License);
        assert_eq!(r.state, PillarState::Valid);
        assert_eq!(r.license_name.as_deref(), Some("MIT License"));

        let r = eval.evaluate(&property(PropertyType::UrlOther, Some("https://x.org")), Pillar::License);
        assert_eq!(r.state, PillarState::Inapplicable);
        assert_eq!(probes.license_calls(), 1);

        let unlicensed = StaticProbes::new().with_license(REPO_URL, None);
        let eval = PillarEvaluator::new(&unlicensed, ProbePolicy::default());
        let r = eval.evaluate(&property(PropertyType::UrlRepo, Some(REPO_URL)), Pillar::License);
        assert_eq!((r.state, r.score), (PillarState::NotValid, 0.0));

        let failing = StaticProbes::new()
            .with_license_error(REPO_URL, ProbeError::Unsupported("gitlab".into()));
        let eval = PillarEvaluator::new(&failing, ProbePolicy::default());
        let r = eval.evaluate(&property(PropertyType::UrlRepo, Some(REPO_URL)), Pillar::License);
        assert_eq!(r.state, PillarState::NotValid);
        assert!(r.reason.contains("unsupported host"));
    }

    #[test]
    fn test_license_needs_repository_coordinates() {
        let probes = StaticProbes::new();
        let eval = PillarEvaluator::new(&probes, ProbePolicy::default());

        let mut owner_only = property(PropertyType::UrlRepo, Some("https://github.com/acme"));
        if let Some(repo) = owner_only.repo.as_mut() {
            repo.owner = None;
            repo.name = None;
        }
        let r = eval.evaluate(&owner_only, Pillar::License);
        assert_eq!(r.state, PillarState::NotValid);
        assert_eq!(r.reason, "Not Valid: no repository coordinates");

        let mut no_repo = property(PropertyType::UrlRepo, Some(REPO_URL));
        no_repo.repo = None;
        let r = eval.evaluate(&no_repo, Pillar::License);
        assert_eq!(r.reason, "Not Valid: no repository coordinates");
        assert_eq!(probes.license_calls(), 0);
    }

    #[test]
    fn test_skip_flags_are_independent() {
        let probes = StaticProbes::new()
            .with_status(REPO_URL, 200)
            .with_license(REPO_URL, None);
        let repo = property(PropertyType::UrlRepo, Some(REPO_URL));

        let policy = ProbePolicy {
            check_accessibility: true,
            check_licenses: false,
        };
        let eval = PillarEvaluator::new(&probes, policy);
        let access = eval.evaluate(&repo, Pillar::Accessibility);
        let license = eval.evaluate(&repo, Pillar::License);
        assert_eq!(access.state, PillarState::Valid);
        assert!(!access.probe_skipped);
        assert_eq!(license.state, PillarState::Inapplicable);
        assert!(license.probe_skipped);
        assert_eq!(license.score, 100.0);
        assert_eq!(probes.license_calls(), 0);

        let policy = ProbePolicy {
            check_accessibility: false,
            check_licenses: true,
        };
        let eval = PillarEvaluator::new(&probes, policy);
        let access = eval.evaluate(&repo, Pillar::Accessibility);
        let license = eval.evaluate(&repo, Pillar::License);
        assert!(access.probe_skipped);
        assert_eq!(license.state, PillarState::NotValid);
        assert!(!license.probe_skipped);
        assert_eq!(probes.reachability_calls(), 1);
    }

    #[test]
    fn test_score_matches_state() {
        let probes = StaticProbes::new().with_status("https://ok.org", 204);
        let eval = PillarEvaluator::new(&probes, ProbePolicy::default());
        let props = [
            property(PropertyType::UrlRepo, Some(REPO_URL)),
            property(PropertyType::UrlOther, Some("https://ok.org")),
            property(PropertyType::ResourceOnto, Some("x")),
            property(PropertyType::ResourceInternal, None),
            property(PropertyType::Literal, Some("")),
        ];
        for prop in &props {
            for result in eval.evaluate_all(prop) {
                match result.state {
                    PillarState::Valid | PillarState::Inapplicable => assert_eq!(result.score, 100.0),
                    PillarState::NotValid => assert_eq!(result.score, 0.0),
                }
            }
        }
    }
}
