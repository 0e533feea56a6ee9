//! Core data models for reproscore
//!
//! These models are shared by the classifier, the scoring engine, the
//! statistics engine and the reporters.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Semantic type assigned to a property by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyType {
    UrlRepo,
    UrlOther,
    ResourceOnto,
    ResourceInternal,
    Literal,
}

impl PropertyType {
    pub const ALL: [PropertyType; 5] = [
        PropertyType::UrlRepo,
        PropertyType::UrlOther,
        PropertyType::ResourceOnto,
        PropertyType::ResourceInternal,
        PropertyType::Literal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::UrlRepo => "url_repo",
            PropertyType::UrlOther => "url_other",
            PropertyType::ResourceOnto => "resource_onto",
            PropertyType::ResourceInternal => "resource_internal",
            PropertyType::Literal => "literal",
        }
    }

    pub fn is_url(&self) -> bool {
        matches!(self, PropertyType::UrlRepo | PropertyType::UrlOther)
    }

    pub fn is_resource(&self) -> bool {
        matches!(self, PropertyType::ResourceOnto | PropertyType::ResourceInternal)
    }
}

impl std::fmt::Display for PropertyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Known code/data hosting services
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepoHost {
    GitHub,
    GitLab,
    Bitbucket,
    HuggingFace,
    Zenodo,
    Figshare,
    Osf,
    /// A host added through `[classifier].repo_hosts`
    Other(String),
}

impl std::fmt::Display for RepoHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RepoHost::GitHub => write!(f, "github"),
            RepoHost::GitLab => write!(f, "gitlab"),
            RepoHost::Bitbucket => write!(f, "bitbucket"),
            RepoHost::HuggingFace => write!(f, "huggingface"),
            RepoHost::Zenodo => write!(f, "zenodo"),
            RepoHost::Figshare => write!(f, "figshare"),
            RepoHost::Osf => write!(f, "osf"),
            RepoHost::Other(host) => write!(f, "{}", host),
        }
    }
}

/// Repository coordinates extracted from a `url_repo` value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRef {
    pub host: RepoHost,
    /// Owner / namespace (absent for record-style hosts such as Zenodo)
    pub owner: Option<String>,
    /// Repository name or record identifier
    pub name: Option<String>,
    /// The original URL
    pub url: String,
}

impl RepoRef {
    /// True when the coordinates are enough for a license lookup: owner and
    /// name on forge hosts, a record identifier elsewhere
    pub fn has_coordinates(&self) -> bool {
        match self.host {
            RepoHost::GitHub | RepoHost::GitLab | RepoHost::Bitbucket | RepoHost::HuggingFace => {
                self.owner.is_some() && self.name.is_some()
            }
            _ => self.name.is_some(),
        }
    }
}

/// A classified property of a contribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: String,
    pub predicate_id: String,
    pub predicate_label: String,
    pub value: Option<String>,
    pub declared_type: PropertyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo: Option<RepoRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ontology_source: Option<String>,
}

/// The unit of scoring: a contribution and the properties it owns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub id: String,
    #[serde(default)]
    pub paper_id: String,
    #[serde(default)]
    pub paper_title: String,
    pub properties: Vec<Property>,
}

/// The four reproducibility pillars
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Pillar {
    Availability,
    Accessibility,
    Linkability,
    License,
}

impl Pillar {
    pub const ALL: [Pillar; 4] = [
        Pillar::Availability,
        Pillar::Accessibility,
        Pillar::Linkability,
        Pillar::License,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Pillar::Availability => "Availability",
            Pillar::Accessibility => "Accessibility",
            Pillar::Linkability => "Linkability",
            Pillar::License => "License",
        }
    }
}

impl std::fmt::Display for Pillar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Pillar::Availability => write!(f, "availability"),
            Pillar::Accessibility => write!(f, "accessibility"),
            Pillar::Linkability => write!(f, "linkability"),
            Pillar::License => write!(f, "license"),
        }
    }
}

/// Outcome of one pillar check on one property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PillarState {
    Valid,
    Inapplicable,
    NotValid,
}

impl PillarState {
    /// Valid and Inapplicable score 100, NotValid scores 0.
    pub fn score(&self) -> f64 {
        match self {
            PillarState::Valid | PillarState::Inapplicable => 100.0,
            PillarState::NotValid => 0.0,
        }
    }
}

impl std::fmt::Display for PillarState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PillarState::Valid => write!(f, "valid"),
            PillarState::Inapplicable => write!(f, "inapplicable"),
            PillarState::NotValid => write!(f, "not_valid"),
        }
    }
}

/// Result of evaluating one (property, pillar) pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PillarResult {
    pub contribution_id: String,
    pub property_id: String,
    /// Position of the property within its contribution
    #[serde(default)]
    pub property_index: usize,
    pub pillar: Pillar,
    pub declared_type: PropertyType,
    pub state: PillarState,
    pub score: f64,
    pub reason: String,
    /// The check applied but was disabled by configuration
    #[serde(default)]
    pub probe_skipped: bool,
    /// License detected by the license probe (License pillar only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_name: Option<String>,
}

impl PillarResult {
    pub fn new(
        property: &Property,
        pillar: Pillar,
        state: PillarState,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            contribution_id: String::new(),
            property_id: property.id.clone(),
            property_index: 0,
            pillar,
            declared_type: property.declared_type,
            state,
            score: state.score(),
            reason: reason.into(),
            probe_skipped: false,
            license_name: None,
        }
    }

    pub fn skipped(mut self) -> Self {
        self.probe_skipped = true;
        self
    }

    pub fn with_license(mut self, name: impl Into<String>) -> Self {
        self.license_name = Some(name.into());
        self
    }

    pub fn for_contribution(mut self, contribution_id: &str) -> Self {
        self.contribution_id = contribution_id.to_string();
        self
    }

    pub fn at_property(mut self, index: usize) -> Self {
        self.property_index = index;
        self
    }
}

/// Coarse quality band derived from the overall score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::Excellent, Tier::Good, Tier::Fair, Tier::Poor];

    /// Lower bounds are inclusive: 80.0 is Excellent, 60.0 Good, 40.0 Fair.
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 80.0 => Tier::Excellent,
            s if s >= 60.0 => Tier::Good,
            s if s >= 40.0 => Tier::Fair,
            _ => Tier::Poor,
        }
    }

    pub fn band(&self) -> &'static str {
        match self {
            Tier::Excellent => "≥80%",
            Tier::Good => "60-79%",
            Tier::Fair => "40-59%",
            Tier::Poor => "<40%",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Excellent => write!(f, "Excellent"),
            Tier::Good => write!(f, "Good"),
            Tier::Fair => write!(f, "Fair"),
            Tier::Poor => write!(f, "Poor"),
        }
    }
}

/// Per-contribution score record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributionScore {
    pub contribution_id: String,
    #[serde(default)]
    pub paper_id: String,
    #[serde(default)]
    pub paper_title: String,
    pub num_properties: usize,
    /// `None` marks a pillar with no results (undefined for this contribution)
    pub pillar_scores: BTreeMap<Pillar, Option<f64>>,
    pub overall_score: Option<f64>,
    pub tier: Option<Tier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excluded_reason: Option<String>,
}

impl ContributionScore {
    pub fn pillar(&self, pillar: Pillar) -> Option<f64> {
        self.pillar_scores.get(&pillar).copied().flatten()
    }

    pub fn is_scored(&self) -> bool {
        self.overall_score.is_some()
    }
}

/// A contribution record that could not be turned into a [`Contribution`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedContribution {
    /// Position in the input `contributions` array
    pub index: usize,
    pub contribution_id: Option<String>,
    pub reason: String,
}
