//! Property classifier
//!
//! Assigns every raw property exactly one [`PropertyType`]:
//!
//! ```text
//! value starts with http(s)://  ->  url_repo  (known code/data host)
//!                               ->  url_other
//! resource reference            ->  resource_onto     (known ontology prefix)
//!                               ->  resource_internal
//! anything else                 ->  literal
//! ```
//!
//! Matching is case-insensitive pattern/substring matching on the raw
//! string, never full URL parsing. Classification has no error path:
//! shapes that match nothing fall through to `literal`.

mod distribution;

pub use distribution::PropertyDistribution;

use crate::config::ClassifierConfig;
use crate::models::{Property, PropertyType, RepoHost, RepoRef};
use regex::Regex;
use std::sync::OnceLock;

/// Ontology / vocabulary prefixes and the source they map to
pub const ONTOLOGY_PREFIXES: &[(&str, &str)] = &[
    ("wikidata:", "wikidata"),
    ("wd:", "wikidata"),
    ("http://www.wikidata.org/", "wikidata"),
    ("https://www.wikidata.org/", "wikidata"),
    ("http://purl.obolibrary.org/obo/", "obo"),
    ("https://purl.obolibrary.org/obo/", "obo"),
    ("obo:", "obo"),
    ("http://purl.org/", "purl"),
    ("https://purl.org/", "purl"),
    ("http://www.w3.org/", "w3"),
    ("https://www.w3.org/", "w3"),
    ("http://schema.org/", "schema.org"),
    ("https://schema.org/", "schema.org"),
    ("http://dbpedia.org/", "dbpedia"),
    ("https://dbpedia.org/", "dbpedia"),
    ("doi:", "doi"),
    ("orcid:", "orcid"),
];

/// How a repository pattern's capture groups map onto a [`RepoRef`]
#[derive(Clone, Copy)]
enum Captures {
    /// group 1 = owner, group 2 = repository name
    OwnerName,
    /// group 1 = record identifier
    Record,
    /// host recognised, no coordinates
    HostOnly,
}

struct RepoPattern {
    regex: Regex,
    host: RepoHost,
    captures: Captures,
}

fn repo_patterns() -> &'static [RepoPattern] {
    static PATTERNS: OnceLock<Vec<RepoPattern>> = OnceLock::new();

    PATTERNS.get_or_init(|| {
        let owner_name = |pattern: &str, host: RepoHost| RepoPattern {
            regex: Regex::new(pattern).expect("valid regex"),
            host,
            captures: Captures::OwnerName,
        };
        let record = |pattern: &str, host: RepoHost| RepoPattern {
            regex: Regex::new(pattern).expect("valid regex"),
            host,
            captures: Captures::Record,
        };
        let host_only = |pattern: &str, host: RepoHost| RepoPattern {
            regex: Regex::new(pattern).expect("valid regex"),
            host,
            captures: Captures::HostOnly,
        };

        vec![
            owner_name(r"(?i)github\.com/([^/\s?#]+)/([^/\s?#]+)", RepoHost::GitHub),
            owner_name(r"(?i)gitlab\.com/([^/\s?#]+)/([^/\s?#]+)", RepoHost::GitLab),
            owner_name(r"(?i)bitbucket\.org/([^/\s?#]+)/([^/\s?#]+)", RepoHost::Bitbucket),
            owner_name(r"(?i)huggingface\.co/([^/\s?#]+)/([^/\s?#]+)", RepoHost::HuggingFace),
            record(r"(?i)zenodo\.org/records?/(\d+)", RepoHost::Zenodo),
            record(r"(?i)doi\.org/10\.5281/zenodo\.(\d+)", RepoHost::Zenodo),
            record(
                r"(?i)figshare\.com/articles/(?:[^/\s?#]+/)*?(\d+)(?:[/?#\s]|$)",
                RepoHost::Figshare,
            ),
            record(r"(?i)doi\.org/10\.6084/m9\.figshare\.(\d+)", RepoHost::Figshare),
            record(r"(?i)osf\.io/([a-z0-9]{5})(?:[/?#\s]|$)", RepoHost::Osf),
            host_only(r"(?i)github\.com", RepoHost::GitHub),
            host_only(r"(?i)gitlab\.com", RepoHost::GitLab),
            host_only(r"(?i)bitbucket\.org", RepoHost::Bitbucket),
            host_only(r"(?i)zenodo\.org", RepoHost::Zenodo),
            host_only(r"(?i)figshare\.com", RepoHost::Figshare),
            host_only(r"(?i)osf\.io", RepoHost::Osf),
        ]
    })
}

/// Outcome of classifying one raw value
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub declared_type: PropertyType,
    pub repo: Option<RepoRef>,
    pub ontology_source: Option<String>,
}

impl Classification {
    fn of(declared_type: PropertyType) -> Self {
        Self {
            declared_type,
            repo: None,
            ontology_source: None,
        }
    }
}

/// Raw property fields the classifier needs
#[derive(Debug, Clone, Copy, Default)]
pub struct RawValue<'a> {
    pub value: Option<&'a str>,
    pub object_id: &'a str,
    /// The source record marks this value as a knowledge-graph resource
    pub is_resource: bool,
}

/// Classifies property values against the built-in host and ontology
/// lists plus any configured additions.
#[derive(Debug, Clone, Default)]
pub struct PropertyClassifier {
    extra_repo_hosts: Vec<String>,
    extra_ontology_prefixes: Vec<String>,
}

impl PropertyClassifier {
    pub fn new(config: &ClassifierConfig) -> Self {
        let lower = |items: &[String]| -> Vec<String> {
            items
                .iter()
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect()
        };
        Self {
            extra_repo_hosts: lower(&config.repo_hosts),
            extra_ontology_prefixes: lower(&config.ontology_prefixes),
        }
    }

    /// Assign exactly one type to a raw value
    pub fn classify(&self, raw: RawValue<'_>) -> Classification {
        let value = raw.value.map(str::trim).unwrap_or("");

        if is_http_url(value) {
            return match self.repo_ref(value) {
                Some(repo) => Classification {
                    declared_type: PropertyType::UrlRepo,
                    repo: Some(repo),
                    ontology_source: None,
                },
                None => Classification::of(PropertyType::UrlOther),
            };
        }

        if raw.is_resource {
            return match self.ontology_source(raw.object_id, value) {
                Some(source) => Classification {
                    declared_type: PropertyType::ResourceOnto,
                    repo: None,
                    ontology_source: Some(source),
                },
                None => Classification::of(PropertyType::ResourceInternal),
            };
        }

        Classification::of(PropertyType::Literal)
    }

    /// Build a [`Property`] from a classified raw value
    pub fn classify_property(
        &self,
        id: String,
        predicate_id: String,
        predicate_label: String,
        raw: RawValue<'_>,
    ) -> Property {
        let classification = self.classify(raw);
        Property {
            id,
            predicate_id,
            predicate_label,
            value: raw.value.map(str::to_string),
            declared_type: classification.declared_type,
            repo: classification.repo,
            ontology_source: classification.ontology_source,
        }
    }

    /// Repository coordinates if the URL points at a known hosting service
    pub fn repo_ref(&self, url: &str) -> Option<RepoRef> {
        for pattern in repo_patterns() {
            let Some(caps) = pattern.regex.captures(url) else {
                continue;
            };
            let group = |i: usize| caps.get(i).map(|m| m.as_str().to_string());
            let (owner, name) = match pattern.captures {
                Captures::OwnerName => (group(1), group(2).map(strip_git_suffix)),
                Captures::Record => (None, group(1)),
                Captures::HostOnly => (None, None),
            };
            return Some(RepoRef {
                host: pattern.host.clone(),
                owner,
                name,
                url: url.to_string(),
            });
        }

        let lower = url.to_lowercase();
        self.extra_repo_hosts
            .iter()
            .find(|host| lower.contains(host.as_str()))
            .map(|host| RepoRef {
                host: RepoHost::Other(host.clone()),
                owner: None,
                name: None,
                url: url.to_string(),
            })
    }

    /// Ontology source when the object id or value carries a known prefix
    pub fn ontology_source(&self, object_id: &str, value: &str) -> Option<String> {
        let id = object_id.to_lowercase();
        let value = value.to_lowercase();

        for (prefix, source) in ONTOLOGY_PREFIXES {
            if id.contains(prefix) || value.contains(prefix) {
                return Some(source.to_string());
            }
        }

        self.extra_ontology_prefixes
            .iter()
            .find(|prefix| id.contains(prefix.as_str()) || value.contains(prefix.as_str()))
            .cloned()
    }
}

fn is_http_url(value: &str) -> bool {
    let head: String = value.chars().take(8).collect::<String>().to_ascii_lowercase();
    head.starts_with("http://") || head.starts_with("https://")
}

fn strip_git_suffix(name: String) -> String {
    match name.strip_suffix(".git") {
        Some(stripped) => stripped.to_string(),
        None => name,
    }
}
