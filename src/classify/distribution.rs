//! Property type distribution and sampling balance

use crate::models::{Contribution, PropertyType};
use serde::Serialize;
use std::collections::BTreeMap;

/// How a batch's properties spread over the five declared types
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PropertyDistribution {
    pub contributions: usize,
    pub total_properties: usize,
    pub type_counts: BTreeMap<PropertyType, usize>,
    /// Repository host -> number of `url_repo` properties
    pub repo_hosts: BTreeMap<String, usize>,
    /// Ontology source -> number of `resource_onto` properties
    pub ontology_sources: BTreeMap<String, usize>,
}

impl PropertyDistribution {
    pub fn from_contributions(contributions: &[Contribution]) -> Self {
        let mut dist = Self {
            contributions: contributions.len(),
            type_counts: PropertyType::ALL.iter().map(|t| (*t, 0)).collect(),
            ..Default::default()
        };

        for property in contributions.iter().flat_map(|c| &c.properties) {
            dist.total_properties += 1;
            *dist.type_counts.entry(property.declared_type).or_insert(0) += 1;
            if let Some(repo) = &property.repo {
                *dist.repo_hosts.entry(repo.host.to_string()).or_insert(0) += 1;
            }
            if let Some(source) = &property.ontology_source {
                *dist.ontology_sources.entry(source.clone()).or_insert(0) += 1;
            }
        }
        dist
    }

    pub fn count(&self, property_type: PropertyType) -> usize {
        self.type_counts.get(&property_type).copied().unwrap_or(0)
    }

    /// Share of all properties, 0-100
    pub fn percentage(&self, property_type: PropertyType) -> f64 {
        if self.total_properties == 0 {
            return 0.0;
        }
        100.0 * self.count(property_type) as f64 / self.total_properties as f64
    }

    /// Every type reaches `min_per_type`
    pub fn is_balanced(&self, min_per_type: usize) -> bool {
        self.needed_types(min_per_type).is_empty()
    }

    /// Types still below `min_per_type`
    pub fn needed_types(&self, min_per_type: usize) -> Vec<PropertyType> {
        PropertyType::ALL
            .iter()
            .copied()
            .filter(|t| self.count(*t) < min_per_type)
            .collect()
    }
}
