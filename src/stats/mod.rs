//! Corpus statistics
//!
//! Summaries over all scored contributions plus raw pass rates computed
//! straight from the pillar results, without the Inapplicable = 100 masking
//! that the per-contribution scores apply.

use crate::models::{
    ContributionScore, Pillar, PillarResult, PillarState, PropertyType, SkippedContribution, Tier,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Descriptive statistics of one score series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub count: usize,
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
}

impl SummaryStats {
    /// `None` for an empty series
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        let mid = sorted.len() / 2;
        let median = if sorted.len() % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };

        Some(Self {
            count: values.len(),
            mean,
            std_dev: variance.sqrt(),
            median,
            min: sorted[0],
            max: sorted[sorted.len() - 1],
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierCount {
    pub tier: Tier,
    pub count: usize,
    /// Share of scored contributions, 0-100
    pub percentage: f64,
}

/// Pass rate over the properties a check applies to
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRate {
    pub applicable: usize,
    /// Applicable but not checked because the probe was disabled
    pub skipped: usize,
    pub evaluated: usize,
    pub passed: usize,
    /// `100 * passed / evaluated`; `None` when nothing was evaluated
    pub rate: Option<f64>,
}

impl RawRate {
    fn from_results<'a>(results: impl Iterator<Item = &'a PillarResult>) -> Self {
        let mut rate = RawRate::default();
        for result in results {
            rate.applicable += 1;
            if result.probe_skipped {
                rate.skipped += 1;
            } else if result.state == PillarState::Valid {
                rate.passed += 1;
            }
        }
        rate.evaluated = rate.applicable - rate.skipped;
        rate.rate = (rate.evaluated > 0).then(|| 100.0 * rate.passed as f64 / rate.evaluated as f64);
        rate
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LicenseRate {
    #[serde(flatten)]
    pub rate: RawRate,
    /// Detected license name -> number of repositories
    pub license_types: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRates {
    /// Over url_repo and url_other properties
    pub url_accessibility: RawRate,
    /// Over resource_onto and resource_internal properties
    pub resource_linkability: RawRate,
    /// Over url_repo properties
    pub repo_license: LicenseRate,
    /// Over all properties
    pub availability: RawRate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExcludedContribution {
    pub contribution_id: String,
    pub reason: String,
}

/// Contributions that did not make it into the aggregates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Diagnostics {
    /// Malformed input records
    pub skipped: Vec<SkippedContribution>,
    /// Well-formed contributions without any defined pillar
    pub excluded: Vec<ExcludedContribution>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorpusStatistics {
    pub total_contributions: usize,
    pub scored_contributions: usize,
    pub total_properties: usize,
    pub property_types: BTreeMap<PropertyType, usize>,
    pub pillars: BTreeMap<Pillar, Option<SummaryStats>>,
    pub overall: Option<SummaryStats>,
    pub tiers: Vec<TierCount>,
    pub raw_rates: RawRates,
    pub diagnostics: Diagnostics,
}

impl CorpusStatistics {
    pub fn compute(
        scores: &[ContributionScore],
        results: &[PillarResult],
        skipped: &[SkippedContribution],
    ) -> Self {
        let scored: Vec<&ContributionScore> = scores.iter().filter(|s| s.is_scored()).collect();

        let pillars = Pillar::ALL
            .iter()
            .map(|pillar| {
                let values: Vec<f64> = scored.iter().filter_map(|s| s.pillar(*pillar)).collect();
                (*pillar, SummaryStats::from_values(&values))
            })
            .collect();

        let overall_values: Vec<f64> = scored.iter().filter_map(|s| s.overall_score).collect();

        let tiers = Tier::ALL
            .iter()
            .map(|tier| {
                let count = scored.iter().filter(|s| s.tier == Some(*tier)).count();
                let percentage = if scored.is_empty() {
                    0.0
                } else {
                    100.0 * count as f64 / scored.len() as f64
                };
                TierCount {
                    tier: *tier,
                    count,
                    percentage,
                }
            })
            .collect();

        // Every property yields exactly one Availability result
        let mut property_types: BTreeMap<PropertyType, usize> =
            PropertyType::ALL.iter().map(|t| (*t, 0)).collect();
        let mut total_properties = 0;
        for result in results.iter().filter(|r| r.pillar == Pillar::Availability) {
            *property_types.entry(result.declared_type).or_insert(0) += 1;
            total_properties += 1;
        }

        let excluded = scores
            .iter()
            .filter(|s| !s.is_scored())
            .map(|s| ExcludedContribution {
                contribution_id: s.contribution_id.clone(),
                reason: s
                    .excluded_reason
                    .clone()
                    .unwrap_or_else(|| "no defined pillar".to_string()),
            })
            .collect();

        Self {
            total_contributions: scores.len(),
            scored_contributions: scored.len(),
            total_properties,
            property_types,
            pillars,
            overall: SummaryStats::from_values(&overall_values),
            tiers,
            raw_rates: raw_rates(results),
            diagnostics: Diagnostics {
                skipped: skipped.to_vec(),
                excluded,
            },
        }
    }

    pub fn pillar(&self, pillar: Pillar) -> Option<&SummaryStats> {
        self.pillars.get(&pillar).and_then(Option::as_ref)
    }

    pub fn tier_count(&self, tier: Tier) -> usize {
        self.tiers
            .iter()
            .find(|t| t.tier == tier)
            .map(|t| t.count)
            .unwrap_or(0)
    }
}

fn raw_rates(results: &[PillarResult]) -> RawRates {
    let of = |pillar: Pillar, applies: fn(PropertyType) -> bool| {
        results
            .iter()
            .filter(move |r| r.pillar == pillar && applies(r.declared_type))
    };

    let mut license_types = BTreeMap::new();
    for result in of(Pillar::License, |t| t == PropertyType::UrlRepo) {
        if let (PillarState::Valid, Some(name)) = (result.state, result.license_name.as_ref()) {
            *license_types.entry(name.clone()).or_insert(0) += 1;
        }
    }

    RawRates {
        url_accessibility: RawRate::from_results(of(Pillar::Accessibility, |t| t.is_url())),
        resource_linkability: RawRate::from_results(of(Pillar::Linkability, |t| t.is_resource())),
        repo_license: LicenseRate {
            rate: RawRate::from_results(of(Pillar::License, |t| t == PropertyType::UrlRepo)),
            license_types,
        },
        availability: RawRate::from_results(of(Pillar::Availability, |_| true)),
    }
}
