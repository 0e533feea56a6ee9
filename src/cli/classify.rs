//! Classify command - property type distribution and sampling balance

use super::resolve_config;
use crate::classify::{PropertyClassifier, PropertyDistribution};
use crate::input::load_input;
use crate::models::PropertyType;
use anyhow::{Context, Result};
use console::style;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct ClassifyReport<'a> {
    #[serde(flatten)]
    distribution: &'a PropertyDistribution,
    min_per_type: usize,
    balanced: bool,
    needed_types: Vec<PropertyType>,
    skipped: usize,
}

/// Run the classify command
pub(super) fn run(
    input: &Path,
    min_per_type: Option<usize>,
    format: &str,
    config_path: Option<&Path>,
) -> Result<()> {
    let config = resolve_config(input, config_path)?;
    let min_per_type = min_per_type.unwrap_or(config.sampling.min_per_type);

    let classifier = PropertyClassifier::new(&config.classifier);
    let batch = load_input(input, &classifier)
        .with_context(|| format!("Failed to load contributions from {}", input.display()))?;
    let dist = PropertyDistribution::from_contributions(&batch.contributions);

    if format == "json" {
        let report = ClassifyReport {
            distribution: &dist,
            min_per_type,
            balanced: dist.is_balanced(min_per_type),
            needed_types: dist.needed_types(min_per_type),
            skipped: batch.skipped.len(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "\n{} {} contributions, {} properties\n",
        style("Property distribution:").bold(),
        dist.contributions,
        dist.total_properties
    );
    for property_type in PropertyType::ALL {
        let count = dist.count(property_type);
        let mark = if count >= min_per_type {
            style("✓").green()
        } else {
            style("✗").red()
        };
        println!(
            "  {} {:<18} {:>5}  ({:>5.1}%)",
            mark,
            property_type.as_str(),
            count,
            dist.percentage(property_type)
        );
    }

    print_counts("Repository hosts", &dist.repo_hosts);
    print_counts("Ontology sources", &dist.ontology_sources);

    println!();
    let needed = dist.needed_types(min_per_type);
    if needed.is_empty() {
        println!(
            "{} Balanced: every type has at least {} properties",
            style("✓").green(),
            min_per_type
        );
    } else {
        let names: Vec<&str> = needed.iter().map(|t| t.as_str()).collect();
        println!(
            "{} Not balanced (min {} per type). Needs more: {}",
            style("⚠").yellow(),
            min_per_type,
            names.join(", ")
        );
    }
    if !batch.skipped.is_empty() {
        println!(
            "{} {} malformed contributions skipped",
            style("⚠").yellow(),
            batch.skipped.len()
        );
    }

    Ok(())
}

fn print_counts(title: &str, counts: &std::collections::BTreeMap<String, usize>) {
    if counts.is_empty() {
        return;
    }
    let mut entries: Vec<(&String, &usize)> = counts.iter().collect();
    entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    let parts: Vec<String> = entries
        .iter()
        .map(|(name, count)| format!("{} {}", name, count))
        .collect();
    println!("\n  {}: {}", style(title).dim(), parts.join(", "));
}
