//! Text (terminal) reporter with colors and formatting

use crate::models::{ContributionScore, Pillar, Tier};
use crate::pipeline::EvaluationRun;
use crate::stats::{RawRate, SummaryStats};
use anyhow::Result;

/// Number of lowest-scoring contributions listed
const WORST_SHOWN: usize = 5;

/// Tier colors (ANSI escape codes)
fn tier_color(tier: Tier) -> &'static str {
    match tier {
        Tier::Excellent => "\x1b[32m", // Green
        Tier::Good => "\x1b[92m",      // Light green
        Tier::Fair => "\x1b[33m",      // Yellow
        Tier::Poor => "\x1b[31m",      // Red
    }
}

/// Reset ANSI color
const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";

/// Render a run as formatted terminal output
pub fn render(run: &EvaluationRun) -> Result<String> {
    let stats = &run.statistics;
    let mut out = String::new();

    // Header
    out.push_str(&format!("\n{BOLD}Reproducibility Evaluation{RESET}\n"));
    out.push_str(&format!(
        "{DIM}──────────────────────────────────────{RESET}\n"
    ));
    match stats.overall.as_ref() {
        Some(overall) => {
            let tier = Tier::from_score(overall.mean);
            out.push_str(&format!(
                "Mean score: {BOLD}{:.1}/100{RESET}  Tier: {}{BOLD}{}{RESET}  ",
                overall.mean,
                tier_color(tier),
                tier
            ));
        }
        None => out.push_str("Mean score: n/a  "),
    }
    out.push_str(&format!(
        "Contributions: {}  Scored: {}  Properties: {}\n",
        stats.total_contributions, stats.scored_contributions, stats.total_properties
    ));
    let types: Vec<String> = stats
        .property_types
        .iter()
        .filter(|(_, count)| **count > 0)
        .map(|(t, count)| format!("{} {}", count, t))
        .collect();
    if !types.is_empty() {
        out.push_str(&format!("{DIM}  {}{RESET}\n", types.join(" | ")));
    }
    out.push('\n');

    // Pillar table
    out.push_str(&format!("{BOLD}PILLAR SCORES{RESET}\n"));
    out.push_str(&format!(
        "{DIM}  {:<15} {:>8} {:>8} {:>8} {:>12}{RESET}\n",
        "PILLAR", "MEAN", "STD", "MEDIAN", "RANGE"
    ));
    for pillar in Pillar::ALL {
        out.push_str(&summary_line(pillar.label(), stats.pillar(pillar)));
    }
    out.push_str(&summary_line("Overall", stats.overall.as_ref()));
    out.push('\n');

    // Tiers
    out.push_str(&format!("{BOLD}TIERS{RESET}\n"));
    for tier in &stats.tiers {
        out.push_str(&format!(
            "  {}{:<10}{RESET} {DIM}{:<7}{RESET} {:>4}  ({:.1}%)\n",
            tier_color(tier.tier),
            tier.tier.to_string(),
            tier.tier.band(),
            tier.count,
            tier.percentage
        ));
    }
    out.push('\n');

    // Raw rates
    let rates = &stats.raw_rates;
    out.push_str(&format!("{BOLD}DETAILED ANALYSIS{RESET}\n"));
    out.push_str(&rate_line("Availability", &rates.availability));
    out.push_str(&rate_line("URL accessibility", &rates.url_accessibility));
    out.push_str(&rate_line("Resource linkability", &rates.resource_linkability));
    out.push_str(&rate_line("Repository license", &rates.repo_license.rate));

    let mut licenses: Vec<(&String, &usize)> = rates.repo_license.license_types.iter().collect();
    licenses.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));
    if !licenses.is_empty() {
        let top: Vec<String> = licenses
            .iter()
            .take(5)
            .map(|(name, count)| format!("{} ({})", name, count))
            .collect();
        out.push_str(&format!("  {DIM}Top licenses: {}{RESET}\n", top.join(", ")));
    }
    out.push('\n');

    // Lowest scoring contributions
    let mut scored: Vec<&ContributionScore> = run.scores.iter().filter(|s| s.is_scored()).collect();
    scored.sort_by(|a, b| {
        a.overall_score
            .unwrap_or(0.0)
            .total_cmp(&b.overall_score.unwrap_or(0.0))
            .then_with(|| a.contribution_id.cmp(&b.contribution_id))
    });
    if !scored.is_empty() {
        out.push_str(&format!("{BOLD}LOWEST SCORING{RESET}\n"));
        out.push_str(&format!(
            "{DIM}  {:<12} {:>4} {:>7} {:>7} {:>7} {:>7} {:>8}  TIER{RESET}\n",
            "ID", "#", "AVAIL", "ACCESS", "LINK", "LIC", "OVERALL"
        ));
        for score in scored.iter().take(WORST_SHOWN) {
            out.push_str(&contribution_line(score));
        }
        out.push('\n');
    }

    // Diagnostics
    let diag = &stats.diagnostics;
    if !diag.skipped.is_empty() || !diag.excluded.is_empty() {
        out.push_str(&format!("{BOLD}DIAGNOSTICS{RESET}\n"));
        for skipped in &diag.skipped {
            out.push_str(&format!(
                "  \x1b[33mskipped{RESET} #{} {}: {}\n",
                skipped.index,
                skipped.contribution_id.as_deref().unwrap_or("(no id)"),
                skipped.reason
            ));
        }
        for excluded in &diag.excluded {
            out.push_str(&format!(
                "  {DIM}excluded{RESET} {}: {}\n",
                excluded.contribution_id, excluded.reason
            ));
        }
        out.push('\n');
    }

    Ok(out)
}

fn summary_line(label: &str, summary: Option<&SummaryStats>) -> String {
    match summary {
        Some(s) => format!(
            "  {:<15} {} {:>8.1} {:>8.1} {:>12}\n",
            label,
            format_score(s.mean),
            s.std_dev,
            s.median,
            format!("{:.0}-{:.0}", s.min, s.max)
        ),
        None => format!("  {:<15} {DIM}{:>8}{RESET}\n", label, "n/a"),
    }
}

fn rate_line(label: &str, rate: &RawRate) -> String {
    let pct = match rate.rate {
        Some(r) => format!("{:.1}%", r),
        None => "n/a".to_string(),
    };
    let mut line = format!(
        "  {:<22} {}/{} ({})",
        label, rate.passed, rate.evaluated, pct
    );
    if rate.skipped > 0 {
        line.push_str(&format!(" {DIM}{} skipped{RESET}", rate.skipped));
    }
    line.push('\n');
    line
}

fn contribution_line(score: &ContributionScore) -> String {
    let cell = |s: Option<f64>| s.map(|v| format!("{:.1}", v)).unwrap_or_else(|| "-".into());
    let id: String = score.contribution_id.chars().take(12).collect();
    let tier = score.tier.map(|t| format!("{}{}{RESET}", tier_color(t), t)).unwrap_or_default();
    format!(
        "  {:<12} {:>4} {:>7} {:>7} {:>7} {:>7} {:>8}  {}\n",
        id,
        score.num_properties,
        cell(score.pillar(Pillar::Availability)),
        cell(score.pillar(Pillar::Accessibility)),
        cell(score.pillar(Pillar::Linkability)),
        cell(score.pillar(Pillar::License)),
        cell(score.overall_score),
        tier
    )
}

/// Right-aligned score, colored by band
fn format_score(score: f64) -> String {
    let color = if score >= 80.0 {
        "\x1b[32m"
    } else if score >= 60.0 {
        "\x1b[33m"
    } else {
        "\x1b[31m"
    };
    format!("{color}{:>8.1}{RESET}", score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporters::tests::test_run;

    #[test]
    fn test_text_sections() {
        let out = render(&test_run()).unwrap();
        for section in ["PILLAR SCORES", "TIERS", "DETAILED ANALYSIS", "LOWEST SCORING", "DIAGNOSTICS"] {
            assert!(out.contains(section), "missing {}", section);
        }
        assert!(out.contains("Contributions: 2  Scored: 2  Properties: 2"));
        assert!(out.contains("URL accessibility      0/1 (0.0%)"));
        assert!(out.contains("skipped\x1b[0m #2 (no id)"));
    }

    #[test]
    fn test_lowest_scoring_first() {
        let out = render(&test_run()).unwrap();
        let r1 = out.rfind("R1").unwrap();
        let r2 = out.rfind("R2").unwrap();
        assert!(r2 < r1, "R2 (50) should be listed before R1 (100)");
    }
}
