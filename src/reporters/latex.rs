//! LaTeX reporter
//!
//! Three booktabs tables: pillar score summary, raw property pass rates and
//! the tier distribution. Undefined values render as `--`.

use crate::models::{Pillar, Tier};
use crate::stats::{CorpusStatistics, RawRate, SummaryStats};
use anyhow::Result;
use chrono::Local;

/// Render the tables document
pub fn render(stats: &CorpusStatistics) -> Result<String> {
    let mut tex = String::new();
    tex.push_str("% Reproducibility evaluation results\n");
    tex.push_str(&format!("% Generated: {}\n", Local::now().format("%Y-%m-%d %H:%M:%S")));
    tex.push_str("% Inapplicable checks count as 100%\n\n");

    tex.push_str(&render_score_table(stats));
    tex.push('\n');
    tex.push_str(&render_rate_table(stats));
    tex.push('\n');
    tex.push_str(&render_tier_table(stats));
    Ok(tex)
}

fn render_score_table(stats: &CorpusStatistics) -> String {
    let mut tex = begin_table(
        &format!("Reproducibility Score Results (n={})", stats.scored_contributions),
        "tab:repro-scores",
        "lcccc",
    );
    tex.push_str(
        "\\textbf{Pillar} & \\textbf{Mean} & \\textbf{Std} & \\textbf{Median} & \\textbf{Range} \\\\\n\\midrule\n",
    );
    for pillar in Pillar::ALL {
        tex.push_str(&summary_row(pillar.label(), stats.pillar(pillar)));
    }
    tex.push_str("\\midrule\n");
    tex.push_str(&summary_row("\\textbf{Overall}", stats.overall.as_ref()));
    tex.push_str(END_TABLE);
    tex
}

fn render_rate_table(stats: &CorpusStatistics) -> String {
    let rates = &stats.raw_rates;
    let mut tex = begin_table("Property-Level Pass Rates", "tab:property-rates", "lcccc");
    tex.push_str(
        "\\textbf{Check} & \\textbf{Applicable} & \\textbf{Evaluated} & \\textbf{Pass} & \\textbf{Rate} \\\\\n\\midrule\n",
    );
    tex.push_str(&rate_row("Availability", &rates.availability));
    tex.push_str(&rate_row("URL Accessibility", &rates.url_accessibility));
    tex.push_str(&rate_row("Resource Linkability", &rates.resource_linkability));
    tex.push_str(&rate_row("Repository License", &rates.repo_license.rate));
    tex.push_str(END_TABLE);
    tex
}

fn render_tier_table(stats: &CorpusStatistics) -> String {
    let mut tex = begin_table("Reproducibility Tier Distribution", "tab:repro-tiers", "lcc");
    tex.push_str("\\textbf{Tier} & \\textbf{Count} & \\textbf{Percent} \\\\\n\\midrule\n");
    for tier in &stats.tiers {
        tex.push_str(&format!(
            "{} ({}) & {} & {:.1}\\% \\\\\n",
            tier.tier,
            tier_band(tier.tier),
            tier.count,
            tier.percentage
        ));
    }
    tex.push_str(END_TABLE);
    tex
}

const END_TABLE: &str = "\\bottomrule\n\\end{tabular}\n\\end{table}\n";

fn begin_table(caption: &str, label: &str, columns: &str) -> String {
    format!(
        "\\begin{{table}}[htbp]\n\\centering\n\\caption{{{}}}\n\\label{{{}}}\n\\begin{{tabular}}{{{}}}\n\\toprule\n",
        caption, label, columns
    )
}

fn summary_row(label: &str, summary: Option<&SummaryStats>) -> String {
    match summary {
        Some(s) => format!(
            "{} & {:.1}\\% & {:.1} & {:.1} & {:.0}--{:.0} \\\\\n",
            label, s.mean, s.std_dev, s.median, s.min, s.max
        ),
        None => format!("{} & -- & -- & -- & -- \\\\\n", label),
    }
}

fn rate_row(label: &str, rate: &RawRate) -> String {
    let pct = rate
        .rate
        .map(|r| format!("{:.1}\\%", r))
        .unwrap_or_else(|| "--".to_string());
    format!(
        "{} & {} & {} & {} & {} \\\\\n",
        label, rate.applicable, rate.evaluated, rate.passed, pct
    )
}

fn tier_band(tier: Tier) -> &'static str {
    match tier {
        Tier::Excellent => "$\\geq$80\\%",
        Tier::Good => "60--79\\%",
        Tier::Fair => "40--59\\%",
        Tier::Poor => "$<$40\\%",
    }
}
