//! CLI command definitions and handlers

mod classify;
mod evaluate;
mod init;

use crate::config::{load_config_file, load_project_config, ProjectConfig};
use crate::pipeline::MAX_WORKERS;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

/// Parse and validate workers count (1-64)
fn parse_workers(s: &str) -> Result<usize, String> {
    let n: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number", s))?;
    if n == 0 {
        Err("workers must be at least 1".to_string())
    } else if n > MAX_WORKERS {
        Err(format!("workers cannot exceed {}", MAX_WORKERS))
    } else {
        Ok(n)
    }
}

/// Parse a probe timeout in seconds (1-300)
fn parse_timeout(s: &str) -> Result<u64, String> {
    let n: u64 = s
        .parse()
        .map_err(|_| format!("'{}' is not a valid number of seconds", s))?;
    if (1..=300).contains(&n) {
        Ok(n)
    } else {
        Err("timeout must be between 1 and 300 seconds".to_string())
    }
}

/// reproscore - Reproducibility scoring for knowledge-graph contributions
#[derive(Parser, Debug)]
#[command(name = "reproscore")]
#[command(
    version,
    about = "Score research contributions on four reproducibility pillars: availability, accessibility, linkability, license",
    long_about = "reproscore classifies every reproducibility property of a contribution, \
checks it against four pillars, aggregates per-pillar scores with a trimmed mean and \
assigns each contribution a tier.\n\n\
Inapplicable checks count as 100%, so a property is only penalised on pillars that apply to it.",
    after_help = "\
Examples:
  reproscore evaluate contributions.json                      Full evaluation, files in ./results
  reproscore evaluate data.json -o out --format json          JSON on stdout
  reproscore evaluate data.json --skip-accessibility --skip-licenses   Offline run
  reproscore classify data.json --min-per-type 40             Check sampling balance
  reproscore init                                             Write an example reproscore.toml"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    /// Number of parallel workers (1-64, default: auto)
    #[arg(long, global = true, value_parser = parse_workers)]
    pub workers: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Evaluate contributions and write scores, statistics and tables
    #[command(after_help = "\
Writes scores.csv, detailed.csv, statistics.json and tables.tex into the output directory.

Examples:
  reproscore evaluate data.json                         Text report, files in ./results
  reproscore evaluate data.json -o results/run1         Custom output directory
  reproscore evaluate data.json --format latex          LaTeX tables on stdout
  reproscore evaluate data.json --stream scores.jsonl   Stream scores as they complete
  reproscore evaluate data.json --timeout 15            Slower hosts
  reproscore evaluate data.json --explain R123          Pillar breakdown for one contribution")]
    Evaluate {
        /// Contributions JSON file
        input: PathBuf,

        /// Output directory (default: results)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Stdout format: text, json, latex (default: text)
        #[arg(long, short = 'f', value_parser = ["text", "json", "latex", "tex"])]
        format: Option<String>,

        /// Do not probe URLs; URL properties pass Accessibility as inapplicable
        #[arg(long)]
        skip_accessibility: bool,

        /// Do not look up repository licenses; repositories pass License as inapplicable
        #[arg(long)]
        skip_licenses: bool,

        /// Per-request probe timeout in seconds (1-300)
        #[arg(long, value_parser = parse_timeout)]
        timeout: Option<u64>,

        /// Append each finished contribution score to this JSON Lines file
        #[arg(long)]
        stream: Option<PathBuf>,

        /// Config file (default: reproscore.toml next to the input)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Show the per-pillar breakdown of one contribution (text format)
        #[arg(long, value_name = "CONTRIBUTION_ID")]
        explain: Option<String>,
    },

    /// Classify properties and report the type distribution
    Classify {
        /// Contributions JSON file
        input: PathBuf,

        /// Minimum properties per type for a balanced sample
        #[arg(long)]
        min_per_type: Option<usize>,

        /// Output format: text, json
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,

        /// Config file (default: reproscore.toml next to the input)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Write an example reproscore.toml
    Init {
        /// Directory to write the config into
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Run the CLI command
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Evaluate {
            input,
            output,
            format,
            skip_accessibility,
            skip_licenses,
            timeout,
            stream,
            config,
            explain,
        } => evaluate::run(evaluate::EvaluateArgs {
            input,
            output,
            format,
            skip_accessibility,
            skip_licenses,
            timeout,
            stream,
            config,
            workers: cli.workers,
            explain,
        }),

        Commands::Classify {
            input,
            min_per_type,
            format,
            config,
        } => classify::run(&input, min_per_type, &format, config.as_deref()),

        Commands::Init { path, force } => init::run(&path, force),
    }
}

/// Load the explicit config file, or discover one next to the input
fn resolve_config(input: &Path, explicit: Option<&Path>) -> Result<ProjectConfig> {
    match explicit {
        Some(path) => load_config_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => {
            let dir = input
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            Ok(load_project_config(dir))
        }
    }
}
