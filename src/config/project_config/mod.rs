//! Project-level configuration support
//!
//! Loads per-run configuration from `reproscore.toml` or `.reproscorerc.json`
//! in the directory that holds the input file, or from an explicit
//! `--config` path.
//!
//! # Configuration Format
//!
//! ```toml
//! # reproscore.toml
//!
//! [probes]
//! skip_accessibility = false
//! skip_licenses = true
//! timeout_secs = 8
//!
//! [classifier]
//! repo_hosts = ["git.example.org"]
//! ontology_prefixes = ["http://purl.bioontology.org/"]
//!
//! [sampling]
//! min_per_type = 40
//!
//! [defaults]
//! format = "text"
//! output = "results"
//! workers = 8
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Config file names searched next to the input file, in order
pub const CONFIG_FILE_NAMES: &[&str] = &["reproscore.toml", ".reproscorerc.json"];

/// Example configuration written by `reproscore init`
pub const EXAMPLE_CONFIG: &str = r#"# reproscore configuration

[probes]
# Disable network checks. Affected properties are reported as
# probe-skipped (Inapplicable, 100) instead of being probed.
skip_accessibility = false
skip_licenses = false
# Per-request timeout; an expired probe counts as Not Valid
timeout_secs = 8
# user_agent = "reproscore/0.1"

[classifier]
# Extra hosts treated as code/data repositories (substring match)
repo_hosts = []
# Extra prefixes/namespaces treated as external ontologies
ontology_prefixes = []

[sampling]
# Minimum properties per type expected from the sampling step
min_per_type = 40

[defaults]
# format = "text"
# output = "results"
# workers = 8
"#;

/// Run configuration loaded from reproscore.toml or similar
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProjectConfig {
    /// Network probe settings
    #[serde(default)]
    pub probes: ProbeConfig,

    /// Extra classification rules
    #[serde(default)]
    pub classifier: ClassifierConfig,

    /// Sampling expectations for the input corpus
    #[serde(default)]
    pub sampling: SamplingConfig,

    /// Default CLI flags
    #[serde(default)]
    pub defaults: CliDefaults,
}

/// Settings for the URL reachability and license probes
#[derive(Debug, Clone, Deserialize)]
pub struct ProbeConfig {
    #[serde(default)]
    pub skip_accessibility: bool,

    #[serde(default)]
    pub skip_licenses: bool,

    /// Per-call timeout in seconds (default: 8)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            skip_accessibility: false,
            skip_licenses: false,
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    8
}

fn default_user_agent() -> String {
    concat!("reproscore/", env!("CARGO_PKG_VERSION")).to_string()
}

/// Additions to the built-in host and ontology lists
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ClassifierConfig {
    #[serde(default)]
    pub repo_hosts: Vec<String>,

    #[serde(default)]
    pub ontology_prefixes: Vec<String>,
}

/// Expectations about the sampled corpus
#[derive(Debug, Clone, Deserialize)]
pub struct SamplingConfig {
    /// Minimum properties per declared type (default: 40)
    #[serde(default = "default_min_per_type")]
    pub min_per_type: usize,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            min_per_type: default_min_per_type(),
        }
    }
}

fn default_min_per_type() -> usize {
    40
}

/// Default CLI flags that can be set in project config
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CliDefaults {
    /// Default stdout format (text, json, latex)
    #[serde(default)]
    pub format: Option<String>,

    /// Default output directory for report files
    #[serde(default)]
    pub output: Option<PathBuf>,

    /// Default number of workers
    #[serde(default)]
    pub workers: Option<usize>,
}

/// Load configuration from the directory holding the input file.
///
/// Searches for `reproscore.toml`, then `.reproscorerc.json`.
/// Returns default configuration if no config file is found or it fails to
/// parse (the failure is logged).
pub fn load_project_config(dir: &Path) -> ProjectConfig {
    for name in CONFIG_FILE_NAMES {
        let path = dir.join(name);
        if !path.exists() {
            continue;
        }
        match load_config_file(&path) {
            Ok(config) => {
                debug!("Loaded project config from {}", path.display());
                return config;
            }
            Err(e) => {
                warn!("Failed to load {}: {}", path.display(), e);
            }
        }
    }

    debug!("No project config found, using defaults");
    ProjectConfig::default()
}

/// Load configuration from an explicit path. The format follows the
/// extension: `.json` is JSON, anything else is TOML.
pub fn load_config_file(path: &Path) -> anyhow::Result<ProjectConfig> {
    let content = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    let config = if is_json {
        serde_json::from_str(&content)?
    } else {
        toml::from_str(&content)?
    };
    Ok(config)
}
