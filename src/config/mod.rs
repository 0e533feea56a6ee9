//! Configuration module for reproscore
//!
//! This module handles:
//! - Run configuration (reproscore.toml)
//! - Probe switches and timeouts
//! - Classifier extensions
//! - CLI defaults

mod project_config;

pub use project_config::{
    ClassifierConfig,
    CliDefaults,
    ProbeConfig,
    ProjectConfig,
    SamplingConfig,
    CONFIG_FILE_NAMES,
    EXAMPLE_CONFIG,
    load_config_file,
    load_project_config,
};
