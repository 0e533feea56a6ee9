//! reproscore - reproducibility scoring for knowledge-graph contributions
//!
//! Classifies the reproducibility properties of research contributions,
//! evaluates them on four pillars (availability, accessibility, linkability,
//! license), aggregates per-pillar trimmed means into an overall score and
//! tier, and summarises a corpus.

pub mod classify;
pub mod cli;
pub mod config;
pub mod input;
pub mod models;
pub mod pipeline;
pub mod probes;
pub mod reporters;
pub mod scoring;
pub mod stats;
