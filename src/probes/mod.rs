//! Network probes used by the Accessibility and License pillars
//!
//! The scoring core only sees the [`Probes`] trait. Two implementations ship
//! with the crate:
//!
//! - [`HttpProbes`] - live checks over sync HTTP (ureq), one attempt per
//!   call with a global per-call timeout
//! - [`StaticProbes`] - canned responses keyed by URL, for deterministic
//!   evaluation in tests and offline runs

mod canned;
mod http;

pub use canned::StaticProbes;
pub use http::HttpProbes;

use crate::models::RepoRef;
use thiserror::Error;

/// Why a probe could not produce a definitive positive answer.
///
/// The evaluator maps every variant to `NotValid`; none of them abort a run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error("timed out")]
    Timeout,

    #[error("HTTP {0}")]
    Status(u16),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("unsupported host: {0}")]
    Unsupported(String),

    #[error("unexpected response: {0}")]
    Malformed(String),
}

/// External capabilities needed to evaluate URL-bearing properties
pub trait Probes: Send + Sync {
    /// Final HTTP status of a successful (2xx) retrieval of `url`
    fn reachable(&self, url: &str) -> Result<u16, ProbeError>;

    /// Declared license of a repository; `Ok(None)` when the repository
    /// exists but declares none
    fn license_of(&self, repo: &RepoRef) -> Result<Option<String>, ProbeError>;
}
