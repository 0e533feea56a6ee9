//! Canned probe responses

use super::{ProbeError, Probes};
use crate::models::RepoRef;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Probes answering from fixed tables keyed by URL.
///
/// URLs without an entry fail with a transport error, the same way an
/// unreachable host would.
#[derive(Debug, Default)]
pub struct StaticProbes {
    statuses: HashMap<String, Result<u16, ProbeError>>,
    licenses: HashMap<String, Result<Option<String>, ProbeError>>,
    reachability_calls: AtomicUsize,
    license_calls: AtomicUsize,
}

impl StaticProbes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Respond to `reachable(url)` with an HTTP status
    pub fn with_status(mut self, url: impl Into<String>, status: u16) -> Self {
        let response = if (200..300).contains(&status) {
            Ok(status)
        } else {
            Err(ProbeError::Status(status))
        };
        self.statuses.insert(url.into(), response);
        self
    }

    /// Respond to `reachable(url)` with an error
    pub fn with_reach_error(mut self, url: impl Into<String>, error: ProbeError) -> Self {
        self.statuses.insert(url.into(), Err(error));
        self
    }

    /// Respond to `license_of` for the repository at `url`
    pub fn with_license(mut self, url: impl Into<String>, license: Option<&str>) -> Self {
        self.licenses
            .insert(url.into(), Ok(license.map(str::to_string)));
        self
    }

    /// Fail `license_of` for the repository at `url`
    pub fn with_license_error(mut self, url: impl Into<String>, error: ProbeError) -> Self {
        self.licenses.insert(url.into(), Err(error));
        self
    }

    pub fn reachability_calls(&self) -> usize {
        self.reachability_calls.load(Ordering::Relaxed)
    }

    pub fn license_calls(&self) -> usize {
        self.license_calls.load(Ordering::Relaxed)
    }
}

impl Probes for StaticProbes {
    fn reachable(&self, url: &str) -> Result<u16, ProbeError> {
        self.reachability_calls.fetch_add(1, Ordering::Relaxed);
        self.statuses
            .get(url)
            .cloned()
            .unwrap_or_else(|| Err(ProbeError::Transport("no canned response".to_string())))
    }

    fn license_of(&self, repo: &RepoRef) -> Result<Option<String>, ProbeError> {
        self.license_calls.fetch_add(1, Ordering::Relaxed);
        self.licenses
            .get(&repo.url)
            .cloned()
            .unwrap_or_else(|| Err(ProbeError::Transport("no canned response".to_string())))
    }
}
