//! Live probes over sync HTTP via ureq (no async runtime needed)

use super::{ProbeError, Probes};
use crate::config::ProbeConfig;
use crate::models::{RepoHost, RepoRef};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

const GITHUB_API: &str = "https://api.github.com";
const ZENODO_API: &str = "https://zenodo.org/api";

/// Reachability and license probes backed by a shared ureq agent
pub struct HttpProbes {
    agent: ureq::Agent,
    user_agent: String,
    github_token: Option<String>,
}

fn make_agent(timeout: Duration) -> ureq::Agent {
    ureq::config::Config::builder()
        .http_status_as_error(false) // Status codes are mapped to ProbeError below
        .timeout_global(Some(timeout))
        .build()
        .new_agent()
}

impl HttpProbes {
    pub fn new(config: &ProbeConfig) -> Self {
        Self {
            agent: make_agent(Duration::from_secs(config.timeout_secs.max(1))),
            user_agent: config.user_agent.clone(),
            github_token: std::env::var("GITHUB_TOKEN").ok().filter(|t| !t.is_empty()),
        }
    }

    /// GET a JSON document, requiring HTTP 200
    fn get_json(&self, url: &str, bearer: Option<&str>) -> Result<Value, ProbeError> {
        let mut request = self
            .agent
            .get(url)
            .header("User-Agent", &self.user_agent)
            .header("Accept", "application/json");
        if let Some(token) = bearer {
            request = request.header("Authorization", &format!("Bearer {}", token));
        }

        let response = request.call().map_err(map_ureq_error)?;
        let status = response.status().as_u16();
        if status != 200 {
            return Err(ProbeError::Status(status));
        }

        response
            .into_body()
            .read_json::<Value>()
            .map_err(|e| ProbeError::Malformed(e.to_string()))
    }

    fn github_license(&self, owner: &str, name: &str) -> Result<Option<String>, ProbeError> {
        let url = format!("{}/repos/{}/{}", GITHUB_API, owner, name);
        let body = self.get_json(&url, self.github_token.as_deref())?;
        github_license_name(&body)
    }

    fn zenodo_license(&self, record: &str) -> Result<Option<String>, ProbeError> {
        let url = format!("{}/records/{}", ZENODO_API, record);
        let body = self.get_json(&url, None)?;
        zenodo_license_name(&body)
    }
}

impl Probes for HttpProbes {
    fn reachable(&self, url: &str) -> Result<u16, ProbeError> {
        let response = self
            .agent
            .head(url)
            .header("User-Agent", &self.user_agent)
            .call()
            .map_err(map_ureq_error)?;
        let mut status = response.status().as_u16();

        // Some servers reject HEAD; retry the same attempt as GET
        if status == 405 {
            let response = self
                .agent
                .get(url)
                .header("User-Agent", &self.user_agent)
                .call()
                .map_err(map_ureq_error)?;
            status = response.status().as_u16();
        }

        debug!("Reachability {} -> {}", url, status);
        if (200..300).contains(&status) {
            Ok(status)
        } else {
            Err(ProbeError::Status(status))
        }
    }

    fn license_of(&self, repo: &RepoRef) -> Result<Option<String>, ProbeError> {
        let result = match (&repo.host, repo.owner.as_deref(), repo.name.as_deref()) {
            (RepoHost::GitHub, Some(owner), Some(name)) => self.github_license(owner, name),
            (RepoHost::Zenodo, _, Some(record)) => self.zenodo_license(record),
            (host, _, _) => Err(ProbeError::Unsupported(host.to_string())),
        };
        debug!("License {} -> {:?}", repo.url, result);
        result
    }
}

fn map_ureq_error(e: ureq::Error) -> ProbeError {
    match e {
        ureq::Error::Timeout(_) => ProbeError::Timeout,
        ureq::Error::StatusCode(code) => ProbeError::Status(code),
        other => ProbeError::Transport(other.to_string()),
    }
}

/// License from a GitHub `/repos/{owner}/{repo}` document.
///
/// `NOASSERTION` means GitHub found a license file it could not identify,
/// which is not counted as a declared license.
fn github_license_name(body: &Value) -> Result<Option<String>, ProbeError> {
    let spdx = body
        .pointer("/license/spdx_id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty() && *id != "NOASSERTION");

    match spdx {
        Some(id) => {
            let name = body
                .pointer("/license/name")
                .and_then(Value::as_str)
                .filter(|n| !n.is_empty())
                .unwrap_or(id);
            Ok(Some(name.to_string()))
        }
        None if body.get("id").is_some() => Ok(None),
        None => Err(ProbeError::Malformed("missing repository id".to_string())),
    }
}

/// License from a Zenodo `/api/records/{id}` document
fn zenodo_license_name(body: &Value) -> Result<Option<String>, ProbeError> {
    let license = match body.pointer("/metadata/license") {
        Some(Value::Object(map)) if !map.is_empty() => map
            .get("id")
            .or_else(|| map.get("title"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| Some("unknown".to_string())),
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    };

    match license {
        Some(name) => Ok(Some(name)),
        None if body.get("id").is_some() => Ok(None),
        None => Err(ProbeError::Malformed("missing record id".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;

    /// Serve `connections` requests on a local port. `respond` gets the
    /// request method and returns the raw response, or `None` to hold the
    /// connection open without answering.
    fn serve(connections: usize, respond: fn(&str) -> Option<&'static str>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            for stream in listener.incoming().take(connections) {
                let mut stream = stream.unwrap();
                let mut reader = BufReader::new(stream.try_clone().unwrap());
                let mut request_line = String::new();
                reader.read_line(&mut request_line).unwrap();
                let mut line = String::new();
                while reader.read_line(&mut line).unwrap_or(0) > 2 {
                    line.clear();
                }

                let method = request_line.split_whitespace().next().unwrap_or("");
                match respond(method) {
                    Some(response) => {
                        let _ = stream.write_all(response.as_bytes());
                    }
                    None => std::thread::sleep(Duration::from_secs(3)),
                }
            }
        });
        format!("http://{}/resource", addr)
    }

    fn probes_with_timeout(secs: u64) -> HttpProbes {
        HttpProbes::new(&ProbeConfig {
            timeout_secs: secs,
            ..ProbeConfig::default()
        })
    }

    #[test]
    fn test_reachable_falls_back_to_get_on_405() {
        let url = serve(2, |method| match method {
            "HEAD" => Some(
                "HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
            ),
            _ => Some("HTTP/1.1 200 OK\r\nContent-Length: 2\r\nConnection: close\r\n\r\nok"),
        });
        assert_eq!(probes_with_timeout(5).reachable(&url), Ok(200));
    }

    #[test]
    fn test_reachable_maps_error_status() {
        let url = serve(1, |_| {
            Some("HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\nConnection: close\r\n\r\n")
        });
        assert_eq!(probes_with_timeout(5).reachable(&url), Err(ProbeError::Status(404)));
    }

    #[test]
    fn test_reachable_times_out() {
        let url = serve(1, |_| None);
        let started = std::time::Instant::now();
        assert_eq!(probes_with_timeout(1).reachable(&url), Err(ProbeError::Timeout));
        assert!(started.elapsed() < Duration::from_secs(3));
    }

    #[test]
    fn test_github_license_parsing() {
        let body = json!({"id": 1, "license": {"spdx_id": "MIT", "name": "MIT License"}});
        assert_eq!(github_license_name(&body), Ok(Some("MIT License".to_string())));

        let body = json!({"id": 1, "license": {"spdx_id": "Apache-2.0", "name": ""}});
        assert_eq!(github_license_name(&body), Ok(Some("Apache-2.0".to_string())));

        let body = json!({"id": 1, "license": {"spdx_id": "NOASSERTION", "name": "Other"}});
        assert_eq!(github_license_name(&body), Ok(None));

        let body = json!({"id": 1, "license": null});
        assert_eq!(github_license_name(&body), Ok(None));

        let body = json!({"message": "Not Found"});
        assert!(github_license_name(&body).is_err());
    }

    #[test]
    fn test_zenodo_license_parsing() {
        let body = json!({"id": 7, "metadata": {"license": {"id": "cc-by-4.0"}}});
        assert_eq!(zenodo_license_name(&body), Ok(Some("cc-by-4.0".to_string())));

        let body = json!({"id": 7, "metadata": {"license": "mit"}});
        assert_eq!(zenodo_license_name(&body), Ok(Some("mit".to_string())));

        let body = json!({"id": 7, "metadata": {}});
        assert_eq!(zenodo_license_name(&body), Ok(None));

        let body = json!({"status": 404});
        assert!(zenodo_license_name(&body).is_err());
    }

    #[test]
    fn test_unsupported_host_needs_no_network() {
        let probes = HttpProbes::new(&ProbeConfig::default());
        let repo = RepoRef {
            host: RepoHost::GitLab,
            owner: Some("group".into()),
            name: Some("project".into()),
            url: "https://gitlab.com/group/project".into(),
        };
        assert_eq!(
            probes.license_of(&repo),
            Err(ProbeError::Unsupported("gitlab".to_string()))
        );
    }
}
