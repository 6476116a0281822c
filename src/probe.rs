//! Probe execution and outcome classification
//!
//! A probe is one GET of `<target>/<candidate>`. The status code is the only
//! signal: codes in the [`NegativeStatusSet`] mean the path is absent, any
//! other code means it exists. Transport failures become
//! [`ProbeOutcome::Error`] and are never retried.

use crate::config::ScanConfig;
use crate::error::{ProbeError, ScanError, ScanResult};
use crate::target::Target;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::time::Duration;

/// Codes treated as "not found" when none are configured
pub const DEFAULT_NEGATIVE_CODES: [u16; 4] = [400, 401, 403, 404];

/// HTTP status codes that mark a path as absent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<u16>", into = "Vec<u16>")]
pub struct NegativeStatusSet {
    codes: BTreeSet<u16>,
}

impl NegativeStatusSet {
    pub fn new<I: IntoIterator<Item = u16>>(codes: I) -> Self {
        Self {
            codes: codes.into_iter().collect(),
        }
    }

    pub fn contains(&self, status: u16) -> bool {
        self.codes.contains(&status)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.codes.iter().copied()
    }
}

impl Default for NegativeStatusSet {
    fn default() -> Self {
        Self::new(DEFAULT_NEGATIVE_CODES)
    }
}

impl From<Vec<u16>> for NegativeStatusSet {
    fn from(codes: Vec<u16>) -> Self {
        Self::new(codes)
    }
}

impl From<NegativeStatusSet> for Vec<u16> {
    fn from(set: NegativeStatusSet) -> Self {
        set.codes.into_iter().collect()
    }
}

impl fmt::Display for NegativeStatusSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codes: Vec<String> = self.codes.iter().map(|c| c.to_string()).collect();
        write!(f, "[{}]", codes.join(", "))
    }
}

/// Classified result of a single probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    Found { candidate: String, status: u16 },
    NotFound { candidate: String, status: u16 },
    Error { candidate: String, cause: ProbeError },
}

impl ProbeOutcome {
    /// Classify a received status code
    pub fn classify(candidate: String, status: u16, negatives: &NegativeStatusSet) -> Self {
        if negatives.contains(status) {
            ProbeOutcome::NotFound { candidate, status }
        } else {
            ProbeOutcome::Found { candidate, status }
        }
    }

    pub fn candidate(&self) -> &str {
        match self {
            ProbeOutcome::Found { candidate, .. }
            | ProbeOutcome::NotFound { candidate, .. }
            | ProbeOutcome::Error { candidate, .. } => candidate,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, ProbeOutcome::Found { .. })
    }
}

/// Anything that can probe one candidate against a target
///
/// Implementations must turn every failure into [`ProbeOutcome::Error`].
#[async_trait]
pub trait Prober: Send + Sync + 'static {
    async fn probe(&self, target: &Target, candidate: String) -> ProbeOutcome;
}

/// Prober backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpProber {
    client: Client,
    negatives: NegativeStatusSet,
}

impl HttpProber {
    /// Build a prober with its own client
    pub fn new(negatives: NegativeStatusSet, timeout: Duration, user_agent: &str, insecure: bool) -> ScanResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .user_agent(user_agent)
            .danger_accept_invalid_certs(insecure)
            .build()
            .map_err(|e| ScanError::HttpClient(e.to_string()))?;

        Ok(Self { client, negatives })
    }

    pub fn from_config(config: &ScanConfig) -> ScanResult<Self> {
        Self::new(
            config.negative_codes.clone(),
            config.timeout_duration(),
            &config.user_agent,
            config.insecure,
        )
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe(&self, target: &Target, candidate: String) -> ProbeOutcome {
        let url = target.url_for(&candidate);
        match self.client.get(&url).send().await {
            // Body is dropped unread
            Ok(response) => {
                let status = response.status().as_u16();
                ProbeOutcome::classify(candidate, status, &self.negatives)
            }
            Err(e) => {
                log::debug!("Probe of {} failed: {}", url, e);
                ProbeOutcome::Error {
                    candidate,
                    cause: ProbeError::from(e),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_negative_codes() {
        let set = NegativeStatusSet::default();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![400, 401, 403, 404]);
        assert!(!set.contains(200));
        assert_eq!(set.to_string(), "[400, 401, 403, 404]");
    }

    #[test]
    fn test_classify() {
        let negatives = NegativeStatusSet::new([404]);
        assert_eq!(
            ProbeOutcome::classify("admin".into(), 200, &negatives),
            ProbeOutcome::Found { candidate: "admin".into(), status: 200 }
        );
        assert_eq!(
            ProbeOutcome::classify("login".into(), 404, &negatives),
            ProbeOutcome::NotFound { candidate: "login".into(), status: 404 }
        );
        // Anything outside the set counts, including errors and redirects
        assert!(ProbeOutcome::classify("x".into(), 500, &negatives).is_found());
        assert!(ProbeOutcome::classify("x".into(), 301, &negatives).is_found());
        assert!(ProbeOutcome::classify("x".into(), 403, &negatives).is_found());
    }

    #[test]
    fn test_empty_negative_set_finds_everything() {
        let negatives = NegativeStatusSet::new(Vec::new());
        assert!(negatives.is_empty());
        assert!(ProbeOutcome::classify("x".into(), 404, &negatives).is_found());
    }

    #[test]
    fn test_outcome_candidate() {
        let outcome = ProbeOutcome::Error {
            candidate: "xyz123".into(),
            cause: ProbeError::Timeout,
        };
        assert_eq!(outcome.candidate(), "xyz123");
        assert!(!outcome.is_found());
    }

    #[tokio::test]
    async fn test_http_probe_connection_refused_is_error() {
        // Bind then drop to get a port with nothing listening
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let target = Target::parse(&format!("http://127.0.0.1:{}", port)).unwrap();
        let prober = HttpProber::new(
            NegativeStatusSet::default(),
            Duration::from_secs(2),
            "baas-test",
            false,
        )
        .unwrap();

        let outcome = prober.probe(&target, "admin".into()).await;
        assert!(matches!(outcome, ProbeOutcome::Error { ref candidate, .. } if candidate == "admin"));
    }
}
