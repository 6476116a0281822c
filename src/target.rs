//! Scan target handling

use crate::error::{ScanError, ScanResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Base URL every candidate is appended to
///
/// Only the scheme is checked. The rest of the URL is kept exactly as given,
/// so `http://host/` probes `http://host//word`, same as the word would be
/// joined by hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Target {
    base: String,
}

impl Target {
    /// Validate and wrap a base URL
    pub fn parse(url: &str) -> ScanResult<Self> {
        if url.starts_with("http://") || url.starts_with("https://") {
            Ok(Self {
                base: url.to_string(),
            })
        } else {
            Err(ScanError::InvalidTarget(format!(
                "{} (URL should start with 'http://' or 'https://')",
                url
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.base
    }

    /// Request URL for one candidate
    pub fn url_for(&self, candidate: &str) -> String {
        format!("{}/{}", self.base, candidate)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)
    }
}

impl TryFrom<String> for Target {
    type Error = ScanError;

    fn try_from(value: String) -> ScanResult<Self> {
        Target::parse(&value)
    }
}

impl From<Target> for String {
    fn from(target: Target) -> Self {
        target.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_and_https() {
        assert!(Target::parse("http://example.com").is_ok());
        assert!(Target::parse("https://example.com:8443/app").is_ok());
    }

    #[test]
    fn test_rejects_other_schemes() {
        for bad in ["example.com", "ftp://example.com", "HTTP//x", ""] {
            let err = Target::parse(bad).unwrap_err();
            assert!(matches!(err, ScanError::InvalidTarget(_)), "{}", bad);
        }
    }

    #[test]
    fn test_url_for_joins_without_normalising() {
        let target = Target::parse("http://example.com").unwrap();
        assert_eq!(target.url_for("admin"), "http://example.com/admin");
        assert_eq!(target.url_for("a/b"), "http://example.com/a/b");

        let trailing = Target::parse("http://example.com/").unwrap();
        assert_eq!(trailing.url_for("admin"), "http://example.com//admin");
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Result<Target, _> = serde_json::from_str("\"https://x.io\"");
        assert!(ok.is_ok());
        let bad: Result<Target, _> = serde_json::from_str("\"x.io\"");
        assert!(bad.is_err());
    }
}
