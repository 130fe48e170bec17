//! Routing decision types.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Phase boundary set by a handler entry in the route table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Filesystem,
    Hit,
    Miss,
    Rewrite,
    Error,
    Resource,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Phase::Filesystem => "filesystem",
            Phase::Hit => "hit",
            Phase::Miss => "miss",
            Phase::Rewrite => "rewrite",
            Phase::Error => "error",
            Phase::Resource => "resource",
        };
        f.write_str(s)
    }
}

/// Where the caller should dispatch a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    /// Static asset store.
    Filesystem,
    /// A compute backend (lambda).
    Backend,
    /// External redirect.
    Url,
    /// Internal path known to neither route set.
    Unresolved,
}

impl Target {
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Filesystem => "filesystem",
            Target::Backend => "backend",
            Target::Url => "url",
            Target::Unresolved => "unresolved",
        }
    }
}

/// Rewritten destination of a terminal rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Path inside this deployment.
    Path(String),
    /// Absolute `http`/`https` URL.
    Url(String),
}

impl Destination {
    /// Classify a resolved destination.
    ///
    /// Only `scheme://host...` counts as a URL; lenient forms such as
    /// `http:/host` stay paths.
    pub fn classify(dest: &str) -> Self {
        match url::Url::parse(dest) {
            Ok(url)
                if matches!(url.scheme(), "http" | "https")
                    && url.has_host()
                    && has_authority(dest, url.scheme()) =>
            {
                Destination::Url(dest.to_string())
            }
            _ => Destination::Path(dest.to_string()),
        }
    }
}

fn has_authority(dest: &str, scheme: &str) -> bool {
    dest.get(..scheme.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
        && dest[scheme.len()..].starts_with("://")
}

/// Outcome of one `route()` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResult {
    pub found: bool,
    pub destination: String,
    pub target: Target,
    pub headers: BTreeMap<String, String>,
    /// True once any continue-rule fired during the scan.
    #[serde(rename = "continue")]
    pub continued: bool,
    pub status: Option<u16>,
    pub query_args: BTreeMap<String, String>,
    pub matched_rule_index: Option<usize>,
    pub phase: Option<Phase>,
}

impl RouteResult {
    pub fn is_redirect(&self) -> bool {
        self.found && self.target == Target::Url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_destination() {
        assert_eq!(
            Destination::classify("https://example.com/a"),
            Destination::Url("https://example.com/a".into())
        );
        assert_eq!(
            Destination::classify("/__LAMBDA_0"),
            Destination::Path("/__LAMBDA_0".into())
        );
        assert_eq!(
            Destination::classify("mailto:someone@example.com"),
            Destination::Path("mailto:someone@example.com".into())
        );
        assert_eq!(Destination::classify("404"), Destination::Path("404".into()));
        assert_eq!(
            Destination::classify("HTTPS://Example.com/a"),
            Destination::Url("HTTPS://Example.com/a".into())
        );
    }

    #[test]
    fn test_lenient_url_forms_are_paths() {
        assert_eq!(
            Destination::classify("http:/evil/p"),
            Destination::Path("http:/evil/p".into())
        );
        assert_eq!(
            Destination::classify("https:evil.com/p"),
            Destination::Path("https:evil.com/p".into())
        );
        assert_eq!(
            Destination::classify(" https://example.com/"),
            Destination::Path(" https://example.com/".into())
        );
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let result = RouteResult {
            found: true,
            destination: "/x".into(),
            target: Target::Backend,
            headers: BTreeMap::new(),
            continued: false,
            status: Some(200),
            query_args: BTreeMap::new(),
            matched_rule_index: Some(2),
            phase: Some(Phase::Filesystem),
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["continue"], false);
        assert_eq!(json["target"], "backend");
        assert_eq!(json["matchedRuleIndex"], 2);
        assert_eq!(json["phase"], "filesystem");
        assert!(json.get("queryArgs").is_some());
    }
}
