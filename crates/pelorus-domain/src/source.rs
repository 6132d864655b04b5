//! Source module - the fundamental unit of retrieved evidence

use crate::tier::Tier;

/// A retrieved evidence document from a search provider
///
/// Identity is the canonical form of the URL: two sources whose URLs differ
/// only by case or tracking parameters are the same source. A source is
/// immutable once produced by a provider call, except that the aggregator
/// may attach or overwrite `tier` and `rank_score`.
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    /// Document title as reported by the provider
    pub title: String,

    /// Original URL as reported by the provider
    pub url: String,

    /// Extracted text content (may be a snippet)
    pub content: String,

    /// Composite rank score assigned by the aggregator
    pub rank_score: f64,

    /// Authority tier assigned by the domain categorizer
    pub tier: Tier,

    /// Externally supplied content-intelligence score, if any
    ///
    /// Treated as an optional ranking input signal; never computed here.
    pub intel_score: Option<f64>,
}

impl Source {
    /// Create a new source as produced by a provider call
    ///
    /// # Examples
    ///
    /// ```
    /// use pelorus_domain::Source;
    ///
    /// let source = Source::new("MV Example", "https://example.org/vessel", "...");
    /// assert_eq!(source.rank_score, 0.0);
    /// ```
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            content: content.into(),
            rank_score: 0.0,
            tier: Tier::T3,
            intel_score: None,
        }
    }

    /// Attach an externally supplied content-intelligence score
    pub fn with_intel_score(mut self, score: f64) -> Self {
        self.intel_score = Some(score);
        self
    }

    /// Canonical form of this source's URL (its identity)
    pub fn canonical_url(&self) -> String {
        canonical_url(&self.url)
    }
}

/// Query parameters stripped during canonicalization
const TRACKING_PARAMS: &[&str] = &["fbclid", "gclid", "ref", "mc_cid", "mc_eid", "igshid"];

/// Compute the canonical form of a URL
///
/// Canonicalization lowercases the scheme and host, drops the fragment,
/// removes known tracking parameters (including any `utm_*`), and strips a
/// trailing slash. Path and remaining query parameters keep their case and
/// order.
pub fn canonical_url(url: &str) -> String {
    let trimmed = url.trim();

    // Fragment never participates in identity
    let without_fragment = trimmed.split('#').next().unwrap_or(trimmed);

    let (base, query) = match without_fragment.split_once('?') {
        Some((base, query)) => (base, Some(query)),
        None => (without_fragment, None),
    };

    let mut canonical = lowercase_scheme_and_host(base);
    while canonical.len() > 1 && canonical.ends_with('/') {
        canonical.pop();
    }

    if let Some(query) = query {
        let kept: Vec<&str> = query
            .split('&')
            .filter(|param| !is_tracking_param(param))
            .collect();
        if !kept.is_empty() {
            canonical.push('?');
            canonical.push_str(&kept.join("&"));
        }
    }

    canonical
}

/// Extract the host portion of a URL, lowercased
///
/// Returns an empty string when the input has no recognizable host.
pub fn url_host(url: &str) -> String {
    let rest = match url.split_once("://") {
        Some((_, rest)) => rest,
        None => url,
    };
    let host = rest.split(['/', '?', '#']).next().unwrap_or("");
    // Drop userinfo and port
    let host = host.rsplit('@').next().unwrap_or(host);
    let host = host.split(':').next().unwrap_or(host);
    host.to_lowercase()
}

fn lowercase_scheme_and_host(base: &str) -> String {
    match base.split_once("://") {
        Some((scheme, rest)) => {
            let (host, path) = match rest.split_once('/') {
                Some((host, path)) => (host, Some(path)),
                None => (rest, None),
            };
            let mut out = format!("{}://{}", scheme.to_lowercase(), host.to_lowercase());
            if let Some(path) = path {
                out.push('/');
                out.push_str(path);
            }
            out
        }
        None => base.to_string(),
    }
}

fn is_tracking_param(param: &str) -> bool {
    let name = param.split('=').next().unwrap_or(param).to_lowercase();
    name.starts_with("utm_") || TRACKING_PARAMS.contains(&name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_url_lowercases_host() {
        assert_eq!(
            canonical_url("HTTPS://Example.ORG/Vessel"),
            "https://example.org/Vessel"
        );
    }

    #[test]
    fn test_canonical_url_strips_tracking_params() {
        assert_eq!(
            canonical_url("https://example.org/ship?utm_source=x&id=42&fbclid=abc"),
            "https://example.org/ship?id=42"
        );
    }

    #[test]
    fn test_canonical_url_strips_fragment_and_trailing_slash() {
        assert_eq!(
            canonical_url("https://example.org/ship/#details"),
            "https://example.org/ship"
        );
    }

    #[test]
    fn test_canonical_url_drops_empty_query() {
        assert_eq!(
            canonical_url("https://example.org/ship?utm_campaign=a"),
            "https://example.org/ship"
        );
    }

    #[test]
    fn test_case_and_tracking_variants_share_identity() {
        let a = Source::new("t", "https://Example.org/v?utm_source=mail", "c");
        let b = Source::new("t", "https://example.org/v", "c");
        assert_eq!(a.canonical_url(), b.canonical_url());
    }

    #[test]
    fn test_url_host() {
        assert_eq!(url_host("https://www.Equasis.org/page?q=1"), "www.equasis.org");
        assert_eq!(url_host("http://user@host.com:8080/x"), "host.com");
        assert_eq!(url_host("no-scheme.org/path"), "no-scheme.org");
    }

    #[test]
    fn test_source_defaults() {
        let source = Source::new("title", "https://example.org", "content");
        assert_eq!(source.tier, Tier::T3);
        assert_eq!(source.rank_score, 0.0);
        assert!(source.intel_score.is_none());
    }

    #[test]
    fn test_with_intel_score() {
        let source = Source::new("t", "u", "c").with_intel_score(0.8);
        assert_eq!(source.intel_score, Some(0.8));
    }
}
