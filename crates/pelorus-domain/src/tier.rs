//! Tier module - authority classification of source domains

use crate::source::url_host;

/// Authority tier of a source's domain, most-authoritative to least
///
/// Assignment is a pure function of the URL:
/// - T1: accredited registries, classification societies, AIS trackers
/// - T2: industry and trade press, maritime forums
/// - T3: generic or commercial sites
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    /// Accredited registries, class societies, AIS trackers
    T1,

    /// Industry and trade press, forums
    T2,

    /// Generic and commercial sites
    T3,
}

impl Tier {
    /// Get the tier name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::T1 => "T1",
            Tier::T2 => "T2",
            Tier::T3 => "T3",
        }
    }

    /// Parse a tier from a string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "T1" => Some(Tier::T1),
            "T2" => Some(Tier::T2),
            "T3" => Some(Tier::T3),
            _ => None,
        }
    }
}

impl std::str::FromStr for Tier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid tier: {}", s))
    }
}

/// Registries, classification societies, flag/port-state databases, AIS trackers
const T1_DOMAINS: &[&str] = &[
    "equasis.org",
    "gisis.imo.org",
    "imo.org",
    "marinetraffic.com",
    "vesselfinder.com",
    "fleetmon.com",
    "myshiptracking.com",
    "lr.org",
    "dnv.com",
    "classnk.or.jp",
    "eagle.org",
    "bureauveritas.com",
    "rina.org",
    "ccs.org.cn",
    "emsa.europa.eu",
    "uscg.mil",
    "parismou.org",
    "tokyo-mou.org",
];

/// Trade press, industry outlets, and maritime community forums
const T2_DOMAINS: &[&str] = &[
    "tradewindsnews.com",
    "lloydslist.com",
    "lloydslistintelligence.com",
    "maritime-executive.com",
    "gcaptain.com",
    "splash247.com",
    "shippingwatch.com",
    "seatrade-maritime.com",
    "marinelink.com",
    "offshore-energy.biz",
    "hellenicshippingnews.com",
    "shipspotting.com",
    "marineinsight.com",
];

/// Categorize a URL into an authority tier
///
/// Deterministic and stateless: the same URL always maps to the same tier.
/// Subdomains inherit their parent domain's tier.
///
/// # Examples
///
/// ```
/// use pelorus_domain::tier::{categorize, Tier};
///
/// assert_eq!(categorize("https://www.equasis.org/restricted/Search"), Tier::T1);
/// assert_eq!(categorize("https://gcaptain.com/some-article"), Tier::T2);
/// assert_eq!(categorize("https://random-blog.example.com/post"), Tier::T3);
/// ```
pub fn categorize(url: &str) -> Tier {
    let host = url_host(url);
    if host.is_empty() {
        return Tier::T3;
    }

    if matches_any(&host, T1_DOMAINS) {
        Tier::T1
    } else if matches_any(&host, T2_DOMAINS) {
        Tier::T2
    } else {
        Tier::T3
    }
}

fn matches_any(host: &str, domains: &[&str]) -> bool {
    domains
        .iter()
        .any(|domain| host == *domain || host.ends_with(&format!(".{}", domain)))
}
