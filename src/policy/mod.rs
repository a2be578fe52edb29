//! Admission policy for discovered URLs
//!
//! Pure decision logic, no I/O: scope, whitelist/blacklist, depth, and
//! budget checks. The governor is consulted under the frontier lock, so its
//! budget counters need no synchronization of their own.

pub mod budget;

use regex::Regex;
use url::Url;

pub use budget::BudgetTable;

use crate::config::SessionConfig;
use crate::utils::registrable_stem;

/// Outcome of evaluating one URL for admission.
///
/// Everything except `Admit` and `Duplicate` is silent filtering: the URL
/// stays in the link ledger but is never fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Admitted to the frontier; one unit of budget was consumed
    Admit,
    /// Canonical URL already queued or visited this session
    Duplicate,
    /// Host is outside the configured crawl scope
    OutOfScope,
    /// A whitelist is configured and the URL matches none of it
    NotWhitelisted,
    /// URL matches a blacklist pattern
    Blacklisted,
    /// Link depth exceeds the configured limit
    DepthExceeded,
    /// The matching budget counter is exhausted
    BudgetExhausted,
}

impl Verdict {
    /// Whether the URL was admitted for fetching
    #[must_use]
    pub fn is_admitted(&self) -> bool {
        matches!(self, Self::Admit)
    }
}

/// Scope, pattern, depth, and budget policy for one session
#[derive(Debug)]
pub struct PolicyGovernor {
    seed_host: String,
    subdomains: bool,
    tld: bool,
    external_domains: Vec<String>,
    blacklist: Vec<Regex>,
    whitelist: Vec<Regex>,
    depth_limit: usize,
    budget: BudgetTable,
}

impl PolicyGovernor {
    /// Build the governor from a validated session snapshot
    #[must_use]
    pub fn new(snapshot: &SessionConfig) -> Self {
        let seed_host = snapshot
            .seed()
            .host_str()
            .map(registrable_stem)
            .unwrap_or_default()
            .to_string();
        let config = snapshot.config();
        Self {
            seed_host,
            subdomains: config.subdomains(),
            tld: config.tld(),
            external_domains: config
                .external_domains()
                .iter()
                .map(|d| registrable_stem(d).to_string())
                .collect(),
            blacklist: snapshot.blacklist().to_vec(),
            whitelist: snapshot.whitelist().to_vec(),
            depth_limit: config.depth(),
            budget: BudgetTable::new(config.budget()),
        }
    }

    /// Evaluate one canonical URL at the given link depth.
    ///
    /// Checks run in a fixed order (scope, whitelist, blacklist, depth,
    /// budget) so a URL failing several checks always reports the same
    /// verdict. Budget is checked last and consumed on admission.
    pub fn admit(&mut self, url: &Url, depth: usize) -> Verdict {
        if !self.in_scope(url) {
            return Verdict::OutOfScope;
        }
        let url_str = url.as_str();
        if !self.whitelist.is_empty() && !self.whitelist.iter().any(|re| re.is_match(url_str)) {
            return Verdict::NotWhitelisted;
        }
        if self.blacklist.iter().any(|re| re.is_match(url_str)) {
            return Verdict::Blacklisted;
        }
        if self.depth_limit != 0 && depth > self.depth_limit {
            return Verdict::DepthExceeded;
        }
        if !self.budget.consume(url.path()) {
            return Verdict::BudgetExhausted;
        }
        Verdict::Admit
    }

    fn in_scope(&self, url: &Url) -> bool {
        let Some(host) = url.host_str() else {
            return false;
        };
        let host = registrable_stem(host);

        if host == self.seed_host {
            return true;
        }
        if self.subdomains && is_subdomain_of(host, &self.seed_host) {
            return true;
        }
        if self.tld && host_stem(host) == host_stem(&self.seed_host) {
            return true;
        }
        self.external_domains
            .iter()
            .any(|d| host == d || is_subdomain_of(host, d))
    }
}

fn is_subdomain_of(host: &str, parent: &str) -> bool {
    host.len() > parent.len() + 1
        && host.ends_with(parent)
        && host.as_bytes()[host.len() - parent.len() - 1] == b'.'
}

/// Host with its final dot-suffix removed: `example.com` → `example`.
///
/// An approximation of the registrable name without a public-suffix table,
/// good enough to pair `example.com` with `example.org` for the tld scope
/// flag.
fn host_stem(host: &str) -> &str {
    match host.rsplit_once('.') {
        Some((stem, _tld)) => stem,
        None => host,
    }
}
