//! Proxy rule resolution.
//!
//! # Design Decisions
//! - Disabled rules are never candidates
//! - Specificity: the candidate with the fewest wildcard segments wins
//! - Equal specificity: the first declared rule wins (deterministic)
//! - Pure function over immutable inputs; no locking required

use std::collections::HashMap;

use super::rule::ProxyRule;

/// A resolved rule together with its extracted wildcard parameters.
/// Ephemeral, produced per request.
#[derive(Debug, Clone)]
pub struct ProxyDecision<'a> {
    pub rule: &'a ProxyRule,
    pub params: HashMap<String, String>,
}

/// Select the single best rule for `path`, or `None` when no enabled rule
/// matches.
pub fn resolve<'a>(path: &str, rules: &'a [ProxyRule]) -> Option<ProxyDecision<'a>> {
    let mut best: Option<(usize, ProxyDecision<'a>)> = None;

    for rule in rules.iter().filter(|r| r.enabled) {
        let result = rule.pattern.match_path(path);
        if !result.matched {
            continue;
        }
        let wildcards = rule.pattern.wildcard_count();
        // Strict comparison keeps the earlier candidate on ties.
        let better = match &best {
            None => true,
            Some((current, _)) => wildcards < *current,
        };
        if better {
            best = Some((
                wildcards,
                ProxyDecision {
                    rule,
                    params: result.params,
                },
            ));
        }
    }

    best.map(|(_, decision)| decision)
}
