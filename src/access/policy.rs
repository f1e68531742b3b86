//! Allow/deny evaluation for client addresses

use crate::access::pattern::IpPattern;
use crate::config::ServerConfig;

/// Outcome of checking a client address against the configured rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyDecision {
    Accepted,
    /// A reject pattern matched. Takes precedence over any accept match.
    RejectedByDenyList,
    /// An allow-list is configured and nothing in it matched.
    RejectedNotInAllowList,
}

impl PolicyDecision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, PolicyDecision::Accepted)
    }

    /// Short description used in the error log.
    pub fn reason(&self) -> &'static str {
        match self {
            PolicyDecision::Accepted => "accepted",
            PolicyDecision::RejectedByDenyList => "matched reject list",
            PolicyDecision::RejectedNotInAllowList => "not in accept list",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    accept: Vec<IpPattern>,
    reject: Vec<IpPattern>,
}

impl AccessPolicy {
    pub fn new<A, R>(accept: A, reject: R) -> Self
    where
        A: IntoIterator,
        A::Item: Into<IpPattern>,
        R: IntoIterator,
        R::Item: Into<IpPattern>,
    {
        Self {
            accept: accept.into_iter().map(Into::into).collect(),
            reject: reject.into_iter().map(Into::into).collect(),
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(
            config.accept.iter().map(String::as_str),
            config.reject.iter().map(String::as_str),
        )
    }

    /// Classifies `client_ip`.
    ///
    /// Deny rules are checked first. With no accept rules every address that
    /// was not denied is accepted.
    pub fn decide(&self, client_ip: &str) -> PolicyDecision {
        if self.reject.iter().any(|rule| rule.matches(client_ip)) {
            return PolicyDecision::RejectedByDenyList;
        }

        if self.accept.is_empty() || self.accept.iter().any(|rule| rule.matches(client_ip)) {
            PolicyDecision::Accepted
        } else {
            PolicyDecision::RejectedNotInAllowList
        }
    }
}
