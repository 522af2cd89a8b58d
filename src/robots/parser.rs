//! Robots.txt policy evaluation
//!
//! This module wraps the robotstxt crate's matcher behind a small policy type
//! that also carries the fail-open "allow everything" sentinel.

use robotstxt::DefaultMatcher;

/// Cached robots.txt ruleset for one origin
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RobotsPolicy {
    /// No usable robots.txt (missing, unreachable, non-200, undecodable)
    AllowAll,
    /// Raw robots.txt body, evaluated on demand
    Rules(String),
}

impl RobotsPolicy {
    /// Creates a policy from a fetched robots.txt body
    ///
    /// An empty or whitespace-only body carries no rules and becomes
    /// [`RobotsPolicy::AllowAll`].
    pub fn from_content(content: &str) -> Self {
        if content.trim().is_empty() {
            Self::AllowAll
        } else {
            Self::Rules(content.to_string())
        }
    }

    /// Returns true if this is the allow-all sentinel
    pub fn is_allow_all(&self) -> bool {
        matches!(self, Self::AllowAll)
    }

    /// Checks if a URL is allowed for the given user agent
    ///
    /// # Arguments
    ///
    /// * `url` - The absolute URL (or path) to check
    /// * `user_agent` - The full user agent string; the matcher picks the
    ///   product token out of it
    ///
    /// # Returns
    ///
    /// * `true` - If the URL is allowed, or the content holds no applicable rules
    /// * `false` - If a matching group disallows the URL
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        match self {
            Self::AllowAll => true,
            Self::Rules(content) => {
                let mut matcher = DefaultMatcher::default();
                matcher.one_agent_allowed_by_robots(content, user_agent, url)
            }
        }
    }
}
