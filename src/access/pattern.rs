//! Glob-style IP patterns
//!
//! A pattern is matched against the whole dotted-quad string. `*` stands for
//! any run of characters (including none); every other character must match
//! literally. There is no CIDR arithmetic: `192.168.*` is a string rule.

/// A single allow/deny rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpPattern {
    raw: String,
}

impl IpPattern {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            raw: pattern.into(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns `true` if `ip` matches this pattern in full.
    ///
    /// # Example
    ///
    /// ```
    /// # use gatehouse::access::pattern::IpPattern;
    /// let rule = IpPattern::new("10.0.0.*");
    /// assert!(rule.matches("10.0.0.5"));
    /// assert!(!rule.matches("10.0.1.5"));
    /// ```
    pub fn matches(&self, ip: &str) -> bool {
        glob_match(self.raw.as_bytes(), ip.as_bytes())
    }
}

impl From<&str> for IpPattern {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for IpPattern {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

// Iterative wildcard match, backtracking to the most recent `*`.
fn glob_match(pattern: &[u8], text: &[u8]) -> bool {
    let (mut p, mut t) = (0, 0);
    let mut star: Option<usize> = None;
    let mut resume = 0;

    while t < text.len() {
        if p < pattern.len() && pattern[p] == b'*' {
            star = Some(p);
            p += 1;
            resume = t;
        } else if p < pattern.len() && pattern[p] == text[t] {
            p += 1;
            t += 1;
        } else if let Some(s) = star {
            p = s + 1;
            resume += 1;
            t = resume;
        } else {
            return false;
        }
    }

    pattern[p..].iter().all(|&c| c == b'*')
}
