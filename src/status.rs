//! Single-pass extraction of session and CPU figures from `api status`.
//!
//! The status command answers with a free-text block. One fixed pattern with
//! eleven capture groups pulls every figure out of it in a single pass; the
//! groups are consumed positionally by the catalog's status-group metrics.

use regex::Regex;

use crate::error::ScrapeError;

/// Number of capture groups in the session pattern.
pub const STATUS_GROUPS: usize = 11;

/// Group order: sessions since startup, current sessions, peak sessions,
/// peak sessions last 5min, sessions per second, max sessions per second,
/// peak sps, peak sps last 5min, max sessions, min idle cpu, current idle
/// cpu.
const SESSION_PATTERN: &str = r"(\d+) session\(s\) since startup\s+(\d+) session\(s\) - peak (\d+), last 5min (\d+)\s+(\d+) session\(s\) per Sec out of max (\d+), peak (\d+), last 5min (\d+)\s+(\d+) session\(s\) max\s+min idle cpu (\d+\.\d+)/(\d+\.\d+)";

/// The compiled status pattern.
pub struct StatusParser {
    pattern: Regex,
}

impl StatusParser {
    pub fn new() -> Self {
        Self {
            // The pattern is a constant; compilation cannot fail at runtime.
            pattern: Regex::new(SESSION_PATTERN).expect("session pattern compiles"),
        }
    }

    /// Apply the pattern and return the captured groups in order.
    ///
    /// The pattern must match the status text exactly once. Zero or multiple
    /// matches is a mismatch error; there is no partial result.
    pub fn parse<'t>(&self, text: &'t str) -> Result<[&'t str; STATUS_GROUPS], ScrapeError> {
        let mut captures = self.pattern.captures_iter(text);
        let Some(found) = captures.next() else {
            return Err(ScrapeError::StatusPattern { matches: 0 });
        };
        let extra = captures.count();
        if extra > 0 {
            return Err(ScrapeError::StatusPattern { matches: 1 + extra });
        }

        let mut groups = [""; STATUS_GROUPS];
        for (i, slot) in groups.iter_mut().enumerate() {
            // Group 0 is the whole match; captures 1..=11 always exist when
            // the pattern matched.
            *slot = found
                .get(i + 1)
                .map(|m| m.as_str())
                .unwrap_or_default();
        }
        Ok(groups)
    }
}

impl Default for StatusParser {
    fn default() -> Self {
        Self::new()
    }
}
