//! Glob patterns over `/`-separated relative paths
//!
//! `*`, `?` and `[...]` match within one segment; a `**` segment matches zero
//! or more whole segments.

use crate::error::{Result, ScaffoldError};
use glob::MatchOptions;
use std::fmt;

const OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern(glob::Pattern);

impl Pattern {
    pub fn new(pattern: &str) -> Result<Self> {
        let normalized = pattern.trim_start_matches("./");
        glob::Pattern::new(normalized)
            .map(Self)
            .map_err(|source| ScaffoldError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })
    }

    pub fn matches(&self, path: &str) -> bool {
        self.0.matches_with(path.trim_matches('/'), OPTIONS)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}
