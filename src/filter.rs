//! Substring exclusion filter
//!
//! Entries whose label contains the pattern (case-insensitively) may still
//! appear on the wheel but can never be picked at random.

use crate::common::traits::ExclusionRule;
use crate::config::FilterConfig;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExclusionFilter {
    enabled: bool,
    /// Stored uppercased
    pattern: String,
}

impl ExclusionFilter {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            enabled: true,
            pattern: pattern.into().to_uppercase(),
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            pattern: String::new(),
        }
    }

    pub fn from_config(config: &FilterConfig) -> Self {
        Self {
            enabled: config.enabled,
            pattern: config.pattern.to_uppercase(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl Default for ExclusionFilter {
    fn default() -> Self {
        Self::from_config(&FilterConfig::default())
    }
}

impl ExclusionRule for ExclusionFilter {
    fn is_excluded(&self, label: &str) -> bool {
        self.enabled && !self.pattern.is_empty() && label.to_uppercase().contains(&self.pattern)
    }
}
