//! Error types for the wheelspin engine
//!
//! Every failure is local to the request that caused it: nothing here
//! leaves the rotation state corrupted or needs recovery across spins.

use thiserror::Error;

/// Root error type for all wheelspin operations
#[derive(Debug, Error)]
pub enum WheelError {
    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// Spin request errors
    #[error("Spin error: {0}")]
    Spin(#[from] SpinError),

    /// Entry list errors
    #[error("Roster error: {0}")]
    Roster(#[from] RosterError),

    /// Reading entry lists or config files
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding reports and outcomes
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Configuration loading and validation errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigurationError {
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Failed to load configuration: {0}")]
    LoadFailed(String),
}

/// Reasons a spin request is rejected or a session ends without a winner
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SpinError {
    #[error("Cannot spin an empty wheel")]
    EmptyEntryList,

    #[error("All {entry_count} entries are excluded from winning")]
    AllEntriesExcluded { entry_count: usize },

    #[error("Target index {index} is outside 0..{entry_count}")]
    InvalidTargetIndex { index: usize, entry_count: usize },

    #[error("A spin is already in progress")]
    SpinAlreadyInProgress,

    #[error("Spin session {session_id} was cancelled before settling")]
    Cancelled { session_id: String },

    #[error("Invalid spin configuration: {0}")]
    InvalidConfiguration(String),
}

impl SpinError {
    /// Whether the rejection is an expected, non-exceptional condition.
    ///
    /// Re-entrant requests while the wheel is turning are simply ignored.
    pub fn is_benign(&self) -> bool {
        matches!(self, SpinError::SpinAlreadyInProgress)
    }
}

/// Entry list lookup errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum RosterError {
    #[error("Winner name is empty")]
    EmptyName,

    #[error("No entry named '{0}'")]
    UnknownEntry(String),

    #[error("Entry '{0}' is excluded by the active filter")]
    ExcludedEntry(String),
}

impl From<toml::de::Error> for WheelError {
    fn from(e: toml::de::Error) -> Self {
        WheelError::Configuration(ConfigurationError::LoadFailed(e.to_string()))
    }
}

impl From<toml::ser::Error> for WheelError {
    fn from(e: toml::ser::Error) -> Self {
        WheelError::Configuration(ConfigurationError::LoadFailed(e.to_string()))
    }
}

// Convenience type alias for Results
pub type WheelResult<T> = Result<T, WheelError>;
