//! Configuration management with validation and defaults
//!
//! The engine takes a `WheelConfig` value at construction and never reads
//! global state. `ConfigLoader` layers defaults, an optional TOML file and
//! environment overrides, then validates the result.

use crate::errors::{ConfigurationError, WheelResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

/// Complete wheel configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WheelConfig {
    pub spin: SpinConfig,
    pub filter: FilterConfig,
    pub presentation: PresentationConfig,
    pub monitoring: MonitoringConfig,
}

/// Spin trajectory and playback tuning
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpinConfig {
    /// Fewest full revolutions before settling
    pub min_spins: u32,
    /// Most full revolutions before settling (inclusive)
    pub max_spins: u32,
    /// Wall-clock length of one spin
    pub duration_seconds: f64,
    /// Normalized time at which acceleration hands over to deceleration
    pub ease_breakpoint: f64,
    /// Power of the ease-out settle curve
    pub ease_exponent: f64,
    /// Frame period of the playback clock
    pub frame_interval_ms: u64,
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self {
            min_spins: 10,
            max_spins: 20,
            duration_seconds: 6.0,
            ease_breakpoint: 0.1,
            ease_exponent: 5.0,
            frame_interval_ms: 16, // ~60 frames per second
        }
    }
}

/// Exclusion filter settings
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FilterConfig {
    pub enabled: bool,
    /// Case-insensitive substring marking an entry ineligible
    pub pattern: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            pattern: "IPS".to_string(),
        }
    }
}

/// Styling handed to the render adapter
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PresentationConfig {
    pub show_border: bool,
    pub border_thickness: f64,
    pub show_shadow: bool,
    /// Hub radius as a percentage of the wheel radius
    pub center_size_percent: u32,
    /// Vertical offset of the pointer arrow in pixels
    pub arrow_offset: i32,
    pub base_font_size: f64,
    pub min_font_size: f64,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            show_border: true,
            border_thickness: 2.0,
            show_shadow: true,
            center_size_percent: 15,
            arrow_offset: 0,
            base_font_size: 24.0,
            min_font_size: 10.0,
        }
    }
}

/// Logging configuration
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MonitoringConfig {
    pub log_level: LogLevel,
    /// Emit a trace line for every animation frame
    pub log_ticks: bool,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_ticks: false,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(ConfigurationError::InvalidValue {
                field: "log_level".to_string(),
                value: s.to_string(),
                reason: "expected error, warn, info, debug or trace".to_string(),
            }),
        }
    }
}

/// Presets and validation
impl WheelConfig {
    /// The earlier, gentler curve: 8 second spins over 5..=10 turns with a
    /// symmetric quadratic/cubic ease
    pub fn classic() -> Self {
        Self {
            spin: SpinConfig {
                min_spins: 5,
                max_spins: 10,
                duration_seconds: 8.0,
                ease_breakpoint: 0.5,
                ease_exponent: 3.0,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Short spins for demos and tests
    pub fn quick() -> Self {
        Self {
            spin: SpinConfig {
                min_spins: 2,
                max_spins: 4,
                duration_seconds: 1.0,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Validate configuration for logical consistency
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.spin.validate()?;

        if self.filter.enabled && self.filter.pattern.trim().is_empty() {
            return Err(ConfigurationError::ValidationFailed(
                "filter.pattern must not be empty when the filter is enabled".to_string(),
            ));
        }

        let p = &self.presentation;
        if p.border_thickness < 0.0 || !p.border_thickness.is_finite() {
            return Err(ConfigurationError::ValidationFailed(
                "presentation.border_thickness must be >= 0".to_string(),
            ));
        }
        if p.center_size_percent > 100 {
            return Err(ConfigurationError::ValidationFailed(
                "presentation.center_size_percent must be <= 100".to_string(),
            ));
        }
        if p.min_font_size <= 0.0 || p.base_font_size < p.min_font_size {
            return Err(ConfigurationError::ValidationFailed(
                "presentation font sizes must satisfy 0 < min_font_size <= base_font_size".to_string(),
            ));
        }

        Ok(())
    }

    pub fn spin_duration(&self) -> Duration {
        self.spin.duration()
    }

    pub fn frame_interval(&self) -> Duration {
        self.spin.frame_interval()
    }
}

impl SpinConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.min_spins < 1 {
            return Err(ConfigurationError::ValidationFailed(
                "spin.min_spins must be >= 1".to_string(),
            ));
        }
        if self.max_spins < self.min_spins {
            return Err(ConfigurationError::ValidationFailed(format!(
                "spin.max_spins ({}) must be >= spin.min_spins ({})",
                self.max_spins, self.min_spins
            )));
        }
        if !(self.duration_seconds.is_finite() && self.duration_seconds > 0.0) {
            return Err(ConfigurationError::ValidationFailed(
                "spin.duration_seconds must be a positive number".to_string(),
            ));
        }
        if !(self.ease_breakpoint > 0.0 && self.ease_breakpoint < 1.0) {
            return Err(ConfigurationError::ValidationFailed(
                "spin.ease_breakpoint must lie strictly between 0 and 1".to_string(),
            ));
        }
        if !(self.ease_exponent.is_finite() && self.ease_exponent >= 1.0) {
            return Err(ConfigurationError::ValidationFailed(
                "spin.ease_exponent must be >= 1".to_string(),
            ));
        }
        if self.frame_interval_ms == 0 {
            return Err(ConfigurationError::ValidationFailed(
                "spin.frame_interval_ms must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.duration_seconds)
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

/// Configuration loader with environment variable support
#[derive(Debug, Default)]
pub struct ConfigLoader {
    config_path: Option<String>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Set the configuration file path
    pub fn with_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_string_lossy().to_string());
        self
    }

    /// Load configuration from file and environment variables
    pub fn load(&self) -> WheelResult<WheelConfig> {
        let mut config = match self.config_path {
            Some(ref path) => Self::load_from_file(path)?,
            None => WheelConfig::default(),
        };

        apply_overrides(&mut config, |key| env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from TOML file
    fn load_from_file(path: &str) -> WheelResult<WheelConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigurationError::LoadFailed(format!("Failed to read {}: {}", path, e))
        })?;

        Ok(toml::from_str(&content)?)
    }
}

/// Apply `WHEELSPIN_*` overrides resolved through `lookup`
pub fn apply_overrides<F>(config: &mut WheelConfig, lookup: F) -> Result<(), ConfigurationError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup("WHEELSPIN_MIN_SPINS") {
        config.spin.min_spins = parse_field("WHEELSPIN_MIN_SPINS", value)?;
    }
    if let Some(value) = lookup("WHEELSPIN_MAX_SPINS") {
        config.spin.max_spins = parse_field("WHEELSPIN_MAX_SPINS", value)?;
    }
    if let Some(value) = lookup("WHEELSPIN_DURATION_SECONDS") {
        config.spin.duration_seconds = parse_field("WHEELSPIN_DURATION_SECONDS", value)?;
    }
    if let Some(value) = lookup("WHEELSPIN_EASE_BREAKPOINT") {
        config.spin.ease_breakpoint = parse_field("WHEELSPIN_EASE_BREAKPOINT", value)?;
    }
    if let Some(value) = lookup("WHEELSPIN_EASE_EXPONENT") {
        config.spin.ease_exponent = parse_field("WHEELSPIN_EASE_EXPONENT", value)?;
    }
    if let Some(value) = lookup("WHEELSPIN_FRAME_INTERVAL_MS") {
        config.spin.frame_interval_ms = parse_field("WHEELSPIN_FRAME_INTERVAL_MS", value)?;
    }
    if let Some(value) = lookup("WHEELSPIN_FILTER_ENABLED") {
        config.filter.enabled = parse_field("WHEELSPIN_FILTER_ENABLED", value)?;
    }
    if let Some(value) = lookup("WHEELSPIN_FILTER_PATTERN") {
        config.filter.pattern = value;
    }
    if let Some(value) = lookup("WHEELSPIN_LOG_LEVEL") {
        config.monitoring.log_level = value.parse()?;
    }
    Ok(())
}

fn parse_field<T: std::str::FromStr>(field: &str, value: String) -> Result<T, ConfigurationError> {
    value.trim().parse().map_err(|_| ConfigurationError::InvalidValue {
        field: field.to_string(),
        reason: format!("cannot parse as {}", std::any::type_name::<T>()),
        value,
    })
}
