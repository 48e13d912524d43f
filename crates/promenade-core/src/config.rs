//! Configuration loading and typed config structures.
//!
//! The canonical configuration lives in `promenade-config.yaml` at the
//! project root. Every field has a default, so an absent file or an absent
//! section simply yields the built-in values. Secrets never live in the file:
//! the advisor API key is read from the environment by the advisor crate.

use std::path::Path;

use promenade_types::{DisplayMode, Season};
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The values parsed but describe an unusable simulation.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// What is wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration, mirroring `promenade-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// World-level settings (name, seed, frame pacing).
    #[serde(default)]
    pub world: WorldConfig,

    /// Density policy scaling.
    #[serde(default)]
    pub density: DensityConfig,

    /// Spawn and motion constants.
    #[serde(default)]
    pub motion: MotionConfig,

    /// Parameters in effect at startup.
    #[serde(default)]
    pub params: InitialParamsConfig,

    /// Insight advisor connection settings.
    #[serde(default)]
    pub advisor: AdvisorSettings,

    /// Observer HTTP server settings.
    #[serde(default)]
    pub observer: ObserverConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `ADVISOR_API_URL` overrides `advisor.api_url`
    /// - `ADVISOR_MODEL` overrides `advisor.model`
    /// - `OBSERVER_PORT` overrides `observer.port`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config: Self = serde_yml::from_str(&contents)?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise start from defaults. Either
    /// way, environment overrides are applied and the result validated.
    ///
    /// # Errors
    ///
    /// Same as [`from_file`](Self::from_file).
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            return Self::from_file(path);
        }
        tracing::info!(path = %path.display(), "config file not found, using defaults");
        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string. No environment overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] or [`ConfigError::Invalid`].
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from a key lookup. The process environment is the
    /// usual source; tests pass a map instead.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `OBSERVER_PORT` is not a port.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("ADVISOR_API_URL") {
            self.advisor.api_url = url;
        }
        if let Some(model) = lookup("ADVISOR_MODEL") {
            self.advisor.model = model;
        }
        if let Some(port) = lookup("OBSERVER_PORT") {
            self.observer.port = port.parse().map_err(|e| ConfigError::Invalid {
                reason: format!("OBSERVER_PORT={port} is not a valid port: {e}"),
            })?;
        }
        Ok(())
    }

    /// Check ranges the type system cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| {
            Err(ConfigError::Invalid {
                reason: reason.to_owned(),
            })
        };

        if self.world.frame_interval_ms == 0 {
            return invalid("world.frame_interval_ms must be at least 1");
        }
        let m = &self.motion;
        if !(m.speed_min.is_finite() && m.speed_min > 0.0) {
            return invalid("motion.speed_min must be positive");
        }
        if !(m.speed_max.is_finite() && m.speed_max >= m.speed_min) {
            return invalid("motion.speed_max must be at least motion.speed_min");
        }
        if !(m.spawn_jitter.is_finite() && m.spawn_jitter >= 0.0) {
            return invalid("motion.spawn_jitter must be non-negative");
        }
        if !(m.arrival_radius.is_finite() && m.arrival_radius >= 0.0) {
            return invalid("motion.arrival_radius must be non-negative");
        }
        if !(m.damping_divisor.is_finite() && m.damping_divisor > 0.0) {
            return invalid("motion.damping_divisor must be positive");
        }
        if !(m.damping_floor > 0.0 && m.damping_floor <= 1.0) {
            return invalid("motion.damping_floor must be in (0, 1]");
        }
        if self.params.season > Season::MAX_INDEX {
            return invalid("params.season must be in 0..=11");
        }
        if self.params.hour > 23 {
            return invalid("params.hour must be in 0..=23");
        }
        if self.advisor.debounce_ms == 0 {
            return invalid("advisor.debounce_ms must be at least 1");
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable simulation name.
    #[serde(default = "default_world_name")]
    pub name: String,
    /// Random seed for spawn placement, targets, and colors.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Milliseconds between frames (one tick per frame).
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
    /// Stop after this many ticks (0 = run until interrupted).
    #[serde(default)]
    pub max_ticks: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: default_seed(),
            frame_interval_ms: default_frame_interval_ms(),
            max_ticks: 0,
        }
    }
}

/// Density policy configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DensityConfig {
    /// Agents at a factor product of exactly 1.0.
    #[serde(default = "default_base_scale")]
    pub base_scale: u32,
    /// Optional hard cap on the target count. Unset means uncapped.
    #[serde(default)]
    pub ceiling: Option<u32>,
}

impl Default for DensityConfig {
    fn default() -> Self {
        Self {
            base_scale: default_base_scale(),
            ceiling: None,
        }
    }
}

/// Spawn and motion constants.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MotionConfig {
    /// Distance below which a tourist counts as arrived.
    #[serde(default = "default_arrival_radius")]
    pub arrival_radius: f64,
    /// Maximum spawn offset from the entry landmark, per axis.
    #[serde(default = "default_spawn_jitter")]
    pub spawn_jitter: f64,
    /// Slowest spawn speed, units per tick.
    #[serde(default = "default_speed_min")]
    pub speed_min: f64,
    /// Fastest spawn speed, units per tick.
    #[serde(default = "default_speed_max")]
    pub speed_max: f64,
    /// Target count at which damping would reach zero before the floor.
    #[serde(default = "default_damping_divisor")]
    pub damping_divisor: f64,
    /// Lowest allowed damping factor.
    #[serde(default = "default_damping_floor")]
    pub damping_floor: f64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            arrival_radius: default_arrival_radius(),
            spawn_jitter: default_spawn_jitter(),
            speed_min: default_speed_min(),
            speed_max: default_speed_max(),
            damping_divisor: default_damping_divisor(),
            damping_floor: default_damping_floor(),
        }
    }
}

/// Parameters in effect when the process starts.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InitialParamsConfig {
    /// Zero-based month index.
    #[serde(default = "default_season")]
    pub season: u8,
    /// Hour of day.
    #[serde(default = "default_hour")]
    pub hour: u8,
    /// Dots or heatmap.
    #[serde(default)]
    pub display_mode: DisplayMode,
}

impl Default for InitialParamsConfig {
    fn default() -> Self {
        Self {
            season: default_season(),
            hour: default_hour(),
            display_mode: DisplayMode::Dots,
        }
    }
}

/// Insight advisor settings. The API key is deliberately absent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AdvisorSettings {
    /// Whether to consult the advisor at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Backend protocol: `openai` or `anthropic`.
    #[serde(default = "default_advisor_backend")]
    pub backend: String,
    /// Base API URL, without the endpoint path.
    #[serde(default = "default_advisor_api_url")]
    pub api_url: String,
    /// Model identifier.
    #[serde(default = "default_advisor_model")]
    pub model: String,
    /// Settling delay after the last change before a request is issued.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
}

impl Default for AdvisorSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            backend: default_advisor_backend(),
            api_url: default_advisor_api_url(),
            model: default_advisor_model(),
            debounce_ms: default_debounce_ms(),
        }
    }
}

/// Observer HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ObserverConfig {
    /// Interface to bind.
    #[serde(default = "default_observer_host")]
    pub host: String,
    /// TCP port to bind.
    #[serde(default = "default_observer_port")]
    pub port: u16,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            host: default_observer_host(),
            port: default_observer_port(),
        }
    }
}

/// Output format for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable, one event per line.
    #[default]
    Pretty,
    /// Newline-delimited JSON.
    Json,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::Pretty,
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn default_world_name() -> String {
    "Old Town Waterfront".to_owned()
}

const fn default_seed() -> u64 {
    42
}

const fn default_frame_interval_ms() -> u64 {
    16
}

const fn default_base_scale() -> u32 {
    400
}

const fn default_arrival_radius() -> f64 {
    10.0
}

const fn default_spawn_jitter() -> f64 {
    25.0
}

const fn default_speed_min() -> f64 {
    0.5
}

const fn default_speed_max() -> f64 {
    1.3
}

const fn default_damping_divisor() -> f64 {
    800.0
}

const fn default_damping_floor() -> f64 {
    0.2
}

const fn default_season() -> u8 {
    6
}

const fn default_hour() -> u8 {
    12
}

const fn default_true() -> bool {
    true
}

fn default_advisor_backend() -> String {
    "openai".to_owned()
}

fn default_advisor_api_url() -> String {
    "https://api.openai.com/v1".to_owned()
}

fn default_advisor_model() -> String {
    "gpt-4o-mini".to_owned()
}

const fn default_debounce_ms() -> u64 {
    800
}

fn default_observer_host() -> String {
    "127.0.0.1".to_owned()
}

const fn default_observer_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.world.seed, 42);
        assert_eq!(config.world.frame_interval_ms, 16);
        assert_eq!(config.density.base_scale, 400);
        assert_eq!(config.density.ceiling, None);
        assert_eq!(config.advisor.debounce_ms, 800);
        assert_eq!(config.observer.port, 8080);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
world:
  name: "Test Harbour"
  seed: 7
  frame_interval_ms: 33
  max_ticks: 500
density:
  base_scale: 300
  ceiling: 500
motion:
  arrival_radius: 12.5
  spawn_jitter: 10.0
  speed_min: 0.4
  speed_max: 1.0
  damping_divisor: 600.0
  damping_floor: 0.25
params:
  season: 7
  hour: 19
  display_mode: heatmap
advisor:
  enabled: false
  backend: anthropic
  api_url: "https://api.anthropic.com/v1"
  model: "claude-haiku"
  debounce_ms: 500
observer:
  host: "0.0.0.0"
  port: 9090
logging:
  level: debug
  format: json
"#;
        let config = SimulationConfig::parse(yaml).unwrap();
        assert_eq!(config.world.name, "Test Harbour");
        assert_eq!(config.world.max_ticks, 500);
        assert_eq!(config.density.ceiling, Some(500));
        assert_eq!(config.params.display_mode, DisplayMode::Heatmap);
        assert!(!config.advisor.enabled);
        assert_eq!(config.advisor.backend, "anthropic");
        assert_eq!(config.observer.port, 9090);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let config = SimulationConfig::parse("world:\n  seed: 99\n").unwrap();
        assert_eq!(config.world.seed, 99);
        assert_eq!(config.world.frame_interval_ms, 16);
        assert_eq!(config.motion, MotionConfig::default());
    }

    #[test]
    fn out_of_range_params_are_rejected() {
        let err = SimulationConfig::parse("params:\n  hour: 24\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
        let err = SimulationConfig::parse("params:\n  season: 12\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn inverted_speed_range_is_rejected() {
        let yaml = "motion:\n  speed_min: 2.0\n  speed_max: 1.0\n";
        assert!(matches!(
            SimulationConfig::parse(yaml),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn malformed_yaml_is_a_yaml_error() {
        assert!(matches!(
            SimulationConfig::parse("world: [unclosed"),
            Err(ConfigError::Yaml { .. })
        ));
    }

    #[test]
    fn overrides_replace_yaml_values() {
        let env = BTreeMap::from([
            ("ADVISOR_API_URL", "http://localhost:11434/v1"),
            ("ADVISOR_MODEL", "llama3"),
            ("OBSERVER_PORT", "9999"),
        ]);
        let mut config = SimulationConfig::default();
        config
            .apply_overrides(|k| env.get(k).map(|v| (*v).to_owned()))
            .unwrap();
        assert_eq!(config.advisor.api_url, "http://localhost:11434/v1");
        assert_eq!(config.advisor.model, "llama3");
        assert_eq!(config.observer.port, 9999);
    }

    #[test]
    fn bad_port_override_is_rejected() {
        let mut config = SimulationConfig::default();
        let err = config
            .apply_overrides(|k| (k == "OBSERVER_PORT").then(|| "not-a-port".to_owned()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn shipped_config_matches_defaults() {
        let shipped =
            SimulationConfig::parse(include_str!("../../../promenade-config.yaml")).unwrap();
        assert_eq!(shipped, SimulationConfig::default());
    }
}
