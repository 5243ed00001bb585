//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.waypoint/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct WaypointConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub readiness: ReadinessConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub log_level: Option<String>,
    pub log_file: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AnimationConfig {
    pub enabled: Option<bool>,
    pub duration_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ReadinessConfig {
    pub warn_after_ms: Option<u64>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_LOG_LEVEL: &str = "debug";
pub const DEFAULT_LOG_FILE: &str = "waypoint.log";
pub const DEFAULT_ANIMATION_MS: u64 = 250;
pub const DEFAULT_READINESS_WARN_MS: u64 = 2000;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

/// Settings the coordinator itself consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorConfig {
    /// Global switch for every animated host command.
    pub animated: bool,
    /// A readiness wait longer than this is logged. It is never cut short.
    pub readiness_warn_after: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            animated: true,
            readiness_warn_after: Duration::from_millis(DEFAULT_READINESS_WARN_MS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub log_level: String,
    pub log_file: String,
    pub animation_duration: Duration,
    pub coordinator: CoordinatorConfig,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.waypoint/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".waypoint").join("config.toml"))
}

/// Where the loaded config came from.
///
/// Config is read before the logger exists, so loading only reports what
/// happened and `log` is called once logging is up.
#[derive(Debug)]
pub enum ConfigSource {
    NoHomeDir,
    Generated(PathBuf),
    GenerateFailed { path: PathBuf, error: io::Error },
    File(PathBuf),
}

impl ConfigSource {
    pub fn log(&self, config: &WaypointConfig) {
        match self {
            ConfigSource::NoHomeDir => {
                warn!("Could not determine home directory, using default config")
            }
            ConfigSource::Generated(path) => {
                info!("No config file found, generated default at {}", path.display())
            }
            ConfigSource::GenerateFailed { path, error } => warn!(
                "No config file found, failed to write default at {}: {}",
                path.display(),
                error
            ),
            ConfigSource::File(path) => {
                info!("Loaded config from {}", path.display());
                debug!("Config: {:?}", config);
            }
        }
    }
}

/// Load config from `~/.waypoint/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `WaypointConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<(WaypointConfig, ConfigSource), ConfigError> {
    load_config_from(config_path())
}

fn load_config_from(path: Option<PathBuf>) -> Result<(WaypointConfig, ConfigSource), ConfigError> {
    let Some(path) = path else {
        return Ok((WaypointConfig::default(), ConfigSource::NoHomeDir));
    };

    if !path.exists() {
        let source = match generate_default_config(&path) {
            Ok(()) => ConfigSource::Generated(path),
            Err(error) => ConfigSource::GenerateFailed { path, error },
        };
        return Ok((WaypointConfig::default(), source));
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config: WaypointConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    Ok((config, ConfigSource::File(path)))
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) -> io::Result<()> {
    let default_content = r#"# Waypoint Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# log_level = "debug"                # "error", "warn", "info", "debug", "trace", "off"
# log_file = "waypoint.log"

# [animation]
# enabled = true                     # Or set WAYPOINT_ANIMATIONS=0
# duration_ms = 250                  # Or set WAYPOINT_ANIMATION_MS

# [readiness]
# warn_after_ms = 2000               # Log a warning when a screen takes longer to get ready
"#;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, default_content)
}

// ============================================================================
// Resolution
// ============================================================================

/// Overrides coming from CLI flags (None = not specified).
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub log_level: Option<String>,
    pub no_animation: bool,
    pub animation_ms: Option<u64>,
}

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &WaypointConfig, cli: &CliOverrides) -> ResolvedConfig {
    // Log level: CLI → env → config → default
    let log_level = cli
        .log_level
        .clone()
        .or_else(|| std::env::var("WAYPOINT_LOG_LEVEL").ok())
        .or_else(|| config.general.log_level.clone())
        .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

    let log_file = config
        .general
        .log_file
        .clone()
        .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());

    // Animations: CLI flag can only turn them off
    let animated = !cli.no_animation
        && std::env::var("WAYPOINT_ANIMATIONS")
            .ok()
            .and_then(|v| parse_flag(&v))
            .or(config.animation.enabled)
            .unwrap_or(true);

    // Animation duration: CLI → env → config → default
    let animation_ms = cli
        .animation_ms
        .or_else(|| {
            std::env::var("WAYPOINT_ANIMATION_MS")
                .ok()
                .and_then(|v| v.parse().ok())
        })
        .or(config.animation.duration_ms)
        .unwrap_or(DEFAULT_ANIMATION_MS);

    let warn_after_ms = config
        .readiness
        .warn_after_ms
        .unwrap_or(DEFAULT_READINESS_WARN_MS);

    ResolvedConfig {
        log_level,
        log_file,
        animation_duration: Duration::from_millis(animation_ms),
        coordinator: CoordinatorConfig {
            animated,
            readiness_warn_after: Duration::from_millis(warn_after_ms),
        },
    }
}

/// Accepts the usual spellings of a boolean env var.
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
