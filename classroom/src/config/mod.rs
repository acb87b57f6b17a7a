//! Configuration system for the classroom console.
//!
//! Supports layered configuration with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/classroom/config.toml`)
//! 4. Compiled defaults
//!
//! Missing config file is not an error (defaults are used). An explicit
//! `--config` path that doesn't exist is an error.

use std::path::PathBuf;
use std::time::Duration;

use classroom_proto::student::Student;

use crate::roster::demo_roster;
use crate::session::{DEFAULT_WINDOW_SECS, SessionConfig};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),

    /// A session setting is out of range.
    #[error("invalid session setting: {0}")]
    InvalidSession(String),
}

// ---------------------------------------------------------------------------
// TOML file structs (all fields Option for partial overrides)
// ---------------------------------------------------------------------------

/// Top-level TOML config file structure.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    session: SessionFileConfig,
    class: ClassFileConfig,
}

/// `[session]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct SessionFileConfig {
    window_secs: Option<u32>,
    tick_millis: Option<u64>,
    scan_every_ticks: Option<u32>,
    scan_probability: Option<f64>,
}

/// `[class]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ClassFileConfig {
    section: Option<String>,
    students: Option<Vec<StudentFileConfig>>,
}

/// One `[[class.students]]` entry.
#[derive(Debug, serde::Deserialize)]
struct StudentFileConfig {
    id: u32,
    name: String,
    #[serde(default)]
    present: bool,
    #[serde(default)]
    points: u32,
}

// ---------------------------------------------------------------------------
// Resolved configuration (concrete types, all fields populated)
// ---------------------------------------------------------------------------

/// Fully resolved console configuration.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    // -- Class --
    /// Class section label.
    pub section: String,
    /// Roster definition, in display order.
    pub students: Vec<Student>,

    // -- Session --
    /// Check-in window timing.
    pub session: SessionConfig,
    /// Per-sample arrival chance for the simulated scan source.
    pub scan_probability: f64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            section: "CS-201: Data Structures".to_string(),
            students: demo_roster(),
            session: SessionConfig::default(),
            scan_probability: 0.4,
        }
    }
}

impl ConsoleConfig {
    /// Load configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the explicit config file cannot be read
    /// or parsed, or if the resolved session settings are out of range.
    pub fn load(cli: &CliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        let config = Self::resolve(cli, &file);
        config.validate()?;
        Ok(config)
    }

    /// Resolve a `ConsoleConfig` from CLI args and a parsed config file.
    ///
    /// Priority: CLI > file > default.
    #[must_use]
    fn resolve(cli: &CliArgs, file: &ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            section: cli
                .section
                .clone()
                .or_else(|| file.class.section.clone())
                .unwrap_or(defaults.section),
            students: file.class.students.as_ref().map_or(defaults.students, |entries| {
                entries
                    .iter()
                    .map(|s| Student::new(s.id, s.name.clone(), s.present, s.points))
                    .collect()
            }),
            session: SessionConfig {
                window_secs: cli
                    .window_secs
                    .or(file.session.window_secs)
                    .unwrap_or(DEFAULT_WINDOW_SECS),
                time_unit: cli
                    .tick_millis
                    .or(file.session.tick_millis)
                    .map_or(defaults.session.time_unit, Duration::from_millis),
                scan_every_ticks: file
                    .session
                    .scan_every_ticks
                    .unwrap_or(defaults.session.scan_every_ticks),
                countdown: defaults.session.countdown,
            },
            scan_probability: file
                .session
                .scan_probability
                .unwrap_or(defaults.scan_probability),
        }
    }

    /// Checks that session timing can drive real timers.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSession`] naming the first bad setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session.window_secs == 0 {
            return Err(ConfigError::InvalidSession(
                "window_secs must be at least 1".to_string(),
            ));
        }
        if self.session.time_unit.is_zero() {
            return Err(ConfigError::InvalidSession(
                "tick_millis must be at least 1".to_string(),
            ));
        }
        if self.session.scan_every_ticks == 0 {
            return Err(ConfigError::InvalidSession(
                "scan_every_ticks must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.scan_probability) {
            return Err(ConfigError::InvalidSession(format!(
                "scan_probability must be within 0..=1, got {}",
                self.scan_probability
            )));
        }
        Ok(())
    }
}

/// CLI arguments parsed by clap.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Classroom attendance, tasks and leaderboard console")]
pub struct CliArgs {
    /// Path to config file (default: `~/.config/classroom/config.toml`).
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Class section label.
    #[arg(long, env = "CLASSROOM_SECTION")]
    pub section: Option<String>,

    /// QR check-in window length, in time units.
    #[arg(long)]
    pub window_secs: Option<u32>,

    /// Length of one time unit in milliseconds.
    #[arg(long)]
    pub tick_millis: Option<u64>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", env = "CLASSROOM_LOG")]
    pub log_level: String,

    /// Path to log file (default: `$TMPDIR/classroom.log`).
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Load and parse a TOML config file.
///
/// If `explicit_path` is `Some`, the file must exist (error if not).
/// If `explicit_path` is `None`, the default path is tried and missing file
/// is treated as empty config.
fn load_config_file(explicit_path: Option<&std::path::Path>) -> Result<ConfigFile, ConfigError> {
    let path = if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    } else {
        let Some(config_dir) = dirs::config_dir() else {
            return Ok(ConfigFile::default());
        };
        config_dir.join("classroom").join("config.toml")
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}
