// -*- indent-tabs-mode: nil; tab-width: 2; -*-
// vim: set ts=&2 sw=2 et ai :

//! Configuration for the vrouter-port hook.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::serde;
use crate::toml;
use crate::anyhow;

use serde::Deserialize;
use crate::log;
use log::LevelFilter;

pub const DEFAULT_CONFIG_PATH: &str = "/etc/vrouter-port/vrouter-port.toml";
pub const DEFAULT_AGENT_URL: &str = "http://127.0.0.1:9091";
pub const DEFAULT_AGENT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LOCK_PATH: &str = "/run/vrouter-port/port.lock";

/// Configuration for the vrouter-port hook.
///
/// Every key is optional; a missing file yields `Config::default()`.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
  pub log_level: LogLevel,
  pub log_target: LogTarget,

  /// Path of the host-wide lock file. An empty path disables locking.
  pub lock_path: PathBuf,

  pub agent: AgentConfig,
}

impl Default for Config {
  fn default() -> Self {
    Config {
      log_level: LogLevel::default(),
      log_target: LogTarget::default(),
      lock_path: PathBuf::from(DEFAULT_LOCK_PATH),
      agent: AgentConfig::default(),
    }
  }
}

impl Config {
  /// read the configuration from a file.
  pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, anyhow::Error> {
    let config_str = std::fs::read_to_string(path)?;
    Self::from_toml(&config_str)
  }

  /// parse the configuration from a TOML string.
  pub fn from_toml(config_str: &str) -> Result<Self, anyhow::Error> {
    let config = toml::from_str(config_str)?;
    Ok(config)
  }

  /// read the configuration from `path`, or from the default location when
  /// no path is given. Only the default location may be absent.
  pub fn load(path: Option<&Path>) -> Result<Self, anyhow::Error> {
    if let Some(path) = path {
      return Self::from_path(path)
        .map_err(|e| anyhow::anyhow!("failed to load config {}: {}", path.display(), e));
    }

    match std::fs::read_to_string(DEFAULT_CONFIG_PATH) {
      Ok(config_str) => Self::from_toml(&config_str),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
      Err(e) => Err(e.into()),
    }
  }

  /// Get the log level as a `LevelFilter`.
  pub fn level_filter(&self) -> LevelFilter {
    self.log_level.into()
  }

  /// Lock path, or `None` if locking is disabled.
  pub fn lock_path(&self) -> Option<&Path> {
    if self.lock_path.as_os_str().is_empty() {
      None
    } else {
      Some(&self.lock_path)
    }
  }
}

/// Connection settings for the vRouter agent.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct AgentConfig {
  /// Base URL of the agent's port API.
  pub url: String,

  /// Per-request timeout in seconds.
  pub timeout_secs: u64,
}

impl Default for AgentConfig {
  fn default() -> Self {
    AgentConfig {
      url: DEFAULT_AGENT_URL.to_string(),
      timeout_secs: DEFAULT_AGENT_TIMEOUT_SECS,
    }
  }
}

impl AgentConfig {
  pub fn timeout(&self) -> Duration {
    Duration::from_secs(self.timeout_secs)
  }
}

/// Where log records go.
#[derive(Clone, Copy, PartialEq, Eq, Deserialize, Debug, Default)]
pub enum LogTarget {
  #[default]
  Stdout,
  Syslog,
}

/// Log level.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize, Debug)]
pub enum LogLevel {
  Off,
  Error,
  Warn,
  Info,
  Debug,
  Trace,
}

impl Default for LogLevel {
  fn default() -> Self {
    LogLevel::Info
  }
}

impl From<LogLevel> for LevelFilter {
  fn from(value: LogLevel) -> Self {
    match value {
      LogLevel::Off => LevelFilter::Off,
      LogLevel::Error => LevelFilter::Error,
      LogLevel::Warn => LevelFilter::Warn,
      LogLevel::Info => LevelFilter::Info,
      LogLevel::Debug => LevelFilter::Debug,
      LogLevel::Trace => LevelFilter::Trace,
    }
  }
}

impl From<LevelFilter> for LogLevel {
  fn from(value: LevelFilter) -> Self {
    match value {
      LevelFilter::Off => LogLevel::Off,
      LevelFilter::Error => LogLevel::Error,
      LevelFilter::Warn => LogLevel::Warn,
      LevelFilter::Info => LogLevel::Info,
      LevelFilter::Debug => LogLevel::Debug,
      LevelFilter::Trace => LogLevel::Trace,
    }
  }
}
