//! Configuration system for the OS simulator.
//!
//! This module defines the configuration record consumed by the simulator. It provides:
//! 1. **Defaults:** Baseline values used when a JSON document omits a field.
//! 2. **Enums:** Scheduling policy and log target codes.
//! 3. **Loading:** The line-oriented simulator configuration file and JSON.
//! 4. **Validation:** Range checks shared by both loaders.
//!
//! A configuration file looks like this (the nine data lines may appear in any order):
//!
//! ```text
//! Start Simulator Configuration File:
//! Version/Phase: 3.0
//! File Path: Test_3.mdf
//! CPU Scheduling Code: SJF-N
//! Quantum Time (cycles): 3
//! Memory Available (KB): 12000
//! Processor Cycle Time (msec): 10
//! I/O Cycle Time (msec): 20
//! Log To: Both
//! Log File Path: logfile_1.lgf
//! End Simulator Configuration File.
//! ```

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::common::constants::{
    IO_CYCLE_MS_RANGE, MEMORY_KB_MAX, PROCESS_CYCLE_MS_RANGE, QUANTUM_MAX, VERSION_MAX,
    VERSION_MIN,
};

/// Default configuration constants for the simulator.
mod defaults {
    /// Configuration format version.
    pub const VERSION: f64 = 1.0;

    /// Meta-data file read when none is named.
    pub const METADATA_PATH: &str = "program.mdf";

    /// Quantum, in cycles (accepted but not differentiated).
    pub const QUANTUM_CYCLES: u32 = 3;

    /// Memory ceiling per process, in KB.
    pub const MEMORY_KB: u32 = 10_240;

    /// Processor cycle time, in ms.
    pub const PROCESS_CYCLE_MS: u32 = 10;

    /// I/O cycle time, in ms.
    pub const IO_CYCLE_MS: u32 = 20;

    /// Log file written when the target includes a file.
    pub const LOG_PATH: &str = "logfile.lgf";
}

const START_DESCRIPTOR: &str = "Start Simulator Configuration File";
const END_DESCRIPTOR: &str = "End Simulator Configuration File";

/// CPU scheduling policy codes.
///
/// Only FCFS-N and SJF-N produce distinct orders; the preemptive codes are
/// accepted and run in FCFS order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum SchedulingPolicy {
    /// First come, first served, non-preemptive (also selected by `NONE`).
    #[default]
    FcfsN,
    /// Shortest job first, non-preemptive.
    SjfN,
    /// Shortest remaining time first, preemptive.
    SrtfP,
    /// First come, first served, preemptive.
    FcfsP,
    /// Round robin, preemptive.
    RrP,
}

impl SchedulingPolicy {
    /// Display name (`"SJF-N"`, `"RR-P"`, ...).
    pub const fn name(self) -> &'static str {
        match self {
            Self::FcfsN => "FCFS-N",
            Self::SjfN => "SJF-N",
            Self::SrtfP => "SRTF-P",
            Self::FcfsP => "FCFS-P",
            Self::RrP => "RR-P",
        }
    }

    /// Whether the code names a preemptive policy.
    pub const fn is_preemptive(self) -> bool {
        matches!(self, Self::SrtfP | Self::FcfsP | Self::RrP)
    }
}

impl fmt::Display for SchedulingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SchedulingPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "fcfs-n" => Ok(Self::FcfsN),
            "sjf-n" => Ok(Self::SjfN),
            "srtf-p" => Ok(Self::SrtfP),
            "fcfs-p" => Ok(Self::FcfsP),
            "rr-p" => Ok(Self::RrP),
            _ => Err(ConfigError::DataOutOfRange {
                field: ConfigField::SchedulingCode,
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for SchedulingPolicy {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Destination(s) of the event log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum LogTarget {
    /// Live output only.
    #[default]
    Monitor,
    /// Log file only, written at the end of the run.
    File,
    /// Live output and the log file.
    Both,
}

impl LogTarget {
    /// Display name (`"Monitor"`, `"File"`, `"Both"`).
    pub const fn name(self) -> &'static str {
        match self {
            Self::Monitor => "Monitor",
            Self::File => "File",
            Self::Both => "Both",
        }
    }

    /// Whether lines are written to the monitor as they are recorded.
    pub const fn includes_monitor(self) -> bool {
        matches!(self, Self::Monitor | Self::Both)
    }

    /// Whether the log file is written when the run finishes.
    pub const fn includes_file(self) -> bool {
        matches!(self, Self::File | Self::Both)
    }
}

impl fmt::Display for LogTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LogTarget {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "monitor" => Ok(Self::Monitor),
            "file" => Ok(Self::File),
            "both" => Ok(Self::Both),
            _ => Err(ConfigError::DataOutOfRange {
                field: ConfigField::LogTo,
                value: s.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for LogTarget {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Data lines of the configuration file, identified by their prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigField {
    /// `Version/Phase`
    Version,
    /// `File Path`
    MetadataPath,
    /// `CPU Scheduling Code`
    SchedulingCode,
    /// `Quantum Time (cycles)`
    QuantumCycles,
    /// `Memory Available (KB)`
    MemoryAvailable,
    /// `Processor Cycle Time (msec)`
    ProcessCycleTime,
    /// `I/O Cycle Time (msec)`
    IoCycleTime,
    /// `Log To`
    LogTo,
    /// `Log File Path`
    LogPath,
}

impl ConfigField {
    /// Every field, in the canonical file order.
    pub const ALL: [Self; 9] = [
        Self::Version,
        Self::MetadataPath,
        Self::SchedulingCode,
        Self::QuantumCycles,
        Self::MemoryAvailable,
        Self::ProcessCycleTime,
        Self::IoCycleTime,
        Self::LogTo,
        Self::LogPath,
    ];

    /// Prompt text preceding the colon.
    pub const fn prompt(self) -> &'static str {
        match self {
            Self::Version => "Version/Phase",
            Self::MetadataPath => "File Path",
            Self::SchedulingCode => "CPU Scheduling Code",
            Self::QuantumCycles => "Quantum Time (cycles)",
            Self::MemoryAvailable => "Memory Available (KB)",
            Self::ProcessCycleTime => "Processor Cycle Time (msec)",
            Self::IoCycleTime => "I/O Cycle Time (msec)",
            Self::LogTo => "Log To",
            Self::LogPath => "Log File Path",
        }
    }

    fn from_prompt(prompt: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.prompt() == prompt)
    }

    const fn bit(self) -> u16 {
        1 << self as u16
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prompt())
    }
}

/// Errors raised while loading or validating a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Configuration File Access Error ({path}): {source}")]
    FileAccess {
        /// Requested path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The start or end descriptor line is missing or malformed.
    #[error("Corrupt Configuration Descriptor Error")]
    CorruptDescriptor,

    /// The end descriptor (or end of input) came before all nine data lines.
    #[error("Incomplete File Error")]
    IncompleteFile,

    /// A data line has an unknown prompt or no colon.
    #[error("Corrupt Configuration Prompt Error: {0:?}")]
    CorruptPrompt(String),

    /// The same prompt appears twice.
    #[error("Duplicate Configuration Prompt Error: {0}")]
    DuplicatePrompt(ConfigField),

    /// A value does not parse as the field's type.
    #[error("Invalid Configuration Value Error: {field} = {value:?}")]
    InvalidValue {
        /// Offending field.
        field: ConfigField,
        /// Raw value text.
        value: String,
    },

    /// A value parses but lies outside the accepted range.
    #[error("Data Out Of Range Configuration Error: {field} = {value}")]
    DataOutOfRange {
        /// Offending field.
        field: ConfigField,
        /// Value as written or stored.
        value: String,
    },

    /// A JSON configuration document is malformed.
    #[error("Invalid JSON Configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Root configuration structure for the simulator.
///
/// # Examples
///
/// Deserializing from JSON; omitted fields take their defaults:
///
/// ```
/// use ossim_core::config::{Config, LogTarget, SchedulingPolicy};
///
/// let json = r#"{ "policy": "sjf-n", "log_to": "Both", "memory_kb": 2048 }"#;
/// let config = Config::from_json(json)?;
/// assert_eq!(config.policy, SchedulingPolicy::SjfN);
/// assert_eq!(config.log_to, LogTarget::Both);
/// assert_eq!(config.memory_kb, 2048);
/// # Ok::<(), ossim_core::config::ConfigError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    /// Configuration format version (0.0 to 10.0).
    #[serde(default = "Config::default_version")]
    pub version: f64,

    /// Meta-data file holding the program.
    #[serde(default = "Config::default_metadata_path")]
    pub metadata_path: PathBuf,

    /// CPU scheduling policy.
    #[serde(default)]
    pub policy: SchedulingPolicy,

    /// Quantum for round-robin style policies, in cycles (0 to 100).
    #[serde(default = "Config::default_quantum_cycles")]
    pub quantum_cycles: u32,

    /// Memory ceiling copied into every process, in KB (0 to 102400).
    #[serde(default = "Config::default_memory_kb")]
    pub memory_kb: u32,

    /// Processor cycle time, in ms/cycle (1 to 1000).
    #[serde(default = "Config::default_process_cycle_ms")]
    pub process_cycle_ms: u32,

    /// I/O cycle time, in ms/cycle (1 to 10000).
    #[serde(default = "Config::default_io_cycle_ms")]
    pub io_cycle_ms: u32,

    /// Log destination(s).
    #[serde(default)]
    pub log_to: LogTarget,

    /// Log file path, used when `log_to` includes a file.
    #[serde(default = "Config::default_log_path")]
    pub log_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: defaults::VERSION,
            metadata_path: Self::default_metadata_path(),
            policy: SchedulingPolicy::default(),
            quantum_cycles: defaults::QUANTUM_CYCLES,
            memory_kb: defaults::MEMORY_KB,
            process_cycle_ms: defaults::PROCESS_CYCLE_MS,
            io_cycle_ms: defaults::IO_CYCLE_MS,
            log_to: LogTarget::default(),
            log_path: Self::default_log_path(),
        }
    }
}

impl Config {
    fn default_version() -> f64 {
        defaults::VERSION
    }

    fn default_metadata_path() -> PathBuf {
        PathBuf::from(defaults::METADATA_PATH)
    }

    fn default_quantum_cycles() -> u32 {
        defaults::QUANTUM_CYCLES
    }

    fn default_memory_kb() -> u32 {
        defaults::MEMORY_KB
    }

    fn default_process_cycle_ms() -> u32 {
        defaults::PROCESS_CYCLE_MS
    }

    fn default_io_cycle_ms() -> u32 {
        defaults::IO_CYCLE_MS
    }

    fn default_log_path() -> PathBuf {
        PathBuf::from(defaults::LOG_PATH)
    }

    /// Parses a simulator configuration file's contents.
    ///
    /// Paths are kept exactly as written; see
    /// [`sim::loader::load_config`](crate::sim::loader::load_config) for
    /// resolution against the file's directory.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] describing the first problem found.
    pub fn parse_str(text: &str) -> Result<Self, ConfigError> {
        let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());

        match lines.next().and_then(|l| l.split_once(':')) {
            Some((descriptor, _)) if descriptor.trim() == START_DESCRIPTOR => {}
            _ => return Err(ConfigError::CorruptDescriptor),
        }

        let mut config = Self::default();
        let mut seen: u16 = 0;
        let mut terminated = false;

        for line in lines.by_ref() {
            if let Some(rest) = line.strip_prefix(END_DESCRIPTOR) {
                if rest.trim() != "." {
                    return Err(ConfigError::CorruptDescriptor);
                }
                terminated = true;
                break;
            }

            let (prompt, value) = line
                .split_once(':')
                .ok_or_else(|| ConfigError::CorruptPrompt(line.to_string()))?;
            let field = ConfigField::from_prompt(prompt.trim())
                .ok_or_else(|| ConfigError::CorruptPrompt(prompt.trim().to_string()))?;
            if seen & field.bit() != 0 {
                return Err(ConfigError::DuplicatePrompt(field));
            }
            seen |= field.bit();
            config.set(field, value.trim())?;
        }

        let all_seen = ConfigField::ALL.iter().all(|f| seen & f.bit() != 0);
        if !terminated || !all_seen {
            return Err(ConfigError::IncompleteFile);
        }
        Ok(config)
    }

    /// Deserializes a JSON configuration and validates it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] for malformed documents and
    /// [`ConfigError::DataOutOfRange`] for out-of-range values.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every numeric value against its accepted range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DataOutOfRange`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_version(self.version)?;
        check_u32(ConfigField::QuantumCycles, self.quantum_cycles, 0, QUANTUM_MAX)?;
        check_u32(ConfigField::MemoryAvailable, self.memory_kb, 0, MEMORY_KB_MAX)?;
        check_u32(
            ConfigField::ProcessCycleTime,
            self.process_cycle_ms,
            PROCESS_CYCLE_MS_RANGE.0,
            PROCESS_CYCLE_MS_RANGE.1,
        )?;
        check_u32(
            ConfigField::IoCycleTime,
            self.io_cycle_ms,
            IO_CYCLE_MS_RANGE.0,
            IO_CYCLE_MS_RANGE.1,
        )?;
        Ok(())
    }

    /// Resolves relative file paths against `base`.
    #[must_use]
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        if self.metadata_path.is_relative() {
            self.metadata_path = base.join(&self.metadata_path);
        }
        if self.log_path.is_relative() {
            self.log_path = base.join(&self.log_path);
        }
        self
    }

    /// Configuration echo written at the top of a log file.
    pub fn log_header_lines(&self) -> Vec<String> {
        vec![
            "===================================".to_string(),
            "Simulator Log File Header".to_string(),
            String::new(),
            format!(
                "File Name                       : {}",
                self.metadata_path.display()
            ),
            format!("CPU Scheduling                  : {}", self.policy),
            format!("Quantum Cycles                  : {}", self.quantum_cycles),
            format!("Memory Available (KB)           : {}", self.memory_kb),
            format!("Processor Cycle Rate (ms/cycle) : {}", self.process_cycle_ms),
            format!("I/O Cycle Rate (ms/cycle)       : {}", self.io_cycle_ms),
            String::new(),
        ]
    }

    /// Human-readable display of every configuration value.
    pub fn display_lines(&self) -> Vec<String> {
        vec![
            format!("Version                 : {:3.2}", self.version),
            format!("Program file name       : {}", self.metadata_path.display()),
            format!("CPU schedule selection  : {}", self.policy),
            format!("Quantum time            : {}", self.quantum_cycles),
            format!("Memory available (KB)   : {}", self.memory_kb),
            format!("Process cycle rate      : {}", self.process_cycle_ms),
            format!("I/O cycle rate          : {}", self.io_cycle_ms),
            format!("Log to selection        : {}", self.log_to),
            format!("Log file name           : {}", self.log_path.display()),
        ]
    }

    fn set(&mut self, field: ConfigField, value: &str) -> Result<(), ConfigError> {
        match field {
            ConfigField::Version => {
                let version = value.parse().map_err(|_| invalid(field, value))?;
                check_version(version)?;
                self.version = version;
            }
            ConfigField::MetadataPath => self.metadata_path = PathBuf::from(value),
            ConfigField::SchedulingCode => self.policy = value.parse()?,
            ConfigField::QuantumCycles => {
                self.quantum_cycles = parse_u32(field, value, 0, QUANTUM_MAX)?;
            }
            ConfigField::MemoryAvailable => {
                self.memory_kb = parse_u32(field, value, 0, MEMORY_KB_MAX)?;
            }
            ConfigField::ProcessCycleTime => {
                let (lo, hi) = PROCESS_CYCLE_MS_RANGE;
                self.process_cycle_ms = parse_u32(field, value, lo, hi)?;
            }
            ConfigField::IoCycleTime => {
                let (lo, hi) = IO_CYCLE_MS_RANGE;
                self.io_cycle_ms = parse_u32(field, value, lo, hi)?;
            }
            ConfigField::LogTo => self.log_to = value.parse()?,
            ConfigField::LogPath => self.log_path = PathBuf::from(value),
        }
        Ok(())
    }
}

fn invalid(field: ConfigField, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field,
        value: value.to_string(),
    }
}

fn parse_u32(field: ConfigField, value: &str, lo: u32, hi: u32) -> Result<u32, ConfigError> {
    // Negative numbers parse as i64 so they report out-of-range, not invalid.
    let parsed: i64 = value.parse().map_err(|_| invalid(field, value))?;
    let v = u32::try_from(parsed).map_err(|_| ConfigError::DataOutOfRange {
        field,
        value: value.to_string(),
    })?;
    check_u32(field, v, lo, hi)?;
    Ok(v)
}

fn check_u32(field: ConfigField, value: u32, lo: u32, hi: u32) -> Result<(), ConfigError> {
    if (lo..=hi).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::DataOutOfRange {
            field,
            value: value.to_string(),
        })
    }
}

fn check_version(version: f64) -> Result<(), ConfigError> {
    if (VERSION_MIN..=VERSION_MAX).contains(&version) {
        Ok(())
    } else {
        Err(ConfigError::DataOutOfRange {
            field: ConfigField::Version,
            value: version.to_string(),
        })
    }
}
