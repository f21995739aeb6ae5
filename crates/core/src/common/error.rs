//! Fault and error definitions.
//!
//! This module defines the error handling for the simulator. It provides:
//! 1. **Memory Faults:** MMU rejections that terminate a single process.
//! 2. **Lifecycle Errors:** Illegal process state transitions.
//! 3. **Top-level Errors:** Everything surfaced to the caller before or after a run.

use std::io;
use std::path::PathBuf;

use crate::config::ConfigError;
use crate::metadata::MetadataError;
use crate::pcb::ProcessState;

/// A simulated segmentation fault raised by the memory table.
///
/// A fault is always local to the process that issued the request: the process
/// is terminated and the simulation continues with the next scheduled process.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MemoryFault {
    /// Allocation requested a base that is already held by some process.
    #[error("base {base} is already allocated to process {owner}")]
    BaseInUse {
        /// Requested base.
        base: u32,
        /// Process currently holding the base.
        owner: usize,
    },

    /// Allocation requested a base above the process memory ceiling.
    #[error("base {base} exceeds the memory ceiling of {ceiling} KB")]
    BaseOutOfRange {
        /// Requested base.
        base: u32,
        /// Ceiling of the requesting process.
        ceiling: u32,
    },

    /// Access named a segment/base pair the process never allocated.
    #[error("process {owner} owns no region {segment}/{base}")]
    NoSuchRegion {
        /// Requesting process.
        owner: usize,
        /// Requested segment id.
        segment: u32,
        /// Requested base.
        base: u32,
    },

    /// Access went past the offset granted at allocation time.
    #[error("offset {offset} exceeds the granted offset {max_offset}")]
    OffsetOutOfRange {
        /// Requested offset.
        offset: u32,
        /// Offset granted when the region was allocated.
        max_offset: u32,
    },
}

/// An illegal process lifecycle transition.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("process {process} cannot move from {from} to {to}")]
pub struct StateError {
    /// Process whose transition was rejected.
    pub process: usize,
    /// State the process was in.
    pub from: ProcessState,
    /// State that was requested.
    pub to: ProcessState,
}

/// Errors surfaced to the caller of the simulator.
///
/// Loader errors are reported before any process runs; `Monitor` and `LogFile`
/// are reported when the event log cannot be written.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// Configuration could not be loaded or failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Meta-data file could not be loaded or is malformed.
    #[error(transparent)]
    Metadata(#[from] MetadataError),

    /// A process lifecycle invariant was violated.
    #[error(transparent)]
    State(#[from] StateError),

    /// The live monitor sink rejected a write.
    #[error("Monitor Write Error: {0}")]
    Monitor(#[source] io::Error),

    /// The log file could not be written.
    #[error("Log File Write Error ({path}): {source}")]
    LogFile {
        /// Configured log file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
}
