//! Discrete-event operating system simulator library.
//!
//! This crate models a small batch operating system running a program of
//! per-process operation codes:
//! 1. **Program:** Typed operation sequences and the meta-data file loader/writer.
//! 2. **Processes:** Process control blocks and their NEW→READY→RUNNING→EXIT lifecycle.
//! 3. **Scheduling:** Process discovery and FCFS/SJF ordering.
//! 4. **Execution:** Timed CPU and I/O holds plus a fault-raising MMU simulation.
//! 5. **Output:** An ordered, timestamped event log mirrored to a monitor and/or a file.
//! 6. **Simulation:** Configuration, file loading, the run driver and statistics.

/// Shared error types and limits.
pub mod common;
/// Simulator configuration (defaults, enums, text and JSON loading).
pub mod config;
/// Operation executor for a single process.
pub mod executor;
/// Random meta-data program generator.
pub mod generator;
/// Ordered activity log and its monitor/file sinks.
pub mod log;
/// Meta-data (operation code) file parsing and rendering.
pub mod metadata;
/// Memory table simulating a single shared address space.
pub mod mmu;
/// Process control blocks and lifecycle states.
pub mod pcb;
/// Typed operations and validated programs.
pub mod program;
/// Process discovery and ordering policies.
pub mod scheduler;
/// File loading and the simulation driver.
pub mod sim;
/// Simulation statistics collection and reporting.
pub mod stats;
/// Clock and timed-hold primitive.
pub mod timer;

/// Top-level error type returned by the simulator and loaders.
pub use crate::common::SimError;
/// Root configuration type; use `Config::default()`, a configuration file, or JSON.
pub use crate::config::Config;
/// Validated operation sequence.
pub use crate::program::Program;
/// Simulation driver; construct with `Simulator::new`.
pub use crate::sim::simulator::{SimReport, Simulator};
