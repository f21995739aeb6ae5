//! Common types used throughout the simulator.
//!
//! This module provides building blocks shared across components:
//! 1. **Constants:** Configuration ranges and operation-code limits.
//! 2. **Error Handling:** Memory faults, lifecycle errors and the top-level `SimError`.

/// Configuration and operation-code limits.
pub mod constants;

/// Error types for faults, lifecycle violations and loading.
pub mod error;

pub use error::{MemoryFault, SimError, StateError};
