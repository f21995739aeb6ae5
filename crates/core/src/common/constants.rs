//! Global Simulator Constants.
//!
//! This module defines limits shared by the loaders and the validator. It includes:
//! 1. **Configuration Ranges:** Accepted bounds for every numeric configuration value.
//! 2. **Operation-Code Limits:** Value width and memory operand packing.
//! 3. **Output Constants:** Banner text and generator line width.

/// Lowest accepted configuration version.
pub const VERSION_MIN: f64 = 0.0;

/// Highest accepted configuration version.
pub const VERSION_MAX: f64 = 10.0;

/// Highest accepted quantum, in cycles.
pub const QUANTUM_MAX: u32 = 100;

/// Highest accepted memory ceiling, in KB.
pub const MEMORY_KB_MAX: u32 = 102_400;

/// Accepted processor cycle time range, in ms/cycle.
pub const PROCESS_CYCLE_MS_RANGE: (u32, u32) = (1, 1000);

/// Accepted I/O cycle time range, in ms/cycle.
pub const IO_CYCLE_MS_RANGE: (u32, u32) = (1, 10_000);

/// Maximum number of digits in an operation-code value.
pub const MAX_OP_VALUE_DIGITS: usize = 8;

/// Divisor extracting the segment id from a packed memory operand.
pub const SEGMENT_DIVISOR: u32 = 1_000_000;

/// Divisor/modulus extracting base and offset from a packed memory operand.
pub const FIELD_DIVISOR: u32 = 1000;

/// Separator line around the simulation run.
pub const BANNER_RULE: &str = "==================================";

/// Maximum rendered meta-data line length before wrapping.
pub const MAX_LINE_LENGTH: usize = 55;
