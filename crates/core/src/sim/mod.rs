//! Simulation driver and file loading.
//!
//! Provides utilities for loading configuration and meta-data files from
//! disk and the driver that runs a loaded program to completion.

pub mod loader;
pub mod simulator;
