//! Random meta-data program generator.
//!
//! Produces programs of `P(run)`, `I(..)` and `O(..)` operations for
//! exercising the simulator. Each non-processing operation picks a device
//! with fixed odds, and its cycle count is a uniform 5 to 15 scaled by the
//! device's speed factor.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::program::{Device, Operation, Program, ProgramError};

const CYCLES_MIN: u32 = 5;
const CYCLES_MAX: u32 = 15;
const INPUT_ODDS: u32 = 50;
const OUTPUT_ODDS: u32 = 33;

/// Generator parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Process blocks to generate.
    pub programs: usize,
    /// Operations per process, markers excluded.
    pub ops_per_program: usize,
    /// Chance of each operation being `P(run)`, in percent (clamped to 100).
    pub processing_percent: u32,
    /// Seed for reproducible output; `None` seeds from the thread RNG.
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            programs: 5,
            ops_per_program: 10,
            processing_percent: 50,
            seed: None,
        }
    }
}

/// Stateful program generator.
#[derive(Debug)]
pub struct Generator {
    config: GeneratorConfig,
    rng: ChaCha8Rng,
    first_io: bool,
}

impl Generator {
    /// Creates a generator; the RNG is seeded from `config.seed` when given.
    pub fn new(config: GeneratorConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_rng(&mut rand::rng()),
        };
        Self {
            config,
            rng,
            first_io: true,
        }
    }

    /// Generates one program.
    ///
    /// The first I/O operation of a generator's lifetime is always an input.
    ///
    /// # Errors
    ///
    /// Propagates [`ProgramError`] from [`Program::from_processes`]; generated
    /// bodies never contain markers, so this does not occur in practice.
    pub fn generate(&mut self) -> Result<Program, ProgramError> {
        let bodies: Vec<Vec<Operation>> = (0..self.config.programs)
            .map(|_| {
                (0..self.config.ops_per_program)
                    .map(|_| self.next_op())
                    .collect()
            })
            .collect();
        let program = Program::from_processes(bodies)?;
        tracing::debug!(
            programs = self.config.programs,
            operations = program.len(),
            "program generated"
        );
        Ok(program)
    }

    fn next_op(&mut self) -> Operation {
        if self.odds(self.config.processing_percent) {
            return Operation::Compute {
                cycles: self.cycles(1),
            };
        }

        if self.first_io || self.odds(INPUT_ODDS) {
            self.first_io = false;
            let (device, factor) = if self.odds(INPUT_ODDS) {
                (Device::HardDrive, 3)
            } else {
                (Device::Keyboard, 10)
            };
            Operation::Input {
                device,
                cycles: self.cycles(factor),
            }
        } else {
            let (device, factor) = if self.odds(OUTPUT_ODDS) {
                (Device::HardDrive, 3)
            } else if self.odds(OUTPUT_ODDS) {
                (Device::Monitor, 2)
            } else {
                (Device::Printer, 5)
            };
            Operation::Output {
                device,
                cycles: self.cycles(factor),
            }
        }
    }

    /// True with `percent` odds, drawn as `1..=100 <= percent`.
    fn odds(&mut self, percent: u32) -> bool {
        self.rng.random_range(1..=100) <= percent.min(100)
    }

    fn cycles(&mut self, factor: u32) -> u32 {
        self.rng.random_range(CYCLES_MIN..=CYCLES_MAX) * factor
    }
}
