//! Process control blocks.
//!
//! A PCB is created in `New` for every `A(start)` marker and walks
//! `New → Ready → Running → Exit` exactly once. Any other transition is
//! rejected with a [`StateError`].

use std::fmt;

use crate::common::StateError;

/// Lifecycle state of a simulated process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProcessState {
    /// Discovered, not yet admitted.
    New,
    /// Admitted and waiting to be selected.
    Ready,
    /// Executing its operations.
    Running,
    /// Finished or terminated by a fault.
    Exit,
}

impl ProcessState {
    /// The only state reachable from `self`, if any.
    pub const fn successor(self) -> Option<Self> {
        match self {
            Self::New => Some(Self::Ready),
            Self::Ready => Some(Self::Running),
            Self::Running => Some(Self::Exit),
            Self::Exit => None,
        }
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::New => "NEW",
            Self::Ready => "READY",
            Self::Running => "RUNNING",
            Self::Exit => "EXIT",
        })
    }
}

/// Runtime record of one simulated process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessControlBlock {
    id: usize,
    state: ProcessState,
    cursor: usize,
    estimated_time_ms: u64,
    remaining_time_ms: u64,
    memory_ceiling_kb: u32,
    history: Vec<ProcessState>,
}

impl ProcessControlBlock {
    /// Creates a PCB in `New`.
    ///
    /// * `cursor` - Index of the first operation after the process's `A(start)`.
    /// * `estimated_time_ms` - Total timed cost of the process, used for ordering.
    /// * `memory_ceiling_kb` - Highest base the process may allocate.
    pub fn new(id: usize, cursor: usize, estimated_time_ms: u64, memory_ceiling_kb: u32) -> Self {
        Self {
            id,
            state: ProcessState::New,
            cursor,
            estimated_time_ms,
            remaining_time_ms: estimated_time_ms,
            memory_ceiling_kb,
            history: vec![ProcessState::New],
        }
    }

    /// Sequential id in discovery order.
    pub const fn id(&self) -> usize {
        self.id
    }

    /// Current state.
    pub const fn state(&self) -> ProcessState {
        self.state
    }

    /// Index of the next operation to execute.
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Precomputed total cost; never changes.
    pub const fn estimated_time_ms(&self) -> u64 {
        self.estimated_time_ms
    }

    /// Cost of the operations not yet completed.
    pub const fn remaining_time_ms(&self) -> u64 {
        self.remaining_time_ms
    }

    /// Memory ceiling copied from the configuration.
    pub const fn memory_ceiling_kb(&self) -> u32 {
        self.memory_ceiling_kb
    }

    /// Every state entered so far, oldest first.
    pub fn history(&self) -> &[ProcessState] {
        &self.history
    }

    /// Moves to `next`.
    ///
    /// # Errors
    ///
    /// Returns a [`StateError`] unless `next` is the successor of the current state.
    pub fn transition(&mut self, next: ProcessState) -> Result<(), StateError> {
        if self.state.successor() != Some(next) {
            return Err(StateError {
                process: self.id,
                from: self.state,
                to: next,
            });
        }
        self.state = next;
        self.history.push(next);
        Ok(())
    }

    /// Moves the cursor one operation forward.
    pub const fn advance(&mut self) {
        self.cursor += 1;
    }

    /// Charges a completed operation against the remaining time.
    pub const fn charge(&mut self, cost_ms: u64) {
        self.remaining_time_ms = self.remaining_time_ms.saturating_sub(cost_ms);
    }
}
