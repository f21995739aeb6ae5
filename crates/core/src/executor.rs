//! Operation executor.
//!
//! Walks one process's operations from its cursor to `A(end)`. Compute and
//! I/O operations are timed holds bracketed by start/end log lines; memory
//! operations go through the MMU, and a rejected request is a segmentation
//! fault that ends the process immediately.

use std::time::Duration;

use crate::common::{MemoryFault, SimError};
use crate::config::Config;
use crate::log::{EventLog, Subject};
use crate::mmu::MemoryTable;
use crate::pcb::ProcessControlBlock;
use crate::program::{Boundary, MemoryAction, MemoryRequest, Operation, Program};
use crate::stats::SimStats;
use crate::timer::Clock;

/// How an executor pass ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProcessOutcome {
    /// Reached `A(end)`.
    Completed,
    /// Terminated by a segmentation fault; later operations were skipped.
    Faulted {
        /// The memory operation that faulted.
        op: Operation,
        /// Why the MMU rejected it.
        fault: MemoryFault,
    },
}

/// Shared state an executor pass reads and mutates.
pub struct ExecContext<'a> {
    /// Run configuration (cycle rates).
    pub config: &'a Config,
    /// Clock for timestamps and holds.
    pub clock: &'a dyn Clock,
    /// Destination of every event.
    pub log: &'a mut EventLog,
    /// Global memory table.
    pub memory: &'a mut MemoryTable,
    /// Run statistics.
    pub stats: &'a mut SimStats,
}

impl std::fmt::Debug for ExecContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecContext")
            .field("log", &self.log)
            .field("memory", &self.memory)
            .finish_non_exhaustive()
    }
}

impl ExecContext<'_> {
    /// Records an event stamped with the current clock time.
    ///
    /// # Errors
    ///
    /// Propagates monitor write failures.
    pub fn record(&mut self, subject: Subject, message: impl Into<String>) -> Result<(), SimError> {
        self.log.record(self.clock.elapsed(), subject, message)
    }
}

/// Executes `pcb` until its `A(end)` or a segmentation fault.
///
/// # Errors
///
/// Only log sink failures are errors; a memory fault is reported through
/// [`ProcessOutcome::Faulted`].
pub fn run(
    pcb: &mut ProcessControlBlock,
    program: &Program,
    ctx: &mut ExecContext<'_>,
) -> Result<ProcessOutcome, SimError> {
    let rates = (ctx.config.process_cycle_ms, ctx.config.io_cycle_ms);

    while let Some(&op) = program.get(pcb.cursor()) {
        tracing::trace!(process = pcb.id(), cursor = pcb.cursor(), %op, "execute");
        match op {
            Operation::Process(Boundary::End) => break,
            Operation::Compute { .. } => {
                ctx.stats.ops_compute += 1;
                let cost = op.cost_ms(rates.0, rates.1);
                ctx.stats.compute_ms += cost;
                hold(pcb, ctx, "run operation", cost)?;
            }
            Operation::Input { device, .. } => {
                ctx.stats.ops_input += 1;
                let cost = op.cost_ms(rates.0, rates.1);
                ctx.stats.io_ms += cost;
                hold(pcb, ctx, &format!("{} input", device.name()), cost)?;
            }
            Operation::Output { device, .. } => {
                ctx.stats.ops_output += 1;
                let cost = op.cost_ms(rates.0, rates.1);
                ctx.stats.io_ms += cost;
                hold(pcb, ctx, &format!("{} output", device.name()), cost)?;
            }
            Operation::Memory { action, request } => {
                ctx.stats.ops_memory += 1;
                if let Err(fault) = memory(pcb, ctx, action, request)? {
                    ctx.record(
                        Subject::Process(pcb.id()),
                        "experiences segmentation fault",
                    )?;
                    tracing::debug!(process = pcb.id(), %op, %fault, "segmentation fault");
                    return Ok(ProcessOutcome::Faulted { op, fault });
                }
            }
            // Unreachable in a validated program: a block holds no other markers.
            Operation::System(_) | Operation::Process(Boundary::Start) => break,
        }
        pcb.advance();
    }
    Ok(ProcessOutcome::Completed)
}

/// Runs one timed hold bracketed by `<label> start` / `<label> end`.
fn hold(
    pcb: &mut ProcessControlBlock,
    ctx: &mut ExecContext<'_>,
    label: &str,
    cost_ms: u64,
) -> Result<(), SimError> {
    let subject = Subject::Process(pcb.id());
    ctx.record(subject, format!("{label} start"))?;
    ctx.clock.hold(Duration::from_millis(cost_ms));
    ctx.record(subject, format!("{label} end"))?;
    pcb.charge(cost_ms);
    Ok(())
}

/// Performs one MMU request; the inner result carries the fault, if any.
fn memory(
    pcb: &ProcessControlBlock,
    ctx: &mut ExecContext<'_>,
    action: MemoryAction,
    request: MemoryRequest,
) -> Result<Result<(), MemoryFault>, SimError> {
    let subject = Subject::Process(pcb.id());
    ctx.record(subject, format!("MMU attempt to {} {request}", action.name()))?;

    let result = match action {
        MemoryAction::Allocate => ctx
            .memory
            .allocate(pcb.id(), request, pcb.memory_ceiling_kb())
            .map(|_| ()),
        MemoryAction::Access => ctx.memory.access(pcb.id(), request).map(|_| ()),
    };

    match (&result, action) {
        (Ok(()), MemoryAction::Allocate) => {
            ctx.stats.mem_allocations += 1;
            ctx.record(subject, "MMU successful allocation")?;
        }
        (Ok(()), MemoryAction::Access) => {
            ctx.stats.mem_accesses += 1;
            ctx.record(subject, "MMU successful access")?;
        }
        (Err(_), MemoryAction::Allocate) => {
            ctx.stats.mem_faults += 1;
            ctx.record(subject, "MMU failed to allocate")?;
        }
        (Err(_), MemoryAction::Access) => {
            ctx.stats.mem_faults += 1;
            ctx.record(subject, "MMU failed to access")?;
        }
    }
    Ok(result)
}
