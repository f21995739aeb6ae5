//! Simulator: owns the program, the memory table and the event log side by side.
//!
//! A run walks the driver phases in a fixed order. Processes are created from
//! the program, admitted together, ordered by the scheduler and then run one
//! at a time to completion or fault.

use std::fmt;
use std::io::Write;
use std::time::Duration;

use crate::common::SimError;
use crate::common::constants::BANNER_RULE;
use crate::config::Config;
use crate::executor::{self, ExecContext, ProcessOutcome};
use crate::log::{EventLog, LogLine, Subject};
use crate::mmu::MemoryTable;
use crate::pcb::{ProcessControlBlock, ProcessState};
use crate::program::Program;
use crate::scheduler;
use crate::stats::SimStats;
use crate::timer::{Clock, WallClock};

/// Driver phases, entered strictly in declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum DriverPhase {
    /// Constructed, nothing logged.
    Init,
    /// Begin banner and `System Start`.
    SystemStart,
    /// PCBs created in `New`.
    PcbCreate,
    /// Every PCB moved to `Ready`.
    PcbReady,
    /// One iteration per scheduled PCB.
    RunningLoop,
    /// `System Stop` and end banner.
    SystemStop,
    /// Log finalized.
    Done,
}

impl fmt::Display for DriverPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Final record of one process.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessReport {
    /// Process id (discovery order).
    pub id: usize,
    /// How execution ended.
    pub outcome: ProcessOutcome,
    /// States entered, oldest first.
    pub history: Vec<ProcessState>,
    /// Estimated total time used for scheduling.
    pub estimated_time_ms: u64,
    /// Time left unexecuted (non-zero only after a fault).
    pub remaining_time_ms: u64,
}

/// Result of a completed run.
#[derive(Clone, Debug)]
pub struct SimReport {
    /// Process ids in execution order.
    pub order: Vec<usize>,
    /// Per-process records, in execution order.
    pub processes: Vec<ProcessReport>,
    /// Every rendered log line, banners included.
    pub lines: Vec<String>,
    /// Every timestamped event.
    pub events: Vec<LogLine>,
    /// Run statistics.
    pub stats: SimStats,
    /// Clock reading at `System Stop`.
    pub elapsed: Duration,
}

impl SimReport {
    /// Record of process `id`, if it was scheduled.
    pub fn process(&self, id: usize) -> Option<&ProcessReport> {
        self.processes.iter().find(|p| p.id == id)
    }

    /// Rendered lines of one process's events, in creation order.
    pub fn process_lines(&self, id: usize) -> Vec<String> {
        self.events
            .iter()
            .filter(|e| e.subject == Subject::Process(id))
            .map(ToString::to_string)
            .collect()
    }
}

/// Top-level simulator.
pub struct Simulator {
    config: Config,
    program: Program,
    clock: Box<dyn Clock>,
    log: EventLog,
    memory: MemoryTable,
    stats: SimStats,
    phase: DriverPhase,
}

impl fmt::Debug for Simulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulator")
            .field("config", &self.config)
            .field("operations", &self.program.len())
            .field("phase", &self.phase)
            .finish_non_exhaustive()
    }
}

impl Simulator {
    /// Creates a simulator on the wall clock, mirroring to standard output.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] if `config` fails validation.
    pub fn new(config: Config, program: Program) -> Result<Self, SimError> {
        config.validate()?;
        let log = EventLog::new(config.log_to);
        Ok(Self {
            config,
            program,
            clock: Box::new(WallClock::new()),
            log,
            memory: MemoryTable::new(),
            stats: SimStats::default(),
            phase: DriverPhase::Init,
        })
    }

    /// Replaces the clock.
    #[must_use]
    pub fn with_clock(mut self, clock: Box<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the monitor sink.
    #[must_use]
    pub fn with_monitor(mut self, monitor: Box<dyn Write + Send>) -> Self {
        self.log = EventLog::with_monitor(self.config.log_to, monitor);
        self
    }

    /// Configuration in use.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Current driver phase.
    pub const fn phase(&self) -> DriverPhase {
        self.phase
    }

    /// Runs every process and finalizes the log.
    ///
    /// A memory fault ends only the faulting process.
    ///
    /// # Errors
    ///
    /// Returns a [`SimError`] if a log sink fails or a PCB is driven through
    /// an invalid transition.
    pub fn run(mut self) -> Result<SimReport, SimError> {
        self.enter(DriverPhase::SystemStart);
        self.log.banner(BANNER_RULE)?;
        self.log.banner("Begin Simulation")?;
        self.os("System Start")?;

        self.enter(DriverPhase::PcbCreate);
        self.os("Create Process Control Blocks")?;
        let mut pcbs = scheduler::discover(&self.program, &self.config);
        self.os("All Processes initialized in NEW state")?;

        self.enter(DriverPhase::PcbReady);
        for pcb in &mut pcbs {
            pcb.transition(ProcessState::Ready)?;
        }
        self.os("All Processes now set in READY state")?;
        scheduler::order(self.config.policy, &mut pcbs);

        self.enter(DriverPhase::RunningLoop);
        self.stats.processes = pcbs.len() as u64;
        let order: Vec<usize> = pcbs.iter().map(ProcessControlBlock::id).collect();
        let mut processes = Vec::with_capacity(pcbs.len());
        for pcb in pcbs {
            processes.push(self.run_process(pcb)?);
        }

        self.enter(DriverPhase::SystemStop);
        self.os("System Stop")?;
        let elapsed = self.clock.elapsed();
        self.log.banner("End Simulation - Complete")?;
        self.log.banner(BANNER_RULE)?;

        self.enter(DriverPhase::Done);
        self.log.finalize(&self.config)?;
        self.memory.clear();
        tracing::info!(
            processes = self.stats.processes,
            faulted = self.stats.processes_faulted,
            elapsed_ms = elapsed.as_millis(),
            "simulation complete"
        );

        Ok(SimReport {
            order,
            processes,
            lines: self.log.lines().to_vec(),
            events: self.log.events().to_vec(),
            stats: self.stats,
            elapsed,
        })
    }

    fn run_process(&mut self, mut pcb: ProcessControlBlock) -> Result<ProcessReport, SimError> {
        let id = pcb.id();
        self.os(format!(
            "Process {id} selected with {} ms remaining",
            pcb.remaining_time_ms()
        ))?;
        pcb.transition(ProcessState::Running)?;
        self.os(format!("Process {id} set in RUNNING state"))?;

        let mut ctx = ExecContext {
            config: &self.config,
            clock: self.clock.as_ref(),
            log: &mut self.log,
            memory: &mut self.memory,
            stats: &mut self.stats,
        };
        let outcome = executor::run(&mut pcb, &self.program, &mut ctx)?;

        match outcome {
            ProcessOutcome::Completed => self.stats.processes_completed += 1,
            ProcessOutcome::Faulted { .. } => self.stats.processes_faulted += 1,
        }
        let released = self.memory.release(id);
        self.stats.mem_released += released as u64;

        pcb.transition(ProcessState::Exit)?;
        self.os(format!("Process {id} ended and set in EXIT state"))?;
        tracing::debug!(process = id, ?outcome, released, "process exited");

        Ok(ProcessReport {
            id,
            outcome,
            history: pcb.history().to_vec(),
            estimated_time_ms: pcb.estimated_time_ms(),
            remaining_time_ms: pcb.remaining_time_ms(),
        })
    }

    fn enter(&mut self, phase: DriverPhase) {
        tracing::debug!(from = %self.phase, to = %phase, "driver phase");
        self.phase = phase;
    }

    fn os(&mut self, message: impl Into<String>) -> Result<(), SimError> {
        self.log.record(self.clock.elapsed(), Subject::Os, message)
    }
}
