//! # Executor Tests
//!
//! Single-process execution: timed holds, log line pairs, memory outcomes and
//! cursor/remaining-time bookkeeping.

use crate::common::harness::{config, processes};
use crate::common::mocks::clock::VirtualClock;
use crate::common::mocks::monitor::SharedBuffer;
use ossim_core::common::MemoryFault;
use ossim_core::config::LogTarget;
use ossim_core::executor::{self, ExecContext, ProcessOutcome};
use ossim_core::log::EventLog;
use ossim_core::mmu::MemoryTable;
use ossim_core::pcb::ProcessControlBlock;
use ossim_core::program::{Boundary, MemoryAction, MemoryRequest, Operation, Program};
use ossim_core::scheduler;
use ossim_core::stats::SimStats;
use pretty_assertions::assert_eq;
use std::time::Duration;

struct Fixture {
    clock: VirtualClock,
    log: EventLog,
    memory: MemoryTable,
    stats: SimStats,
}

impl Fixture {
    fn new() -> Self {
        Self {
            clock: VirtualClock::new(),
            log: EventLog::with_monitor(LogTarget::Monitor, Box::new(SharedBuffer::new())),
            memory: MemoryTable::new(),
            stats: SimStats::default(),
        }
    }

    fn run(&mut self, pcb: &mut ProcessControlBlock, program: &Program) -> ProcessOutcome {
        let config = config();
        let mut ctx = ExecContext {
            config: &config,
            clock: &self.clock,
            log: &mut self.log,
            memory: &mut self.memory,
            stats: &mut self.stats,
        };
        executor::run(pcb, program, &mut ctx).unwrap()
    }

    fn messages(&self) -> Vec<String> {
        self.log.events().iter().map(|e| e.message.clone()).collect()
    }
}

fn first_pcb(program: &Program) -> ProcessControlBlock {
    scheduler::discover(program, &config()).remove(0)
}

#[test]
fn test_timed_operations_hold_and_log_pairs() {
    let program = processes(&["P(run)2; I(hard drive)1; O(printer)3;"]);
    let mut pcb = first_pcb(&program);
    let mut fx = Fixture::new();

    assert_eq!(fx.run(&mut pcb, &program), ProcessOutcome::Completed);
    assert_eq!(
        fx.messages(),
        vec![
            "run operation start",
            "run operation end",
            "hard drive input start",
            "hard drive input end",
            "printer output start",
            "printer output end",
        ]
    );
    assert_eq!(
        fx.clock.holds(),
        vec![
            Duration::from_millis(20),
            Duration::from_millis(20),
            Duration::from_millis(60),
        ]
    );
    assert_eq!(pcb.remaining_time_ms(), 0);
    assert_eq!(
        program.get(pcb.cursor()),
        Some(&Operation::Process(Boundary::End))
    );
    assert_eq!(fx.stats.compute_ms, 20);
    assert_eq!(fx.stats.io_ms, 80);
}

#[test]
fn test_end_timestamp_follows_hold() {
    let program = processes(&["I(keyboard)5;"]);
    let mut pcb = first_pcb(&program);
    let mut fx = Fixture::new();
    let _ = fx.run(&mut pcb, &program);

    let events = fx.log.events();
    assert_eq!(events[1].timestamp - events[0].timestamp, Duration::from_millis(100));
}

#[test]
fn test_memory_success_lines() {
    let program = processes(&["M(allocate)50010; M(access)50005;"]);
    let mut pcb = first_pcb(&program);
    let mut fx = Fixture::new();

    assert_eq!(fx.run(&mut pcb, &program), ProcessOutcome::Completed);
    assert_eq!(
        fx.messages(),
        vec![
            "MMU attempt to allocate 0/50/10",
            "MMU successful allocation",
            "MMU attempt to access 0/50/5",
            "MMU successful access",
        ]
    );
    assert!(fx.clock.holds().is_empty());
    assert_eq!(fx.memory.regions_of(0).count(), 1);
}

#[test]
fn test_fault_skips_remaining_operations() {
    let program = processes(&["M(allocate)50010; M(access)50020; P(run)4;"]);
    let mut pcb = first_pcb(&program);
    let mut fx = Fixture::new();

    let outcome = fx.run(&mut pcb, &program);
    assert_eq!(
        outcome,
        ProcessOutcome::Faulted {
            op: Operation::Memory {
                action: MemoryAction::Access,
                request: MemoryRequest::new(0, 50, 20),
            },
            fault: MemoryFault::OffsetOutOfRange {
                offset: 20,
                max_offset: 10,
            },
        }
    );
    assert_eq!(
        fx.messages(),
        vec![
            "MMU attempt to allocate 0/50/10",
            "MMU successful allocation",
            "MMU attempt to access 0/50/20",
            "MMU failed to access",
            "experiences segmentation fault",
        ]
    );
    assert!(fx.clock.holds().is_empty());
    assert_eq!(pcb.remaining_time_ms(), 40);
    assert_eq!(fx.stats.mem_faults, 1);
}

#[test]
fn test_allocation_above_ceiling_faults() {
    let program = processes(&["M(allocate)2999000;"]);
    let mut pcb = first_pcb(&program);
    let mut tight = ProcessControlBlock::new(0, pcb.cursor(), 0, 500);
    let mut fx = Fixture::new();

    assert!(matches!(
        fx.run(&mut tight, &program),
        ProcessOutcome::Faulted {
            fault: MemoryFault::BaseOutOfRange {
                base: 999,
                ceiling: 500
            },
            ..
        }
    ));
    assert_eq!(fx.messages()[1], "MMU failed to allocate");
    assert_eq!(fx.run(&mut pcb, &program), ProcessOutcome::Completed);
}
