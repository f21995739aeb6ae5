//! Process discovery and scheduling order.
//!
//! Processes always run one at a time to completion. FCFS-N keeps discovery
//! order and SJF-N sorts by estimated total time; the preemptive codes
//! (SRTF-P, FCFS-P, RR-P) are accepted and currently run in FCFS order.

use crate::config::{Config, SchedulingPolicy};
use crate::pcb::ProcessControlBlock;
use crate::program::{Boundary, Operation, Program};

/// Creates one PCB per process block, in discovery order.
///
/// Scanning stops at `S(end)`. Each PCB's cursor points just past its
/// `A(start)` and its estimate sums the timed cost of its operations.
pub fn discover(program: &Program, config: &Config) -> Vec<ProcessControlBlock> {
    let mut pcbs = Vec::new();
    for (index, op) in program.operations().iter().enumerate() {
        match op {
            Operation::System(Boundary::End) => break,
            Operation::Process(Boundary::Start) => {
                let cursor = index + 1;
                let estimate = estimate_ms(program, cursor, config);
                pcbs.push(ProcessControlBlock::new(
                    pcbs.len(),
                    cursor,
                    estimate,
                    config.memory_kb,
                ));
            }
            _ => {}
        }
    }
    tracing::debug!(processes = pcbs.len(), "discovered processes");
    pcbs
}

/// Sums the timed cost of the operations from `cursor` up to the next `A(end)`.
pub fn estimate_ms(program: &Program, cursor: usize, config: &Config) -> u64 {
    program.operations()[cursor.min(program.len())..]
        .iter()
        .take_while(|op| **op != Operation::Process(Boundary::End))
        .map(|op| op.cost_ms(config.process_cycle_ms, config.io_cycle_ms))
        .sum()
}

/// Ordering actually applied for `policy`.
pub const fn effective_policy(policy: SchedulingPolicy) -> SchedulingPolicy {
    match policy {
        SchedulingPolicy::SjfN => SchedulingPolicy::SjfN,
        SchedulingPolicy::FcfsN
        | SchedulingPolicy::SrtfP
        | SchedulingPolicy::FcfsP
        | SchedulingPolicy::RrP => SchedulingPolicy::FcfsN,
    }
}

/// Reorders `pcbs` for execution under `policy`.
pub fn order(policy: SchedulingPolicy, pcbs: &mut [ProcessControlBlock]) {
    if policy.is_preemptive() {
        tracing::warn!(
            policy = %policy,
            "preemptive policy is not differentiated; running FCFS-N order"
        );
    }
    if effective_policy(policy) == SchedulingPolicy::SjfN {
        shortest_job_first(pcbs);
    }
    tracing::debug!(
        order = ?pcbs.iter().map(ProcessControlBlock::id).collect::<Vec<_>>(),
        "scheduling order"
    );
}

/// Stable insertion sort by estimated time; equal estimates keep discovery order.
fn shortest_job_first(pcbs: &mut [ProcessControlBlock]) {
    for i in 1..pcbs.len() {
        let mut j = i;
        while j > 0 && pcbs[j - 1].estimated_time_ms() > pcbs[j].estimated_time_ms() {
            pcbs.swap(j - 1, j);
            j -= 1;
        }
    }
}
