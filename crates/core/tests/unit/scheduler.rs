//! # Scheduler Tests
//!
//! Process discovery, time estimates and FCFS/SJF ordering.

use crate::common::harness::{config, processes};
use ossim_core::config::SchedulingPolicy;
use ossim_core::pcb::{ProcessControlBlock, ProcessState};
use ossim_core::scheduler;
use proptest::prelude::*;
use rstest::rstest;

fn ids(pcbs: &[ProcessControlBlock]) -> Vec<usize> {
    pcbs.iter().map(ProcessControlBlock::id).collect()
}

#[test]
fn test_discover_creates_new_pcbs_with_estimates() {
    let program = processes(&["P(run)2; I(keyboard)3;", "O(monitor)1;", ""]);
    let pcbs = scheduler::discover(&program, &config());

    assert_eq!(ids(&pcbs), vec![0, 1, 2]);
    assert!(pcbs.iter().all(|p| p.state() == ProcessState::New));
    assert_eq!(pcbs[0].estimated_time_ms(), 2 * 10 + 3 * 20);
    assert_eq!(pcbs[1].estimated_time_ms(), 20);
    assert_eq!(pcbs[2].estimated_time_ms(), 0);
    assert_eq!(pcbs[0].cursor(), 2);
    assert_eq!(pcbs[0].memory_ceiling_kb(), 1000);
}

#[test]
fn test_memory_ops_cost_nothing() {
    let program = processes(&["M(allocate)1010050; P(run)1; M(access)1010020;"]);
    let pcbs = scheduler::discover(&program, &config());
    assert_eq!(pcbs[0].estimated_time_ms(), 10);
}

#[rstest]
#[case(SchedulingPolicy::FcfsN, vec![0, 1, 2, 3])]
#[case(SchedulingPolicy::SjfN, vec![1, 3, 2, 0])]
#[case(SchedulingPolicy::SrtfP, vec![0, 1, 2, 3])]
#[case(SchedulingPolicy::FcfsP, vec![0, 1, 2, 3])]
#[case(SchedulingPolicy::RrP, vec![0, 1, 2, 3])]
fn test_order(#[case] policy: SchedulingPolicy, #[case] expected: Vec<usize>) {
    let program = processes(&["P(run)9;", "P(run)1;", "P(run)4;", "P(run)1;"]);
    let mut pcbs = scheduler::discover(&program, &config());
    scheduler::order(policy, &mut pcbs);
    assert_eq!(ids(&pcbs), expected);
}

proptest! {
    #[test]
    fn prop_sjf_is_sorted_and_stable(estimates in prop::collection::vec(0u64..50, 0..24)) {
        let mut pcbs: Vec<_> = estimates
            .iter()
            .enumerate()
            .map(|(id, &e)| ProcessControlBlock::new(id, 0, e, 0))
            .collect();
        scheduler::order(SchedulingPolicy::SjfN, &mut pcbs);

        for pair in pcbs.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(a.estimated_time_ms() <= b.estimated_time_ms());
            if a.estimated_time_ms() == b.estimated_time_ms() {
                prop_assert!(a.id() < b.id());
            }
        }
    }

    #[test]
    fn prop_fcfs_keeps_discovery_order(estimates in prop::collection::vec(0u64..50, 0..24)) {
        let mut pcbs: Vec<_> = estimates
            .iter()
            .enumerate()
            .map(|(id, &e)| ProcessControlBlock::new(id, 0, e, 0))
            .collect();
        scheduler::order(SchedulingPolicy::FcfsN, &mut pcbs);
        prop_assert_eq!(ids(&pcbs), (0..estimates.len()).collect::<Vec<_>>());
    }
}
