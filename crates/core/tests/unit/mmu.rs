//! # Memory Table Tests
//!
//! Allocation and access rules of the shared memory table, including
//! property tests over random request sequences.

use ossim_core::common::MemoryFault;
use ossim_core::mmu::MemoryTable;
use ossim_core::program::MemoryRequest;
use proptest::prelude::*;
use std::collections::HashSet;

const CEILING: u32 = 1000;

#[test]
fn test_allocate_then_access_within_offset() {
    let mut table = MemoryTable::new();
    let region = table
        .allocate(0, MemoryRequest::new(1, 50, 10), CEILING)
        .unwrap();
    assert_eq!(region.max_offset, 10);
    assert!(table.access(0, MemoryRequest::new(1, 50, 10)).is_ok());
    assert!(table.access(0, MemoryRequest::new(1, 50, 0)).is_ok());
}

#[test]
fn test_access_past_offset_faults() {
    let mut table = MemoryTable::new();
    let _ = table
        .allocate(0, MemoryRequest::new(0, 50, 10), CEILING)
        .unwrap();
    assert_eq!(
        table.access(0, MemoryRequest::new(0, 50, 20)),
        Err(MemoryFault::OffsetOutOfRange {
            offset: 20,
            max_offset: 10
        })
    );
}

#[test]
fn test_base_collision_is_global() {
    let mut table = MemoryTable::new();
    let _ = table
        .allocate(0, MemoryRequest::new(0, 100, 50), CEILING)
        .unwrap();
    assert_eq!(
        table.allocate(1, MemoryRequest::new(3, 100, 5), CEILING),
        Err(MemoryFault::BaseInUse {
            base: 100,
            owner: 0
        })
    );
    assert_eq!(
        table.allocate(0, MemoryRequest::new(2, 100, 5), CEILING),
        Err(MemoryFault::BaseInUse {
            base: 100,
            owner: 0
        })
    );
}

#[test]
fn test_base_above_ceiling_faults() {
    let mut table = MemoryTable::new();
    assert_eq!(
        table.allocate(0, MemoryRequest::new(0, 900, 1), 500),
        Err(MemoryFault::BaseOutOfRange {
            base: 900,
            ceiling: 500
        })
    );
    assert!(table.allocate(0, MemoryRequest::new(0, 500, 1), 500).is_ok());
}

#[test]
fn test_access_requires_owner_segment_and_base() {
    let mut table = MemoryTable::new();
    let _ = table
        .allocate(0, MemoryRequest::new(1, 20, 30), CEILING)
        .unwrap();
    for (owner, request) in [
        (1, MemoryRequest::new(1, 20, 1)),
        (0, MemoryRequest::new(2, 20, 1)),
        (0, MemoryRequest::new(1, 21, 1)),
    ] {
        assert!(matches!(
            table.access(owner, request),
            Err(MemoryFault::NoSuchRegion { .. })
        ));
    }
}

#[test]
fn test_release_frees_bases_for_reuse() {
    let mut table = MemoryTable::new();
    let _ = table.allocate(0, MemoryRequest::new(0, 1, 1), CEILING).unwrap();
    let _ = table.allocate(0, MemoryRequest::new(0, 2, 1), CEILING).unwrap();
    let _ = table.allocate(1, MemoryRequest::new(0, 3, 1), CEILING).unwrap();

    assert_eq!(table.release(0), 2);
    assert_eq!(table.regions_of(0).count(), 0);
    assert_eq!(table.regions_of(1).count(), 1);
    assert!(table.allocate(2, MemoryRequest::new(0, 1, 1), CEILING).is_ok());
}

#[test]
fn test_clear_empties_table() {
    let mut table = MemoryTable::new();
    let _ = table.allocate(0, MemoryRequest::new(0, 1, 1), CEILING).unwrap();
    let _ = table.allocate(1, MemoryRequest::new(0, 2, 1), CEILING).unwrap();
    table.clear();
    assert!(table.regions().is_empty());
}

proptest! {
    #[test]
    fn prop_bases_stay_unique(
        requests in prop::collection::vec((0usize..4, 0u32..10, 0u32..20, 0u32..50), 0..64)
    ) {
        let mut table = MemoryTable::new();
        for (owner, segment, base, offset) in requests {
            let _ = table.allocate(owner, MemoryRequest::new(segment, base, offset), CEILING);
        }
        let mut seen = HashSet::new();
        for region in table.regions() {
            prop_assert!(seen.insert(region.base), "duplicate base {}", region.base);
        }
    }

    #[test]
    fn prop_access_succeeds_iff_region_covers_offset(
        granted in 0u32..100,
        requested in 0u32..200,
        same_owner in any::<bool>(),
    ) {
        let mut table = MemoryTable::new();
        let _ = table.allocate(0, MemoryRequest::new(4, 7, granted), CEILING).unwrap();
        let owner = if same_owner { 0 } else { 1 };
        let result = table.access(owner, MemoryRequest::new(4, 7, requested));
        prop_assert_eq!(result.is_ok(), same_owner && requested <= granted);
    }
}
