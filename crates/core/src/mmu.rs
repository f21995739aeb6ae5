//! Memory Management Unit (MMU) simulation.
//!
//! The memory table models a single shared physical address space: it is
//! global across processes, so two processes can never hold regions with the
//! same base. Capacity is checked only against the single requested base, never
//! against the sum of granted regions, and regions are never resized,
//! coalesced or released individually.

use crate::common::MemoryFault;
use crate::program::MemoryRequest;

/// A granted memory region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemoryRegion {
    /// Process that allocated the region.
    pub owner: usize,
    /// Segment id named at allocation.
    pub segment: u32,
    /// Base address; unique across the table.
    pub base: u32,
    /// Highest offset an access may request.
    pub max_offset: u32,
}

/// Table of live regions for every process.
#[derive(Clone, Debug, Default)]
pub struct MemoryTable {
    regions: Vec<MemoryRegion>,
}

impl MemoryTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Grants a region to `owner`.
    ///
    /// # Errors
    ///
    /// * [`MemoryFault::BaseInUse`] if any process already holds `request.base`.
    /// * [`MemoryFault::BaseOutOfRange`] if `request.base` exceeds `ceiling`.
    pub fn allocate(
        &mut self,
        owner: usize,
        request: MemoryRequest,
        ceiling: u32,
    ) -> Result<MemoryRegion, MemoryFault> {
        if let Some(held) = self.regions.iter().find(|r| r.base == request.base) {
            return Err(MemoryFault::BaseInUse {
                base: request.base,
                owner: held.owner,
            });
        }
        if request.base > ceiling {
            return Err(MemoryFault::BaseOutOfRange {
                base: request.base,
                ceiling,
            });
        }

        let region = MemoryRegion {
            owner,
            segment: request.segment,
            base: request.base,
            max_offset: request.offset,
        };
        self.regions.push(region);
        Ok(region)
    }

    /// Checks an access by `owner`.
    ///
    /// # Errors
    ///
    /// * [`MemoryFault::NoSuchRegion`] if `owner` holds no `(segment, base)` region.
    /// * [`MemoryFault::OffsetOutOfRange`] if the offset exceeds the granted one.
    pub fn access(&self, owner: usize, request: MemoryRequest) -> Result<MemoryRegion, MemoryFault> {
        let region = self
            .regions
            .iter()
            .find(|r| r.owner == owner && r.segment == request.segment && r.base == request.base)
            .ok_or(MemoryFault::NoSuchRegion {
                owner,
                segment: request.segment,
                base: request.base,
            })?;
        if request.offset > region.max_offset {
            return Err(MemoryFault::OffsetOutOfRange {
                offset: request.offset,
                max_offset: region.max_offset,
            });
        }
        Ok(*region)
    }

    /// Releases every region of `owner`, returning how many were freed.
    pub fn release(&mut self, owner: usize) -> usize {
        let before = self.regions.len();
        self.regions.retain(|r| r.owner != owner);
        before - self.regions.len()
    }

    /// Live regions, in allocation order.
    pub fn regions(&self) -> &[MemoryRegion] {
        &self.regions
    }

    /// Live regions of one process.
    pub fn regions_of(&self, owner: usize) -> impl Iterator<Item = &MemoryRegion> {
        self.regions.iter().filter(move |r| r.owner == owner)
    }

    /// Clears the whole table.
    pub fn clear(&mut self) {
        self.regions.clear();
    }
}
