//! Collision-region tracking
//!
//! The hash-output space `[0, M)` is split into `R` contiguous regions. The
//! first `R` bits of the buffer hold one flag per region; a raised flag means
//! at least one membership bit in that region is shared by more than one
//! inserted key, so clearing bits there on removal could cause a false
//! negative.
//!
//! Flags are only ever raised. Removal reads them but never lowers them, so a
//! region that once hosted a collision stays conservative until the filter
//! is cleared.

use super::bit_store::BitStore;
use super::config::DlbfConfig;
use super::hash_functions::hash_offsets;
use crate::error::FilterError;

/// One hash slot of a key: which membership bit it hits and which region
/// tracks that bit
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Slot {
    /// Hash function index `i`
    pub hash_index: usize,
    /// Membership offset `H_i(x) mod M`
    pub offset: usize,
    /// Region covering `offset`
    pub region: usize,
}

/// Enumerate the K slots of key `x`
///
/// Lazily computed; no allocation.
pub fn slots(config: &DlbfConfig, x: u32) -> impl Iterator<Item = Slot> {
    let config = *config;
    hash_offsets(x, config.hash_count, config.size_bits)
        .enumerate()
        .map(move |(hash_index, offset)| Slot {
            hash_index,
            offset,
            region: config.region_of(offset),
        })
}

/// Maps membership offsets and regions onto buffer bit indices
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegionTracker {
    config: DlbfConfig,
}

impl RegionTracker {
    pub fn new(config: &DlbfConfig) -> Self {
        Self { config: *config }
    }

    /// Buffer index of the membership bit for offset `h`
    pub fn membership_index(&self, offset: usize) -> usize {
        self.config.region_count + offset
    }

    /// Buffer index of the flag for `region`
    pub fn flag_index(&self, region: usize) -> Result<usize, FilterError> {
        if region >= self.config.region_count {
            return Err(FilterError::BitOutOfRange {
                index: region,
                len: self.config.region_count,
            });
        }
        Ok(region)
    }

    /// Whether `region` has hosted a collision
    pub fn is_flagged<S: BitStore + ?Sized>(&self, store: &S, region: usize) -> Result<bool, FilterError> {
        store.get(self.flag_index(region)?)
    }

    /// OR `collided` into the flag for `region`
    pub fn mark<S: BitStore + ?Sized>(
        &self,
        store: &mut S,
        region: usize,
        collided: bool,
    ) -> Result<(), FilterError> {
        store.raise(self.flag_index(region)?, collided)
    }

    /// Read the membership bit at offset `h`
    pub fn membership_bit<S: BitStore + ?Sized>(&self, store: &S, offset: usize) -> Result<bool, FilterError> {
        store.get(self.membership_index(offset))
    }

    /// Number of raised region flags
    pub fn flagged_count<S: BitStore + ?Sized>(&self, store: &S) -> Result<usize, FilterError> {
        store.count_ones_in(0..self.config.region_count)
    }

    /// Indices of all raised region flags, ascending
    pub fn flagged_regions<S: BitStore + ?Sized>(&self, store: &S) -> Vec<usize> {
        store
            .as_bits()
            .iter_ones()
            .take_while(|&index| index < self.config.region_count)
            .collect()
    }

    /// Number of set bits in the membership segment
    pub fn membership_count<S: BitStore + ?Sized>(&self, store: &S) -> Result<usize, FilterError> {
        let start = self.config.region_count;
        store.count_ones_in(start..start + self.config.size_bits)
    }
}
