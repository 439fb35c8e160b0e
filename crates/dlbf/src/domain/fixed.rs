//! Inline deletable Bloom filter sized at build time
//!
//! `K`, `M` and `R` come from the `DLBF_HASH_COUNT`, `DLBF_SIZE_BITS` and
//! `DLBF_REGION_COUNT` environment variables at build time (defaults 8,
//! 1024 and 16). The crate fails to build if they are not structurally
//! valid.

use bitvec::prelude::*;

use super::config::DlbfConfig;
use super::filter::DeletableFilter;

include!(concat!(env!("OUT_DIR"), "/fixed_params.rs"));

/// Parameters every [`FixedDlbf`] is built with
pub const FIXED_CONFIG: DlbfConfig = DlbfConfig {
    size_bits: FIXED_SIZE_BITS,
    hash_count: FIXED_HASH_COUNT,
    region_count: FIXED_REGION_COUNT,
};

/// Deletable Bloom filter with build-time parameters and inline storage
///
/// Needs no allocation; the buffer lives as long as the value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixedDlbf {
    bits: BitArray<[u8; FIXED_BUFFER_BYTES], Lsb0>,
}

impl FixedDlbf {
    pub fn new() -> Self {
        Self {
            bits: BitArray::new([0; FIXED_BUFFER_BYTES]),
        }
    }

    /// Raw buffer bytes (region flags first, LSB-first bit order)
    pub fn as_bytes(&self) -> &[u8] {
        self.bits.as_raw_slice()
    }
}

impl Default for FixedDlbf {
    fn default() -> Self {
        Self::new()
    }
}

impl DeletableFilter for FixedDlbf {
    type Store = BitArray<[u8; FIXED_BUFFER_BYTES], Lsb0>;

    fn config(&self) -> &DlbfConfig {
        &FIXED_CONFIG
    }

    fn store(&self) -> &Self::Store {
        &self.bits
    }

    fn store_mut(&mut self) -> &mut Self::Store {
        &mut self.bits
    }
}
