//! Bounds-checked bit storage
//!
//! Bit `i` lives in byte `i / 8` at position `i % 8` (LSB first), matching
//! `bitvec`'s `Lsb0` ordering over `u8`. Writes go through [`BitStore::raise`]
//! (OR) and [`BitStore::lower`] (AND with the given value) so that a flag
//! raised by one key is never overwritten by another key's blind write.

use std::ops::Range;

use bitvec::prelude::*;

use crate::error::FilterError;

/// Addressable bit buffer backing a filter
pub trait BitStore {
    /// View the buffer as a bit slice
    fn as_bits(&self) -> &BitSlice<u8, Lsb0>;

    /// Mutable view of the buffer
    fn as_bits_mut(&mut self) -> &mut BitSlice<u8, Lsb0>;

    /// Underlying bytes, including any padding bits in the last byte
    fn raw_bytes(&self) -> &[u8];

    /// Number of addressable bits
    fn bit_len(&self) -> usize {
        self.as_bits().len()
    }

    /// Read bit `index`
    fn get(&self, index: usize) -> Result<bool, FilterError> {
        self.as_bits()
            .get(index)
            .map(|bit| *bit)
            .ok_or(FilterError::BitOutOfRange {
                index,
                len: self.bit_len(),
            })
    }

    /// Monotonically raise bit `index`: `bit |= value`
    fn raise(&mut self, index: usize, value: bool) -> Result<(), FilterError> {
        let len = self.bit_len();
        let mut bit = self
            .as_bits_mut()
            .get_mut(index)
            .ok_or(FilterError::BitOutOfRange { index, len })?;
        *bit |= value;
        Ok(())
    }

    /// Monotonically lower bit `index`: cleared only when `value` is false
    fn lower(&mut self, index: usize, value: bool) -> Result<(), FilterError> {
        let len = self.bit_len();
        let mut bit = self
            .as_bits_mut()
            .get_mut(index)
            .ok_or(FilterError::BitOutOfRange { index, len })?;
        *bit &= value;
        Ok(())
    }

    /// Count set bits in `range`
    fn count_ones_in(&self, range: Range<usize>) -> Result<usize, FilterError> {
        let len = self.bit_len();
        let end = range.end;
        self.as_bits()
            .get(range)
            .map(|bits| bits.count_ones())
            .ok_or(FilterError::BitOutOfRange { index: end, len })
    }

    /// Reset every bit to zero
    fn clear_all(&mut self) {
        self.as_bits_mut().fill(false);
    }
}

impl BitStore for BitVec<u8, Lsb0> {
    fn as_bits(&self) -> &BitSlice<u8, Lsb0> {
        self.as_bitslice()
    }

    fn as_bits_mut(&mut self) -> &mut BitSlice<u8, Lsb0> {
        self.as_mut_bitslice()
    }

    fn raw_bytes(&self) -> &[u8] {
        self.as_raw_slice()
    }
}

impl<const N: usize> BitStore for BitArray<[u8; N], Lsb0> {
    fn as_bits(&self) -> &BitSlice<u8, Lsb0> {
        self.as_bitslice()
    }

    fn as_bits_mut(&mut self) -> &mut BitSlice<u8, Lsb0> {
        self.as_mut_bitslice()
    }

    fn raw_bytes(&self) -> &[u8] {
        self.as_raw_slice()
    }
}

/// Allocate a zeroed heap buffer of `bits` bits without aborting on OOM
pub fn try_alloc_bits(bits: usize) -> Result<BitVec<u8, Lsb0>, FilterError> {
    let bytes = bits.div_ceil(8).max(1);

    let mut raw: Vec<u8> = Vec::new();
    raw.try_reserve_exact(bytes)
        .map_err(|_| FilterError::AllocationFailed { bytes })?;
    raw.resize(bytes, 0);

    let mut store = BitVec::<u8, Lsb0>::from_vec(raw);
    store.truncate(bits);
    Ok(store)
}
