//! Hash family for the deletable Bloom filter
//!
//! `H_i(x)` concatenates the hash index `i` (high word) and the 32-bit key `x`
//! (low word), multiplies by Knuth's multiplicative constant and folds the
//! 64-bit product by adding its halves. Outputs for different `i` may alias.
//!
//! Keys outside the 32-bit domain are reduced through [`FilterKey`], which
//! uses MurmurHash3 for byte strings and wide integers.

use std::io::Cursor;

/// Knuth's multiplicative hashing constant (`floor(2^32 / phi)`).
pub const KNUTH_MULTIPLIER: u64 = 2_654_435_769;

/// Compute `H_i(x)`
pub fn hash(i: u32, x: u32) -> u32 {
    let concat = ((i as u64) << 32) | x as u64;
    let product = concat.wrapping_mul(KNUTH_MULTIPLIER);
    let lower = product as u32;
    let upper = (product >> 32) as u32;

    lower.wrapping_add(upper)
}

/// Compute the k membership offsets `H_i(x) mod m` for `i` in `0..k`
///
/// Offsets are yielded lazily in hash-index order so callers can
/// short-circuit without allocating.
pub fn hash_offsets(x: u32, k: usize, m: usize) -> impl Iterator<Item = usize> {
    debug_assert!(k <= u32::MAX as usize, "hash index must fit in u32");
    (0..k as u32).map(move |i| (hash(i, x) as u64 % m as u64) as usize)
}

/// Reduce a byte string to the 32-bit key domain with MurmurHash3
pub fn murmur_key(bytes: &[u8]) -> u32 {
    let mut cursor = Cursor::new(bytes);
    murmur3::murmur3_32(&mut cursor, 0).unwrap_or(0)
}

/// Types that can be reduced to the filter's 32-bit key domain
///
/// Integers up to 32 bits keep their bit pattern; wider integers and byte
/// strings are digested with [`murmur_key`].
pub trait FilterKey {
    /// The 32-bit key fed to the hash family
    fn filter_key(&self) -> u32;
}

macro_rules! impl_narrow_key {
    ($($ty:ty),*) => {
        $(
            impl FilterKey for $ty {
                fn filter_key(&self) -> u32 {
                    *self as u32
                }
            }
        )*
    };
}

impl_narrow_key!(u8, u16, u32);

impl FilterKey for i32 {
    fn filter_key(&self) -> u32 {
        *self as u32
    }
}

impl FilterKey for i16 {
    fn filter_key(&self) -> u32 {
        *self as i32 as u32
    }
}

impl FilterKey for u64 {
    fn filter_key(&self) -> u32 {
        murmur_key(&self.to_le_bytes())
    }
}

impl FilterKey for i64 {
    fn filter_key(&self) -> u32 {
        murmur_key(&self.to_le_bytes())
    }
}

impl FilterKey for usize {
    fn filter_key(&self) -> u32 {
        (*self as u64).filter_key()
    }
}

impl FilterKey for [u8] {
    fn filter_key(&self) -> u32 {
        murmur_key(self)
    }
}

impl<const N: usize> FilterKey for [u8; N] {
    fn filter_key(&self) -> u32 {
        murmur_key(self)
    }
}

impl FilterKey for Vec<u8> {
    fn filter_key(&self) -> u32 {
        murmur_key(self)
    }
}

impl FilterKey for str {
    fn filter_key(&self) -> u32 {
        murmur_key(self.as_bytes())
    }
}

impl FilterKey for String {
    fn filter_key(&self) -> u32 {
        murmur_key(self.as_bytes())
    }
}

impl<T: FilterKey + ?Sized> FilterKey for &T {
    fn filter_key(&self) -> u32 {
        (**self).filter_key()
    }
}
