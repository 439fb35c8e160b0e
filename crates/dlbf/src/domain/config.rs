//! Filter configuration and validation
//!
//! A filter is described by three parameters, fixed for its lifetime:
//!
//! - `M` (`size_bits`): bits in the membership bit-array
//! - `K` (`hash_count`): hash functions applied per key
//! - `R` (`region_count`): collision-tracking regions over `[0, M)`
//!
//! # Example
//!
//! ```
//! use dlbf::DlbfConfigBuilder;
//!
//! let config = DlbfConfigBuilder::new()
//!     .size_bits(4096)
//!     .hash_count(6)
//!     .region_count(64)
//!     .build()
//!     .expect("Valid config");
//! assert_eq!(config.buffer_bytes(), 520);
//! ```

use crate::error::FilterError;
use serde::{Deserialize, Serialize};

/// Default number of hash functions (K).
pub const DEFAULT_HASH_COUNT: usize = 8;

/// Default membership bit-array size (M).
pub const DEFAULT_SIZE_BITS: usize = 1024;

/// Default number of collision-tracking regions (R).
pub const DEFAULT_REGION_COUNT: usize = 16;

/// Deletable Bloom filter configuration
///
/// Only structural validity is checked: `M >= 1`, `K >= 1`, `1 <= R <= M`.
/// Choosing values for a target false positive rate is up to the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DlbfConfig {
    /// Size of the membership bit-array in bits (M)
    pub size_bits: usize,
    /// Number of hash functions (K)
    pub hash_count: usize,
    /// Number of collision-tracking regions (R)
    pub region_count: usize,
}

impl Default for DlbfConfig {
    fn default() -> Self {
        Self {
            size_bits: DEFAULT_SIZE_BITS,
            hash_count: DEFAULT_HASH_COUNT,
            region_count: DEFAULT_REGION_COUNT,
        }
    }
}

impl DlbfConfig {
    /// Create a new configuration with validation
    pub fn new(size_bits: usize, hash_count: usize, region_count: usize) -> Result<Self, FilterError> {
        let config = Self {
            size_bits,
            hash_count,
            region_count,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the structural constraints on `M`, `K` and `R`
    pub fn validate(&self) -> Result<(), FilterError> {
        if self.size_bits == 0 {
            return Err(FilterError::InvalidParameters(
                "size_bits cannot be 0".to_string(),
            ));
        }

        if self.hash_count == 0 {
            return Err(FilterError::InvalidParameters(
                "hash_count cannot be 0".to_string(),
            ));
        }

        // Hash indices are folded into the high word of a u64
        if self.hash_count > u32::MAX as usize {
            return Err(FilterError::InvalidParameters(format!(
                "hash_count {} exceeds {}",
                self.hash_count,
                u32::MAX
            )));
        }

        if self.region_count == 0 {
            return Err(FilterError::InvalidParameters(
                "region_count cannot be 0".to_string(),
            ));
        }

        if self.region_count > self.size_bits {
            return Err(FilterError::InvalidParameters(format!(
                "region_count {} exceeds size_bits {}",
                self.region_count, self.size_bits
            )));
        }

        if self.size_bits.checked_add(self.region_count).is_none() {
            return Err(FilterError::InvalidParameters(
                "size_bits + region_count overflows".to_string(),
            ));
        }

        Ok(())
    }

    /// Total bits in the backing buffer: region flags followed by membership bits
    ///
    /// Saturates on an unvalidated config whose sum overflows.
    pub fn buffer_bits(&self) -> usize {
        self.region_count.saturating_add(self.size_bits)
    }

    /// Bytes needed to hold [`buffer_bits`](Self::buffer_bits)
    pub fn buffer_bytes(&self) -> usize {
        self.buffer_bits().div_ceil(8)
    }

    /// Approximate width of one region in hash outputs (`M / R`)
    ///
    /// Zero when `R` is zero.
    pub fn region_width(&self) -> usize {
        self.size_bits.checked_div(self.region_count).unwrap_or(0)
    }

    /// Region covering hash output `h` (`floor(h * R / M)`)
    ///
    /// `h` must already be reduced modulo `M`.
    ///
    /// # Panics
    ///
    /// Panics if `size_bits` is zero. The public fields and `with_*` setters
    /// skip validation; call [`validate`](Self::validate) first.
    pub fn region_of(&self, h: usize) -> usize {
        (h as u128 * self.region_count as u128 / self.size_bits as u128) as usize
    }

    /// Builder-style method to set M
    pub fn with_size_bits(mut self, bits: usize) -> Self {
        self.size_bits = bits;
        self
    }

    /// Builder-style method to set K
    pub fn with_hash_count(mut self, count: usize) -> Self {
        self.hash_count = count;
        self
    }

    /// Builder-style method to set R
    pub fn with_region_count(mut self, count: usize) -> Self {
        self.region_count = count;
        self
    }
}

/// Builder for DlbfConfig with validation
///
/// Unset fields fall back to [`DlbfConfig::default`].
#[derive(Default)]
pub struct DlbfConfigBuilder {
    size_bits: Option<usize>,
    hash_count: Option<usize>,
    region_count: Option<usize>,
}

impl DlbfConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the membership bit-array size (M)
    pub fn size_bits(mut self, bits: usize) -> Self {
        self.size_bits = Some(bits);
        self
    }

    /// Set the number of hash functions (K)
    pub fn hash_count(mut self, count: usize) -> Self {
        self.hash_count = Some(count);
        self
    }

    /// Set the number of collision-tracking regions (R)
    pub fn region_count(mut self, count: usize) -> Self {
        self.region_count = Some(count);
        self
    }

    /// Build the DlbfConfig, validating all parameters
    pub fn build(self) -> Result<DlbfConfig, FilterError> {
        let config = self.build_unchecked();
        config.validate()?;
        Ok(config)
    }

    /// Build without validation
    pub fn build_unchecked(self) -> DlbfConfig {
        let defaults = DlbfConfig::default();

        DlbfConfig {
            size_bits: self.size_bits.unwrap_or(defaults.size_bits),
            hash_count: self.hash_count.unwrap_or(defaults.hash_count),
            region_count: self.region_count.unwrap_or(defaults.region_count),
        }
    }
}
