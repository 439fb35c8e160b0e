//! Heap-backed deletable Bloom filter sized at runtime

use std::fmt;
use std::sync::Arc;

use bitvec::prelude::*;
use tracing::debug;

use super::bit_store::try_alloc_bits;
use super::config::DlbfConfig;
use super::filter::DeletableFilter;
use crate::error::FilterError;
use crate::metrics::{MetricsRecorder, NoOpMetrics};

/// Deletable Bloom filter with runtime parameters
///
/// Parameters are stored as named fields next to a separately owned
/// `R + M` bit buffer. The buffer is released when the filter is dropped.
pub struct Dlbf {
    config: DlbfConfig,
    /// Region flags `[0, R)` followed by membership bits `[R, R + M)`
    bits: BitVec<u8, Lsb0>,
    metrics: Arc<dyn MetricsRecorder>,
}

impl Dlbf {
    /// Create a filter with `m` membership bits, `k` hash functions and `r`
    /// collision-tracking regions
    ///
    /// Fails with [`FilterError::InvalidParameters`] unless `m >= 1`,
    /// `k >= 1` and `1 <= r <= m`, and with
    /// [`FilterError::AllocationFailed`] if the buffer cannot be reserved.
    /// Nothing is allocated on failure.
    pub fn new(m: usize, k: usize, r: usize) -> Result<Self, FilterError> {
        Self::from_config(&DlbfConfig::new(m, k, r)?)
    }

    /// Create a filter from a validated configuration
    pub fn from_config(config: &DlbfConfig) -> Result<Self, FilterError> {
        config.validate()?;
        let bits = try_alloc_bits(config.buffer_bits())?;

        debug!(
            size_bits = config.size_bits,
            hash_count = config.hash_count,
            region_count = config.region_count,
            buffer_bytes = config.buffer_bytes(),
            "Deletable Bloom filter allocated"
        );

        Ok(Self {
            config: *config,
            bits,
            metrics: Arc::new(NoOpMetrics),
        })
    }

    /// Attach a metrics recorder
    ///
    /// The buffer is accounted to one recorder at a time: the previous
    /// recorder sees it freed before the new one sees it created.
    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsRecorder>) -> Self {
        let buffer_bytes = self.config.buffer_bytes();
        self.metrics.record_filter_freed(buffer_bytes);
        metrics.record_filter_created(buffer_bytes);
        self.metrics = metrics;
        self
    }

    /// Membership bit-array size (M)
    pub fn size_bits(&self) -> usize {
        self.config.size_bits
    }

    /// Number of hash functions (K)
    pub fn hash_count(&self) -> usize {
        self.config.hash_count
    }

    /// Number of collision-tracking regions (R)
    pub fn region_count(&self) -> usize {
        self.config.region_count
    }

    /// Raw buffer bytes (region flags first, LSB-first bit order)
    pub fn as_bytes(&self) -> &[u8] {
        self.bits.as_raw_slice()
    }
}

impl DeletableFilter for Dlbf {
    type Store = BitVec<u8, Lsb0>;

    fn config(&self) -> &DlbfConfig {
        &self.config
    }

    fn store(&self) -> &Self::Store {
        &self.bits
    }

    fn store_mut(&mut self) -> &mut Self::Store {
        &mut self.bits
    }

    fn metrics(&self) -> &dyn MetricsRecorder {
        self.metrics.as_ref()
    }
}

impl Drop for Dlbf {
    fn drop(&mut self) {
        self.metrics.record_filter_freed(self.config.buffer_bytes());
    }
}

impl fmt::Debug for Dlbf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dlbf")
            .field("config", &self.config)
            .field("membership_bits_set", &self.membership_bits_set().ok())
            .field("flagged_regions", &self.flagged_regions().len())
            .finish()
    }
}
