//! Deletable Bloom filter operations
//!
//! The algorithm is written once against [`DeletableFilter`] and shared by
//! the heap-backed [`Dlbf`](super::Dlbf) and the inline
//! [`FixedDlbf`](super::FixedDlbf).
//!
//! INVARIANTS:
//! - No false negatives: while `x` is present, `query(x)` returns true, even
//!   after other keys are removed.
//! - Insert reads all K membership bits before writing any of them, so a key
//!   whose hash outputs alias never collides with itself.
//! - Region flags are raised by insert and never lowered by remove.

use tracing::{debug, trace};

use super::bit_store::BitStore;
use super::config::DlbfConfig;
use super::hash_functions::FilterKey;
use super::regions::{slots, RegionTracker, Slot};
use crate::error::FilterError;
use crate::metrics::{MetricsRecorder, NoOpMetrics};

/// Result of [`DeletableFilter::insert`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertOutcome {
    /// The key was added; `collisions` of its K slots hit a bit another key
    /// had already set (`0..=K`)
    Inserted { collisions: usize },
    /// The key already tested as present; nothing changed
    AlreadyPresent,
}

impl InsertOutcome {
    /// Colliding slot count, or `None` for a duplicate
    pub fn collisions(&self) -> Option<usize> {
        match self {
            InsertOutcome::Inserted { collisions } => Some(*collisions),
            InsertOutcome::AlreadyPresent => None,
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self, InsertOutcome::AlreadyPresent)
    }
}

/// Result of [`DeletableFilter::remove`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// The key was removed; `retained` of its K slots sat in flagged regions
    /// and kept their membership bit (`0..=K`)
    Removed { retained: usize },
    /// The key did not test as present; nothing changed
    NotPresent,
}

impl RemoveOutcome {
    /// Retained slot count, or `None` if the key was absent
    pub fn retained(&self) -> Option<usize> {
        match self {
            RemoveOutcome::Removed { retained } => Some(*retained),
            RemoveOutcome::NotPresent => None,
        }
    }

    pub fn is_removed(&self) -> bool {
        matches!(self, RemoveOutcome::Removed { .. })
    }
}

static NO_OP_METRICS: NoOpMetrics = NoOpMetrics;

/// A Bloom filter that supports safe removal through region tracking
///
/// Implementors supply the parameters and the buffer; insert, query and
/// remove are provided.
pub trait DeletableFilter {
    type Store: BitStore + ?Sized;

    /// Parameters fixed for this filter's lifetime
    fn config(&self) -> &DlbfConfig;

    /// The `R + M` bit buffer: region flags, then membership bits
    fn store(&self) -> &Self::Store;

    fn store_mut(&mut self) -> &mut Self::Store;

    /// Sink for operation metrics
    fn metrics(&self) -> &dyn MetricsRecorder {
        &NO_OP_METRICS
    }

    /// Test whether `x` might be in the filter
    ///
    /// True iff all K membership bits are set. Never a false negative.
    fn query(&self, x: u32) -> Result<bool, FilterError> {
        let found = probe(self, x)?;
        self.metrics().record_query(found);
        Ok(found)
    }

    /// Insert `x`
    ///
    /// Returns [`InsertOutcome::AlreadyPresent`] without touching any bit if
    /// `x` already tests as present.
    fn insert(&mut self, x: u32) -> Result<InsertOutcome, FilterError> {
        if probe(self, x)? {
            debug!(key = x, "Insert skipped, key already present");
            self.metrics().record_duplicate_insert();
            return Ok(InsertOutcome::AlreadyPresent);
        }

        let config = *self.config();
        let tracker = RegionTracker::new(&config);
        let mut collisions = 0;

        // Phase A: every collision read happens before any membership write,
        // otherwise aliasing slots (H_i(x) == H_j(x)) would see their own bit.
        for Slot { offset, region, .. } in slots(&config, x) {
            let collided = tracker.membership_bit(self.store(), offset)?;
            tracker.mark(self.store_mut(), region, collided)?;
            collisions += collided as usize;
        }

        // Phase B
        for Slot { offset, .. } in slots(&config, x) {
            self.store_mut().raise(tracker.membership_index(offset), true)?;
        }

        trace!(key = x, collisions = collisions, "Key inserted");
        self.metrics().record_insert(collisions);
        Ok(InsertOutcome::Inserted { collisions })
    }

    /// Insert `x`, reporting only whether it was newly added
    fn insert_new(&mut self, x: u32) -> Result<bool, FilterError> {
        Ok(!self.insert(x)?.is_duplicate())
    }

    /// Remove `x`
    ///
    /// Membership bits in collision-free regions are cleared; bits in
    /// flagged regions are kept because another key may depend on them.
    /// Returns [`RemoveOutcome::NotPresent`] without touching any bit if `x`
    /// does not test as present.
    fn remove(&mut self, x: u32) -> Result<RemoveOutcome, FilterError> {
        if !probe(self, x)? {
            debug!(key = x, "Remove rejected, key not present");
            self.metrics().record_remove_rejected();
            return Ok(RemoveOutcome::NotPresent);
        }

        let config = *self.config();
        let tracker = RegionTracker::new(&config);
        let mut retained = 0;

        for Slot { offset, region, .. } in slots(&config, x) {
            let flagged = tracker.is_flagged(self.store(), region)?;
            self.store_mut().lower(tracker.membership_index(offset), flagged)?;
            retained += flagged as usize;
        }

        debug_assert!(retained <= config.hash_count);

        trace!(key = x, retained = retained, "Key removed");
        self.metrics().record_remove(retained);
        Ok(RemoveOutcome::Removed { retained })
    }

    /// [`insert`](Self::insert) for any key reducible to 32 bits
    fn insert_key<T: FilterKey + ?Sized>(&mut self, key: &T) -> Result<InsertOutcome, FilterError>
    where
        Self: Sized,
    {
        self.insert(key.filter_key())
    }

    /// [`query`](Self::query) for any key reducible to 32 bits
    fn contains_key<T: FilterKey + ?Sized>(&self, key: &T) -> Result<bool, FilterError>
    where
        Self: Sized,
    {
        self.query(key.filter_key())
    }

    /// [`remove`](Self::remove) for any key reducible to 32 bits
    fn remove_key<T: FilterKey + ?Sized>(&mut self, key: &T) -> Result<RemoveOutcome, FilterError>
    where
        Self: Sized,
    {
        self.remove(key.filter_key())
    }

    /// The K slots `x` hashes to, in hash-index order
    fn slots_of(&self, x: u32) -> Vec<Slot> {
        slots(self.config(), x).collect()
    }

    /// Whether `region` has hosted a collision
    fn is_region_flagged(&self, region: usize) -> Result<bool, FilterError> {
        RegionTracker::new(self.config()).is_flagged(self.store(), region)
    }

    /// Indices of regions that are no longer collision-free
    fn flagged_regions(&self) -> Vec<usize> {
        RegionTracker::new(self.config()).flagged_regions(self.store())
    }

    /// Number of set bits in the membership segment
    fn membership_bits_set(&self) -> Result<usize, FilterError> {
        RegionTracker::new(self.config()).membership_count(self.store())
    }

    /// Reset every membership bit and region flag
    fn clear(&mut self) {
        self.store_mut().clear_all();
        debug!("Filter cleared");
    }
}

/// Membership test without metrics, shared by query, insert and remove
fn probe<F: DeletableFilter + ?Sized>(filter: &F, x: u32) -> Result<bool, FilterError> {
    let tracker = RegionTracker::new(filter.config());
    for Slot { offset, .. } in slots(filter.config(), x) {
        if !tracker.membership_bit(filter.store(), offset)? {
            return Ok(false);
        }
    }
    Ok(true)
}
