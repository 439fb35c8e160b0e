//! Nullable filter handle
//!
//! [`FilterHandle`] is the construct/destroy surface for callers that keep a
//! filter slot which may be empty: construction failures yield an invalid
//! handle instead of an error, and every operation on an invalid or
//! destroyed handle returns [`FilterError::InvalidHandle`] before touching
//! any storage.

use tracing::{debug, warn};

use crate::domain::{DeletableFilter, Dlbf, InsertOutcome, RemoveOutcome};
use crate::error::FilterError;

/// Owning, possibly invalid, handle to a [`Dlbf`]
#[derive(Debug, Default)]
pub struct FilterHandle {
    inner: Option<Dlbf>,
}

impl FilterHandle {
    /// An invalid handle
    pub const fn null() -> Self {
        Self { inner: None }
    }

    /// Construct a filter, yielding an invalid handle on bad parameters or
    /// allocation failure
    pub fn construct(m: usize, k: usize, r: usize) -> Self {
        match Dlbf::new(m, k, r) {
            Ok(filter) => Self {
                inner: Some(filter),
            },
            Err(e) => {
                warn!(m = m, k = k, r = r, error = %e, "Filter construction failed");
                Self::null()
            }
        }
    }

    pub fn is_valid(&self) -> bool {
        self.inner.is_some()
    }

    /// Release the filter's buffer; no-op on an invalid handle
    pub fn destroy(&mut self) {
        if let Some(filter) = self.inner.take() {
            debug!(size_bits = filter.size_bits(), "Filter destroyed");
        }
    }

    /// Insert `key`; see [`DeletableFilter::insert`]
    pub fn insert(&mut self, key: u32) -> Result<InsertOutcome, FilterError> {
        self.filter_mut()?.insert(key)
    }

    /// Query `key`; see [`DeletableFilter::query`]
    pub fn query(&self, key: u32) -> Result<bool, FilterError> {
        self.filter()?.query(key)
    }

    /// Remove `key`; see [`DeletableFilter::remove`]
    pub fn remove(&mut self, key: u32) -> Result<RemoveOutcome, FilterError> {
        self.filter_mut()?.remove(key)
    }

    /// Borrow the filter, or `InvalidHandle`
    pub fn filter(&self) -> Result<&Dlbf, FilterError> {
        self.inner.as_ref().ok_or_else(invalid_handle)
    }

    pub fn filter_mut(&mut self) -> Result<&mut Dlbf, FilterError> {
        self.inner.as_mut().ok_or_else(invalid_handle)
    }

    /// Take the filter out, leaving an invalid handle behind
    pub fn take(&mut self) -> Option<Dlbf> {
        self.inner.take()
    }
}

impl From<Dlbf> for FilterHandle {
    fn from(filter: Dlbf) -> Self {
        Self {
            inner: Some(filter),
        }
    }
}

fn invalid_handle() -> FilterError {
    warn!("Operation on invalid filter handle");
    FilterError::InvalidHandle
}
