//! # DlBF
//!
//! Deletable Bloom filter: a probabilistic set supporting insert, query and
//! safe removal without false negatives for keys that remain.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): Pure filter logic, no I/O
//!   - `DeletableFilter`: insert/query/remove, shared by both variants
//!   - `Dlbf`: runtime-sized filter owning a heap buffer
//!   - `FixedDlbf`: build-time-sized filter with inline storage
//!   - `DlbfConfig`: `(M, K, R)` with validation
//!   - `DlbfConfigBuilder`: Fluent builder for configuration
//!   - `RegionTracker`: collision-freeness flags over `[0, M)`
//!
//! - **Handle** (`handle`): nullable construct/destroy surface
//!   - `FilterHandle`: operations on an invalid handle return `InvalidHandle`
//!
//! - **Metrics** (`metrics`): counters for inserts, collisions and removals
//!
//! ## Layout
//!
//! One buffer of `R + M` bits: region flags in `[0, R)`, membership bits in
//! `[R, R + M)`. A region flag is raised when an insert lands on a bit that
//! another key already set. Removal clears a key's membership bits only in
//! regions whose flag is still down, so a bit shared with a surviving key is
//! never cleared.
//!
//! ## Invariants
//!
//! - **No false negatives**: while `x` is present, `query(x)` returns true
//! - **No self-collision**: insert reads all K bits before writing any
//! - **Conservative flags**: region flags are never lowered by removal
//!
//! ## Usage Example
//!
//! ```
//! use dlbf::{DeletableFilter, Dlbf, InsertOutcome, RemoveOutcome};
//!
//! let mut filter = Dlbf::new(1024, 8, 16)?;
//!
//! assert_eq!(filter.insert(42)?, InsertOutcome::Inserted { collisions: 0 });
//! assert_eq!(filter.insert(42)?, InsertOutcome::AlreadyPresent);
//! assert!(filter.query(42)?);
//!
//! assert!(matches!(filter.remove(42)?, RemoveOutcome::Removed { .. }));
//! assert!(!filter.query(42)?);
//! # Ok::<(), dlbf::FilterError>(())
//! ```

pub mod domain;
pub mod error;
pub mod handle;
pub mod metrics;

// Re-exports for convenience
pub use domain::{
    DeletableFilter, Dlbf, DlbfConfig, DlbfConfigBuilder, FilterKey, FixedDlbf, InsertOutcome,
    RemoveOutcome, FIXED_BUFFER_BYTES, FIXED_HASH_COUNT, FIXED_REGION_COUNT, FIXED_SIZE_BITS,
};
pub use error::FilterError;
pub use handle::FilterHandle;
pub use metrics::{Metrics, MetricsRecorder, MetricsSnapshot, NoOpMetrics};
