//! Domain Layer - Pure filter logic
//!
//! This layer contains:
//! - Configuration and parameter validation
//! - Hash family and key reduction
//! - Bit storage
//! - Collision-region tracking
//! - The shared insert/query/remove algorithm
//! - Heap-backed and inline filter variants
//!
//! RULES:
//! - No I/O operations
//! - No async code
//! - Single-threaded; mutation goes through `&mut self`

pub mod bit_store;
pub mod config;
pub mod dynamic;
pub mod filter;
pub mod fixed;
pub mod hash_functions;
pub mod regions;

pub use bit_store::BitStore;
pub use config::{
    DlbfConfig, DlbfConfigBuilder, DEFAULT_HASH_COUNT, DEFAULT_REGION_COUNT, DEFAULT_SIZE_BITS,
};
pub use dynamic::Dlbf;
pub use filter::{DeletableFilter, InsertOutcome, RemoveOutcome};
pub use fixed::{
    FixedDlbf, FIXED_BUFFER_BYTES, FIXED_CONFIG, FIXED_HASH_COUNT, FIXED_REGION_COUNT,
    FIXED_SIZE_BITS,
};
pub use hash_functions::{hash, FilterKey};
pub use regions::{RegionTracker, Slot};
