//! Shared test fixtures

use std::collections::HashSet;
use std::sync::Once;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Install a test-writer subscriber once per process
///
/// Honors `RUST_LOG`; defaults to `warn`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Deterministic RNG for reproducible workloads
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// `count` distinct random keys
pub fn distinct_keys(rng: &mut StdRng, count: usize) -> Vec<u32> {
    let mut seen = HashSet::with_capacity(count);
    let mut keys = Vec::with_capacity(count);
    while keys.len() < count {
        let key: u32 = rng.gen();
        if seen.insert(key) {
            keys.push(key);
        }
    }
    keys
}
