//! # Churn Workload
//!
//! Long random insert/query/remove sequences checked against an exact
//! `HashSet` model. Only keys the filter reported as `Inserted` enter the
//! model; a key rejected as `AlreadyPresent` without being in the model is a
//! false positive and is never removed.

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use dlbf::{DeletableFilter, Dlbf, FixedDlbf, InsertOutcome, RemoveOutcome};
    use rand::seq::SliceRandom;
    use rand::Rng;
    use tracing::info;

    use crate::support::{distinct_keys, init_tracing, seeded_rng};

    #[derive(Debug, Default)]
    struct ChurnStats {
        inserts: usize,
        false_positive_inserts: usize,
        removes: usize,
        bits_retained: usize,
        max_flagged_regions: usize,
    }

    /// Drive `filter` through `ops` random operations over a pool of keys
    fn run_churn<F: DeletableFilter>(filter: &mut F, seed: u64, pool_size: usize, ops: usize) -> ChurnStats {
        let mut rng = seeded_rng(seed);
        let pool = distinct_keys(&mut rng, pool_size);
        let mut live: HashSet<u32> = HashSet::new();
        let mut stats = ChurnStats::default();
        let k = filter.config().hash_count;

        for step in 0..ops {
            let key = *pool.choose(&mut rng).expect("pool is not empty");

            if live.contains(&key) {
                if rng.gen_bool(0.5) {
                    match filter.remove(key).unwrap() {
                        RemoveOutcome::Removed { retained } => {
                            assert!(retained <= k);
                            stats.removes += 1;
                            stats.bits_retained += retained;
                            live.remove(&key);
                        }
                        RemoveOutcome::NotPresent => panic!("false negative for live key {}", key),
                    }
                } else {
                    assert!(filter.query(key).unwrap(), "false negative for live key {}", key);
                }
            } else {
                match filter.insert(key).unwrap() {
                    InsertOutcome::Inserted { collisions } => {
                        assert!(collisions <= k);
                        stats.inserts += 1;
                        live.insert(key);
                    }
                    InsertOutcome::AlreadyPresent => stats.false_positive_inserts += 1,
                }
            }

            let flagged = filter.flagged_regions().len();
            assert!(flagged >= stats.max_flagged_regions, "region flags must never be lowered");
            stats.max_flagged_regions = flagged;

            if step % 250 == 0 {
                for &survivor in &live {
                    assert!(filter.query(survivor).unwrap(), "step {}: lost {}", step, survivor);
                }
            }
        }

        for &survivor in &live {
            assert!(filter.query(survivor).unwrap(), "lost {} at end of churn", survivor);
        }

        stats
    }

    #[test]
    fn test_churn_sparse_filter() {
        init_tracing();
        let mut filter = Dlbf::new(16_384, 6, 256).unwrap();

        let stats = run_churn(&mut filter, 21, 1_000, 20_000);
        info!(?stats, "sparse churn finished");

        assert!(stats.inserts > 0);
        assert!(stats.removes > 0);
    }

    #[test]
    fn test_churn_crowded_filter() {
        init_tracing();
        // Few bits and regions: collisions and retained bits are the norm
        let mut filter = Dlbf::new(512, 4, 8).unwrap();

        let stats = run_churn(&mut filter, 22, 400, 10_000);
        info!(?stats, "crowded churn finished");

        assert!(stats.bits_retained > 0, "crowded filter must retain some bits");
        assert!(stats.max_flagged_regions > 0);
    }

    #[test]
    fn test_churn_single_region() {
        init_tracing();
        let mut filter = Dlbf::new(2_048, 5, 1).unwrap();

        let stats = run_churn(&mut filter, 23, 300, 5_000);
        info!(?stats, "single region churn finished");

        assert!(stats.removes > 0);
    }

    #[test]
    fn test_churn_fixed_variant() {
        init_tracing();
        let mut filter = FixedDlbf::new();

        let stats = run_churn(&mut filter, 24, 200, 5_000);
        info!(?stats, "fixed churn finished");

        assert!(stats.inserts > 0);
    }
}
