//! # Filter Scenarios
//!
//! Fixed scenarios run against the default parameters (`M=1024, K=8, R=16`)
//! on both storage variants and through the handle API.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use dlbf::{
        DeletableFilter, Dlbf, FilterError, FilterHandle, FixedDlbf, InsertOutcome, Metrics,
        RemoveOutcome,
    };
    use rand::Rng;

    use crate::support::{distinct_keys, init_tracing, seeded_rng};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn default_filter() -> Dlbf {
        Dlbf::new(1024, 8, 16).expect("default parameters are valid")
    }

    /// Insert keys from `candidates` until one is genuinely added
    fn insert_fresh<F: DeletableFilter>(filter: &mut F, candidates: &[u32]) -> u32 {
        candidates
            .iter()
            .copied()
            .find(|&key| matches!(filter.insert(key), Ok(InsertOutcome::Inserted { .. })))
            .expect("some candidate is not a false positive")
    }

    // =============================================================================
    // INSERT / DUPLICATE
    // =============================================================================

    #[test]
    fn test_duplicate_insert_reports_already_present() {
        init_tracing();
        let mut filter = default_filter();
        let key: u32 = seeded_rng(5).gen();

        filter.insert(key).unwrap();
        let before = filter.as_bytes().to_vec();
        let bits_before = filter.membership_bits_set().unwrap();

        assert_eq!(filter.insert(key).unwrap(), InsertOutcome::AlreadyPresent);
        assert_eq!(filter.as_bytes(), before.as_slice(), "duplicate must not mutate state");
        assert_eq!(filter.membership_bits_set().unwrap(), bits_before);
        assert!(filter.query(key).unwrap());
    }

    #[test]
    fn test_duplicate_insert_does_not_corrupt_other_keys() {
        init_tracing();
        let mut filter = default_filter();
        let keys = distinct_keys(&mut seeded_rng(55), 40);

        for &key in &keys {
            filter.insert(key).unwrap();
        }
        for &key in &keys {
            assert_eq!(filter.insert(key).unwrap(), InsertOutcome::AlreadyPresent);
        }
        for &key in &keys {
            assert!(filter.query(key).unwrap());
        }
    }

    #[test]
    fn test_no_false_negatives_under_pure_insertion() {
        init_tracing();
        let mut filter = Dlbf::new(8192, 6, 128).unwrap();
        let keys = distinct_keys(&mut seeded_rng(7), 800);

        for (n, &key) in keys.iter().enumerate() {
            filter.insert(key).unwrap();
            // Every key inserted so far is still present
            for &earlier in &keys[..=n] {
                assert!(filter.query(earlier).unwrap(), "false negative for {}", earlier);
            }
        }
    }

    #[test]
    fn test_collision_counts_are_bounded_by_k() {
        init_tracing();
        let mut filter = Dlbf::new(256, 8, 16).unwrap();

        for key in distinct_keys(&mut seeded_rng(9), 200) {
            if let InsertOutcome::Inserted { collisions } = filter.insert(key).unwrap() {
                assert!(collisions <= 8);
            }
        }
        assert!(!filter.flagged_regions().is_empty(), "a crowded filter collides");
    }

    // =============================================================================
    // REMOVE
    // =============================================================================

    #[test]
    fn test_insert_then_remove_uncontended() {
        init_tracing();
        let key: u32 = seeded_rng(6).gen();

        let mut dynamic = default_filter();
        dynamic.insert(key).unwrap();
        assert_eq!(dynamic.remove(key).unwrap(), RemoveOutcome::Removed { retained: 0 });
        assert!(!dynamic.query(key).unwrap());

        let mut fixed = FixedDlbf::new();
        fixed.insert(key).unwrap();
        assert!(fixed.remove(key).unwrap().is_removed());
        assert!(!fixed.query(key).unwrap());
    }

    #[test]
    fn test_remove_never_breaks_surviving_key() {
        init_tracing();
        let mut rng = seeded_rng(11);

        for _ in 0..200 {
            let mut filter = Dlbf::new(64, 4, 4).unwrap();
            let keys = distinct_keys(&mut rng, 16);

            let x = insert_fresh(&mut filter, &keys[..8]);
            let y = insert_fresh(&mut filter, &keys[8..]);

            assert!(filter.remove(x).unwrap().is_removed());
            assert!(filter.query(y).unwrap(), "removing {} broke {}", x, y);
        }
    }

    #[test]
    fn test_remove_absent_key_is_rejected() {
        init_tracing();
        let mut filter = default_filter();
        assert_eq!(filter.remove(12345).unwrap(), RemoveOutcome::NotPresent);

        filter.insert(1).unwrap();
        let before = filter.as_bytes().to_vec();

        let absent = (2..).find(|&k| !filter.query(k).unwrap()).unwrap();
        assert_eq!(filter.remove(absent).unwrap(), RemoveOutcome::NotPresent);
        assert_eq!(filter.as_bytes(), before.as_slice());
    }

    #[test]
    fn test_region_flags_are_never_lowered() {
        init_tracing();
        let mut filter = Dlbf::new(128, 4, 8).unwrap();
        let keys = distinct_keys(&mut seeded_rng(13), 60);

        let mut inserted = Vec::new();
        for &key in &keys {
            if filter.insert(key).unwrap().collisions().is_some() {
                inserted.push(key);
            }
        }

        let flagged = filter.flagged_regions();
        assert!(!flagged.is_empty());

        for key in inserted {
            filter.remove(key).unwrap();
            assert_eq!(filter.flagged_regions(), flagged);
        }
    }

    #[test]
    fn test_removed_keys_leave_dead_bits_in_flagged_regions() {
        init_tracing();
        // A single region means the first collision makes every later removal keep its bits
        let mut filter = Dlbf::new(64, 3, 1).unwrap();
        let keys = distinct_keys(&mut seeded_rng(17), 40);

        let mut inserted = Vec::new();
        for &key in &keys {
            if let InsertOutcome::Inserted { collisions } = filter.insert(key).unwrap() {
                inserted.push(key);
                if collisions > 0 {
                    break;
                }
            }
        }
        assert!(filter.is_region_flagged(0).unwrap());

        let bits_before = filter.membership_bits_set().unwrap();
        for key in inserted {
            assert_eq!(filter.remove(key).unwrap(), RemoveOutcome::Removed { retained: 3 });
        }
        assert_eq!(filter.membership_bits_set().unwrap(), bits_before);
    }

    // =============================================================================
    // HANDLE API
    // =============================================================================

    #[test]
    fn test_null_handle_insert_is_rejected() {
        init_tracing();
        let mut handle = FilterHandle::null();
        let key: u32 = seeded_rng(8).gen();

        assert_eq!(handle.insert(key), Err(FilterError::InvalidHandle));
        assert_eq!(handle.query(key), Err(FilterError::InvalidHandle));
        assert_eq!(handle.remove(key), Err(FilterError::InvalidHandle));
    }

    #[test]
    fn test_invalid_construction_yields_null_handle() {
        init_tracing();
        for (m, k, r) in [(0, 1, 1), (1, 0, 1), (1, 1, 0), (16, 4, 17)] {
            let handle = FilterHandle::construct(m, k, r);
            assert!(!handle.is_valid(), "({}, {}, {}) must be rejected", m, k, r);
        }
    }

    #[test]
    fn test_handle_lifecycle_releases_buffer_once() {
        init_tracing();
        let metrics = Arc::new(Metrics::new());
        let mut handle = FilterHandle::from(default_filter().with_metrics(metrics.clone()));

        handle.insert(3).unwrap();
        assert_eq!(metrics.snapshot().bytes_allocated, 130);

        handle.destroy();
        handle.destroy();
        assert_eq!(metrics.snapshot().bytes_allocated, 0);
        assert_eq!(handle.insert(3), Err(FilterError::InvalidHandle));
    }
}
