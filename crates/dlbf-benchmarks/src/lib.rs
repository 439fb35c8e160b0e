//! Benchmark utilities for the deletable Bloom filter
pub mod utils {
    use rand::Rng;

    /// `count` uniformly random keys
    pub fn generate_keys(count: usize) -> Vec<u32> {
        let mut rng = rand::thread_rng();
        (0..count).map(|_| rng.gen()).collect()
    }

    /// Keys whose first membership offset is identical for a filter of
    /// `size_bits`, forcing collisions on every insert after the first
    pub fn generate_colliding_keys(count: usize, size_bits: usize) -> Vec<u32> {
        let target = dlbf::domain::hash(0, 0) as usize % size_bits;
        (0u32..)
            .filter(|&x| dlbf::domain::hash(0, x) as usize % size_bits == target)
            .take(count)
            .collect()
    }
}
