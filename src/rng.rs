//! Deterministic, per-engine PRNG seeding.
//!
//! No global RNG state exists anywhere in this crate. Every engine that
//! needs randomness (LBEngine's local search, BucketPQ's tie-breaking) owns
//! its own `ChaCha8Rng`, seeded deterministically from the sub-problem it is
//! currently working on so that repeated runs over the same input reproduce
//! the same shuffles.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Seed derived from `42 * num_subgraphs + sum_counts`, the scheme
/// `LBEngine`'s 2-improvement local search uses.
pub fn seed_from_packing(num_subgraphs: usize, sum_counts: u64) -> u64 {
    42u64
        .wrapping_mul(num_subgraphs as u64)
        .wrapping_add(sum_counts)
}

pub fn rng_from_seed(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn same_seed_same_sequence() {
        let mut a = rng_from_seed(seed_from_packing(3, 10));
        let mut b = rng_from_seed(seed_from_packing(3, 10));
        let xs: Vec<u32> = (0..5).map(|_| a.gen()).collect();
        let ys: Vec<u32> = (0..5).map(|_| b.gen()).collect();
        assert_eq!(xs, ys);
    }
}
