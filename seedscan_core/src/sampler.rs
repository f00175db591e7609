//! Seeded Sampler - deterministic batches of bounded integers.
//!
//! Every candidate second is turned into a seed, and the seed fully
//! determines the batch. The default [`RandMaxSampler`] seeds a fresh
//! ChaCha8 generator per call and draws values in `[0, RAND_MAX]`, the range
//! of the classic C `rand()`.
//!
//! Because a batch is a pure function of `(seed, count)`, the same batch is
//! produced on any worker thread, which is what lets the parallel scan agree
//! bit-for-bit with the sequential one.

use crate::error::SampleError;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Largest value a sampler may return (inclusive).
pub const RAND_MAX: u16 = 32767;

/// Produces a deterministic batch of integers in `[0, RAND_MAX]` for a seed.
///
/// Implementations must be pure: the same `(seed, count)` always yields the
/// same sequence, independent of the calling thread.
pub trait SeededSampler: Send + Sync {
    /// Draws `count` samples for `seed`.
    fn sample(&self, seed: i64, count: usize) -> Result<Vec<u16>, SampleError>;
}

/// Default sampler: ChaCha8 seeded from the window second.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandMaxSampler;

impl RandMaxSampler {
    /// Generator for one window second.
    ///
    /// The seed's bits are reinterpreted as `u64`, so pre-1970 seconds stay
    /// distinct from post-1970 ones.
    pub fn rng_for(seed: i64) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(seed as u64)
    }
}

impl SeededSampler for RandMaxSampler {
    fn sample(&self, seed: i64, count: usize) -> Result<Vec<u16>, SampleError> {
        let mut rng = Self::rng_for(seed);
        Ok((0..count).map(|_| rng.gen_range(0..=RAND_MAX)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_sample_length_and_range() {
        let batch = RandMaxSampler.sample(1_700_000_000, 5_000).unwrap();
        assert_eq!(batch.len(), 5_000);
        assert!(batch.iter().all(|&v| v <= RAND_MAX));
    }

    #[test]
    fn test_sample_covers_both_halves() {
        let batch = RandMaxSampler.sample(1_700_000_000, 5_000).unwrap();
        assert!(batch.iter().any(|&v| v < 16_384));
        assert!(batch.iter().any(|&v| v >= 16_384));
    }

    #[test]
    fn test_sample_zero_count_is_empty() {
        assert!(RandMaxSampler.sample(99, 0).unwrap().is_empty());
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = RandMaxSampler.sample(1_700_000_000, 64).unwrap();
        let b = RandMaxSampler.sample(1_700_000_001, 64).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_same_batch_on_other_thread() {
        let here = RandMaxSampler.sample(1_700_000_123, 256).unwrap();
        let there = std::thread::spawn(|| RandMaxSampler.sample(1_700_000_123, 256).unwrap())
            .join()
            .unwrap();
        assert_eq!(here, there);
    }

    #[test]
    fn test_negative_seed_is_distinct() {
        let before_epoch = RandMaxSampler.sample(-1, 32).unwrap();
        let after_epoch = RandMaxSampler.sample(1, 32).unwrap();
        assert_ne!(before_epoch, after_epoch);
        assert_eq!(before_epoch, RandMaxSampler.sample(-1, 32).unwrap());
    }

    #[test]
    fn test_batch_matches_fresh_generator() {
        let mut rng = RandMaxSampler::rng_for(42);
        let expected: Vec<u16> = (0..16).map(|_| rng.gen_range(0..=RAND_MAX)).collect();
        assert_eq!(RandMaxSampler.sample(42, 16).unwrap(), expected);
    }

    proptest! {
        #[test]
        fn prop_sampler_is_deterministic(seed in any::<i64>(), count in 0usize..512) {
            let first = RandMaxSampler.sample(seed, count).unwrap();
            let second = RandMaxSampler.sample(seed, count).unwrap();
            prop_assert_eq!(first.len(), count);
            prop_assert!(first.iter().all(|&v| v <= RAND_MAX));
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_shorter_batch_is_prefix(seed in any::<i64>(), count in 1usize..256) {
            let long = RandMaxSampler.sample(seed, count * 2).unwrap();
            let short = RandMaxSampler.sample(seed, count).unwrap();
            prop_assert_eq!(&long[..count], &short[..]);
        }
    }
}
