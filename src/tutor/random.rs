//! Injectable randomness for word draws.

use std::sync::{Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};

/// Source of random draws used by the engine.
pub trait RandomSource: Send + Sync {
    /// Uniform index in `0..len`. `len` must be non-zero.
    fn index(&self, len: usize) -> usize;

    /// `amount` distinct indices in `0..len`, in draw order. `amount <= len`.
    fn distinct_indices(&self, len: usize, amount: usize) -> Vec<usize>;
}

/// Thread-local generator; draws from different chats never contend.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn index(&self, len: usize) -> usize {
        rand::rng().random_range(0..len)
    }

    fn distinct_indices(&self, len: usize, amount: usize) -> Vec<usize> {
        index::sample(&mut rand::rng(), len, amount).into_vec()
    }
}

/// Deterministic generator for tests and reproducible runs.
pub struct SeededRandom {
    rng: Mutex<StdRng>,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl RandomSource for SeededRandom {
    fn index(&self, len: usize) -> usize {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.random_range(0..len)
    }

    fn distinct_indices(&self, len: usize, amount: usize) -> Vec<usize> {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        index::sample(&mut *rng, len, amount).into_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_is_reproducible() {
        let a = SeededRandom::new(42);
        let b = SeededRandom::new(42);
        assert_eq!(a.distinct_indices(20, 5), b.distinct_indices(20, 5));
        assert_eq!(a.index(20), b.index(20));
    }

    #[test]
    fn test_full_sample_is_permutation() {
        let random = SeededRandom::new(3);
        let mut picked = random.distinct_indices(5, 5);
        picked.sort_unstable();
        assert_eq!(picked, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_thread_random_in_range() {
        for _ in 0..100 {
            assert!(ThreadRandom.index(3) < 3);
        }
    }
}
