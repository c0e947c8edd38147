//! Deterministic utilities for reproducible training
//!
//! Provides LCG-based randomness, deterministic hashing, and split
//! tie-breaking so the same seed yields the same model on every
//! platform and run.

use std::cmp::Ordering;
use std::num::Wrapping;

/// Linear Congruential Generator for deterministic pseudo-randomness
/// Uses constants from Numerical Recipes (glibc)
#[derive(Clone, Debug)]
pub struct LcgRng {
    state: Wrapping<i64>,
}

impl LcgRng {
    const MULTIPLIER: i64 = 1103515245;
    const INCREMENT: i64 = 12345;
    const MODULUS: i64 = 1 << 31;

    pub fn new(seed: i64) -> Self {
        Self {
            state: Wrapping(seed.abs() % Self::MODULUS),
        }
    }

    /// Next value in [0, MODULUS)
    pub fn next_i64(&mut self) -> i64 {
        self.state = self.state * Wrapping(Self::MULTIPLIER) + Wrapping(Self::INCREMENT);
        (self.state.0 & (Self::MODULUS - 1)).abs()
    }

    /// Value in [0, max)
    pub fn next_range(&mut self, max: i64) -> i64 {
        if max <= 0 {
            return 0;
        }
        self.next_i64() % max
    }

    /// Index in [0, max)
    pub fn next_index(&mut self, max: usize) -> usize {
        self.next_range(max as i64) as usize
    }

    /// Value in [0.0, 1.0)
    pub fn next_unit(&mut self) -> f64 {
        self.next_i64() as f64 / Self::MODULUS as f64
    }

    /// Bootstrap sample: `count` indices drawn in [0, n) with
    /// replacement.
    pub fn bootstrap_indices(&mut self, n: usize, count: usize) -> Vec<usize> {
        (0..count).map(|_| self.next_index(n)).collect()
    }

    /// `count` distinct indices in [0, n), returned in ascending order
    /// (partial Fisher-Yates over an index array).
    pub fn sample_without_replacement(&mut self, n: usize, count: usize) -> Vec<usize> {
        let count = count.min(n);
        let mut pool: Vec<usize> = (0..n).collect();
        for i in 0..count {
            let j = i + self.next_index(n - i);
            pool.swap(i, j);
        }
        let mut chosen = pool[..count].to_vec();
        chosen.sort_unstable();
        chosen
    }
}

/// Deterministic xxhash64-like mix in pure i64 arithmetic, used for
/// row-order shuffling and per-tree seed derivation.
pub fn xxhash64_i64(data: &[i64], seed: i64) -> i64 {
    const PRIME1: i64 = 0x9E3779B185EBCA87_u64 as i64;
    const PRIME2: i64 = 0xC2B2AE3D27D4EB4F_u64 as i64;
    const PRIME3: i64 = 0x165667B19E3779F9_u64 as i64;
    const PRIME5: i64 = 0x85EBCA77C2B2AE63_u64 as i64;

    let mut h = seed.wrapping_add(PRIME5);

    for &val in data {
        h = h.wrapping_add(val.wrapping_mul(PRIME3));
        h = h.rotate_left(17).wrapping_mul(PRIME2);
    }

    h ^= h >> 33;
    h = h.wrapping_mul(PRIME1);
    h ^= h >> 29;
    h = h.wrapping_mul(PRIME2);
    h ^= h >> 32;

    h
}

/// Deterministic tie-breaker for split selection: on equal impurity
/// reduction, the lowest feature index wins, then the lowest
/// threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitTieBreaker {
    pub feature_idx: usize,
    pub threshold: f64,
}

impl SplitTieBreaker {
    pub fn new(feature_idx: usize, threshold: f64) -> Self {
        Self {
            feature_idx,
            threshold,
        }
    }
}

impl Eq for SplitTieBreaker {}

impl Ord for SplitTieBreaker {
    fn cmp(&self, other: &Self) -> Ordering {
        self.feature_idx
            .cmp(&other.feature_idx)
            .then_with(|| self.threshold.total_cmp(&other.threshold))
    }
}

impl PartialOrd for SplitTieBreaker {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lcg_determinism() {
        let mut rng1 = LcgRng::new(42);
        let mut rng2 = LcgRng::new(42);
        for _ in 0..100 {
            assert_eq!(rng1.next_i64(), rng2.next_i64());
        }
    }

    #[test]
    fn test_lcg_range() {
        let mut rng = LcgRng::new(42);
        for _ in 0..100 {
            let val = rng.next_range(10);
            assert!((0..10).contains(&val));
        }
    }

    #[test]
    fn test_bootstrap_size_and_bounds() {
        let mut rng = LcgRng::new(7);
        let sample = rng.bootstrap_indices(20, 20);
        assert_eq!(sample.len(), 20);
        assert!(sample.iter().all(|&i| i < 20));
    }

    #[test]
    fn test_sample_without_replacement_is_distinct_and_sorted() {
        let mut rng = LcgRng::new(7);
        let chosen = rng.sample_without_replacement(10, 4);
        assert_eq!(chosen.len(), 4);
        assert!(chosen.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_xxhash64_determinism() {
        let data = vec![1, 2, 3, 4, 5];
        assert_eq!(xxhash64_i64(&data, 42), xxhash64_i64(&data, 42));
        assert_ne!(xxhash64_i64(&data, 42), xxhash64_i64(&data, 43));
    }

    #[test]
    fn test_tie_breaker_ordering() {
        let t1 = SplitTieBreaker::new(0, 100.0);
        let t2 = SplitTieBreaker::new(0, 200.0);
        let t3 = SplitTieBreaker::new(1, 50.0);
        assert!(t1 < t2);
        assert!(t1 < t3);
        assert!(t2 < t3);
    }
}
