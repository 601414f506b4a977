//! Seeded random stream shared by every generation stage.

use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

const UNIT_SCALE: f64 = 1.0 / (1_u64 << 53) as f64;

pub struct GenRng {
    inner: ChaCha8Rng,
}

impl GenRng {
    pub fn new(seed: u64) -> Self {
        Self { inner: ChaCha8Rng::seed_from_u64(seed) }
    }

    pub fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    /// Uniform in `[0, 1)`.
    pub fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * UNIT_SCALE
    }

    pub fn chance(&mut self, probability: f64) -> bool {
        self.unit() < probability
    }

    /// Uniform in `[0, upper)`; zero when `upper` is zero.
    pub fn below(&mut self, upper: usize) -> usize {
        if upper == 0 {
            return 0;
        }
        (self.next_u64() % upper as u64) as usize
    }

    /// Uniform in `[min_value, max_value]`; collapses to `min_value` for an empty range.
    pub fn range_inclusive(&mut self, min_value: i32, max_value: i32) -> i32 {
        if max_value <= min_value {
            return min_value;
        }
        let span = (max_value - min_value) as u64 + 1;
        min_value + (self.next_u64() % span) as i32
    }

    pub fn range_usize(&mut self, min_value: usize, max_value: usize) -> usize {
        if max_value <= min_value {
            return min_value;
        }
        min_value + self.below(max_value - min_value + 1)
    }

    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        items.get(self.below(items.len()))
    }

    pub fn shuffle<T>(&mut self, items: &mut [T]) {
        for index in (1..items.len()).rev() {
            let swap_with = self.below(index + 1);
            items.swap(index, swap_with);
        }
    }

    /// `count` distinct indices from `0..len`, in draw order.
    pub fn sample_indices(&mut self, len: usize, count: usize) -> Vec<usize> {
        let mut pool: Vec<usize> = (0..len).collect();
        let count = count.min(len);
        for index in 0..count {
            let pick = index + self.below(len - index);
            pool.swap(index, pick);
        }
        pool.truncate(count);
        pool
    }
}
