//! Randomness sources for hit rolls, target picks and decision latency.
//!
//! Every consumer takes a [`RandomSource`] by injection. Concurrent decision
//! workers never share one: each receives its own stream via
//! [`RandomSource::fork`], so draws stay independent and contention free
//! while a seeded root keeps whole sessions reproducible.

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Uniform randomness used by the combat rules.
pub trait RandomSource: Send {
    /// Uniform float in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// Uniform index in `[0, len)`. Returns 0 when `len` is 0.
    fn next_index(&mut self, len: usize) -> usize;

    /// Derives an independent stream for a concurrent consumer.
    fn fork(&mut self) -> Box<dyn RandomSource>;

    /// Rolls against `probability`; true means the event happened.
    fn roll(&mut self, probability: f64) -> bool {
        self.next_f64() < probability
    }
}

// ============================================================================
// Seeded stream
// ============================================================================

/// ChaCha-backed stream. The same seed always yields the same draws and forks.
#[derive(Clone, Debug)]
pub struct SeededRng {
    inner: ChaCha8Rng,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Seeds from operating system entropy for unscripted play.
    pub fn from_entropy() -> Self {
        Self {
            inner: ChaCha8Rng::from_entropy(),
        }
    }
}

impl RandomSource for SeededRng {
    fn next_f64(&mut self) -> f64 {
        self.inner.gen_range(0.0..1.0)
    }

    fn next_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        self.inner.gen_range(0..len)
    }

    fn fork(&mut self) -> Box<dyn RandomSource> {
        Box::new(SeededRng::new(self.inner.next_u64()))
    }
}

// ============================================================================
// Scripted stream
// ============================================================================

/// Replays fixed values in a loop. Forks replay the same script from the start.
///
/// Useful for forcing outcomes: `SequenceRng::floats([0.99])` makes every
/// roll against a probability below 0.99 fail, i.e. every attack hit.
#[derive(Clone, Debug, Default)]
pub struct SequenceRng {
    floats: Vec<f64>,
    indices: Vec<usize>,
    float_pos: usize,
    index_pos: usize,
}

impl SequenceRng {
    pub fn new(floats: impl Into<Vec<f64>>, indices: impl Into<Vec<usize>>) -> Self {
        Self {
            floats: floats.into(),
            indices: indices.into(),
            float_pos: 0,
            index_pos: 0,
        }
    }

    pub fn floats(floats: impl Into<Vec<f64>>) -> Self {
        Self::new(floats, Vec::new())
    }
}

impl RandomSource for SequenceRng {
    fn next_f64(&mut self) -> f64 {
        if self.floats.is_empty() {
            return 0.0;
        }
        let value = self.floats[self.float_pos % self.floats.len()];
        self.float_pos += 1;
        value
    }

    fn next_index(&mut self, len: usize) -> usize {
        if len == 0 || self.indices.is_empty() {
            return 0;
        }
        let value = self.indices[self.index_pos % self.indices.len()];
        self.index_pos += 1;
        value % len
    }

    fn fork(&mut self) -> Box<dyn RandomSource> {
        Box::new(Self::new(self.floats.clone(), self.indices.clone()))
    }
}
