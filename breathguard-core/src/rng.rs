//! Randomness sources for the estimation pipeline
//!
//! Provides an injectable abstraction over randomness so that every
//! stochastic step (confidence draws, probability-mass partitioning,
//! contribution weights) can be replayed exactly in tests:
//! - Entropy-seeded PRNG (production, std)
//! - Fixed-seed PRNG (deterministic runs, no_std friendly)
//! - Replayable value sequence (tests)
//!
//! Nothing in this crate reads ambient global random state.

use rand::{rngs::SmallRng, Rng, SeedableRng};

/// Source of uniform random draws for estimation.
///
/// Implementations yield values in `[0, 1)`. The estimator documents
/// its draw order, so a replayed sequence reproduces outputs exactly.
pub trait RandomSource {
    /// Next uniform draw in `[0, 1)`.
    fn next_unit(&mut self) -> f32;
}

/// PRNG seeded from operating-system entropy.
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct EntropyRandom {
    rng: SmallRng,
}

#[cfg(feature = "std")]
impl EntropyRandom {
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for EntropyRandom {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl RandomSource for EntropyRandom {
    fn next_unit(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }
}

/// PRNG with a caller-supplied seed
///
/// Same draw sequence for the same seed, on every platform.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    rng: SmallRng,
}

impl SeededRandom {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for SeededRandom {
    fn next_unit(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }
}

/// Replayable sequence source for tests
///
/// Yields the provided values in order, cycling when exhausted. An
/// empty slice yields zero forever.
#[derive(Debug, Clone)]
pub struct SequenceRandom<'a> {
    values: &'a [f32],
    pos: usize,
}

impl<'a> SequenceRandom<'a> {
    pub fn new(values: &'a [f32]) -> Self {
        Self { values, pos: 0 }
    }

    /// Number of draws taken so far.
    pub fn draws(&self) -> usize {
        self.pos
    }
}

impl RandomSource for SequenceRandom<'_> {
    fn next_unit(&mut self) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        let value = self.values[self.pos % self.values.len()];
        self.pos += 1;
        value
    }
}
