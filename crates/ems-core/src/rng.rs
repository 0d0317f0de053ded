//! Deterministic seeded RNG wrapper.
//!
//! # Determinism strategy
//!
//! Every simulation run and every optimizer trial owns its own `SimRng`;
//! there is no process-global random state anywhere in the workspace.
//! Independent streams are derived from a root seed via:
//!
//!   seed = root_seed XOR (a * MIXING_CONSTANT) XOR rotate(b * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive stream indices uniformly across the seed space.
//! This means:
//!
//! - Concurrent trials never share RNG state (no contention, no ordering
//!   dependency between Rayon workers).
//! - Stream `(a, b)` is the same regardless of how many other streams exist,
//!   so runs are reproducible as population sizes and trial counts change.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Derive the seed of independent stream `(a, b)` from `root_seed`.
///
/// Exposed so callers that need a plain `u64` (e.g. to put in a config) get
/// exactly the stream [`SimRng::for_stream`] would use.
#[inline]
pub fn stream_seed(root_seed: u64, a: u64, b: u64) -> u64 {
    root_seed
        ^ a.wrapping_mul(MIXING_CONSTANT)
        ^ b.wrapping_mul(MIXING_CONSTANT).rotate_left(32)
}

/// Deterministic simulation RNG.
///
/// The type is `Send` but intentionally not `Sync` — each worker thread must
/// own its stream outright.
pub struct SimRng(SmallRng);

impl SimRng {
    /// Seed directly from a root seed.
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// Derive an independent stream `(a, b)` from `root_seed`.
    ///
    /// Used to give every `(candidate, trial)` pair in the optimizer — and
    /// every standalone simulation run — its own generator.
    pub fn for_stream(root_seed: u64, a: u64, b: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(stream_seed(root_seed, a, b)))
    }

    /// Derive a child generator with a different seed offset — useful for
    /// splitting one configured seed into per-phase streams.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(child_seed))
    }

    /// Expose the inner `SmallRng` for use with `rand` distribution types.
    #[inline]
    pub fn inner(&mut self) -> &mut SmallRng {
        &mut self.0
    }

    /// Sample a uniformly distributed value of any `Standard`-distributed type.
    #[inline]
    pub fn random<T>(&mut self) -> T
    where
        rand::distributions::Standard: rand::distributions::Distribution<T>,
    {
        self.0.r#gen()
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// `true` with probability `p` (clamped to [0, 1]).
    #[inline]
    pub fn gen_bool(&mut self, p: f64) -> bool {
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    /// Shuffle a mutable slice in-place (Fisher-Yates).
    #[inline]
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        use rand::seq::SliceRandom;
        slice.shuffle(&mut self.0);
    }

    /// Choose a random element from a slice.  Returns `None` if empty.
    #[inline]
    pub fn choose<'a, T>(&mut self, slice: &'a [T]) -> Option<&'a T> {
        use rand::seq::SliceRandom;
        slice.choose(&mut self.0)
    }

    /// Sample an index in `0..weights.len()` with probability proportional to
    /// `weights[i]`.  Returns `None` if the slice is empty or sums to zero.
    pub fn weighted_index(&mut self, weights: &[f64]) -> Option<usize> {
        let total: f64 = weights.iter().filter(|w| w.is_finite() && **w > 0.0).sum();
        if total <= 0.0 {
            return None;
        }
        let mut roll = self.gen_range(0.0..total);
        for (i, &w) in weights.iter().enumerate() {
            if !w.is_finite() || w <= 0.0 {
                continue;
            }
            if roll < w {
                return Some(i);
            }
            roll -= w;
        }
        // Floating-point slack: fall back to the last positive weight.
        weights.iter().rposition(|w| w.is_finite() && *w > 0.0)
    }
}
