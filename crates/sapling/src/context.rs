//! Growth state threaded through the grower: the random source, the split
//! error accumulator and the running child rotation. Cloning a context takes
//! a snapshot that pruning restores before each trial.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Error-feedback rounding that realises a fractional split rate over a
/// sequence of segments.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SplitAccumulator {
    error: f64,
}

impl SplitAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&self) -> f64 {
        self.error
    }

    /// Whole number of splits for a segment expecting `expected` splits.
    pub fn next(&mut self, expected: f64) -> usize {
        let n_eff = (expected + self.error).round().max(0.0);
        self.error -= n_eff - expected;
        n_eff as usize
    }
}

#[derive(Debug, Clone)]
pub struct GrowthContext {
    rng: StdRng,
    pub split: SplitAccumulator,
    /// Rotation of the last child around its parent, in radians.
    pub rotation: f64,
    next_spline: usize,
}

impl GrowthContext {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            split: SplitAccumulator::new(),
            rotation: 0.0,
            next_spline: 0,
        }
    }

    /// Uniform sample in `[0, 1)`.
    pub fn random(&mut self) -> f64 {
        self.rng.r#gen::<f64>()
    }

    /// Uniform sample in `[lo, hi)`; a degenerate range yields `lo`.
    pub fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.random()
    }

    /// Uniform sample in `[-v, v)`.
    pub fn vary(&mut self, v: f64) -> f64 {
        self.uniform(-v, v)
    }

    pub fn sign(&mut self) -> f64 {
        if self.rng.r#gen::<bool>() { 1.0 } else { -1.0 }
    }

    /// Index for a newly created spline.
    pub fn claim_spline(&mut self) -> usize {
        let index = self.next_spline;
        self.next_spline += 1;
        index
    }

    pub fn spline_count(&self) -> usize {
        self.next_spline
    }
}
