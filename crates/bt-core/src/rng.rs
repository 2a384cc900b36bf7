//! Pluggable randomness for the simulation.
//!
//! # Determinism strategy
//!
//! Every random draw the engine makes goes through the [`RandomSource`]
//! trait.  Production runs use [`SimRng`], a `SmallRng` seeded from the run
//! configuration, so the same seed replays the same deviations and the same
//! boarding/alighting counts.  Tests substitute a scripted source that
//! returns fixed values and never touches `rand` at all.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Source of the three kinds of draw the tick loop needs.
///
/// Sources handed to a spawned engine must also be `Send`.
pub trait RandomSource {
    /// `true` with probability `p`.  Values outside `[0, 1]` are clamped.
    fn chance(&mut self, p: f64) -> bool;

    /// Uniform `f64` in the closed range `[lo, hi]`.
    fn uniform_f64(&mut self, lo: f64, hi: f64) -> f64;

    /// Uniform `u32` in the closed range `[lo, hi]`.
    fn uniform_u32(&mut self, lo: u32, hi: u32) -> u32;
}

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Seeded simulation RNG.
///
/// Used only on the simulation thread; it is `Send` but not shared.
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }
}

impl RandomSource for SimRng {
    #[inline]
    fn chance(&mut self, p: f64) -> bool {
        if p.is_nan() {
            return false;
        }
        self.0.gen_bool(p.clamp(0.0, 1.0))
    }

    #[inline]
    fn uniform_f64(&mut self, lo: f64, hi: f64) -> f64 {
        if lo >= hi {
            return lo;
        }
        self.0.gen_range(lo..=hi)
    }

    #[inline]
    fn uniform_u32(&mut self, lo: u32, hi: u32) -> u32 {
        if lo >= hi {
            return lo;
        }
        self.0.gen_range(lo..=hi)
    }
}
