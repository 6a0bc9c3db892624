//! Seedable randomness for frequency Monte-Carlo draws.
//!
//! A `StdRng` seeded explicitly by the caller, never from the OS clock, keeps `(seed, request)`
//! pairs reproducible across runs.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::time::Time;

/// Draws per-entry boarding offsets for frequency trips.
pub struct FrequencyRng {
    inner: StdRng,
}

impl FrequencyRng {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            inner: StdRng::seed_from_u64(seed),
        }
    }

    /// A uniform offset in `[0, headway_seconds)`, used for a `RANDOM` frequency boarding draw.
    pub fn offset_within_headway(&mut self, headway_seconds: Time) -> Time {
        if headway_seconds <= 0 {
            return 0;
        }
        self.inner.random_range(0..headway_seconds)
    }
}
