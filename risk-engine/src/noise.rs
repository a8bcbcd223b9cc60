//! Live-load noise sources
//!
//! The scorer adds one uniform integer draw per call to model transient
//! load it cannot observe. Production uses a thread-local generator; the
//! other sources exist so tests can pin or script the draw.

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Source of the live-load perturbation
pub trait NoiseSource: Send + Sync + fmt::Debug {
    /// Draw an integer in `min..=max`
    fn draw(&self, min: i32, max: i32) -> i32;
}

/// Uniform draw from the calling thread's generator
///
/// No state is shared between threads, so concurrent callers neither
/// contend nor observe correlated sequences.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngNoise;

impl NoiseSource for ThreadRngNoise {
    fn draw(&self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        rand::thread_rng().gen_range(min..=max)
    }
}

/// Always the same value, clamped into the requested range
#[derive(Debug, Default, Clone, Copy)]
pub struct FixedNoise(pub i32);

impl NoiseSource for FixedNoise {
    fn draw(&self, min: i32, max: i32) -> i32 {
        self.0.clamp(min, max.max(min))
    }
}

/// Reproducible uniform draws from a seeded generator
#[derive(Debug)]
pub struct SeededNoise {
    rng: Mutex<StdRng>,
}

impl SeededNoise {
    /// Create from a seed
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl NoiseSource for SeededNoise {
    fn draw(&self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        self.rng.lock().gen_range(min..=max)
    }
}

/// Replays a fixed sequence, cycling when exhausted
#[derive(Debug)]
pub struct ScriptedNoise {
    values: Vec<i32>,
    cursor: AtomicUsize,
}

impl ScriptedNoise {
    /// Create from a sequence; an empty sequence draws zero
    pub fn new(values: Vec<i32>) -> Self {
        Self {
            values,
            cursor: AtomicUsize::new(0),
        }
    }
}

impl NoiseSource for ScriptedNoise {
    fn draw(&self, min: i32, max: i32) -> i32 {
        let value = if self.values.is_empty() {
            0
        } else {
            let i = self.cursor.fetch_add(1, Ordering::Relaxed);
            self.values[i % self.values.len()]
        };
        value.clamp(min, max.max(min))
    }
}
