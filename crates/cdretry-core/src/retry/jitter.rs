//! Injectable randomness for backoff jitter.

use rand::rngs::{StdRng, ThreadRng};
use rand::{Rng, SeedableRng};

/// Source of jitter ratios. Implementations must return a value in `[0, max]`.
pub trait JitterSource {
    fn sample(&mut self, max: f64) -> f64;
}

impl<J: JitterSource + ?Sized> JitterSource for Box<J> {
    fn sample(&mut self, max: f64) -> f64 {
        (**self).sample(max)
    }
}

/// Uniform jitter from any `rand` generator.
#[derive(Debug, Clone)]
pub struct RandJitter<R> {
    rng: R,
}

impl<R: Rng> RandJitter<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandJitter<StdRng> {
    /// Reproducible jitter sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Seeded from OS entropy. Unlike [`RandJitter::thread`] this is `Send`.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl RandJitter<ThreadRng> {
    /// Thread-local generator, for one-off computations on the current thread.
    pub fn thread() -> Self {
        Self::new(rand::rng())
    }
}

impl<R: Rng> JitterSource for RandJitter<R> {
    fn sample(&mut self, max: f64) -> f64 {
        if max.is_nan() || max <= 0.0 {
            return 0.0;
        }
        self.rng.random_range(0.0..=max)
    }
}

/// Constant jitter ratio, clamped to `[0, max]` on use.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedJitter(pub f64);

impl JitterSource for FixedJitter {
    fn sample(&mut self, max: f64) -> f64 {
        self.0.clamp(0.0, max.max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_sequences_repeat() {
        let mut a = RandJitter::seeded(7);
        let mut b = RandJitter::seeded(7);
        for _ in 0..32 {
            assert_eq!(a.sample(0.1), b.sample(0.1));
        }
    }

    #[test]
    fn samples_stay_in_range() {
        let mut j = RandJitter::seeded(42);
        for _ in 0..1000 {
            let s = j.sample(0.1);
            assert!((0.0..=0.1).contains(&s), "{s}");
        }
        assert_eq!(j.sample(0.0), 0.0);
    }

    #[test]
    fn fixed_jitter_is_clamped() {
        assert_eq!(FixedJitter(0.05).sample(0.1), 0.05);
        assert_eq!(FixedJitter(0.5).sample(0.1), 0.1);
        assert_eq!(FixedJitter(-1.0).sample(0.1), 0.0);
    }
}
