//! Injectable source of uniform random draws.
//!
//! Every random decision in the simulator (region picks, disk sampling,
//! motion mode, jitter) goes through [`RandomSource`]. Production code
//! wraps a seeded or entropy-seeded [`SmallRng`] in [`RngSource`]; tests
//! script exact draws with [`SequenceSource`] so scenario outcomes are
//! exact instead of statistical.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// A stream of uniform draws in `[0, 1)`.
pub trait RandomSource {
    /// Return the next uniform draw in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Return a uniform index in `0..len` as `floor(U * len)`.
    ///
    /// Returns `0` when `len` is zero. The result is clamped to
    /// `len - 1` so a scripted draw of exactly `1.0` stays in range.
    fn next_index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        #[allow(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        let index = (self.next_unit() * len as f64).floor() as usize;
        index.min(len.saturating_sub(1))
    }
}

impl<T: RandomSource + ?Sized> RandomSource for &mut T {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

impl<T: RandomSource + ?Sized> RandomSource for Box<T> {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// The generator used outside tests.
pub type DefaultRandom = RngSource<SmallRng>;

/// Adapter exposing any [`rand::Rng`] as a [`RandomSource`].
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

impl<R: Rng> RngSource<R> {
    /// Wrap an existing generator.
    pub const fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RngSource<SmallRng> {
    /// A reproducible source seeded from `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self::new(SmallRng::seed_from_u64(seed))
    }

    /// A source seeded from the thread-local generator.
    pub fn from_entropy() -> Self {
        Self::new(SmallRng::from_rng(&mut rand::rng()))
    }

    /// Seeded when `seed` is given, entropy-seeded otherwise.
    pub fn from_seed_option(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::from_entropy, Self::seeded)
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn next_unit(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

/// Replays a fixed list of draws, cycling when exhausted.
///
/// An empty list yields `0.0` forever.
#[derive(Debug, Clone, Default)]
pub struct SequenceSource {
    values: Vec<f64>,
    cursor: usize,
}

impl SequenceSource {
    /// Create a source that yields `values` in order.
    pub fn new(values: impl Into<Vec<f64>>) -> Self {
        Self {
            values: values.into(),
            cursor: 0,
        }
    }
}

impl RandomSource for SequenceSource {
    fn next_unit(&mut self) -> f64 {
        let Some(slot) = self.cursor.checked_rem(self.values.len()) else {
            return 0.0;
        };
        self.cursor = self.cursor.saturating_add(1);
        self.values.get(slot).copied().unwrap_or(0.0)
    }
}
