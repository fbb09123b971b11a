use rand::{rngs::StdRng, Rng, SeedableRng};
use std::ops::RangeInclusive;

/// The two draws the wander engine needs. Seam for deterministic tests.
pub trait RandomSource {
    /// Fair coin.
    fn coin(&mut self) -> bool;

    /// Uniform draw from a closed interval.
    fn uniform(&mut self, range: RangeInclusive<f64>) -> f64;
}

impl RandomSource for StdRng {
    fn coin(&mut self) -> bool {
        self.gen_bool(0.5)
    }

    fn uniform(&mut self, range: RangeInclusive<f64>) -> f64 {
        if range.start() >= range.end() {
            return *range.start();
        }
        self.gen_range(range)
    }
}

/// Seeded when a seed is given, OS entropy otherwise.
pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

/// Replays fixed coin flips and unit fractions, cycling when exhausted.
///
/// Fractions are mapped into whatever range is requested, so `0.0` always
/// yields the range start and `1.0` the range end.
#[derive(Clone, Debug)]
pub struct ScriptedSource {
    coins: Vec<bool>,
    fractions: Vec<f64>,
    coin_at: usize,
    fraction_at: usize,
}

impl ScriptedSource {
    pub fn new(coins: Vec<bool>, fractions: Vec<f64>) -> Self {
        Self {
            coins,
            fractions,
            coin_at: 0,
            fraction_at: 0,
        }
    }
}

impl RandomSource for ScriptedSource {
    fn coin(&mut self) -> bool {
        if self.coins.is_empty() {
            return true;
        }
        let v = self.coins[self.coin_at % self.coins.len()];
        self.coin_at += 1;
        v
    }

    fn uniform(&mut self, range: RangeInclusive<f64>) -> f64 {
        let f = if self.fractions.is_empty() {
            0.5
        } else {
            let v = self.fractions[self.fraction_at % self.fractions.len()];
            self.fraction_at += 1;
            v.clamp(0.0, 1.0)
        };
        range.start() + (range.end() - range.start()) * f
    }
}
