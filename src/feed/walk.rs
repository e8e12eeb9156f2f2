//! Bounded random-walk price generation

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Prices carry two decimal places throughout the pipeline.
const PRICE_SCALE: f64 = 100.0;

/// Round a raw price to the pipeline's fixed precision.
pub fn round_price(value: f64) -> f64 {
    (value * PRICE_SCALE).round() / PRICE_SCALE
}

/// Price evolution strategy for the simulated feed
pub trait Walk: Send {
    /// Produce the next price from the previous one.
    fn next_price(&mut self, previous: f64) -> f64;
}

/// Random walk with a uniformly distributed delta inside a symmetric
/// bound, seeded for deterministic replays.
pub struct RandomWalk {
    max_fluctuation: f64,
    rng: ChaCha8Rng,
}

impl RandomWalk {
    /// Create a walk with an entropy-derived seed.
    pub fn new(max_fluctuation: f64) -> Self {
        Self {
            max_fluctuation,
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    /// Create a walk with a deterministic seed.
    pub fn with_seed(max_fluctuation: f64, seed: u64) -> Self {
        Self {
            max_fluctuation,
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Walk for RandomWalk {
    fn next_price(&mut self, previous: f64) -> f64 {
        let delta = self
            .rng
            .gen_range(-self.max_fluctuation..=self.max_fluctuation);
        round_price(previous + delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delta_stays_within_bound() {
        let mut walk = RandomWalk::with_seed(50.0, 7);
        let mut price = 50000.0;
        for _ in 0..1000 {
            let next = walk.next_price(price);
            // Rounding can push the step past the bound by at most half a cent
            assert!(
                (next - price).abs() <= 50.0 + 0.005,
                "step from {} to {} exceeds bound",
                price,
                next
            );
            price = next;
        }
    }

    #[test]
    fn test_prices_round_to_two_decimals() {
        let mut walk = RandomWalk::with_seed(50.0, 11);
        let mut price = 50000.0;
        for _ in 0..100 {
            price = walk.next_price(price);
            assert_eq!(price, round_price(price));
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = RandomWalk::with_seed(50.0, 42);
        let mut b = RandomWalk::with_seed(50.0, 42);
        let mut price_a = 50000.0;
        let mut price_b = 50000.0;
        for _ in 0..50 {
            price_a = a.next_price(price_a);
            price_b = b.next_price(price_b);
            assert_eq!(price_a, price_b);
        }
    }

    #[test]
    fn test_round_price() {
        assert_eq!(round_price(50010.004), 50010.0);
        assert_eq!(round_price(50010.006), 50010.01);
        assert_eq!(round_price(99.999), 100.0);
    }
}
