//! Seeded random source for particle placement.
//!
//! A [`Field`](crate::Field) owns one generator for its whole lifetime: the
//! first seeding and every re-seed after a resize draw from the same stream.
//! A session replays exactly from its seed, yet each re-seed lays out a new
//! set of particles.

/// Marsaglia xorshift, 64-bit state, shift triple (13, 7, 17).
///
/// Pure integer arithmetic, so the stream is identical on native and wasm32.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    /// Stand-in for seed 0, which xorshift would never leave.
    const ZERO_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

    pub fn new(seed: u64) -> Self {
        let state = match seed {
            0 => Self::ZERO_SEED,
            s => s,
        };
        Self { state }
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform in [0, 1) with 53 bits of precision.
    pub fn next_f64(&mut self) -> f64 {
        const SCALE: f64 = 1.0 / (1u64 << 53) as f64;
        (self.next_u64() >> 11) as f64 * SCALE
    }

    /// `min + u * (max - min)` for `u` in [0, 1).
    ///
    /// Bounds are not reordered: with `max < min` the value falls in
    /// `(max, min]`. Particles on a surface narrower than their inset end up
    /// there instead of panicking.
    pub fn next_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_output_for_seed_42_is_stable() {
        // Recorded seeds in render descriptions depend on this value.
        assert_eq!(Xorshift64::new(42).next_u64(), 45_454_805_674);
    }

    #[test]
    fn zero_seed_is_remapped() {
        let mut zero = Xorshift64::new(0);
        let mut fallback = Xorshift64::new(Xorshift64::ZERO_SEED);
        assert_eq!(zero, fallback);
        assert_ne!(zero.next_u64(), 0);
        fallback.next_u64();
        assert_eq!(zero, fallback);
    }

    #[test]
    fn clones_continue_the_same_stream() {
        let mut rng = Xorshift64::new(2024);
        rng.next_u64();
        let mut copy = rng.clone();
        let a: Vec<u64> = (0..64).map(|_| rng.next_u64()).collect();
        let b: Vec<u64> = (0..64).map(|_| copy.next_u64()).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_diverge() {
        let mut a = Xorshift64::new(1);
        let mut b = Xorshift64::new(2);
        let same = (0..32).filter(|_| a.next_u64() == b.next_u64()).count();
        assert_eq!(same, 0);
    }

    #[test]
    fn next_f64_mean_is_near_one_half() {
        let mut rng = Xorshift64::new(77);
        let n = 20_000;
        let mean = (0..n).map(|_| rng.next_f64()).sum::<f64>() / n as f64;
        assert!((mean - 0.5).abs() < 0.01, "mean {mean}");
    }

    #[test]
    fn next_range_with_inverted_bounds_lands_between_them() {
        let mut rng = Xorshift64::new(5);
        for _ in 0..1000 {
            let v = rng.next_range(4.0, -2.0);
            assert!(v > -2.0 && v <= 4.0, "{v} outside (-2, 4]");
        }
    }

    #[test]
    fn next_range_degenerate_interval_returns_min() {
        let mut rng = Xorshift64::new(9);
        assert_eq!(rng.next_range(3.5, 3.5), 3.5);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn unit_draws_stay_in_unit_interval(seed: u64) {
                let mut rng = Xorshift64::new(seed);
                for _ in 0..100 {
                    let v = rng.next_f64();
                    prop_assert!((0.0..1.0).contains(&v), "seed {seed} gave {v}");
                }
            }

            #[test]
            fn ranged_draws_respect_ordered_bounds(
                seed: u64,
                min in -1e6_f64..1e6,
                span in 1e-3_f64..1e6,
            ) {
                let max = min + span;
                let mut rng = Xorshift64::new(seed);
                for _ in 0..100 {
                    let v = rng.next_range(min, max);
                    prop_assert!(v >= min && v <= max, "[{min}, {max}] gave {v}");
                }
            }
        }
    }
}
