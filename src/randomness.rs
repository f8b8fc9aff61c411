//! The single source of every stochastic draw in the library model.
//!
//! A run never touches ambient randomness: the [`Library`](crate::library::Library) owns one value implementing
//! [`Randomness`] and every draw (inter-arrival gaps, title choice, return decision, overdue extension) goes through it
//! in event order. Seeding that value fixes the whole run.

use crate::Days;
use rand::{Rng, RngCore};

/// Draws needed by the library model.
///
/// Every [`RngCore`] implements this trait, so a seeded [`rand_pcg::Pcg64`] can be handed in directly. Tests can
/// substitute a scripted implementation to force particular branches.
pub trait Randomness {
    /// Uniform integer number of days in `[low, high]`, both ends inclusive. Requires `low <= high`.
    fn days_between(&mut self, low: Days, high: Days) -> Days;

    /// Uniform draw from `[0, 1)`.
    fn unit(&mut self) -> f64;

    /// Uniform index into a collection of `len` elements. Requires `len > 0`.
    fn index(&mut self, len: usize) -> usize;
}

impl<Generator> Randomness for Generator
where
    Generator: RngCore,
{
    fn days_between(&mut self, low: Days, high: Days) -> Days {
        self.random_range(low..=high)
    }

    fn unit(&mut self) -> f64 {
        self.random::<f64>()
    }

    fn index(&mut self, len: usize) -> usize {
        self.random_range(0..len)
    }
}

#[cfg(test)]
pub(crate) mod scripted {
    use super::Randomness;
    use crate::Days;
    use std::collections::VecDeque;

    /// Hands out pre-recorded draws in order. Panics when a script runs dry, which in a test means the model made
    /// more draws than expected.
    #[derive(Debug, Default)]
    pub(crate) struct Scripted {
        pub days: VecDeque<Days>,
        pub units: VecDeque<f64>,
        pub indices: VecDeque<usize>,
    }

    impl Randomness for Scripted {
        fn days_between(&mut self, low: Days, high: Days) -> Days {
            let days = self.days.pop_front().expect("ran out of scripted day draws");
            assert!((low..=high).contains(&days), "scripted {days} outside [{low}, {high}]");
            days
        }

        fn unit(&mut self) -> f64 {
            self.units.pop_front().expect("ran out of scripted unit draws")
        }

        fn index(&mut self, len: usize) -> usize {
            let index = self.indices.pop_front().expect("ran out of scripted index draws");
            assert!(index < len);
            index
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    #[test]
    fn seeded_draws_stay_in_range() {
        let mut rng = Pcg64::seed_from_u64(42);
        for _ in 0..1000 {
            let days = rng.days_between(1, 10);
            assert!((1..=10).contains(&days));
            let unit = rng.unit();
            assert!((0.0..1.0).contains(&unit));
            assert!(rng.index(3) < 3);
        }
    }

    #[test]
    fn same_seed_same_draws() {
        let mut first = Pcg64::seed_from_u64(7);
        let mut second = Pcg64::seed_from_u64(7);
        let a: Vec<Days> = (0..50).map(|_| first.days_between(1, 7)).collect();
        let b: Vec<Days> = (0..50).map(|_| second.days_between(1, 7)).collect();
        assert_eq!(a, b);
    }

    #[test]
    fn degenerate_range_is_constant() {
        let mut rng = Pcg64::seed_from_u64(3);
        assert!((0..20).all(|_| rng.days_between(1, 1) == 1));
    }
}
