use core::ops::{Add, Mul};

use crate::NonNegativeF64;

bounded_f64!(
    /// A strictly positive amount, e.g. a population size or a sequence length
    PositiveF64, PositiveF64Error, "(0.0, inf]", |value| value > 0.0
);

impl PartialEq<NonNegativeF64> for PositiveF64 {
    fn eq(&self, other: &NonNegativeF64) -> bool {
        self.get().eq(&other.get())
    }
}

impl PartialOrd<NonNegativeF64> for PositiveF64 {
    fn partial_cmp(&self, other: &NonNegativeF64) -> Option<core::cmp::Ordering> {
        self.get().partial_cmp(&other.get())
    }
}

impl Mul for PositiveF64 {
    type Output = Self;

    fn mul(self, other: Self) -> Self {
        Self(self.0 * other.0)
    }
}

impl Add<NonNegativeF64> for PositiveF64 {
    type Output = Self;

    fn add(self, other: NonNegativeF64) -> Self {
        Self(self.0 + other.get())
    }
}

impl Add<PositiveF64> for NonNegativeF64 {
    type Output = PositiveF64;

    fn add(self, other: PositiveF64) -> PositiveF64 {
        PositiveF64(self.get() + other.0)
    }
}
