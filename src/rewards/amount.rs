//! Fixed-point TON amounts.
use std::{
    fmt,
    iter::Sum,
    ops::{Add, AddAssign},
};

use serde::{Deserialize, Serialize};

pub const NANOTONS_PER_TON: u64 = 1_000_000_000;
const NANOTONS_PER_MILLITON: u64 = 1_000_000;

/// TON amount stored as whole nanotons so repeated credits sum exactly.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Ton(u64);

impl Ton {
    pub const ZERO: Ton = Ton(0);

    pub const fn from_nanotons(nanotons: u64) -> Self {
        Self(nanotons)
    }

    /// Converts a decimal TON value, rounding to the nearest nanoton.
    ///
    /// Returns `None` for negative, NaN or infinite inputs and for values that
    /// overflow the nanoton range.
    pub fn from_ton_f64(value: f64) -> Option<Self> {
        if !value.is_finite() || value < 0.0 {
            return None;
        }
        let scaled = (value * NANOTONS_PER_TON as f64).round();
        if scaled > u64::MAX as f64 {
            return None;
        }
        Some(Self(scaled as u64))
    }

    pub const fn nanotons(self) -> u64 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn saturating_add(self, other: Ton) -> Ton {
        Ton(self.0.saturating_add(other.0))
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn saturating_sub(self, other: Ton) -> Ton {
        Ton(self.0.saturating_sub(other.0))
    }

    /// Shortest exact decimal form (`0.01`, `1`, `0.0005`).
    pub fn to_compact_string(self) -> String {
        let whole = self.0 / NANOTONS_PER_TON;
        let fraction = self.0 % NANOTONS_PER_TON;
        if fraction == 0 {
            return whole.to_string();
        }
        let digits = format!("{:09}", fraction);
        format!("{}.{}", whole, digits.trim_end_matches('0'))
    }
}

impl Add for Ton {
    type Output = Ton;

    fn add(self, rhs: Ton) -> Ton {
        self.saturating_add(rhs)
    }
}

impl AddAssign for Ton {
    fn add_assign(&mut self, rhs: Ton) {
        *self = self.saturating_add(rhs);
    }
}

impl Sum for Ton {
    fn sum<I: Iterator<Item = Ton>>(iter: I) -> Ton {
        iter.fold(Ton::ZERO, Add::add)
    }
}

/// Formats with three decimals, rounding half up (`0.0205` -> `0.021`).
impl fmt::Display for Ton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let millis = self.0.saturating_add(NANOTONS_PER_MILLITON / 2) / NANOTONS_PER_MILLITON;
        write!(f, "{}.{:03}", millis / 1_000, millis % 1_000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_milli_credits_sum_exactly() {
        let half_milli = Ton::from_ton_f64(0.0005).unwrap();
        assert_eq!(half_milli + half_milli, Ton::from_ton_f64(0.001).unwrap());
        assert_eq!((half_milli + half_milli).nanotons(), 1_000_000);
    }

    #[test]
    fn display_rounds_to_three_decimals() {
        assert_eq!(Ton::from_nanotons(20_000_000).to_string(), "0.020");
        assert_eq!(Ton::from_nanotons(500_000).to_string(), "0.001");
        assert_eq!(Ton::from_nanotons(499_999).to_string(), "0.000");
        assert_eq!(Ton::from_nanotons(12_345_600_000).to_string(), "12.346");
        assert_eq!(Ton::ZERO.to_string(), "0.000");
    }

    #[test]
    fn compact_form_trims_trailing_zeros() {
        assert_eq!(Ton::from_nanotons(10_000_000).to_compact_string(), "0.01");
        assert_eq!(Ton::from_nanotons(500_000).to_compact_string(), "0.0005");
        assert_eq!(Ton::from_nanotons(2 * NANOTONS_PER_TON).to_compact_string(), "2");
    }

    #[test]
    fn rejects_negative_and_non_finite_values() {
        assert!(Ton::from_ton_f64(-0.1).is_none());
        assert!(Ton::from_ton_f64(f64::NAN).is_none());
        assert!(Ton::from_ton_f64(f64::INFINITY).is_none());
    }

    #[test]
    fn sums_iterators() {
        let total: Ton = [1_u64, 2, 3].into_iter().map(Ton::from_nanotons).sum();
        assert_eq!(total, Ton::from_nanotons(6));
        assert_eq!(
            Ton::from_nanotons(5).saturating_sub(Ton::from_nanotons(9)),
            Ton::ZERO
        );
    }
}
