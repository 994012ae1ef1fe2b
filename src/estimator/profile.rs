//! Fixed domain constants and the seasonal irradiance profile.

use serde::{Deserialize, Serialize};

/// Derating applied to nameplate output: inverter, temperature, soiling and
/// wiring losses lumped into one factor.
pub const PERFORMANCE_RATIO: f64 = 0.80;

/// Days per calendar month, January first.
///
/// Non-leap year. February 29th is never counted.
pub const DAYS_IN_MONTH: [u32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Short month labels in fixed calendar order.
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const SOUTHERN_FACTORS: [f64; 12] = [
    1.10, 1.10, 1.00, 1.00, 0.90, 0.85, 0.85, 0.90, 1.00, 1.10, 1.15, 1.15,
];

/// Per-month multipliers applied on top of the site-average daily yield.
///
/// The default curve peaks in Nov–Feb and bottoms out in Jun–Jul, which only
/// holds south of the equator. Sites elsewhere need a different table.
///
/// # Examples
///
/// ```
/// use solar_proposal::estimator::profile::SeasonalProfile;
///
/// let south = SeasonalProfile::southern_hemisphere();
/// let north = SeasonalProfile::northern_hemisphere();
/// assert_eq!(south.factor(0), north.factor(6));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeasonalProfile {
    factors: [f64; 12],
}

impl SeasonalProfile {
    /// Builds a profile from an explicit January..December table.
    pub fn from_factors(factors: [f64; 12]) -> Self {
        Self { factors }
    }

    /// Summer peak in December–February.
    pub fn southern_hemisphere() -> Self {
        Self::from_factors(SOUTHERN_FACTORS)
    }

    /// The southern curve shifted by six months (summer peak June–August).
    pub fn northern_hemisphere() -> Self {
        let mut factors = SOUTHERN_FACTORS;
        factors.rotate_left(6);
        Self::from_factors(factors)
    }

    /// Factor for a zero-based month index.
    ///
    /// # Panics
    ///
    /// Panics if `month >= 12`.
    pub fn factor(&self, month: usize) -> f64 {
        self.factors[month]
    }

    pub fn factors(&self) -> &[f64; 12] {
        &self.factors
    }
}

impl Default for SeasonalProfile {
    fn default() -> Self {
        Self::southern_hemisphere()
    }
}

/// Rounds to two decimal places, exact halves to even.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn days_sum_to_non_leap_year() {
        assert_eq!(DAYS_IN_MONTH.iter().sum::<u32>(), 365);
    }

    #[test]
    fn default_profile_is_southern() {
        assert_eq!(SeasonalProfile::default(), SeasonalProfile::southern_hemisphere());
        assert_eq!(SeasonalProfile::default().factor(11), 1.15);
        assert_eq!(SeasonalProfile::default().factor(5), 0.85);
    }

    #[test]
    fn northern_profile_is_shifted_six_months() {
        let south = SeasonalProfile::southern_hemisphere();
        let north = SeasonalProfile::northern_hemisphere();
        for m in 0..12 {
            assert_eq!(north.factor(m), south.factor((m + 6) % 12));
        }
        // June peak in the north
        assert_eq!(north.factor(5), 1.15);
    }

    #[test]
    fn round2_behaviour() {
        assert_eq!(round2(682.0000000000001), 682.0);
        assert_eq!(round2(1.005_1), 1.01);
        assert_eq!(round2(-2.344), -2.34);
        // 0.125 and 0.375 are exact in binary
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(0.375), 0.38);
    }
}
