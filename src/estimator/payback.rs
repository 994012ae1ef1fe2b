//! Simple payback period and the cumulative savings schedule behind it.
//!
//! Payback here is undiscounted: no energy price escalation, no module
//! degradation, no discount rate.

use serde::Serialize;

/// Years shown in the payback schedule when no horizon is requested.
pub const DEFAULT_HORIZON_YEARS: u32 = 30;

/// Years until cumulative savings equal the investment.
///
/// # Returns
///
/// `None` when either value is missing or not strictly positive. A zero
/// investment means nothing has been priced yet. There is no "infinite"
/// sentinel.
///
/// # Examples
///
/// ```
/// use solar_proposal::estimator::estimate_payback;
///
/// assert_eq!(estimate_payback(Some(20_000.0), Some(5_000.0)), Some(4.0));
/// assert_eq!(estimate_payback(Some(20_000.0), Some(0.0)), None);
/// ```
pub fn estimate_payback(total_investment: Option<f64>, annual_savings: Option<f64>) -> Option<f64> {
    let savings = annual_savings.filter(|s| *s > 0.0)?;
    let investment = total_investment.filter(|i| *i > 0.0)?;
    Some(investment / savings)
}

/// One year of the payback schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PaybackYear {
    /// 1-based year after installation.
    pub year: u32,
    pub cumulative_savings: f64,
    /// `cumulative_savings - investment`; crosses zero at payback.
    pub net_position: f64,
}

/// Cumulative savings year by year against the upfront investment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaybackSchedule {
    pub investment: f64,
    pub annual_savings: f64,
    pub payback_years: f64,
    pub years: Vec<PaybackYear>,
}

impl PaybackSchedule {
    /// Builds the schedule for years `1..=horizon_years`.
    ///
    /// # Returns
    ///
    /// `None` if the investment or the savings is not strictly positive.
    pub fn build(investment: f64, annual_savings: f64, horizon_years: u32) -> Option<Self> {
        if !(investment > 0.0 && annual_savings > 0.0) {
            return None;
        }

        let years = (1..=horizon_years)
            .map(|year| {
                let cumulative_savings = annual_savings * f64::from(year);
                PaybackYear {
                    year,
                    cumulative_savings,
                    net_position: cumulative_savings - investment,
                }
            })
            .collect();

        Some(Self {
            investment,
            annual_savings,
            payback_years: investment / annual_savings,
            years,
        })
    }

    /// First year whose cumulative savings cover the investment.
    pub fn break_even_year(&self) -> Option<u32> {
        self.years
            .iter()
            .find(|y| y.net_position >= 0.0)
            .map(|y| y.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payback_is_investment_over_savings() {
        assert_eq!(estimate_payback(Some(35_000.0), Some(7_000.0)), Some(5.0));
    }

    #[test]
    fn payback_absent_without_savings() {
        assert_eq!(estimate_payback(Some(10_000.0), Some(0.0)), None);
        assert_eq!(estimate_payback(Some(10_000.0), None), None);
        assert_eq!(estimate_payback(Some(10_000.0), Some(-5.0)), None);
    }

    #[test]
    fn payback_absent_without_investment() {
        assert_eq!(estimate_payback(None, Some(1_000.0)), None);
    }

    #[test]
    fn payback_absent_for_unpriced_investment() {
        assert_eq!(estimate_payback(Some(0.0), Some(5_398.92)), None);
        assert_eq!(estimate_payback(Some(-0.0), Some(5_398.92)), None);
        assert_eq!(estimate_payback(Some(-100.0), Some(5_398.92)), None);
    }

    #[test]
    fn schedule_has_one_row_per_year() {
        let schedule = PaybackSchedule::build(10_000.0, 2_500.0, DEFAULT_HORIZON_YEARS);
        let schedule = schedule.unwrap_or_else(|| panic!("schedule should build"));
        assert_eq!(schedule.years.len(), 30);
        assert_eq!(schedule.years[0].year, 1);
        assert_eq!(schedule.years[29].cumulative_savings, 75_000.0);
        assert_eq!(schedule.payback_years, 4.0);
        assert_eq!(schedule.break_even_year(), Some(4));
    }

    #[test]
    fn break_even_rounds_up_partial_years() {
        let schedule = PaybackSchedule::build(10_000.0, 3_000.0, 10);
        assert_eq!(schedule.and_then(|s| s.break_even_year()), Some(4));
    }

    #[test]
    fn break_even_beyond_horizon() {
        let schedule = PaybackSchedule::build(100_000.0, 1_000.0, 30);
        assert_eq!(schedule.and_then(|s| s.break_even_year()), None);
    }

    #[test]
    fn schedule_absent_for_non_positive_inputs() {
        assert!(PaybackSchedule::build(0.0, 1_000.0, 30).is_none());
        assert!(PaybackSchedule::build(10_000.0, 0.0, 30).is_none());
        assert!(PaybackSchedule::build(f64::NAN, 1_000.0, 30).is_none());
    }
}
