//! Monthly energy production estimate.

use tracing::debug;

use super::profile::{DAYS_IN_MONTH, PERFORMANCE_RATIO, SeasonalProfile, round2};
use super::types::{MonthlyProduction, SystemSpec};

/// Estimates January..December production with the default southern profile.
///
/// See [`estimate_monthly_production_with`].
///
/// # Examples
///
/// ```
/// use solar_proposal::estimator::{SystemSpec, estimate_monthly_production};
///
/// let months = estimate_monthly_production(&SystemSpec::new(5.0, 5.0)).unwrap();
/// assert_eq!(months[0], 682.0);
/// assert_eq!(months[11], 713.0);
/// ```
pub fn estimate_monthly_production(spec: &SystemSpec) -> Option<MonthlyProduction> {
    estimate_monthly_production_with(spec, &SeasonalProfile::default())
}

/// Estimates monthly production (kWh) for a rated system at a given site.
///
/// `daily = power_kwp * hsp * PERFORMANCE_RATIO`, then each month is
/// `daily * days * seasonal factor`, rounded to 2 decimals.
///
/// # Returns
///
/// All twelve months, or `None` when `power_kwp` or `solar_irradiance_hsp` is
/// missing or not strictly positive. Never a partial list.
pub fn estimate_monthly_production_with(
    spec: &SystemSpec,
    profile: &SeasonalProfile,
) -> Option<MonthlyProduction> {
    let power_kwp = spec.power_kwp.filter(|p| *p > 0.0)?;
    let hsp = spec.solar_irradiance_hsp.filter(|h| *h > 0.0)?;

    let daily_avg = power_kwp * hsp * PERFORMANCE_RATIO;
    debug!(power_kwp, hsp, daily_avg, "estimating monthly production");

    let mut production = [0.0; 12];
    for (month, value) in production.iter_mut().enumerate() {
        *value = round2(daily_avg * f64::from(DAYS_IN_MONTH[month]) * profile.factor(month));
    }
    Some(production)
}
