//! Annual savings under net metering with the Fio B charge on exported energy.

use serde::Serialize;
use tracing::{debug, warn};

use super::profile::round2;
use super::types::{
    ConsumptionInput, DEFAULT_AVAILABILITY_KWH, GridType, MonthlyProduction, TariffInput,
};

/// Every intermediate quantity of one savings estimate.
///
/// Energies are in kWh, money in the tariff's currency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SavingsBreakdown {
    /// Normalized monthly consumption; `None` when it could not be derived.
    pub consumption_kwh_per_month: Option<f64>,
    /// Minimum billed energy per month for the connection type.
    pub availability_kwh_per_month: f64,
    pub total_annual_production_kwh: f64,
    pub total_annual_consumption_kwh: f64,
    /// Production eligible for credit after the minimum charge.
    pub compensable_energy_kwh: f64,
    /// Production in excess of consumption, exported to the grid.
    pub injected_energy_kwh: f64,
    pub fio_b_cost_annual: f64,
    /// Savings before rounding and clamping; may be negative.
    pub annual_savings_raw: f64,
    /// Reported savings, rounded to 2 decimals and never negative.
    pub annual_savings: f64,
}

impl SavingsBreakdown {
    /// Runs the full savings computation.
    ///
    /// # Returns
    ///
    /// `None` when production is absent or `kwh_price` is missing or not
    /// strictly positive; savings are then reported as zero.
    pub fn compute(
        monthly_production: Option<&MonthlyProduction>,
        tariff: &TariffInput,
        consumption: &ConsumptionInput,
    ) -> Option<Self> {
        let kwh_price = tariff.kwh_price.filter(|p| *p > 0.0)?;
        let monthly_production = monthly_production?;

        let consumption_kwh = consumption_kwh_per_month(consumption, tariff, kwh_price);
        let availability_kwh = availability_charge_kwh(&tariff.grid_type);

        let total_annual_production: f64 = monthly_production.iter().sum();
        let total_annual_consumption = consumption_kwh.map_or(0.0, |c| c * 12.0);

        let compensable_energy = (total_annual_production - availability_kwh * 12.0).max(0.0);
        let injected_energy = (total_annual_production - total_annual_consumption).max(0.0);
        let fio_b_cost_annual = injected_energy * tariff.fio_b_price;
        let annual_savings_raw = compensable_energy * kwh_price - fio_b_cost_annual;

        // NaN and negative results both collapse to zero
        let rounded = round2(annual_savings_raw);
        let annual_savings = if rounded > 0.0 { rounded } else { 0.0 };

        debug!(
            total_annual_production,
            compensable_energy,
            injected_energy,
            fio_b_cost_annual,
            annual_savings_raw,
            "savings breakdown"
        );

        Some(Self {
            consumption_kwh_per_month: consumption_kwh,
            availability_kwh_per_month: availability_kwh,
            total_annual_production_kwh: total_annual_production,
            total_annual_consumption_kwh: total_annual_consumption,
            compensable_energy_kwh: compensable_energy,
            injected_energy_kwh: injected_energy,
            fio_b_cost_annual,
            annual_savings_raw,
            annual_savings,
        })
    }
}

/// Estimated yearly bill savings, always `>= 0`.
///
/// # Examples
///
/// ```
/// use solar_proposal::estimator::{ConsumptionInput, TariffInput, estimate_annual_savings};
///
/// let tariff = TariffInput {
///     kwh_price: Some(1.0),
///     grid_type: "single_phase".into(),
///     ..TariffInput::default()
/// };
/// let consumption = ConsumptionInput::Kwh { avg_consumption_kwh: Some(100.0) };
/// let savings = estimate_annual_savings(Some(&[100.0; 12]), &tariff, &consumption);
/// // 1200 kWh produced, 360 kWh owed as the minimum charge
/// assert_eq!(savings, 840.0);
/// ```
pub fn estimate_annual_savings(
    monthly_production: Option<&MonthlyProduction>,
    tariff: &TariffInput,
    consumption: &ConsumptionInput,
) -> f64 {
    SavingsBreakdown::compute(monthly_production, tariff, consumption)
        .map_or(0.0, |b| b.annual_savings)
}

/// Minimum billed energy per month for a connection label.
///
/// Unrecognized labels fall back to the two-phase tier and are logged.
pub fn availability_charge_kwh(grid_type: &str) -> f64 {
    match grid_type.parse::<GridType>() {
        Ok(grid) => grid.availability_kwh(),
        Err(_) => {
            warn!(
                grid_type,
                fallback_kwh = DEFAULT_AVAILABILITY_KWH,
                "unrecognized grid type, using default availability charge"
            );
            DEFAULT_AVAILABILITY_KWH
        }
    }
}

/// Average monthly consumption in kWh.
///
/// Bill amounts are converted by removing the public lighting fee and dividing
/// by the energy price.
fn consumption_kwh_per_month(
    consumption: &ConsumptionInput,
    tariff: &TariffInput,
    kwh_price: f64,
) -> Option<f64> {
    match *consumption {
        ConsumptionInput::Kwh {
            avg_consumption_kwh,
        } => avg_consumption_kwh,
        ConsumptionInput::Currency { avg_bill_currency } => avg_bill_currency
            .map(|bill| (bill - tariff.public_lighting_fee.unwrap_or(0.0)) / kwh_price),
    }
}
