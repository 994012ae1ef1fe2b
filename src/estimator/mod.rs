//! Solar sizing and financial estimation.
//!
//! Pure functions over plain input values: nothing here performs I/O or
//! returns an error. Missing inputs surface as absent production, zero
//! savings or absent payback.

pub mod investment;
pub mod payback;
pub mod production;
pub mod profile;
pub mod savings;
pub mod types;

pub use investment::aggregate_line_items;
pub use payback::{DEFAULT_HORIZON_YEARS, PaybackSchedule, PaybackYear, estimate_payback};
pub use production::{estimate_monthly_production, estimate_monthly_production_with};
pub use profile::{DAYS_IN_MONTH, MONTH_LABELS, PERFORMANCE_RATIO, SeasonalProfile};
pub use savings::{SavingsBreakdown, availability_charge_kwh, estimate_annual_savings};
pub use types::{
    ConsumptionInput, GridType, Investment, LineItem, MonthlyProduction, SystemSpec, TariffInput,
};
