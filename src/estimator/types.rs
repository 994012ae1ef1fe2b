//! Input value types read by the estimator.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Twelve monthly values, January first.
pub type MonthlyProduction = [f64; 12];

/// Availability tier used when the connection type is not recognized.
pub const DEFAULT_AVAILABILITY_KWH: f64 = 50.0;

/// Rated system and site irradiance for one proposal.
///
/// `panel_power_wp` and `panel_quantity` are carried for display only; the
/// estimator sizes from `power_kwp`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemSpec {
    /// Rated DC power (kWp).
    pub power_kwp: Option<f64>,
    /// Power of one module (Wp).
    pub panel_power_wp: Option<u32>,
    /// Number of modules.
    pub panel_quantity: Option<u32>,
    /// Site-average daily insolation (kWh/m²/day).
    pub solar_irradiance_hsp: Option<f64>,
}

impl SystemSpec {
    /// Creates a system with only the two quantities the estimator needs.
    pub fn new(power_kwp: f64, solar_irradiance_hsp: f64) -> Self {
        Self {
            power_kwp: Some(power_kwp),
            solar_irradiance_hsp: Some(solar_irradiance_hsp),
            ..Self::default()
        }
    }

    /// Array size implied by the module list, in kWp.
    pub fn panel_array_kwp(&self) -> Option<f64> {
        match (self.panel_power_wp, self.panel_quantity) {
            (Some(wp), Some(qty)) => Some(f64::from(wp) * f64::from(qty) / 1000.0),
            _ => None,
        }
    }
}

/// Grid connection type, which fixes the minimum monthly billed energy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridType {
    SinglePhase,
    TwoPhase,
    ThreePhase,
}

impl GridType {
    /// Minimum billed energy per month (kWh) for this connection.
    pub fn availability_kwh(self) -> f64 {
        match self {
            Self::SinglePhase => 30.0,
            Self::TwoPhase => 50.0,
            Self::ThreePhase => 100.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::SinglePhase => "single_phase",
            Self::TwoPhase => "two_phase",
            Self::ThreePhase => "three_phase",
        }
    }
}

impl FromStr for GridType {
    type Err = String;

    /// Accepts the canonical labels and the legacy Portuguese ones
    /// (`monofasica`, `bifasica`, `trifasica`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single_phase" | "monofasica" => Ok(Self::SinglePhase),
            "two_phase" | "bifasica" => Ok(Self::TwoPhase),
            "three_phase" | "trifasica" => Ok(Self::ThreePhase),
            other => Err(format!(
                "unknown grid type \"{other}\", expected single_phase, two_phase or three_phase"
            )),
        }
    }
}

impl fmt::Display for GridType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tariff terms of the client's utility bill.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TariffInput {
    /// Energy price (currency/kWh).
    pub kwh_price: Option<f64>,
    /// Flat public lighting fee added to every bill (currency).
    pub public_lighting_fee: Option<f64>,
    /// Raw connection label as entered; resolved with [`GridType::from_str`].
    pub grid_type: String,
    /// Grid-usage charge on exported energy (currency/kWh).
    pub fio_b_price: f64,
}

impl TariffInput {
    /// Resolved connection type, `None` if the label is not recognized.
    pub fn grid(&self) -> Option<GridType> {
        self.grid_type.parse().ok()
    }
}

/// How the client's average monthly consumption was entered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "input_mode", rename_all = "snake_case")]
pub enum ConsumptionInput {
    /// Consumption read straight off the bill, in kWh/month.
    Kwh { avg_consumption_kwh: Option<f64> },
    /// Average bill amount; converted to kWh through the tariff.
    Currency { avg_bill_currency: Option<f64> },
}

impl Default for ConsumptionInput {
    fn default() -> Self {
        Self::Kwh {
            avg_consumption_kwh: None,
        }
    }
}

/// Upfront cost of the installation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Investment {
    pub total_investment: Option<f64>,
}

/// One priced line of a proposal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: u32,
    pub unit_price: f64,
}

impl LineItem {
    pub fn new(description: impl Into<String>, quantity: u32, unit_price: f64) -> Self {
        Self {
            description: description.into(),
            quantity,
            unit_price,
        }
    }

    pub fn total_price(&self) -> f64 {
        f64::from(self.quantity) * self.unit_price
    }
}
