//! TOML-based proposal configuration and preset definitions.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::estimator::{
    ConsumptionInput, GridType, Investment, LineItem, SeasonalProfile, SystemSpec, TariffInput,
};
use crate::irradiance::ClientSite;
use crate::proposal::{Proposal, ProposalInputs, Utility};

/// Top-level proposal description parsed from TOML.
///
/// Every table is optional. Load from TOML with
/// [`ProposalConfig::from_toml_file`] or start from a preset with
/// [`ProposalConfig::from_preset`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProposalConfig {
    /// Proposal title shown on the report.
    #[serde(default)]
    pub title: String,
    /// Client location, used for irradiance lookup.
    #[serde(default)]
    pub client: ClientSite,
    /// Rated system and site irradiance.
    #[serde(default)]
    pub system: SystemConfig,
    /// Bill tariff terms.
    #[serde(default)]
    pub tariff: TariffConfig,
    /// Selected distribution utility, if any.
    #[serde(default)]
    pub utility: Option<Utility>,
    /// Average monthly consumption.
    #[serde(default)]
    pub consumption: ConsumptionConfig,
    /// Upfront cost when no line items are listed.
    #[serde(default)]
    pub investment: InvestmentConfig,
    /// Seasonal production curve.
    #[serde(default)]
    pub production: ProductionConfig,
    /// Priced line items; their sum replaces `investment.total_investment`.
    #[serde(default)]
    pub items: Vec<LineItemConfig>,
}

/// Rated system and site irradiance.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SystemConfig {
    /// Rated DC power (kWp).
    pub power_kwp: Option<f64>,
    /// Module power (Wp).
    pub panel_power_wp: Option<u32>,
    /// Module count.
    pub panel_quantity: Option<u32>,
    /// Average daily insolation (kWh/m²/day).
    pub solar_irradiance_hsp: Option<f64>,
}

/// Bill tariff terms.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TariffConfig {
    /// Energy price (currency/kWh).
    pub kwh_price: Option<f64>,
    /// Public lighting fee (currency/month).
    pub public_lighting_fee: Option<f64>,
    /// `single_phase`, `two_phase` or `three_phase`.
    pub grid_type: Option<String>,
}

/// How consumption was entered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    #[default]
    Kwh,
    #[serde(alias = "brl")]
    Currency,
}

/// Average monthly consumption, in kWh or as a bill amount.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConsumptionConfig {
    pub input_mode: InputMode,
    /// Used when `input_mode = "kwh"`.
    pub avg_consumption_kwh: Option<f64>,
    /// Used when `input_mode = "currency"`.
    pub avg_bill_currency: Option<f64>,
}

/// Upfront cost.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InvestmentConfig {
    pub total_investment: Option<f64>,
}

/// Named seasonal curve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HemisphereProfile {
    #[default]
    Southern,
    Northern,
}

/// Seasonal production curve.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProductionConfig {
    /// Built-in curve, used unless `seasonal_factors` is set.
    pub seasonal_profile: HemisphereProfile,
    /// Explicit January..December factors.
    pub seasonal_factors: Option<[f64; 12]>,
}

impl ProductionConfig {
    /// Resolved profile: explicit factors win over the named curve.
    pub fn profile(&self) -> SeasonalProfile {
        match (self.seasonal_factors, self.seasonal_profile) {
            (Some(factors), _) => SeasonalProfile::from_factors(factors),
            (None, HemisphereProfile::Southern) => SeasonalProfile::southern_hemisphere(),
            (None, HemisphereProfile::Northern) => SeasonalProfile::northern_hemisphere(),
        }
    }
}

/// One `[[items]]` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LineItemConfig {
    pub description: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    pub unit_price: f64,
}

fn default_quantity() -> u32 {
    1
}

impl From<&LineItemConfig> for LineItem {
    fn from(c: &LineItemConfig) -> Self {
        LineItem::new(c.description.clone(), c.quantity, c.unit_price)
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"tariff.kwh_price"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl ProposalConfig {
    /// Available preset names.
    pub const PRESETS: &'static [&'static str] = &["residential", "commercial", "bill_based"];

    /// 5 kWp single-phase home, consumption in kWh, priced by line items.
    pub fn residential() -> Self {
        Self {
            title: "Residential 5 kWp".to_string(),
            client: ClientSite {
                name: Some("Residential client".to_string()),
                address: Some("Rua das Acácias, 210".to_string()),
                city: Some("Belo Horizonte".to_string()),
                state: Some("MG".to_string()),
            },
            system: SystemConfig {
                power_kwp: Some(5.0),
                panel_power_wp: Some(500),
                panel_quantity: Some(10),
                solar_irradiance_hsp: Some(5.0),
            },
            tariff: TariffConfig {
                kwh_price: Some(0.85),
                public_lighting_fee: Some(15.0),
                grid_type: Some("single_phase".to_string()),
            },
            utility: Some(Utility {
                name: "CEMIG".to_string(),
                fio_b_price: 0.28,
            }),
            consumption: ConsumptionConfig {
                input_mode: InputMode::Kwh,
                avg_consumption_kwh: Some(450.0),
                avg_bill_currency: None,
            },
            investment: InvestmentConfig::default(),
            production: ProductionConfig::default(),
            items: vec![
                LineItemConfig {
                    description: "Module 500 Wp".to_string(),
                    quantity: 10,
                    unit_price: 900.0,
                },
                LineItemConfig {
                    description: "Inverter 5 kW".to_string(),
                    quantity: 1,
                    unit_price: 4_500.0,
                },
                LineItemConfig {
                    description: "Installation".to_string(),
                    quantity: 1,
                    unit_price: 3_500.0,
                },
            ],
        }
    }

    /// 10 kWp three-phase business with a lump-sum investment.
    pub fn commercial() -> Self {
        Self {
            title: "Commercial 10 kWp".to_string(),
            client: ClientSite::default(),
            system: SystemConfig {
                power_kwp: Some(10.0),
                panel_power_wp: Some(500),
                panel_quantity: Some(20),
                solar_irradiance_hsp: Some(4.5),
            },
            tariff: TariffConfig {
                kwh_price: Some(0.95),
                public_lighting_fee: Some(20.0),
                grid_type: Some("three_phase".to_string()),
            },
            utility: Some(Utility {
                name: "Enel SP".to_string(),
                fio_b_price: 0.30,
            }),
            consumption: ConsumptionConfig {
                input_mode: InputMode::Kwh,
                avg_consumption_kwh: Some(500.0),
                avg_bill_currency: None,
            },
            investment: InvestmentConfig {
                total_investment: Some(35_000.0),
            },
            production: ProductionConfig::default(),
            items: Vec::new(),
        }
    }

    /// Two-phase home where only the average bill amount is known.
    pub fn bill_based() -> Self {
        Self {
            title: "Bill-based 6.5 kWp".to_string(),
            client: ClientSite::default(),
            system: SystemConfig {
                power_kwp: Some(6.5),
                solar_irradiance_hsp: Some(4.8),
                ..SystemConfig::default()
            },
            tariff: TariffConfig {
                kwh_price: Some(0.91),
                public_lighting_fee: Some(25.0),
                grid_type: Some("two_phase".to_string()),
            },
            utility: Some(Utility {
                name: "Copel".to_string(),
                fio_b_price: 0.27,
            }),
            consumption: ConsumptionConfig {
                input_mode: InputMode::Currency,
                avg_consumption_kwh: None,
                avg_bill_currency: Some(480.0),
            },
            investment: InvestmentConfig {
                total_investment: Some(26_000.0),
            },
            production: ProductionConfig::default(),
            items: Vec::new(),
        }
    }

    /// Loads a proposal from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "residential" => Ok(Self::residential()),
            "commercial" => Ok(Self::commercial()),
            "bill_based" => Ok(Self::bill_based()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a proposal from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("proposal", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a proposal from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid. A missing or zero
    /// `system.power_kwp` is not an error: the proposal is simply reported
    /// without production.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let mut non_negative = |field: &str, value: Option<f64>| {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    errors.push(ConfigError::new(field, "must be a finite number >= 0"));
                }
            }
        };
        non_negative("system.power_kwp", self.system.power_kwp);
        non_negative("system.solar_irradiance_hsp", self.system.solar_irradiance_hsp);
        non_negative("tariff.kwh_price", self.tariff.kwh_price);
        non_negative("tariff.public_lighting_fee", self.tariff.public_lighting_fee);
        non_negative("utility.fio_b_price", self.utility.as_ref().map(|u| u.fio_b_price));
        non_negative("consumption.avg_consumption_kwh", self.consumption.avg_consumption_kwh);
        non_negative("consumption.avg_bill_currency", self.consumption.avg_bill_currency);
        non_negative("investment.total_investment", self.investment.total_investment);

        if let Some(grid) = &self.tariff.grid_type {
            if let Err(message) = grid.parse::<GridType>() {
                errors.push(ConfigError::new("tariff.grid_type", message));
            }
        }

        if let Some(factors) = &self.production.seasonal_factors {
            if factors.iter().any(|f| !f.is_finite() || *f < 0.0) {
                errors.push(ConfigError::new(
                    "production.seasonal_factors",
                    "every factor must be a finite number >= 0",
                ));
            }
        }

        for (i, item) in self.items.iter().enumerate() {
            if item.quantity == 0 {
                errors.push(ConfigError::new(format!("items[{i}].quantity"), "must be > 0"));
            }
            if !item.unit_price.is_finite() || item.unit_price < 0.0 {
                errors.push(ConfigError::new(
                    format!("items[{i}].unit_price"),
                    "must be a finite number >= 0",
                ));
            }
        }

        errors
    }

    /// Estimator inputs for this proposal.
    pub fn inputs(&self) -> ProposalInputs {
        let s = &self.system;
        let t = &self.tariff;
        let c = &self.consumption;

        let consumption = match c.input_mode {
            InputMode::Kwh => ConsumptionInput::Kwh {
                avg_consumption_kwh: c.avg_consumption_kwh,
            },
            InputMode::Currency => ConsumptionInput::Currency {
                avg_bill_currency: c.avg_bill_currency,
            },
        };

        ProposalInputs {
            system: SystemSpec {
                power_kwp: s.power_kwp,
                panel_power_wp: s.panel_power_wp,
                panel_quantity: s.panel_quantity,
                solar_irradiance_hsp: s.solar_irradiance_hsp,
            },
            tariff: TariffInput {
                kwh_price: t.kwh_price,
                public_lighting_fee: t.public_lighting_fee,
                grid_type: t.grid_type.clone().unwrap_or_default(),
                fio_b_price: 0.0,
            },
            consumption,
            investment: Investment {
                total_investment: self.investment.total_investment,
            },
        }
        .with_utility(self.utility.as_ref())
    }

    /// Builds the proposal and computes its estimate.
    pub fn build_proposal(&self) -> Proposal {
        let items = self.items.iter().map(LineItem::from).collect();
        Proposal::new(self.title.clone(), self.inputs(), self.production.profile(), items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_presets_are_valid() {
        for name in ProposalConfig::PRESETS {
            let cfg = ProposalConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn from_preset_unknown() {
        let err = ProposalConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert_eq!(e.field, "preset");
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
title = "Casa Silva"

[client]
name = "João Silva"
address = "Rua A, 10"
city = "Campinas"
state = "SP"

[system]
power_kwp = 10.0
panel_power_wp = 550
panel_quantity = 18
solar_irradiance_hsp = 4.5

[tariff]
kwh_price = 0.95
public_lighting_fee = 20.0
grid_type = "three_phase"

[utility]
name = "CPFL"
fio_b_price = 0.30

[consumption]
input_mode = "kwh"
avg_consumption_kwh = 500.0

[investment]
total_investment = 35000.0

[production]
seasonal_profile = "southern"

[[items]]
description = "Module 550 Wp"
quantity = 18
unit_price = 780.0

[[items]]
description = "Installation"
unit_price = 4500.0
"#;
        let cfg = ProposalConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.title.as_str()), Some("Casa Silva"));
        assert_eq!(cfg.as_ref().and_then(|c| c.system.panel_quantity), Some(18));
        assert_eq!(cfg.as_ref().map(|c| c.items.len()), Some(2));
        assert_eq!(cfg.as_ref().map(|c| c.items[1].quantity), Some(1));
        assert_eq!(
            cfg.as_ref().and_then(|c| c.utility.as_ref()).map(|u| u.fio_b_price),
            Some(0.30)
        );
    }

    #[test]
    fn brl_is_accepted_as_currency_mode() {
        let toml = r#"
[consumption]
input_mode = "brl"
avg_bill_currency = 350.0
"#;
        let cfg = ProposalConfig::from_toml_str(toml).ok();
        assert_eq!(
            cfg.as_ref().map(|c| c.consumption.input_mode),
            Some(InputMode::Currency)
        );
        let inputs = cfg.map(|c| c.inputs());
        assert_eq!(
            inputs.map(|i| i.consumption),
            Some(ConsumptionInput::Currency {
                avg_bill_currency: Some(350.0)
            })
        );
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[system]
power_kwp = 5.0
bogus_field = true
"#;
        assert!(ProposalConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn wrong_factor_count_is_rejected() {
        let toml = r#"
[production]
seasonal_factors = [1.0, 1.0, 1.0]
"#;
        assert!(ProposalConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let cfg = ProposalConfig::from_toml_str("").ok();
        assert!(cfg.as_ref().is_some_and(|c| c.validate().is_empty()));
        let inputs = cfg.map(|c| c.inputs());
        assert_eq!(inputs.as_ref().map(|i| i.tariff.fio_b_price), Some(0.0));
        assert_eq!(inputs.map(|i| i.tariff.grid_type), Some(String::new()));
    }

    #[test]
    fn validation_catches_unknown_grid_type() {
        let mut cfg = ProposalConfig::commercial();
        cfg.tariff.grid_type = Some("four_phase".to_string());
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "tariff.grid_type"));
    }

    #[test]
    fn validation_catches_negative_price() {
        let mut cfg = ProposalConfig::commercial();
        cfg.tariff.kwh_price = Some(-0.1);
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "tariff.kwh_price"));
    }

    #[test]
    fn validation_catches_bad_items() {
        let mut cfg = ProposalConfig::residential();
        cfg.items[1].quantity = 0;
        cfg.items[2].unit_price = f64::NAN;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "items[1].quantity"));
        assert!(errors.iter().any(|e| e.field == "items[2].unit_price"));
    }

    #[test]
    fn validation_catches_negative_factor() {
        let mut cfg = ProposalConfig::commercial();
        let mut factors = [1.0; 12];
        factors[4] = -0.5;
        cfg.production.seasonal_factors = Some(factors);
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "production.seasonal_factors"));
    }

    #[test]
    fn missing_power_is_not_a_validation_error() {
        let mut cfg = ProposalConfig::commercial();
        cfg.system.power_kwp = None;
        assert!(cfg.validate().is_empty());
        assert!(cfg.build_proposal().estimate().monthly_production_kwh.is_none());
    }

    #[test]
    fn explicit_factors_override_named_profile() {
        let production = ProductionConfig {
            seasonal_profile: HemisphereProfile::Northern,
            seasonal_factors: Some([1.0; 12]),
        };
        assert_eq!(production.profile(), SeasonalProfile::from_factors([1.0; 12]));

        let named = ProductionConfig {
            seasonal_profile: HemisphereProfile::Northern,
            seasonal_factors: None,
        };
        assert_eq!(named.profile(), SeasonalProfile::northern_hemisphere());
    }

    #[test]
    fn residential_items_set_investment() {
        let proposal = ProposalConfig::residential().build_proposal();
        assert_eq!(proposal.estimate().total_investment, Some(17_000.0));
        assert_eq!(proposal.items().len(), 3);
    }

    #[test]
    fn utility_price_flows_into_tariff() {
        let inputs = ProposalConfig::commercial().inputs();
        assert_eq!(inputs.tariff.fio_b_price, 0.30);
        assert_eq!(inputs.tariff.grid(), Some(GridType::ThreePhase));
    }
}
