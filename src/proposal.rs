//! Proposal-level orchestration: computed fields, line items, persistence.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::estimator::{
    ConsumptionInput, Investment, LineItem, MonthlyProduction, SavingsBreakdown, SeasonalProfile,
    SystemSpec, TariffInput, aggregate_line_items, estimate_monthly_production_with,
    estimate_payback,
};

/// Distribution utility whose grid-usage charge applies to exported energy.
///
/// Shared across proposals; a proposal only keeps the price it was quoted with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Utility {
    pub name: String,
    /// Fio B charge (currency/kWh).
    pub fio_b_price: f64,
}

/// Everything the estimator reads for one proposal.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProposalInputs {
    pub system: SystemSpec,
    pub tariff: TariffInput,
    pub consumption: ConsumptionInput,
    pub investment: Investment,
}

impl ProposalInputs {
    /// Copies the utility's current Fio B price into the tariff.
    ///
    /// Without a utility the charge is zero.
    pub fn with_utility(mut self, utility: Option<&Utility>) -> Self {
        self.tariff.fio_b_price = utility.map_or(0.0, |u| u.fio_b_price);
        self
    }
}

/// Computed fields written back to the proposal record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProposalEstimate {
    /// January..December, or absent when production is not computable.
    pub monthly_production_kwh: Option<MonthlyProduction>,
    pub estimated_savings_per_year: f64,
    /// Absent when savings are zero.
    pub payback_years: Option<f64>,
    /// Investment the payback was computed against.
    pub total_investment: Option<f64>,
    /// Intermediate savings quantities; absent when savings were not computable.
    pub savings: Option<SavingsBreakdown>,
}

impl ProposalEstimate {
    /// Runs production, savings and payback over one snapshot of inputs.
    pub fn compute(inputs: &ProposalInputs, profile: &SeasonalProfile) -> Self {
        let monthly = estimate_monthly_production_with(&inputs.system, profile);
        let savings =
            SavingsBreakdown::compute(monthly.as_ref(), &inputs.tariff, &inputs.consumption);
        let estimated_savings_per_year = savings.map_or(0.0, |s| s.annual_savings);
        let total_investment = inputs.investment.total_investment;
        let payback_years = estimate_payback(total_investment, Some(estimated_savings_per_year));

        debug!(
            computable = monthly.is_some(),
            estimated_savings_per_year,
            ?payback_years,
            "proposal estimate computed"
        );

        Self {
            monthly_production_kwh: monthly,
            estimated_savings_per_year,
            payback_years,
            total_investment,
            savings,
        }
    }

    /// Sum of the monthly production, if computed.
    pub fn annual_production_kwh(&self) -> Option<f64> {
        self.monthly_production_kwh.map(|m| m.iter().sum())
    }
}

/// A proposal with its line items and the estimate derived from them.
///
/// Item changes recompute the investment and then the estimate in the same
/// call, so the record is never observed half-updated.
#[derive(Debug, Clone)]
pub struct Proposal {
    title: String,
    inputs: ProposalInputs,
    profile: SeasonalProfile,
    items: Vec<LineItem>,
    estimate: ProposalEstimate,
}

impl Proposal {
    /// Creates a proposal and computes its estimate.
    ///
    /// A non-empty item list replaces any investment already set in `inputs`.
    pub fn new(
        title: impl Into<String>,
        mut inputs: ProposalInputs,
        profile: SeasonalProfile,
        items: Vec<LineItem>,
    ) -> Self {
        if !items.is_empty() {
            let total = aggregate_line_items(&items);
            if let Some(configured) = inputs.investment.total_investment.filter(|c| *c != total) {
                warn!(configured, total, "line items replace configured investment");
            }
            inputs.investment.total_investment = Some(total);
        }

        let estimate = ProposalEstimate::compute(&inputs, &profile);
        Self {
            title: title.into(),
            inputs,
            profile,
            items,
            estimate,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn inputs(&self) -> &ProposalInputs {
        &self.inputs
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn estimate(&self) -> &ProposalEstimate {
        &self.estimate
    }

    pub fn profile(&self) -> &SeasonalProfile {
        &self.profile
    }

    /// Appends an item and recomputes investment and estimate.
    pub fn add_item(&mut self, item: LineItem) {
        debug!(description = %item.description, total = item.total_price(), "adding line item");
        self.items.push(item);
        self.recompute();
    }

    /// Removes the item at `index` and recomputes investment and estimate.
    ///
    /// Returns `None`, leaving the proposal untouched, if `index` is out of range.
    pub fn remove_item(&mut self, index: usize) -> Option<LineItem> {
        if index >= self.items.len() {
            return None;
        }
        let removed = self.items.remove(index);
        debug!(description = %removed.description, "removed line item");
        self.recompute();
        Some(removed)
    }

    fn recompute(&mut self) {
        self.inputs.investment.total_investment = Some(aggregate_line_items(&self.items));
        self.estimate = ProposalEstimate::compute(&self.inputs, &self.profile);
    }

    /// Snapshot handed to a [`ProposalSink`].
    pub fn record(&self) -> ProposalRecord<'_> {
        ProposalRecord {
            title: &self.title,
            inputs: &self.inputs,
            items: &self.items,
            estimate: &self.estimate,
        }
    }

    /// Writes the current record to `sink`.
    ///
    /// # Errors
    ///
    /// Propagates the sink's error.
    pub fn persist(&self, sink: &mut dyn ProposalSink) -> Result<(), SinkError> {
        sink.store(&self.record())?;
        info!(title = %self.title, "proposal persisted");
        Ok(())
    }
}

/// Serialized shape of a persisted proposal.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct ProposalRecord<'a> {
    pub title: &'a str,
    pub inputs: &'a ProposalInputs,
    pub items: &'a [LineItem],
    pub estimate: &'a ProposalEstimate,
}

/// Failure to persist a proposal record.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("cannot write proposal record: {0}")]
    Io(#[from] io::Error),

    #[error("cannot serialize proposal record: {0}")]
    Json(#[from] serde_json::Error),
}

/// Destination for computed proposal fields.
pub trait ProposalSink {
    /// Stores one proposal record.
    ///
    /// # Errors
    ///
    /// Returns a [`SinkError`] if the record cannot be written.
    fn store(&mut self, record: &ProposalRecord<'_>) -> Result<(), SinkError>;
}

/// Writes each record as pretty-printed JSON to a file, replacing its contents.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProposalSink for JsonFileSink {
    fn store(&mut self, record: &ProposalRecord<'_>) -> Result<(), SinkError> {
        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, record)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

/// Keeps serialized records in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub records: Vec<serde_json::Value>,
}

impl ProposalSink for MemorySink {
    fn store(&mut self, record: &ProposalRecord<'_>) -> Result<(), SinkError> {
        self.records.push(serde_json::to_value(record)?);
        Ok(())
    }
}
