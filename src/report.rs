//! Plain-text proposal report.

use std::fmt;

use crate::estimator::{MONTH_LABELS, PaybackSchedule};
use crate::proposal::Proposal;

/// Printable summary of one proposal and its estimate.
pub struct ProposalReport<'a> {
    proposal: &'a Proposal,
    schedule: Option<&'a PaybackSchedule>,
}

impl<'a> ProposalReport<'a> {
    pub fn new(proposal: &'a Proposal) -> Self {
        Self {
            proposal,
            schedule: None,
        }
    }

    /// Adds the break-even year line from a payback schedule.
    pub fn with_schedule(mut self, schedule: Option<&'a PaybackSchedule>) -> Self {
        self.schedule = schedule;
        self
    }
}

impl fmt::Display for ProposalReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.proposal;
        let est = p.estimate();
        let system = &p.inputs().system;

        writeln!(f, "--- Proposal: {} ---", p.title())?;
        match system.power_kwp {
            Some(kwp) => writeln!(f, "System power:          {kwp:.2} kWp")?,
            None => writeln!(f, "System power:          n/a")?,
        }
        if let (Some(wp), Some(qty), Some(kwp)) = (
            system.panel_power_wp,
            system.panel_quantity,
            system.panel_array_kwp(),
        ) {
            writeln!(f, "Panels:                {qty} x {wp} Wp ({kwp:.2} kWp)")?;
        }
        match system.solar_irradiance_hsp {
            Some(hsp) => writeln!(f, "Solar irradiance:      {hsp:.2} kWh/m²/day")?,
            None => writeln!(f, "Solar irradiance:      n/a")?,
        }

        match &est.monthly_production_kwh {
            Some(months) => {
                writeln!(f, "Monthly production:")?;
                for (label, kwh) in MONTH_LABELS.iter().zip(months) {
                    writeln!(f, "  {label}  {kwh:>10.2} kWh")?;
                }
            }
            None => writeln!(f, "Monthly production:    not computable")?,
        }

        if let Some(s) = &est.savings {
            writeln!(
                f,
                "Annual production:     {:.2} kWh",
                s.total_annual_production_kwh
            )?;
            writeln!(
                f,
                "Annual consumption:    {:.2} kWh",
                s.total_annual_consumption_kwh
            )?;
            writeln!(f, "Compensable energy:    {:.2} kWh", s.compensable_energy_kwh)?;
            writeln!(f, "Injected energy:       {:.2} kWh", s.injected_energy_kwh)?;
            writeln!(f, "Fio B cost:            {:.2} /yr", s.fio_b_cost_annual)?;
        }

        writeln!(
            f,
            "Estimated savings:     {:.2} /yr",
            est.estimated_savings_per_year
        )?;
        match est.total_investment {
            Some(total) => writeln!(f, "Total investment:      {total:.2}")?,
            None => writeln!(f, "Total investment:      n/a")?,
        }
        if !p.items().is_empty() {
            writeln!(f, "Line items:            {}", p.items().len())?;
        }
        if let Some(year) = self.schedule.and_then(PaybackSchedule::break_even_year) {
            writeln!(f, "Break-even year:       {year}")?;
        }
        match est.payback_years {
            Some(years) => write!(f, "Payback:               {years:.2} years"),
            None => write!(f, "Payback:               n/a"),
        }
    }
}
