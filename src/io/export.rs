//! CSV export for monthly production and the payback schedule.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::estimator::{
    DAYS_IN_MONTH, MONTH_LABELS, MonthlyProduction, PaybackSchedule, SeasonalProfile,
};

/// Column header for the monthly production export.
pub const PRODUCTION_HEADER: &str = "month,days,seasonal_factor,production_kwh";

/// Column header for the payback schedule export.
pub const PAYBACK_HEADER: &str = "year,cumulative_savings,net_position";

/// Exports the twelve monthly production values to a CSV file.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_production_csv(
    production: &MonthlyProduction,
    profile: &SeasonalProfile,
    path: &Path,
) -> io::Result<()> {
    let file = File::create(path)?;
    write_production_csv(production, profile, io::BufWriter::new(file))
}

/// Writes one row per month, January first.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_production_csv(
    production: &MonthlyProduction,
    profile: &SeasonalProfile,
    writer: impl Write,
) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(PRODUCTION_HEADER.split(','))?;

    for (month, kwh) in production.iter().enumerate() {
        wtr.write_record(&[
            MONTH_LABELS[month].to_string(),
            DAYS_IN_MONTH[month].to_string(),
            format!("{:.2}", profile.factor(month)),
            format!("{kwh:.2}"),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Exports the payback schedule to a CSV file.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_payback_csv(schedule: &PaybackSchedule, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_payback_csv(schedule, io::BufWriter::new(file))
}

/// Writes one row per schedule year.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_payback_csv(schedule: &PaybackSchedule, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(PAYBACK_HEADER.split(','))?;

    for y in &schedule.years {
        wtr.write_record(&[
            y.year.to_string(),
            format!("{:.2}", y.cumulative_savings),
            format!("{:.2}", y.net_position),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
