//! Site irradiance lookup.
//!
//! Geocoding and the solar-data service live outside this crate; they are
//! reached through [`IrradianceProvider`]. Whatever the source, the estimator
//! only receives a plain daily-average `f64`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::estimator::profile::round2;

/// Failure to obtain a site-average irradiance.
#[derive(Debug, Error)]
pub enum IrradianceError {
    #[error("client site is incomplete: missing {0}")]
    IncompleteSite(&'static str),

    #[error("no valid irradiance samples in {0} daily records")]
    NoValidSamples(usize),

    #[error("cannot read irradiance series: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid irradiance series: {0}")]
    Csv(#[from] csv::Error),
}

/// Client location handed to the lookup service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientSite {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    /// Two-letter state code.
    pub state: Option<String>,
}

impl ClientSite {
    /// Checks that address, city and state are all present and non-blank.
    ///
    /// # Errors
    ///
    /// Returns [`IrradianceError::IncompleteSite`] naming the first missing part.
    pub fn ensure_complete(&self) -> Result<(), IrradianceError> {
        let filled = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        if !filled(&self.address) {
            return Err(IrradianceError::IncompleteSite("address"));
        }
        if !filled(&self.city) {
            return Err(IrradianceError::IncompleteSite("city"));
        }
        if !filled(&self.state) {
            return Err(IrradianceError::IncompleteSite("state"));
        }
        Ok(())
    }

    /// Single-line address as sent to a geocoder.
    pub fn lookup_query(&self) -> String {
        [&self.address, &self.city, &self.state]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .chain(std::iter::once("Brazil"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Source of site-average daily insolation (kWh/m²/day).
pub trait IrradianceProvider {
    /// Returns the average daily irradiance for the site.
    ///
    /// # Errors
    ///
    /// Any lookup failure; the caller decides whether to proceed without
    /// irradiance.
    fn site_average_hsp(&self, site: &ClientSite) -> Result<f64, IrradianceError>;
}

/// Validates the site, then asks the provider.
///
/// # Errors
///
/// [`IrradianceError::IncompleteSite`] before any lookup, otherwise whatever
/// the provider returns.
pub fn resolve_irradiance(
    provider: &dyn IrradianceProvider,
    site: &ClientSite,
) -> Result<f64, IrradianceError> {
    site.ensure_complete()?;
    debug!(query = %site.lookup_query(), "resolving site irradiance");
    provider.site_average_hsp(site)
}

/// Provider returning one value for every site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedIrradiance(pub f64);

impl IrradianceProvider for FixedIrradiance {
    fn site_average_hsp(&self, _site: &ClientSite) -> Result<f64, IrradianceError> {
        Ok(self.0)
    }
}

/// One row of a daily irradiance export; the date column is not needed.
#[derive(Debug, Clone, Deserialize)]
struct DailyRecord {
    #[serde(alias = "ALLSKY_SFC_SW_DWN")]
    hsp: f64,
}

/// A year (or any span) of daily irradiance samples for one site.
///
/// Typically a daily point export from a solar-data service. Missing days are
/// encoded as negative fill values (e.g. `-999`) and are skipped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyIrradianceSeries {
    samples: Vec<f64>,
}

impl DailyIrradianceSeries {
    pub fn new(samples: Vec<f64>) -> Self {
        Self { samples }
    }

    /// Reads a CSV with a `date` column and an `hsp` (or `ALLSKY_SFC_SW_DWN`)
    /// column.
    ///
    /// # Errors
    ///
    /// Returns [`IrradianceError::Csv`] on malformed rows.
    pub fn from_csv_reader(reader: impl Read) -> Result<Self, IrradianceError> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let samples = rdr
            .deserialize::<DailyRecord>()
            .map(|row| row.map(|r| r.hsp))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { samples })
    }

    /// Reads the CSV series at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsed.
    pub fn from_csv_path(path: &Path) -> Result<Self, IrradianceError> {
        let file = File::open(path)?;
        Self::from_csv_reader(file)
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }
}

impl IrradianceProvider for DailyIrradianceSeries {
    fn site_average_hsp(&self, _site: &ClientSite) -> Result<f64, IrradianceError> {
        average_daily_irradiance(&self.samples)
    }
}

/// Mean of the valid daily samples, rounded to 2 decimals.
///
/// # Errors
///
/// Returns [`IrradianceError::NoValidSamples`] when every sample is a fill
/// value (or the series is empty).
///
/// # Examples
///
/// ```
/// use solar_proposal::irradiance::average_daily_irradiance;
///
/// let hsp = average_daily_irradiance(&[5.0, -999.0, 4.0]).unwrap();
/// assert_eq!(hsp, 4.5);
/// ```
pub fn average_daily_irradiance(samples: &[f64]) -> Result<f64, IrradianceError> {
    let valid: Vec<f64> = samples.iter().copied().filter(|v| *v >= 0.0).collect();
    if valid.is_empty() {
        return Err(IrradianceError::NoValidSamples(samples.len()));
    }

    let skipped = samples.len() - valid.len();
    if skipped > 0 {
        warn!(skipped, total = samples.len(), "skipping irradiance fill values");
    }

    let mean = valid.iter().sum::<f64>() / valid.len() as f64;
    Ok(round2(mean))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_site() -> ClientSite {
        ClientSite {
            name: Some("Maria".into()),
            address: Some("Rua das Flores, 120".into()),
            city: Some("Belo Horizonte".into()),
            state: Some("MG".into()),
        }
    }

    #[test]
    fn complete_site_passes() {
        assert!(full_site().ensure_complete().is_ok());
    }

    #[test]
    fn incomplete_site_names_missing_part() {
        let mut site = full_site();
        site.city = Some("  ".into());
        let err = site.ensure_complete();
        assert!(matches!(err, Err(IrradianceError::IncompleteSite("city"))));

        site = full_site();
        site.state = None;
        assert!(matches!(
            resolve_irradiance(&FixedIrradiance(5.0), &site),
            Err(IrradianceError::IncompleteSite("state"))
        ));
    }

    #[test]
    fn lookup_query_joins_parts() {
        assert_eq!(
            full_site().lookup_query(),
            "Rua das Flores, 120, Belo Horizonte, MG, Brazil"
        );
    }

    #[test]
    fn fixed_provider_resolves() {
        let hsp = resolve_irradiance(&FixedIrradiance(5.23), &full_site());
        assert_eq!(hsp.ok(), Some(5.23));
    }

    #[test]
    fn average_skips_fill_values() {
        let hsp = average_daily_irradiance(&[-999.0, 4.0, 6.0, -999.0, 5.0]);
        assert_eq!(hsp.ok(), Some(5.0));
    }

    #[test]
    fn average_rounds_to_two_decimals() {
        let hsp = average_daily_irradiance(&[4.0, 4.0, 5.0]);
        assert_eq!(hsp.ok(), Some(4.33));
    }

    #[test]
    fn all_fill_values_is_an_error() {
        let err = average_daily_irradiance(&[-999.0, -999.0]);
        assert!(matches!(err, Err(IrradianceError::NoValidSamples(2))));
        assert!(average_daily_irradiance(&[]).is_err());
    }

    #[test]
    fn series_from_csv_with_service_column_name() {
        let data = "date,ALLSKY_SFC_SW_DWN\n20240101,6.1\n20240102,-999\n20240103,5.9\n";
        let series = DailyIrradianceSeries::from_csv_reader(data.as_bytes());
        let series = series.unwrap_or_else(|e| panic!("csv should parse: {e}"));
        assert_eq!(series.samples().len(), 3);
        assert_eq!(series.site_average_hsp(&full_site()).ok(), Some(6.0));
    }

    #[test]
    fn series_from_csv_with_hsp_column() {
        let data = "date, hsp\n2024-06-01, 3.5\n2024-06-02, 4.5\n";
        let series = DailyIrradianceSeries::from_csv_reader(data.as_bytes());
        let hsp = series.ok().map(|s| s.site_average_hsp(&ClientSite::default()).ok());
        assert_eq!(hsp, Some(Some(4.0)));
    }

    #[test]
    fn malformed_csv_is_an_error() {
        let data = "date,hsp\n20240101,sunny\n";
        let series = DailyIrradianceSeries::from_csv_reader(data.as_bytes());
        assert!(matches!(series, Err(IrradianceError::Csv(_))));
    }
}
