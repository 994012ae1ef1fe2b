//! solar-proposal entry point: CLI wiring, config loading and report output.

use std::process;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use solar_proposal::cli::Cli;
use solar_proposal::config::ProposalConfig;
use solar_proposal::error::AppError;
use solar_proposal::estimator::PaybackSchedule;
use solar_proposal::io::export::{export_payback_csv, export_production_csv};
use solar_proposal::irradiance::{DailyIrradianceSeries, resolve_irradiance};
use solar_proposal::proposal::JsonFileSink;
use solar_proposal::report::ProposalReport;

fn init_tracing(verbose: bool) {
    let default = if verbose {
        "solar_proposal=debug"
    } else {
        "solar_proposal=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<ProposalConfig, AppError> {
    // --proposal takes priority, then --preset, then the residential default
    let cfg = if let Some(path) = &cli.proposal {
        info!(path = %path.display(), "loading proposal");
        ProposalConfig::from_toml_file(path)?
    } else {
        let name = cli.preset.as_deref().unwrap_or(Cli::DEFAULT_PRESET);
        info!(preset = name, "using preset");
        ProposalConfig::from_preset(name)?
    };

    let errors = cfg.validate();
    if !errors.is_empty() {
        return Err(AppError::Invalid(errors));
    }
    Ok(cfg)
}

fn run(cli: &Cli) -> Result<(), AppError> {
    let mut cfg = load_config(cli)?;

    if let Some(path) = &cli.irradiance_csv {
        if cfg.system.solar_irradiance_hsp.is_none() {
            let series = DailyIrradianceSeries::from_csv_path(path)?;
            let hsp = resolve_irradiance(&series, &cfg.client)?;
            info!(hsp, site = %cfg.client.lookup_query(), "resolved site irradiance");
            cfg.system.solar_irradiance_hsp = Some(hsp);
        } else {
            debug!("proposal already sets solar_irradiance_hsp, irradiance CSV ignored");
        }
    }

    let proposal = cfg.build_proposal();
    let est = proposal.estimate();
    let schedule = PaybackSchedule::build(
        est.total_investment.unwrap_or(0.0),
        est.estimated_savings_per_year,
        cli.horizon_years,
    );

    println!(
        "{}",
        ProposalReport::new(&proposal).with_schedule(schedule.as_ref())
    );

    if let Some(path) = &cli.production_out {
        match &est.monthly_production_kwh {
            Some(production) => {
                export_production_csv(production, proposal.profile(), path).map_err(
                    |source| AppError::Export {
                        path: path.clone(),
                        source,
                    },
                )?;
                info!(path = %path.display(), "monthly production written");
            }
            None => info!("production not computable, skipping production export"),
        }
    }

    if let Some(path) = &cli.payback_out {
        match &schedule {
            Some(s) => {
                export_payback_csv(s, path).map_err(|source| AppError::Export {
                    path: path.clone(),
                    source,
                })?;
                info!(path = %path.display(), "payback schedule written");
            }
            None => info!("no positive savings and investment, skipping payback export"),
        }
    }

    if let Some(path) = &cli.json_out {
        let mut sink = JsonFileSink::new(path);
        proposal.persist(&mut sink)?;
        info!(path = %sink.path().display(), "proposal record written");
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
