//! Top-level error type for the command-line entry point.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::irradiance::IrradianceError;
use crate::proposal::SinkError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid proposal:\n{}", join_lines(.0))]
    Invalid(Vec<ConfigError>),

    #[error("irradiance lookup failed: {0}")]
    Irradiance(#[from] IrradianceError),

    #[error("failed to write {path}: {source}")]
    Export {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Sink(#[from] SinkError),
}

fn join_lines(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
