//! Solar proposal estimator: monthly production, annual bill savings and payback.

pub mod cli;
pub mod config;
pub mod error;
pub mod estimator;
pub mod io;
pub mod irradiance;
pub mod proposal;
pub mod report;
