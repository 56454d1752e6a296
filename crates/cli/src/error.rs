//! Error types for the apexctl CLI

use apexcoach_errors::{DatasetError, ValidationError};
use apexcoach_telemetry_config::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Driver not found: {0}")]
    DriverNotFound(String),

    #[error("Lap {lap} of {vehicle} not found in telemetry")]
    LapNotFound { vehicle: String, lap: u32 },

    #[error("No benchmark driver available")]
    NoBenchmark,

    #[error("Not telemetry data: {0} has no telemetry_name/telemetry_value columns")]
    NotTelemetry(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::DriverNotFound(_) | CliError::LapNotFound { .. } | CliError::NoBenchmark => 2,
            CliError::Dataset(_) | CliError::NotTelemetry(_) => 3,
            CliError::InvalidArgument(_)
            | CliError::Validation(_)
            | CliError::Config(ConfigError::Invalid(_)) => 4,
            CliError::Config(_) | CliError::Json(_) => 1,
        }
    }

    fn type_name(&self) -> &'static str {
        match self.exit_code() {
            2 => "not_found",
            3 => "dataset",
            4 => "validation",
            _ => "other",
        }
    }
}

/// Process exit code for an error: 2 driver not found, 3 dataset error,
/// 4 validation error, 1 anything else.
pub fn exit_code(error: &anyhow::Error) -> u8 {
    if let Some(cli) = error.downcast_ref::<CliError>() {
        return cli.exit_code();
    }
    if error.downcast_ref::<DatasetError>().is_some() {
        return 3;
    }
    if error.downcast_ref::<ValidationError>().is_some()
        || matches!(error.downcast_ref::<ConfigError>(), Some(ConfigError::Invalid(_)))
    {
        return 4;
    }
    1
}

/// Short machine-readable error kind for JSON output.
pub fn error_type_name(error: &anyhow::Error) -> &'static str {
    if let Some(cli) = error.downcast_ref::<CliError>() {
        return cli.type_name();
    }
    match exit_code(error) {
        3 => "dataset",
        4 => "validation",
        _ if error.downcast_ref::<ConfigError>().is_some() => "config",
        _ => "other",
    }
}
