//! Post-merge configuration validation.

use crate::error::{ConfigError, ConfigResult};
use crate::types::Config;

/// Accepted log levels.
pub const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Accepted log formats.
pub const LOG_FORMATS: [&str; 4] = ["pretty", "compact", "json", "full"];

/// Accepted log targets.
pub const LOG_TARGETS: [&str; 3] = ["stderr", "stdout", "file"];

/// Accepted log file rotations.
pub const LOG_ROTATIONS: [&str; 3] = ["daily", "hourly", "never"];

/// Validate a fully-merged and deserialized configuration.
///
/// # Errors
///
/// Returns the first validation error found.
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_features(config)?;
    validate_build(config)?;
    validate_registry(config)?;
    validate_collection(config)?;
    validate_logging(config)?;
    Ok(())
}

fn non_empty(field: &str, value: &str) -> ConfigResult<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::ValidationError {
            field: field.to_owned(),
            message: "must not be empty".to_owned(),
        });
    }
    Ok(())
}

fn validate_features(config: &Config) -> ConfigResult<()> {
    non_empty("features.src_dir", &config.features.src_dir)?;
    non_empty("features.tests_dir", &config.features.tests_dir)
}

fn validate_build(config: &Config) -> ConfigResult<()> {
    non_empty("build.output_dir", &config.build.output_dir)
}

fn validate_registry(config: &Config) -> ConfigResult<()> {
    let registry = &config.registry.registry;
    non_empty("registry.registry", registry)?;
    if registry.contains("://") {
        return Err(ConfigError::ValidationError {
            field: "registry.registry".to_owned(),
            message: format!("'{registry}' must be a host name without a scheme"),
        });
    }
    if config.registry.namespace.chars().any(char::is_whitespace) {
        return Err(ConfigError::ValidationError {
            field: "registry.namespace".to_owned(),
            message: "must not contain whitespace".to_owned(),
        });
    }
    Ok(())
}

fn validate_collection(config: &Config) -> ConfigResult<()> {
    let file_name = &config.collection.file_name;
    non_empty("collection.file_name", file_name)?;
    if file_name.contains(['/', '\\']) {
        return Err(ConfigError::ValidationError {
            field: "collection.file_name".to_owned(),
            message: format!("'{file_name}' must be a file name, not a path"),
        });
    }
    Ok(())
}

fn one_of(field: &str, kind: &str, value: &str, accepted: &[&str]) -> ConfigResult<()> {
    if accepted.contains(&value) {
        return Ok(());
    }
    Err(ConfigError::ValidationError {
        field: field.to_owned(),
        message: format!(
            "unsupported {kind} '{value}'; expected one of: {}",
            accepted.join(", ")
        ),
    })
}

fn validate_logging(config: &Config) -> ConfigResult<()> {
    let logging = &config.logging;
    one_of("logging.level", "log level", &logging.level, &LOG_LEVELS)?;
    one_of("logging.format", "log format", &logging.format, &LOG_FORMATS)?;
    one_of("logging.target", "log target", &logging.target, &LOG_TARGETS)?;
    one_of("logging.rotation", "log rotation", &logging.rotation, &LOG_ROTATIONS)?;

    if logging.target == "file" {
        non_empty("logging.directory", &logging.directory)?;
        non_empty("logging.file_prefix", &logging.file_prefix)?;
    }
    Ok(())
}
