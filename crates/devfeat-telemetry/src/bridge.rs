//! Conversion from the `[logging]` config section.

use devfeat_config::LoggingSection;

use crate::error::{TelemetryError, TelemetryResult};
use crate::logging::{FileRotation, LogConfig, LogFormat, LogTarget};

impl LogConfig {
    /// Build a log config from the `[logging]` section.
    ///
    /// A `"file"` target logs under `section.directory` as given; callers
    /// resolve relative directories first.
    ///
    /// # Errors
    ///
    /// Returns [`TelemetryError::ConfigError`] for an unknown format, target
    /// or rotation, or a file target without a directory.
    pub fn from_section(section: &LoggingSection) -> TelemetryResult<Self> {
        let format: LogFormat = section.format.parse()?;
        let mut config = Self::new(&section.level).with_format(format);
        config.directives.clone_from(&section.directives);

        match section.target.to_ascii_lowercase().as_str() {
            "stderr" => {},
            "stdout" => config = config.with_target(LogTarget::Stdout),
            "file" => {
                if section.directory.trim().is_empty() {
                    return Err(TelemetryError::ConfigError(
                        "file log target needs a directory".to_owned(),
                    ));
                }
                let rotation: FileRotation = section.rotation.parse()?;
                config = config.with_file_logging(
                    &section.directory,
                    &section.file_prefix,
                    rotation,
                );
            },
            other => {
                return Err(TelemetryError::ConfigError(format!(
                    "unknown log target '{other}'"
                )));
            },
        }
        Ok(config)
    }
}
