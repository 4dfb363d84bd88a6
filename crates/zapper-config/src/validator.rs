//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::{Config, StorageBackend};

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Turn the first error into a [`ConfigError`].
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(err) => Err(ConfigError::InvalidValue {
                field: err.path,
                message: err.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_targeting(config, &mut result);
        Self::validate_selector(config, &mut result);
        Self::validate_zap(config, &mut result);
        Self::validate_storage(config, &mut result);

        Ok(result)
    }

    fn validate_targeting(config: &Config, result: &mut ValidationResult) {
        let targeting = &config.targeting;

        if targeting.throttle_ms == 0 {
            result.add_error(ValidationError::new(
                "targeting.throttle_ms",
                "throttle_ms must be greater than 0",
            ));
        }

        if targeting.throttle_ms > 250 {
            result.add_warning(ValidationWarning::new(
                "targeting.throttle_ms",
                "throttle_ms above 250 makes the highlight visibly lag the pointer",
            ));
        }

        if targeting.tooltip_gap_px < 0.0 || targeting.tooltip_clearance_px < 0.0 {
            result.add_error(ValidationError::new(
                "targeting.tooltip_gap_px",
                "tooltip spacing cannot be negative",
            ));
        }

        if targeting.max_tooltip_text == 0 {
            result.add_warning(ValidationWarning::new(
                "targeting.max_tooltip_text",
                "element text will never be shown in the tooltip",
            ));
        }
    }

    fn validate_selector(config: &Config, result: &mut ValidationResult) {
        if config.selector.max_depth == 0 {
            result.add_error(ValidationError::new(
                "selector.max_depth",
                "max_depth must be greater than 0",
            ));
        }

        if config.selector.max_depth > 64 {
            result.add_warning(ValidationWarning::new(
                "selector.max_depth",
                "max_depth is very high (>64); positional selectors get long and brittle",
            ));
        }
    }

    fn validate_zap(config: &Config, result: &mut ValidationResult) {
        if config.zap.transition_ms > 2000 {
            result.add_warning(ValidationWarning::new(
                "zap.transition_ms",
                "transition_ms above 2000 delays hiding noticeably",
            ));
        }
    }

    fn validate_storage(config: &Config, result: &mut ValidationResult) {
        if config.storage.backend == StorageBackend::File
            && config.storage.path.as_os_str().is_empty()
        {
            result.add_error(ValidationError::new(
                "storage.path",
                "file backend requires a storage path",
            ));
        }

        if config.storage.backend == StorageBackend::Memory {
            result.add_warning(ValidationWarning::new(
                "storage.backend",
                "memory backend forgets every zap when the process exits",
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
