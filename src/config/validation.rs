//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate the endpoint URL and API version range
//! - Validate value ranges (timeout > 0, weight >= 1)
//! - Validate NGINX time strings used as server defaults
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;

use url::Url;

use crate::client::version::{MAX_API_VERSION, MIN_API_VERSION};
use crate::config::schema::ClientConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(message) = validate_endpoint(&config.endpoint) {
        errors.push(ValidationError::new("endpoint", message));
    }

    if let Some(version) = config.api_version {
        if !(MIN_API_VERSION..=MAX_API_VERSION).contains(&version) {
            errors.push(ValidationError::new(
                "api_version",
                format!("{version} is outside the supported range {MIN_API_VERSION}..={MAX_API_VERSION}"),
            ));
        }
    }

    if config.timeout_secs == 0 {
        errors.push(ValidationError::new("timeout_secs", "must be greater than zero"));
    }

    let defaults = &config.defaults;
    if defaults.weight == 0 {
        errors.push(ValidationError::new("defaults.weight", "must be at least 1"));
    }
    if !is_nginx_time(&defaults.fail_timeout) {
        errors.push(ValidationError::new(
            "defaults.fail_timeout",
            format!("{:?} is not a valid time", defaults.fail_timeout),
        ));
    }
    if !is_nginx_time(&defaults.slow_start) {
        errors.push(ValidationError::new(
            "defaults.slow_start",
            format!("{:?} is not a valid time", defaults.slow_start),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Check that an endpoint is an absolute http(s) URL.
pub fn validate_endpoint(endpoint: &str) -> Result<Url, String> {
    let url = Url::parse(endpoint).map_err(|e| format!("invalid URL {endpoint:?}: {e}"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("unsupported scheme {other:?}, expected http or https")),
    }
}

/// Check NGINX time syntax: one or more `<number><unit>` groups,
/// e.g. "10s", "1m30s", "500ms". A bare number means seconds.
pub fn is_nginx_time(value: &str) -> bool {
    const UNITS: [&str; 8] = ["ms", "s", "m", "h", "d", "w", "M", "y"];

    let mut rest = value.trim();
    if rest.is_empty() {
        return false;
    }

    while !rest.is_empty() {
        let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
        if digits == 0 {
            return false;
        }
        rest = &rest[digits..];
        if rest.is_empty() {
            return true;
        }
        match UNITS.iter().find(|unit| rest.starts_with(*unit)) {
            Some(unit) => rest = &rest[unit.len()..],
            None => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ClientConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ClientConfig::default();
        config.endpoint = "ftp://nginx/api".into();
        config.api_version = Some(3);
        config.timeout_secs = 0;
        config.defaults.weight = 0;
        config.defaults.slow_start = "soon".into();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["endpoint", "api_version", "timeout_secs", "defaults.weight", "defaults.slow_start"]
        );
    }

    #[test]
    fn test_nginx_time() {
        for ok in ["10s", "0s", "1m30s", "500ms", "30", "1h"] {
            assert!(is_nginx_time(ok), "{ok} should be valid");
        }
        for bad in ["", "s", "10x", "1.5s", "-1s"] {
            assert!(!is_nginx_time(bad), "{bad} should be invalid");
        }
    }
}
