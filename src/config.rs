//! Configuration options for the dialect exporters.
//!
//! This module defines how numeric ranges are discretized for dialects that only
//! accept value lists, and what the generated files look like.

use crate::error::{PcsError, Result};
use serde::{Deserialize, Serialize};

/// Options shared by the exporters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Number of points a numeric range is discretized into for ParamILS. Default: 20
    pub granularity: usize,

    /// Header comment written on the first line of generated files.
    /// Default: "### Parameter file generated by pcs-rs"
    pub header: String,

    /// Lower bound used instead of zero when discretizing a log-scaled range. Default: 1e-5
    pub log_zero_floor: f64,

    /// Fractional digits IRACE assumes for real parameters. Default: 4
    pub irace_digits: usize,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            granularity: 20,
            header: "### Parameter file generated by pcs-rs".to_string(),
            log_zero_floor: 1e-5,
            irace_digits: 4,
        }
    }
}

impl ExportOptions {
    /// Check the options for values no exporter can work with
    pub fn validate(&self) -> Result<()> {
        if self.granularity == 0 {
            return Err(PcsError::InvalidOptions(
                "granularity must be at least 1".to_string(),
            ));
        }
        if !(self.log_zero_floor.is_finite() && self.log_zero_floor > 0.0) {
            return Err(PcsError::InvalidOptions(format!(
                "log_zero_floor must be a positive number, got {}",
                self.log_zero_floor
            )));
        }
        if self.header.contains('\n') {
            return Err(PcsError::InvalidOptions(
                "header must be a single line".to_string(),
            ));
        }
        Ok(())
    }

    /// Load options from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let options: ExportOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from YAML; missing fields take their defaults
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let options: ExportOptions = serde_yaml::from_str(yaml)?;
        options.validate()?;
        Ok(options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ExportOptions::default();
        assert_eq!(options.granularity, 20);
        assert_eq!(options.irace_digits, 4);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_partial_documents() {
        let options = ExportOptions::from_json(r#"{"granularity": 5}"#).unwrap();
        assert_eq!(options.granularity, 5);
        assert_eq!(options.header, ExportOptions::default().header);

        let options = ExportOptions::from_yaml("header: \"# custom\"\n").unwrap();
        assert_eq!(options.header, "# custom");
        assert_eq!(options.granularity, 20);

        assert!(matches!(
            ExportOptions::from_json(r#"{"granularity": 0}"#),
            Err(PcsError::InvalidOptions(_))
        ));
    }
}
