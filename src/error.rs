use thiserror::Error;

use crate::space::parameter::ParameterError;

/// Error types for the pcs-rs library.
#[derive(Error, Debug)]
pub enum PcsError {
    /// The requested parse/export direction is not implemented for a convention.
    #[error("Convention '{convention}' does not support {direction}")]
    UnsupportedConvention {
        convention: String,
        direction: &'static str,
    },

    /// A native space file whose suffix is neither JSON nor YAML.
    #[error("Unsupported file type for the native convention: '{path}' (expected .json, .yaml or .yml)")]
    UnsupportedFileType { path: String },

    /// A source line matched none of the grammar productions.
    #[error("Cannot parse line {line_number}: '{line}' ({reason})")]
    MalformedLine {
        line_number: usize,
        line: String,
        reason: String,
    },

    /// A parameter declaration line that parsed but was rejected.
    #[error("Invalid declaration on line {line_number}: '{line}' ({source})")]
    InvalidDeclaration {
        line_number: usize,
        line: String,
        source: ParameterError,
    },

    /// A condition expression could not be parsed.
    #[error("Cannot parse condition '{expression}': {reason}")]
    MalformedCondition { expression: String, reason: String },

    /// A constraint, condition or forbidden clause names an undeclared parameter.
    #[error("Unknown parameter '{name}' referenced in {context}")]
    UnknownParameterReference { name: String, context: String },

    /// A literal could not be cast to the referenced parameter's value type.
    #[error("Value '{literal}' is not a valid {expected} for parameter '{parameter}'")]
    ValueCoercion {
        parameter: String,
        literal: String,
        expected: &'static str,
    },

    /// A condition kind the parent parameter cannot support.
    #[error("Unsupported condition on parameter '{parameter}': {reason}")]
    UnsupportedCondition { parameter: String, reason: String },

    /// A configuration that violates its configuration space.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Declaration-level validation failure.
    #[error("Parameter error: {0}")]
    Parameter(#[from] ParameterError),

    /// Invalid export options.
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// I/O error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for pcs-rs operations.
pub type Result<T> = std::result::Result<T, PcsError>;
