//! Parameter definition and implementation
//!
//! This module provides the Parameter struct, the fundamental building block of a
//! parameter configuration space. A parameter has a name, a typed domain (integer or
//! real bounds, or a list of categorical/ordinal values), a scale and a default value.

use crate::error::{PcsError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Characters that may never appear in a parameter name.
///
/// Besides whitespace, commas, quotes and parentheses, the structural characters
/// of the line grammars are excluded so names stay unambiguous in every dialect.
pub(crate) const RESERVED_NAME_CHARS: &[char] = &[
    ',', '"', '\'', '(', ')', '|', '{', '}', '[', ']', '#', '=', '<', '>', '!',
];

/// Errors that can occur when declaring parameters
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    #[error("Parameter structure '{structure}' not supported")]
    UnsupportedStructure { structure: String },

    #[error("Invalid domain for parameter '{name}': {reason}")]
    InvalidDomain { name: String, reason: String },

    #[error("Invalid bounds for parameter '{name}': lower ({lower}) must not exceed upper ({upper})")]
    InvalidBounds {
        name: String,
        lower: String,
        upper: String,
    },

    #[error("Invalid parameter name '{name}'")]
    InvalidName { name: String },

    #[error("Parameter '{name}' is declared more than once")]
    DuplicateName { name: String },

    #[error("Default value '{default}' of parameter '{name}' lies outside its domain")]
    DefaultOutsideDomain { name: String, default: String },

    #[error("Parameter '{name}' uses a log scale with a negative lower bound ({lower})")]
    InvalidLogScale { name: String, lower: String },
}

/// The kind of values a parameter takes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Structure {
    /// Whole numbers within inclusive bounds
    Integer,

    /// Floating point numbers within inclusive bounds
    Real,

    /// An unordered set of value tokens
    Categorical,

    /// An ordered sequence of value tokens
    Ordinal,
}

impl Structure {
    /// The lowercase keyword used by the textual dialects
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Real => "real",
            Self::Categorical => "categorical",
            Self::Ordinal => "ordinal",
        }
    }

    /// Whether the structure has numeric bounds
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Real)
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Structure {
    type Err = ParameterError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "integer" => Ok(Self::Integer),
            "real" => Ok(Self::Real),
            "categorical" => Ok(Self::Categorical),
            "ordinal" => Ok(Self::Ordinal),
            other => Err(ParameterError::UnsupportedStructure {
                structure: other.to_string(),
            }),
        }
    }
}

/// Scale of a numeric parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    #[default]
    Linear,
    Log,
}

/// The typed domain of a parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "structure", rename_all = "lowercase")]
pub enum Domain {
    Integer { lower: i64, upper: i64 },
    Real { lower: f64, upper: f64 },
    Categorical { values: Vec<String> },
    Ordinal { values: Vec<String> },
}

impl Domain {
    /// The structure this domain belongs to
    pub fn structure(&self) -> Structure {
        match self {
            Self::Integer { .. } => Structure::Integer,
            Self::Real { .. } => Structure::Real,
            Self::Categorical { .. } => Structure::Categorical,
            Self::Ordinal { .. } => Structure::Ordinal,
        }
    }

    /// The value tokens of a categorical or ordinal domain
    pub fn values(&self) -> Option<&[String]> {
        match self {
            Self::Categorical { values } | Self::Ordinal { values } => Some(values),
            _ => None,
        }
    }

    /// The domain rendered as the tokens a dialect writes between its brackets
    pub fn tokens(&self) -> Vec<String> {
        match self {
            Self::Integer { lower, upper } => vec![lower.to_string(), upper.to_string()],
            Self::Real { lower, upper } => vec![format_real(*lower), format_real(*upper)],
            Self::Categorical { values } | Self::Ordinal { values } => values.clone(),
        }
    }

    /// Position of a token inside a categorical or ordinal domain
    pub fn position(&self, token: &str) -> Option<usize> {
        self.values()?.iter().position(|v| v == token)
    }

    /// Check whether a typed value lies inside the domain
    pub fn contains(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::Integer { lower, upper }, Value::Integer(v)) => v >= lower && v <= upper,
            (Self::Real { lower, upper }, Value::Real(v)) => v >= lower && v <= upper,
            (Self::Categorical { values }, Value::Text(v))
            | (Self::Ordinal { values }, Value::Text(v)) => values.contains(v),
            _ => false,
        }
    }
}

/// A literal coerced to a parameter's value type
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Real(f64),
    Text(String),
}

impl Value {
    /// Numeric view of the value, if it has one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(v) => Some(*v as f64),
            Self::Real(v) => Some(*v),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(v) => write!(f, "{}", v),
            Self::Real(v) => f.write_str(&format_real(*v)),
            Self::Text(v) => f.write_str(v),
        }
    }
}

/// Shortest text that reads back as the same float.
pub(crate) fn format_real(value: f64) -> String {
    format!("{}", value)
}

/// A tunable parameter of a solver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Name of the parameter
    name: String,

    /// Typed domain, which also fixes the structure
    domain: Domain,

    /// Scale of numeric parameters, always linear otherwise
    #[serde(default)]
    scale: Scale,

    /// Default value, as written in the source
    default: String,

    /// Trailing comment of the declaration
    #[serde(default, skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
}

impl Parameter {
    /// Create a new validated parameter
    ///
    /// # Arguments
    ///
    /// * `name` - Name of the parameter
    /// * `structure` - Kind of values the parameter takes
    /// * `domain` - Two bounds for integer/real, the value tokens otherwise
    /// * `scale` - Linear or log; forced to linear for categorical and ordinal parameters
    /// * `default` - Default value as text
    /// * `comment` - Optional trailing comment
    ///
    /// # Returns
    ///
    /// The parameter, or an error if the name, domain or default is invalid
    ///
    /// # Examples
    ///
    /// ```
    /// use pcs_rs::space::{Parameter, Scale, Structure};
    ///
    /// let param = Parameter::new("x", Structure::Integer, &["1", "100"], Scale::Linear, "10", None).unwrap();
    /// assert_eq!(param.name(), "x");
    /// assert_eq!(param.structure(), Structure::Integer);
    /// ```
    pub fn new<S: AsRef<str>>(
        name: &str,
        structure: Structure,
        domain: &[S],
        scale: Scale,
        default: &str,
        comment: Option<&str>,
    ) -> std::result::Result<Self, ParameterError> {
        validate_name(name)?;
        let tokens: Vec<String> = domain.iter().map(|t| t.as_ref().trim().to_string()).collect();
        let domain = parse_domain(name, structure, &tokens)?;
        let scale = if structure.is_numeric() {
            scale
        } else {
            Scale::Linear
        };

        let param = Self {
            name: name.to_string(),
            domain,
            scale,
            default: default.trim().to_string(),
            comment: comment
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
        };
        param.validate()?;
        Ok(param)
    }

    /// Re-run the declaration checks, e.g. after deserialization
    pub fn validate(&self) -> std::result::Result<(), ParameterError> {
        validate_name(&self.name)?;

        match &self.domain {
            Domain::Integer { lower, upper } if lower > upper => {
                return Err(self.invalid_bounds(lower.to_string(), upper.to_string()));
            }
            Domain::Real { lower, upper } => {
                if !lower.is_finite() || !upper.is_finite() {
                    return Err(ParameterError::InvalidDomain {
                        name: self.name.clone(),
                        reason: "real bounds must be finite".to_string(),
                    });
                }
                if lower > upper {
                    return Err(self.invalid_bounds(format_real(*lower), format_real(*upper)));
                }
            }
            Domain::Categorical { values } | Domain::Ordinal { values } => {
                if values.is_empty() || values.iter().any(|v| v.is_empty()) {
                    return Err(ParameterError::InvalidDomain {
                        name: self.name.clone(),
                        reason: "value list must be non-empty".to_string(),
                    });
                }
            }
            _ => {}
        }

        if self.scale == Scale::Log {
            let negative = match &self.domain {
                Domain::Integer { lower, .. } => (*lower < 0).then(|| lower.to_string()),
                Domain::Real { lower, .. } => (*lower < 0.0).then(|| format_real(*lower)),
                _ => None,
            };
            if let Some(lower) = negative {
                return Err(ParameterError::InvalidLogScale {
                    name: self.name.clone(),
                    lower,
                });
            }
        }

        let inside = self
            .coerce(&self.default)
            .map(|v| self.domain.contains(&v))
            .unwrap_or(false);
        if !inside {
            return Err(ParameterError::DefaultOutsideDomain {
                name: self.name.clone(),
                default: self.default.clone(),
            });
        }

        Ok(())
    }

    fn invalid_bounds(&self, lower: String, upper: String) -> ParameterError {
        ParameterError::InvalidBounds {
            name: self.name.clone(),
            lower,
            upper,
        }
    }

    /// Get the name of the parameter
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the structure of the parameter
    pub fn structure(&self) -> Structure {
        self.domain.structure()
    }

    /// Get the domain of the parameter
    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Get the scale of the parameter
    pub fn scale(&self) -> Scale {
        self.scale
    }

    /// Whether the parameter is numeric and log-scaled
    pub fn is_log(&self) -> bool {
        self.scale == Scale::Log
    }

    /// Get the default value as written
    pub fn default(&self) -> &str {
        &self.default
    }

    /// Get the comment attached to the declaration
    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Get the default value coerced to the parameter's value type
    pub fn default_value(&self) -> Result<Value> {
        self.coerce(&self.default)
    }

    /// Coerce a literal to this parameter's value type
    ///
    /// Integer parameters accept whole numbers only, real parameters any float, and
    /// categorical/ordinal parameters only tokens of their own domain.
    ///
    /// # Returns
    ///
    /// The typed value, or `PcsError::ValueCoercion` naming the parameter and literal
    pub fn coerce(&self, literal: &str) -> Result<Value> {
        let literal = literal.trim();
        let coerced = match &self.domain {
            Domain::Integer { .. } => literal.parse::<i64>().ok().map(Value::Integer),
            Domain::Real { .. } => literal
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(Value::Real),
            Domain::Categorical { values } | Domain::Ordinal { values } => values
                .iter()
                .any(|v| v == literal)
                .then(|| Value::Text(literal.to_string())),
        };

        coerced.ok_or_else(|| PcsError::ValueCoercion {
            parameter: self.name.clone(),
            literal: literal.to_string(),
            expected: match self.structure() {
                Structure::Integer => "integer",
                Structure::Real => "real",
                Structure::Categorical => "categorical value",
                Structure::Ordinal => "ordinal value",
            },
        })
    }
}

fn validate_name(name: &str) -> std::result::Result<(), ParameterError> {
    let invalid = name.is_empty()
        || name
            .chars()
            .any(|c| c.is_whitespace() || RESERVED_NAME_CHARS.contains(&c));
    if invalid {
        return Err(ParameterError::InvalidName {
            name: name.to_string(),
        });
    }
    Ok(())
}

/// Build a typed domain from the raw tokens of a declaration
fn parse_domain(
    name: &str,
    structure: Structure,
    tokens: &[String],
) -> std::result::Result<Domain, ParameterError> {
    let invalid = |reason: String| ParameterError::InvalidDomain {
        name: name.to_string(),
        reason,
    };

    match structure {
        Structure::Integer | Structure::Real => {
            if tokens.len() != 2 {
                return Err(invalid(format!(
                    "expected exactly two bounds, got {}",
                    tokens.len()
                )));
            }
            if structure == Structure::Integer {
                let bound = |t: &String| {
                    t.parse::<i64>()
                        .map_err(|_| invalid(format!("'{}' is not an integer bound", t)))
                };
                Ok(Domain::Integer {
                    lower: bound(&tokens[0])?,
                    upper: bound(&tokens[1])?,
                })
            } else {
                let bound = |t: &String| {
                    t.parse::<f64>()
                        .map_err(|_| invalid(format!("'{}' is not a real bound", t)))
                };
                Ok(Domain::Real {
                    lower: bound(&tokens[0])?,
                    upper: bound(&tokens[1])?,
                })
            }
        }
        Structure::Categorical => Ok(Domain::Categorical {
            values: tokens.to_vec(),
        }),
        Structure::Ordinal => Ok(Domain::Ordinal {
            values: tokens.to_vec(),
        }),
    }
}
