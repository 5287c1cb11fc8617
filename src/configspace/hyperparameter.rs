//! Typed hyperparameters
//!
//! A [`Hyperparameter`] is the configurator-facing counterpart of a declared
//! [`Parameter`]: bounds and defaults are already coerced to their value type.

use crate::error::{PcsError, Result};
use crate::space::{Domain, Parameter, Value};
use std::cmp::Ordering;

/// A typed hyperparameter of a configuration space
#[derive(Debug, Clone, PartialEq)]
pub enum Hyperparameter {
    /// Uniformly distributed integer in `[lower, upper]`
    UniformInteger {
        name: String,
        lower: i64,
        upper: i64,
        default: i64,
        log: bool,
    },

    /// Uniformly distributed float in `[lower, upper]`
    UniformFloat {
        name: String,
        lower: f64,
        upper: f64,
        default: f64,
        log: bool,
    },

    /// Unordered choice
    Categorical {
        name: String,
        choices: Vec<String>,
        default: String,
    },

    /// Ordered sequence of values
    Ordinal {
        name: String,
        sequence: Vec<String>,
        default: String,
    },
}

impl Hyperparameter {
    /// Instantiate the hyperparameter for a declared parameter
    ///
    /// # Examples
    ///
    /// ```
    /// use pcs_rs::configspace::Hyperparameter;
    /// use pcs_rs::space::{Parameter, Scale, Structure};
    ///
    /// let param = Parameter::new("x", Structure::Integer, &["1", "100"], Scale::Linear, "10", None).unwrap();
    /// let hp = Hyperparameter::from_parameter(&param).unwrap();
    /// assert_eq!(hp.name(), "x");
    /// assert!(!hp.is_log());
    /// ```
    pub fn from_parameter(param: &Parameter) -> Result<Self> {
        let name = param.name().to_string();
        let log = param.is_log();

        match (param.domain(), param.default_value()?) {
            (Domain::Integer { lower, upper }, Value::Integer(default)) => Ok(Self::UniformInteger {
                name,
                lower: *lower,
                upper: *upper,
                default,
                log,
            }),
            (Domain::Real { lower, upper }, Value::Real(default)) => Ok(Self::UniformFloat {
                name,
                lower: *lower,
                upper: *upper,
                default,
                log,
            }),
            (Domain::Categorical { values }, Value::Text(default)) => Ok(Self::Categorical {
                name,
                choices: values.clone(),
                default,
            }),
            (Domain::Ordinal { values }, Value::Text(default)) => Ok(Self::Ordinal {
                name,
                sequence: values.clone(),
                default,
            }),
            (_, other) => Err(PcsError::ValueCoercion {
                parameter: name,
                literal: other.to_string(),
                expected: param.structure().as_str(),
            }),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::UniformInteger { name, .. }
            | Self::UniformFloat { name, .. }
            | Self::Categorical { name, .. }
            | Self::Ordinal { name, .. } => name,
        }
    }

    pub fn default_value(&self) -> Value {
        match self {
            Self::UniformInteger { default, .. } => Value::Integer(*default),
            Self::UniformFloat { default, .. } => Value::Real(*default),
            Self::Categorical { default, .. } | Self::Ordinal { default, .. } => {
                Value::Text(default.clone())
            }
        }
    }

    /// Whether the hyperparameter is sampled on a log scale
    pub fn is_log(&self) -> bool {
        match self {
            Self::UniformInteger { log, .. } | Self::UniformFloat { log, .. } => *log,
            _ => false,
        }
    }

    /// Whether values of the hyperparameter have an order
    pub fn is_ordered(&self) -> bool {
        !matches!(self, Self::Categorical { .. })
    }

    /// Check whether a value is legal for the hyperparameter
    pub fn contains(&self, value: &Value) -> bool {
        match (self, value) {
            (Self::UniformInteger { lower, upper, .. }, Value::Integer(v)) => {
                lower <= v && v <= upper
            }
            (Self::UniformFloat { lower, upper, .. }, Value::Real(v)) => lower <= v && v <= upper,
            (Self::Categorical { choices, .. }, Value::Text(v)) => choices.contains(v),
            (Self::Ordinal { sequence, .. }, Value::Text(v)) => sequence.contains(v),
            _ => false,
        }
    }

    /// Order two values of this hyperparameter
    ///
    /// Numbers compare numerically and ordinal values by their position in the
    /// sequence. Categorical values have no order.
    pub fn compare(&self, a: &Value, b: &Value) -> Option<Ordering> {
        match self {
            Self::UniformInteger { .. } | Self::UniformFloat { .. } => {
                a.as_f64()?.partial_cmp(&b.as_f64()?)
            }
            Self::Ordinal { sequence, .. } => match (a, b) {
                (Value::Text(a), Value::Text(b)) => {
                    let a = sequence.iter().position(|v| v == a)?;
                    let b = sequence.iter().position(|v| v == b)?;
                    Some(a.cmp(&b))
                }
                _ => None,
            },
            Self::Categorical { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::space::{Scale, Structure};

    #[test]
    fn test_from_parameter() {
        let param =
            Parameter::new("a", Structure::Real, &["0.01", "1"], Scale::Log, "0.1", None).unwrap();
        assert_eq!(
            Hyperparameter::from_parameter(&param).unwrap(),
            Hyperparameter::UniformFloat {
                name: "a".to_string(),
                lower: 0.01,
                upper: 1.0,
                default: 0.1,
                log: true,
            }
        );

        let param = Parameter::new(
            "o",
            Structure::Ordinal,
            &["low", "mid", "high"],
            Scale::Linear,
            "mid",
            None,
        )
        .unwrap();
        let hp = Hyperparameter::from_parameter(&param).unwrap();
        assert_eq!(hp.default_value(), Value::Text("mid".to_string()));
        assert!(hp.is_ordered());
    }

    #[test]
    fn test_compare_and_contains() {
        let ordinal = Hyperparameter::Ordinal {
            name: "o".to_string(),
            sequence: vec!["low".to_string(), "mid".to_string(), "high".to_string()],
            default: "low".to_string(),
        };
        let text = |s: &str| Value::Text(s.to_string());
        assert_eq!(ordinal.compare(&text("high"), &text("low")), Some(Ordering::Greater));
        assert_eq!(ordinal.compare(&text("high"), &text("extreme")), None);

        let categorical = Hyperparameter::Categorical {
            name: "c".to_string(),
            choices: vec!["a".to_string(), "b".to_string()],
            default: "a".to_string(),
        };
        assert_eq!(categorical.compare(&text("a"), &text("b")), None);
        assert!(categorical.contains(&text("b")));
        assert!(!categorical.contains(&Value::Integer(1)));

        let integer = Hyperparameter::UniformInteger {
            name: "x".to_string(),
            lower: 1,
            upper: 10,
            default: 5,
            log: false,
        };
        assert!(integer.contains(&Value::Integer(10)));
        assert!(!integer.contains(&Value::Integer(11)));
        assert_eq!(
            integer.compare(&Value::Integer(3), &Value::Integer(7)),
            Some(Ordering::Less)
        );
    }
}
