//! # Dialects
//!
//! Readers and writers for the textual and structured PCS conventions.
//!
//! - [`smac::SmacReader`]: the grammar-based SMAC-style reader
//! - [`native::NativeReader`] / [`native::NativeWriter`]: the lossless JSON/YAML form
//! - [`paramils::ParamIlsWriter`]: discretizing ParamILS writer
//! - [`irace::IraceWriter`]: tabular IRACE writer with a separate forbidden file
//!
//! Writers never fail on information they cannot express. They drop it and record a
//! [`ConversionWarning`] in the returned [`Compiled`] artifact, which is also logged.

pub mod conditions;
pub mod irace;
pub mod native;
pub mod paramils;
pub mod smac;

use crate::error::{PcsError, Result};
use crate::space::{ConditionClause, Domain, Parameter, ParameterSpace, Quantifier};
use thiserror::Error;

/// Information lost while converting a space into another form
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConversionWarning {
    #[error("Advanced forbidden clause '{{{expression}}}' is not supported by {target}; skipped")]
    AdvancedForbiddenSkipped {
        target: &'static str,
        expression: String,
    },

    #[error("Values [{}] of parameter '{parameter}' cannot be expressed in a {target} condition; dropped", values.join(", "))]
    ConditionValuesDropped {
        target: &'static str,
        parameter: String,
        values: Vec<String>,
    },
}

impl ConversionWarning {
    /// Log the warning and record it
    pub(crate) fn emit(self, warnings: &mut Vec<ConversionWarning>) {
        match &self {
            Self::AdvancedForbiddenSkipped { target, expression } => {
                tracing::warn!(%target, %expression, "skipping advanced forbidden clause");
            }
            Self::ConditionValuesDropped {
                target,
                parameter,
                values,
            } => {
                tracing::warn!(%target, %parameter, ?values, "dropping condition values");
            }
        }
        warnings.push(self);
    }
}

/// Record the literals of a clause a writer had to drop
///
/// A clause left without any value can never hold in the target dialect, so it fails
/// with [`PcsError::UnsupportedCondition`] instead of being rendered as an empty set.
pub(crate) fn drop_condition_values(
    target: &'static str,
    clause: &ConditionClause,
    kept: &[String],
    dropped: Vec<String>,
    warnings: &mut Vec<ConversionWarning>,
) -> Result<()> {
    if !dropped.is_empty() {
        ConversionWarning::ConditionValuesDropped {
            target,
            parameter: clause.parameter().to_string(),
            values: dropped,
        }
        .emit(warnings);
    }
    if kept.is_empty() {
        return Err(PcsError::UnsupportedCondition {
            parameter: clause.parameter().to_string(),
            reason: format!("no value {} can express satisfies '{}'", target, clause),
        });
    }
    Ok(())
}

/// The domain values of a categorical or ordinal parent that satisfy a clause
///
/// Literals outside the domain are dropped and reported through
/// [`drop_condition_values`]. Ordering comparisons need an ordinal parent.
pub(crate) fn select_domain_values(
    target: &'static str,
    parent: &Parameter,
    clause: &ConditionClause,
    warnings: &mut Vec<ConversionWarning>,
) -> Result<Vec<String>> {
    let (values, ordered) = match parent.domain() {
        Domain::Categorical { values } => (values, false),
        Domain::Ordinal { values } => (values, true),
        Domain::Integer { .. } | Domain::Real { .. } => {
            return Err(PcsError::UnsupportedCondition {
                parameter: parent.name().to_string(),
                reason: "numeric parameters have no value list".to_string(),
            })
        }
    };
    let known = |literal: &String| values.contains(literal);

    let (kept, dropped): (Vec<String>, Vec<String>) = match clause {
        ConditionClause::Categorical { items, .. } => items.iter().cloned().partition(known),
        ConditionClause::Numerical {
            quantifier, value, ..
        } => match quantifier {
            Quantifier::Equal if known(value) => (vec![value.clone()], Vec::new()),
            Quantifier::Equal => (Vec::new(), vec![value.clone()]),
            Quantifier::NotEqual => (
                values.iter().filter(|v| *v != value).cloned().collect(),
                Vec::new(),
            ),
            _ if !ordered => {
                return Err(PcsError::UnsupportedCondition {
                    parameter: parent.name().to_string(),
                    reason: format!(
                        "'{}' needs an order but the parameter is categorical",
                        quantifier
                    ),
                })
            }
            _ => match parent.domain().position(value) {
                Some(pivot) => (
                    values
                        .iter()
                        .enumerate()
                        .filter(|(index, _)| quantifier.holds(index.cmp(&pivot)))
                        .map(|(_, v)| v.clone())
                        .collect(),
                    Vec::new(),
                ),
                None => (Vec::new(), vec![value.clone()]),
            },
        },
    };

    drop_condition_values(target, clause, &kept, dropped, warnings)?;
    Ok(kept)
}

/// The output of a writer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Compiled {
    /// Primary document
    pub text: String,

    /// Companion forbidden-combinations document, for dialects that keep one
    pub forbidden: Option<String>,

    /// Everything that could not be carried over
    pub warnings: Vec<ConversionWarning>,
}

/// Reads a dialect into a fresh parameter space
pub trait PcsReader {
    /// Parse a whole document
    fn parse(&self, text: &str) -> Result<ParameterSpace>;
}

/// Renders a parameter space in a dialect
pub trait PcsWriter {
    /// Render the space; the space itself is never modified
    fn compile(&self, space: &ParameterSpace) -> Result<Compiled>;
}
