//! Forbidden parameter combinations
//!
//! Simple clauses are AND-only equality conjunctions and can be carried into every
//! target. Advanced clauses are kept as raw text only; exporters and the
//! configuration-space builder skip them with a warning.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One `parameter=value` pair of a simple forbidden clause
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForbiddenPair {
    pub parameter: String,
    pub value: String,
}

impl ForbiddenPair {
    pub fn new(parameter: &str, value: &str) -> Self {
        Self {
            parameter: parameter.trim().to_string(),
            value: value.trim().to_string(),
        }
    }
}

/// The body of a forbidden clause
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ForbiddenExpression {
    /// Conjunction of equality pairs
    Simple { pairs: Vec<ForbiddenPair> },

    /// Raw expression and its sub-expressions split on `||`/`&&`
    Advanced {
        expression: String,
        segments: Vec<String>,
    },
}

/// A combination of values that must never co-occur
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForbiddenClause {
    pub expression: ForbiddenExpression,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl ForbiddenClause {
    /// Create a simple clause from its pairs
    pub fn simple(pairs: Vec<ForbiddenPair>, comment: Option<&str>) -> Self {
        Self {
            expression: ForbiddenExpression::Simple { pairs },
            comment: clean_comment(comment),
        }
    }

    /// Create an advanced clause, splitting the raw text on `||` and `&&`
    pub fn advanced(expression: &str, comment: Option<&str>) -> Self {
        let expression = expression.trim().to_string();
        let segments = expression
            .split("||")
            .flat_map(|part| part.split("&&"))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        Self {
            expression: ForbiddenExpression::Advanced {
                expression,
                segments,
            },
            comment: clean_comment(comment),
        }
    }

    pub fn is_simple(&self) -> bool {
        matches!(self.expression, ForbiddenExpression::Simple { .. })
    }

    /// The equality pairs of a simple clause
    pub fn pairs(&self) -> Option<&[ForbiddenPair]> {
        match &self.expression {
            ForbiddenExpression::Simple { pairs } => Some(pairs),
            ForbiddenExpression::Advanced { .. } => None,
        }
    }
}

impl fmt::Display for ForbiddenClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.expression {
            ForbiddenExpression::Simple { pairs } => {
                let body: Vec<String> = pairs
                    .iter()
                    .map(|p| format!("{}={}", p.parameter, p.value))
                    .collect();
                write!(f, "{{{}}}", body.join(","))
            }
            ForbiddenExpression::Advanced { expression, .. } => write!(f, "{{{}}}", expression),
        }
    }
}

fn clean_comment(comment: Option<&str>) -> Option<String> {
    comment
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}
