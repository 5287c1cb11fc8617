//! Activation conditions of a configuration space
//!
//! Leaf conditions compare a parent hyperparameter's value with typed literals;
//! [`Condition::And`] and [`Condition::Or`] combine them in the order the source
//! expression was folded.

use crate::configspace::space::{Configuration, ConfigurationSpace};
use crate::space::Value;
use std::cmp::Ordering;
use std::fmt;

/// A condition tying a child hyperparameter's activation to its parents
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Equals {
        child: String,
        parent: String,
        value: Value,
    },
    NotEquals {
        child: String,
        parent: String,
        value: Value,
    },
    LessThan {
        child: String,
        parent: String,
        value: Value,
    },
    GreaterThan {
        child: String,
        parent: String,
        value: Value,
    },
    In {
        child: String,
        parent: String,
        values: Vec<Value>,
    },
    And {
        left: Box<Condition>,
        right: Box<Condition>,
    },
    Or {
        left: Box<Condition>,
        right: Box<Condition>,
    },
}

impl Condition {
    pub fn and(left: Condition, right: Condition) -> Self {
        Self::And {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn or(left: Condition, right: Condition) -> Self {
        Self::Or {
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// The hyperparameter this condition activates
    pub fn child(&self) -> &str {
        match self {
            Self::Equals { child, .. }
            | Self::NotEquals { child, .. }
            | Self::LessThan { child, .. }
            | Self::GreaterThan { child, .. }
            | Self::In { child, .. } => child,
            Self::And { left, .. } | Self::Or { left, .. } => left.child(),
        }
    }

    /// Names of all parents, in order of appearance and without repeats
    pub fn parents(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_parents(&mut out);
        out
    }

    fn collect_parents<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Equals { parent, .. }
            | Self::NotEquals { parent, .. }
            | Self::LessThan { parent, .. }
            | Self::GreaterThan { parent, .. }
            | Self::In { parent, .. } => {
                if !out.contains(&parent.as_str()) {
                    out.push(parent);
                }
            }
            Self::And { left, right } | Self::Or { left, right } => {
                left.collect_parents(out);
                right.collect_parents(out);
            }
        }
    }

    /// Evaluate the condition against a configuration
    ///
    /// A leaf whose parent has no value in the configuration (because the parent is
    /// itself inactive) does not hold.
    pub fn evaluate(&self, space: &ConfigurationSpace, config: &Configuration) -> bool {
        match self {
            Self::Equals { parent, value, .. } => config.get(parent) == Some(value),
            Self::NotEquals { parent, value, .. } => {
                config.get(parent).is_some_and(|current| current != value)
            }
            Self::LessThan { parent, value, .. } => {
                compare(space, config, parent, value) == Some(Ordering::Less)
            }
            Self::GreaterThan { parent, value, .. } => {
                compare(space, config, parent, value) == Some(Ordering::Greater)
            }
            Self::In { parent, values, .. } => config
                .get(parent)
                .is_some_and(|current| values.contains(current)),
            Self::And { left, right } => {
                left.evaluate(space, config) && right.evaluate(space, config)
            }
            Self::Or { left, right } => left.evaluate(space, config) || right.evaluate(space, config),
        }
    }
}

fn compare(
    space: &ConfigurationSpace,
    config: &Configuration,
    parent: &str,
    value: &Value,
) -> Option<Ordering> {
    let current = config.get(parent)?;
    space.get(parent)?.compare(current, value)
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Equals { parent, value, .. } => write!(f, "{} == {}", parent, value),
            Self::NotEquals { parent, value, .. } => write!(f, "{} != {}", parent, value),
            Self::LessThan { parent, value, .. } => write!(f, "{} < {}", parent, value),
            Self::GreaterThan { parent, value, .. } => write!(f, "{} > {}", parent, value),
            Self::In { parent, values, .. } => {
                let values: Vec<String> = values.iter().map(Value::to_string).collect();
                write!(f, "{} in {{{}}}", parent, values.join(", "))
            }
            Self::And { left, right } => write!(f, "({} && {})", left, right),
            Self::Or { left, right } => write!(f, "({} || {})", left, right),
        }
    }
}
