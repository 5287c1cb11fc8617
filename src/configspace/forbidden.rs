//! Forbidden value combinations of a configuration space

use crate::configspace::space::Configuration;
use crate::space::Value;
use std::fmt;

/// `parameter == value`
#[derive(Debug, Clone, PartialEq)]
pub struct ForbiddenEquals {
    pub parameter: String,
    pub value: Value,
}

impl ForbiddenEquals {
    pub fn new(parameter: &str, value: Value) -> Self {
        Self {
            parameter: parameter.to_string(),
            value,
        }
    }

    pub fn holds(&self, config: &Configuration) -> bool {
        config.get(&self.parameter) == Some(&self.value)
    }
}

/// A conjunction of equalities that must never hold together
#[derive(Debug, Clone, PartialEq)]
pub struct ForbiddenAndConjunction {
    pub clauses: Vec<ForbiddenEquals>,
}

impl ForbiddenAndConjunction {
    pub fn new(clauses: Vec<ForbiddenEquals>) -> Self {
        Self { clauses }
    }

    /// Whether the configuration contains the forbidden combination
    pub fn is_forbidden(&self, config: &Configuration) -> bool {
        !self.clauses.is_empty() && self.clauses.iter().all(|clause| clause.holds(config))
    }
}

impl fmt::Display for ForbiddenAndConjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .clauses
            .iter()
            .map(|c| format!("{} == {}", c.parameter, c.value))
            .collect();
        write!(f, "forbidden({})", parts.join(" && "))
    }
}
