//! The queryable configuration space

use crate::configspace::conditions::Condition;
use crate::configspace::forbidden::ForbiddenAndConjunction;
use crate::configspace::hyperparameter::Hyperparameter;
use crate::error::{PcsError, Result};
use crate::space::{ParameterError, Value};
use std::collections::BTreeMap;

/// An assignment of values to the active hyperparameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Configuration {
    values: BTreeMap<String, Value>,
}

impl Configuration {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, returning the previous one
    pub fn insert(&mut self, name: &str, value: Value) -> Option<Value> {
        self.values.insert(name.to_string(), value)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.values.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, Value)> for Configuration {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Hyperparameters with their activation conditions and forbidden combinations
///
/// Every hyperparameter has at most one condition; adding a second condition for the
/// same child combines both with `And`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigurationSpace {
    hyperparameters: Vec<Hyperparameter>,
    conditions: Vec<Condition>,
    forbidden: Vec<ForbiddenAndConjunction>,
}

impl ConfigurationSpace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a hyperparameter; names must be unique
    pub fn add_hyperparameter(&mut self, hyperparameter: Hyperparameter) -> Result<()> {
        if self.get(hyperparameter.name()).is_some() {
            return Err(ParameterError::DuplicateName {
                name: hyperparameter.name().to_string(),
            }
            .into());
        }
        self.hyperparameters.push(hyperparameter);
        Ok(())
    }

    /// Attach a condition to its child
    ///
    /// # Returns
    ///
    /// `Ok(())`, or `PcsError::UnknownParameterReference` if the child or a parent is
    /// not a hyperparameter of this space
    pub fn add_condition(&mut self, condition: Condition) -> Result<()> {
        let names = std::iter::once(condition.child()).chain(condition.parents());
        for name in names {
            if self.get(name).is_none() {
                return Err(PcsError::UnknownParameterReference {
                    name: name.to_string(),
                    context: format!("condition '{}'", condition),
                });
            }
        }

        match self
            .conditions
            .iter()
            .position(|existing| existing.child() == condition.child())
        {
            Some(index) => {
                let existing = self.conditions.remove(index);
                self.conditions.insert(index, Condition::and(existing, condition));
            }
            None => self.conditions.push(condition),
        }
        Ok(())
    }

    /// Add a forbidden combination
    pub fn add_forbidden(&mut self, clause: ForbiddenAndConjunction) -> Result<()> {
        for equals in &clause.clauses {
            let hyperparameter =
                self.get(&equals.parameter)
                    .ok_or_else(|| PcsError::UnknownParameterReference {
                        name: equals.parameter.clone(),
                        context: clause.to_string(),
                    })?;
            if !hyperparameter.contains(&equals.value) {
                return Err(PcsError::ValueCoercion {
                    parameter: equals.parameter.clone(),
                    literal: equals.value.to_string(),
                    expected: "value inside the domain",
                });
            }
        }
        self.forbidden.push(clause);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Hyperparameter> {
        self.hyperparameters.iter().find(|hp| hp.name() == name)
    }

    pub fn hyperparameters(&self) -> &[Hyperparameter] {
        &self.hyperparameters
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    /// The condition that activates a hyperparameter, if it has one
    pub fn condition_for(&self, child: &str) -> Option<&Condition> {
        self.conditions.iter().find(|c| c.child() == child)
    }

    pub fn forbidden_clauses(&self) -> &[ForbiddenAndConjunction] {
        &self.forbidden
    }

    /// Number of hyperparameters
    pub fn len(&self) -> usize {
        self.hyperparameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hyperparameters.is_empty()
    }

    /// Whether a hyperparameter is active under a configuration
    ///
    /// Unconditioned hyperparameters are always active.
    pub fn is_active(&self, name: &str, config: &Configuration) -> bool {
        self.condition_for(name)
            .map_or(true, |condition| condition.evaluate(self, config))
    }

    /// Whether the configuration hits any forbidden combination
    pub fn is_forbidden(&self, config: &Configuration) -> bool {
        self.forbidden.iter().any(|clause| clause.is_forbidden(config))
    }

    /// The configuration of all defaults, restricted to the active hyperparameters
    pub fn default_configuration(&self) -> Configuration {
        let mut config: Configuration = self
            .hyperparameters
            .iter()
            .map(|hp| (hp.name().to_string(), hp.default_value()))
            .collect();

        // Deactivating a parent can only deactivate more children, so this terminates.
        loop {
            let inactive: Vec<String> = config
                .iter()
                .filter(|(name, _)| !self.is_active(name, &config))
                .map(|(name, _)| name.to_string())
                .collect();
            if inactive.is_empty() {
                break;
            }
            for name in inactive {
                config.remove(&name);
            }
        }
        config
    }

    /// Check a configuration against the space
    ///
    /// Every value must belong to a known hyperparameter and lie inside its domain,
    /// exactly the active hyperparameters must be set, and no forbidden combination may
    /// occur.
    pub fn check_configuration(&self, config: &Configuration) -> Result<()> {
        for (name, value) in config.iter() {
            let hp = self
                .get(name)
                .ok_or_else(|| PcsError::UnknownParameterReference {
                    name: name.to_string(),
                    context: "configuration".to_string(),
                })?;
            if !hp.contains(value) {
                return Err(PcsError::InvalidConfiguration(format!(
                    "value {} of '{}' lies outside its domain",
                    value, name
                )));
            }
        }

        for hp in &self.hyperparameters {
            let active = self.is_active(hp.name(), config);
            match (active, config.contains(hp.name())) {
                (true, false) => {
                    return Err(PcsError::InvalidConfiguration(format!(
                        "active hyperparameter '{}' has no value",
                        hp.name()
                    )));
                }
                (false, true) => {
                    return Err(PcsError::InvalidConfiguration(format!(
                        "inactive hyperparameter '{}' has a value",
                        hp.name()
                    )));
                }
                _ => {}
            }
        }

        if let Some(clause) = self.forbidden.iter().find(|c| c.is_forbidden(config)) {
            return Err(PcsError::InvalidConfiguration(format!(
                "configuration matches {}",
                clause
            )));
        }
        Ok(())
    }
}
