//! Building a configuration space from a parameter space
//!
//! Parameters become typed hyperparameters, constraint trees become [`Condition`]s
//! attached to their child, and simple forbidden clauses become
//! [`ForbiddenAndConjunction`]s. Every literal is coerced to the type of the parameter
//! it is compared with. Advanced forbidden clauses cannot be rebuilt; they are skipped
//! and reported in the [`BuildReport`].

use crate::configspace::conditions::Condition;
use crate::configspace::forbidden::{ForbiddenAndConjunction, ForbiddenEquals};
use crate::configspace::hyperparameter::Hyperparameter;
use crate::configspace::space::ConfigurationSpace;
use crate::dialect::ConversionWarning;
use crate::error::{PcsError, Result};
use crate::space::{
    ConditionClause, ConditionTree, ForbiddenExpression, LogicalOp, Parameter, ParameterSpace,
    Quantifier, Structure,
};

const TARGET: &str = "ConfigSpace";

/// A built configuration space and everything that could not be carried over
#[derive(Debug, Clone, PartialEq)]
pub struct BuildReport {
    pub space: ConfigurationSpace,
    pub warnings: Vec<ConversionWarning>,
}

/// Build the configuration space of a parameter space
///
/// # Returns
///
/// The space with its warnings, or an error if a reference does not resolve, a literal
/// cannot be coerced, or an ordering comparison targets a categorical parent
///
/// # Examples
///
/// ```
/// use pcs_rs::configspace::build;
/// use pcs_rs::dialect::{smac::SmacReader, PcsReader};
///
/// let space = SmacReader::new()
///     .parse("x integer [1, 100] [10]\ny categorical {a,b,c} [a]\ny | x > 50")
///     .unwrap();
/// let report = build(&space).unwrap();
///
/// assert_eq!(report.space.len(), 2);
/// assert!(report.space.condition_for("y").is_some());
/// assert!(report.warnings.is_empty());
/// ```
pub fn build(space: &ParameterSpace) -> Result<BuildReport> {
    space.validate()?;

    let mut cs = ConfigurationSpace::new();
    for param in space.parameters() {
        cs.add_hyperparameter(Hyperparameter::from_parameter(param)?)?;
    }

    for constraint in space.constraints() {
        let condition = convert_tree(space, &constraint.parameter, &constraint.conditions)?;
        cs.add_condition(condition)?;
    }

    let mut warnings = Vec::new();
    for clause in space.forbidden_clauses() {
        match &clause.expression {
            ForbiddenExpression::Simple { pairs } => {
                let clauses = pairs
                    .iter()
                    .map(|pair| -> Result<ForbiddenEquals> {
                        let value = lookup(space, &pair.parameter, || clause.to_string())?
                            .coerce(&pair.value)?;
                        Ok(ForbiddenEquals::new(&pair.parameter, value))
                    })
                    .collect::<Result<Vec<_>>>()?;
                cs.add_forbidden(ForbiddenAndConjunction::new(clauses))?;
            }
            ForbiddenExpression::Advanced { expression, .. } => {
                ConversionWarning::AdvancedForbiddenSkipped {
                    target: TARGET,
                    expression: expression.clone(),
                }
                .emit(&mut warnings);
            }
        }
    }

    tracing::debug!(
        hyperparameters = cs.len(),
        conditions = cs.conditions().len(),
        forbidden = cs.forbidden_clauses().len(),
        warnings = warnings.len(),
        "built configuration space"
    );
    Ok(BuildReport {
        space: cs,
        warnings,
    })
}

fn lookup<'a>(
    space: &'a ParameterSpace,
    name: &str,
    context: impl FnOnce() -> String,
) -> Result<&'a Parameter> {
    space
        .get(name)
        .ok_or_else(|| PcsError::UnknownParameterReference {
            name: name.to_string(),
            context: context(),
        })
}

/// Convert an already folded tree, keeping its grouping
fn convert_tree(space: &ParameterSpace, child: &str, tree: &ConditionTree) -> Result<Condition> {
    match tree {
        ConditionTree::Leaf(clause) => convert_clause(space, child, clause),
        ConditionTree::Group { op, left, right } => {
            let left = convert_tree(space, child, left)?;
            let right = convert_tree(space, child, right)?;
            Ok(match op {
                LogicalOp::And => Condition::and(left, right),
                LogicalOp::Or => Condition::or(left, right),
            })
        }
    }
}

fn convert_clause(space: &ParameterSpace, child: &str, clause: &ConditionClause) -> Result<Condition> {
    let parent = lookup(space, clause.parameter(), || format!("condition of '{}'", child))?;
    let child = child.to_string();
    let name = parent.name().to_string();

    let (quantifier, literal) = match clause {
        ConditionClause::Categorical { items, .. } => {
            let values = items
                .iter()
                .map(|item| parent.coerce(item))
                .collect::<Result<Vec<_>>>()?;
            return Ok(Condition::In {
                child,
                parent: name,
                values,
            });
        }
        ConditionClause::Numerical {
            quantifier, value, ..
        } => (*quantifier, value),
    };

    let value = parent.coerce(literal)?;
    if !matches!(quantifier, Quantifier::Equal | Quantifier::NotEqual)
        && parent.structure() == Structure::Categorical
    {
        return Err(PcsError::UnsupportedCondition {
            parameter: name,
            reason: format!(
                "'{}' needs an order but the parameter is categorical",
                quantifier
            ),
        });
    }

    let equals = || Condition::Equals {
        child: child.clone(),
        parent: name.clone(),
        value: value.clone(),
    };
    let less = || Condition::LessThan {
        child: child.clone(),
        parent: name.clone(),
        value: value.clone(),
    };
    let greater = || Condition::GreaterThan {
        child: child.clone(),
        parent: name.clone(),
        value: value.clone(),
    };

    Ok(match quantifier {
        Quantifier::Equal => equals(),
        Quantifier::NotEqual => Condition::NotEquals {
            child: child.clone(),
            parent: name.clone(),
            value: value.clone(),
        },
        Quantifier::LessThan => less(),
        Quantifier::GreaterThan => greater(),
        Quantifier::LessThanOrEqual => Condition::or(less(), equals()),
        Quantifier::GreaterThanOrEqual => Condition::or(greater(), equals()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::smac::SmacReader;
    use crate::dialect::PcsReader;
    use crate::configspace::space::Configuration;
    use crate::space::Value;

    fn build_from(text: &str) -> Result<BuildReport> {
        build(&SmacReader::new().parse(text)?)
    }

    #[test]
    fn test_concrete_scenario() {
        let report = build_from(
            "x integer [1, 100] [10]\n\
             y categorical {a,b,c} [a]\n\
             y | x > 50",
        )
        .unwrap();
        let cs = report.space;

        assert_eq!(
            cs.get("x"),
            Some(&Hyperparameter::UniformInteger {
                name: "x".to_string(),
                lower: 1,
                upper: 100,
                default: 10,
                log: false,
            })
        );
        assert_eq!(
            cs.get("y"),
            Some(&Hyperparameter::Categorical {
                name: "y".to_string(),
                choices: vec!["a".to_string(), "b".to_string(), "c".to_string()],
                default: "a".to_string(),
            })
        );
        assert_eq!(
            cs.condition_for("y"),
            Some(&Condition::GreaterThan {
                child: "y".to_string(),
                parent: "x".to_string(),
                value: Value::Integer(50),
            })
        );
    }

    #[test]
    fn test_left_to_right_fold() {
        let report = build_from(
            "a integer [0, 5] [1]\n\
             b integer [0, 5] [1]\n\
             c integer [0, 5] [1]\n\
             z integer [0, 5] [1]\n\
             z | a == 1 && b == 1 || c == 1",
        )
        .unwrap();
        let condition = report.space.condition_for("z").unwrap();
        assert_eq!(condition.to_string(), "((a == 1 && b == 1) || c == 1)");

        // With (a && b) || c, c alone activates z.
        let config: Configuration = [("a", 0), ("b", 0), ("c", 1), ("z", 1)]
            .into_iter()
            .map(|(name, value)| (name.to_string(), Value::Integer(value)))
            .collect();
        assert!(report.space.is_active("z", &config));
    }

    #[test]
    fn test_inclusive_comparisons_expand() {
        let report = build_from(
            "x real [0, 1] [0.5]\n\
             z integer [0, 5] [1]\n\
             z | x <= 0.5",
        )
        .unwrap();
        let condition = report.space.condition_for("z").unwrap();
        assert_eq!(condition.to_string(), "(x < 0.5 || x == 0.5)");
        assert!(report
            .space
            .is_active("z", &report.space.default_configuration()));
    }

    #[test]
    fn test_coercion_errors() {
        assert!(matches!(
            build_from("x integer [1, 10] [5]\nz integer [0, 5] [1]\nz | x == abc"),
            Err(PcsError::ValueCoercion { .. })
        ));
        assert!(matches!(
            build_from("x integer [1, 10] [5]\ny categorical {a,b} [a]\n{x=1, y=q}"),
            Err(PcsError::ValueCoercion { .. })
        ));
        assert!(matches!(
            build_from("y categorical {a,b} [a]\nz integer [0, 5] [1]\nz | y > a"),
            Err(PcsError::UnsupportedCondition { .. })
        ));
        assert!(matches!(
            build_from("z integer [0, 5] [1]\nz | nope == 1"),
            Err(PcsError::UnknownParameterReference { .. })
        ));
    }

    #[test]
    fn test_advanced_forbidden_warns() {
        let report = build_from(
            "x integer [1, 10] [5]\n\
             y categorical {a,b} [a]\n\
             {x=1, y=b}\n\
             {x > 3 || y == a}",
        )
        .unwrap();
        assert_eq!(report.space.forbidden_clauses().len(), 1);
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_ordinal_ordering_conditions() {
        let report = build_from(
            "o ordinal {low,mid,high} [low]\n\
             z integer [0, 5] [1]\n\
             z | o >= mid",
        )
        .unwrap();
        let cs = &report.space;
        assert!(!cs.is_active("z", &cs.default_configuration()));

        let mut config = cs.default_configuration();
        config.insert("o", Value::Text("high".to_string()));
        assert!(cs.is_active("z", &config));
    }
}
