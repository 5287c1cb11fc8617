//! ParamILS writer
//!
//! ParamILS only knows finite value lists, so integer and real ranges are discretized
//! into at most `granularity` points (plus the default, which is always kept). The
//! output has three blocks separated by blank lines: parameters, constraints and
//! forbidden clauses.
//!
//! ```text
//! x {1,6,11,...,100} [10]
//! y {a,b,c} [a]
//!
//! y | x in {53, 58, ..., 100}
//!
//! {x=1,y=b}
//! ```

use crate::config::ExportOptions;
use crate::dialect::{
    drop_condition_values, select_domain_values, Compiled, ConversionWarning, PcsWriter,
};
use crate::error::{PcsError, Result};
use crate::space::parameter::format_real;
use crate::space::{
    ConditionClause, ConditionTree, Domain, ForbiddenExpression, Parameter, ParameterSpace,
    Quantifier, Value,
};

const TARGET: &str = "ParamILS";

/// Writer for the ParamILS dialect
#[derive(Debug, Clone, Default)]
pub struct ParamIlsWriter {
    options: ExportOptions,
}

impl ParamIlsWriter {
    pub fn new(options: ExportOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    fn render_parameter(&self, param: &Parameter) -> Result<String> {
        let values: Vec<String> = discretize(param, &self.options)?
            .iter()
            .map(Value::to_string)
            .collect();
        let default = param.default_value()?;

        let mut line = format!("{} {{{}}} [{}]", param.name(), values.join(","), default);
        if let Some(comment) = param.comment() {
            line.push_str(&format!(" # {}", comment));
        }
        Ok(line)
    }

    fn render_tree(
        &self,
        space: &ParameterSpace,
        tree: &ConditionTree,
        warnings: &mut Vec<ConversionWarning>,
    ) -> Result<String> {
        match tree {
            ConditionTree::Leaf(clause) => self.render_clause(space, clause, warnings),
            ConditionTree::Group { op, left, right } => {
                let mut lhs = self.render_tree(space, left, warnings)?;
                if left.needs_parens_as_left_of(*op) {
                    lhs = format!("({})", lhs);
                }
                let mut rhs = self.render_tree(space, right, warnings)?;
                if matches!(**right, ConditionTree::Group { .. }) {
                    rhs = format!("({})", rhs);
                }
                Ok(format!("{} {} {}", lhs, op, rhs))
            }
        }
    }

    /// Render a clause as `parent in {values}`
    fn render_clause(
        &self,
        space: &ParameterSpace,
        clause: &ConditionClause,
        warnings: &mut Vec<ConversionWarning>,
    ) -> Result<String> {
        let parent = space
            .get(clause.parameter())
            .ok_or_else(|| PcsError::UnknownParameterReference {
                name: clause.parameter().to_string(),
                context: format!("condition '{}'", clause),
            })?;

        let kept = match (parent.domain(), clause) {
            (
                Domain::Integer { .. } | Domain::Real { .. },
                ConditionClause::Numerical {
                    quantifier, value, ..
                },
            ) => {
                let kept = self.grid_values(parent, *quantifier, value)?;
                let dropped = if kept.is_empty() {
                    vec![value.clone()]
                } else {
                    Vec::new()
                };
                drop_condition_values(TARGET, clause, &kept, dropped, warnings)?;
                kept
            }
            (
                Domain::Integer { .. } | Domain::Real { .. },
                ConditionClause::Categorical { items, .. },
            ) => {
                let grid = discretize(parent, &self.options)?;
                let mut kept = Vec::new();
                let mut dropped = Vec::new();
                for item in items {
                    let value = parent.coerce(item)?;
                    if grid.contains(&value) {
                        kept.push(value.to_string());
                    } else {
                        dropped.push(item.clone());
                    }
                }
                drop_condition_values(TARGET, clause, &kept, dropped, warnings)?;
                kept
            }
            _ => select_domain_values(TARGET, parent, clause, warnings)?,
        };

        Ok(format!("{} in {{{}}}", parent.name(), kept.join(", ")))
    }

    /// The discretized points of a numeric parent satisfying `parent quantifier literal`
    fn grid_values(
        &self,
        parent: &Parameter,
        quantifier: Quantifier,
        literal: &str,
    ) -> Result<Vec<String>> {
        let pivot = parent.coerce(literal)?.as_f64().unwrap_or_default();
        Ok(discretize(parent, &self.options)?
            .iter()
            .filter(|point| {
                point
                    .as_f64()
                    .is_some_and(|p| quantifier.holds(p.total_cmp(&pivot)))
            })
            .map(Value::to_string)
            .collect())
    }
}

impl PcsWriter for ParamIlsWriter {
    fn compile(&self, space: &ParameterSpace) -> Result<Compiled> {
        self.options.validate()?;
        space.validate()?;

        let mut warnings = Vec::new();
        let mut lines = Vec::new();

        for param in space.parameters() {
            lines.push(self.render_parameter(param)?);
        }
        lines.push(String::new());

        for constraint in space.constraints() {
            let mut line = format!(
                "{} | {}",
                constraint.parameter,
                self.render_tree(space, &constraint.conditions, &mut warnings)?
            );
            if let Some(comment) = &constraint.comment {
                line.push_str(&format!(" # {}", comment));
            }
            lines.push(line);
        }
        lines.push(String::new());

        for clause in space.forbidden_clauses() {
            match &clause.expression {
                ForbiddenExpression::Simple { .. } => {
                    let mut line = clause.to_string();
                    if let Some(comment) = &clause.comment {
                        line.push_str(&format!(" # {}", comment));
                    }
                    lines.push(line);
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

        tracing::debug!(lines = lines.len(), warnings = warnings.len(), "compiled ParamILS document");
        Ok(Compiled {
            text: lines.join("\n"),
            forbidden: None,
            warnings,
        })
    }
}

/// Discretize a parameter's domain into the value list ParamILS receives
///
/// Numeric ranges get `granularity` evenly spaced points between the bounds, on a
/// geometric grid for log-scaled parameters. Integer points are rounded half to even.
/// The default is always part of the result, which is sorted and free of duplicates,
/// so it holds at most `granularity + 1` values. Categorical and ordinal domains are
/// returned unchanged.
///
/// # Examples
///
/// ```
/// use pcs_rs::config::ExportOptions;
/// use pcs_rs::dialect::paramils::discretize;
/// use pcs_rs::space::{Parameter, Scale, Structure, Value};
///
/// let param = Parameter::new("x", Structure::Integer, &["1", "100"], Scale::Linear, "10", None).unwrap();
/// let values = discretize(&param, &ExportOptions::default()).unwrap();
///
/// assert_eq!(values.first(), Some(&Value::Integer(1)));
/// assert_eq!(values.last(), Some(&Value::Integer(100)));
/// assert!(values.contains(&Value::Integer(10)));
/// ```
pub fn discretize(param: &Parameter, options: &ExportOptions) -> Result<Vec<Value>> {
    let default = param.default_value()?;
    let points = options.granularity.max(1);

    match param.domain() {
        Domain::Integer { lower, upper } => {
            let mut values: Vec<i64> = spaced(
                *lower as f64,
                *upper as f64,
                points,
                param.is_log(),
                options.log_zero_floor,
            )
            .into_iter()
            .map(|p| (p.round_ties_even() as i64).clamp(*lower, *upper))
            .collect();
            if let Value::Integer(default) = default {
                values.push(default);
            }
            values.sort_unstable();
            values.dedup();
            Ok(values.into_iter().map(Value::Integer).collect())
        }
        Domain::Real { lower, upper } => {
            let mut values = spaced(*lower, *upper, points, param.is_log(), options.log_zero_floor);
            if let Value::Real(default) = default {
                values.push(default);
            }
            values.sort_by(|a, b| a.total_cmp(b));
            values.dedup_by(|a, b| format_real(*a) == format_real(*b));
            Ok(values.into_iter().map(Value::Real).collect())
        }
        Domain::Categorical { values } | Domain::Ordinal { values } => {
            Ok(values.iter().cloned().map(Value::Text).collect())
        }
    }
}

/// `points` values from `lower` to `upper` inclusive, linear or geometric
fn spaced(lower: f64, upper: f64, points: usize, log: bool, zero_floor: f64) -> Vec<f64> {
    if points == 1 || lower == upper {
        return vec![lower];
    }

    let last = points - 1;
    let step = |start: f64, end: f64, i: usize| start + (end - start) * i as f64 / last as f64;

    if log {
        let start = if lower <= 0.0 {
            zero_floor.min(upper)
        } else {
            lower
        };
        let (a, b) = (start.ln(), upper.ln());
        (0..points)
            .map(|i| match i {
                0 => start,
                i if i == last => upper,
                i => step(a, b, i).exp(),
            })
            .collect()
    } else {
        (0..points)
            .map(|i| if i == last { upper } else { step(lower, upper, i) })
            .collect()
    }
}
