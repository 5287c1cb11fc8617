//! IRACE writer
//!
//! IRACE reads a whitespace-aligned table with one parameter per row and the
//! activation condition of the parameter in its last column, written in R syntax.
//! Forbidden combinations go to a separate document.
//!
//! ```text
//! # name  switch  type  values           [conditions (using R syntax)]
//! x       "--x "  i     (1, 100)
//! y       "--y "  c     ("a", "b", "c")  | x > 50
//! ```

use crate::config::ExportOptions;
use crate::dialect::{select_domain_values, Compiled, ConversionWarning, PcsWriter};
use crate::error::{PcsError, Result};
use crate::space::parameter::format_real;
use crate::space::{
    ConditionClause, ConditionTree, Domain, ForbiddenExpression, LogicalOp, Parameter,
    ParameterSpace, Quantifier, Structure,
};

const TARGET: &str = "IRACE";

const HEADER: [&str; 5] = [
    "# name",
    "switch",
    "type",
    "values",
    "[conditions (using R syntax)]",
];

/// Writer for the IRACE dialect
#[derive(Debug, Clone, Default)]
pub struct IraceWriter {
    options: ExportOptions,
}

impl IraceWriter {
    pub fn new(options: ExportOptions) -> Self {
        Self { options }
    }

    fn row(
        &self,
        space: &ParameterSpace,
        param: &Parameter,
        warnings: &mut Vec<ConversionWarning>,
    ) -> Result<Vec<String>> {
        let mut type_code = match param.structure() {
            Structure::Integer => "i",
            Structure::Real => "r",
            Structure::Categorical => "c",
            Structure::Ordinal => "o",
        }
        .to_string();
        if param.is_log() {
            type_code.push_str(",log");
        }

        let values = match param.domain() {
            Domain::Integer { .. } | Domain::Real { .. } => param.domain().tokens(),
            Domain::Categorical { values } | Domain::Ordinal { values } => {
                values.iter().map(|v| quote(v)).collect::<Vec<_>>()
            }
        };

        let constraints: Vec<&ConditionTree> = space
            .constraints_for(param.name())
            .map(|c| &c.conditions)
            .collect();
        let condition = match constraints.as_slice() {
            [] => String::new(),
            [single] => format!("| {}", render_tree(space, single, warnings)?),
            many => {
                let mut parts = Vec::with_capacity(many.len());
                for tree in many {
                    let rendered = render_tree(space, tree, warnings)?;
                    parts.push(match tree {
                        ConditionTree::Group { .. } => format!("({})", rendered),
                        ConditionTree::Leaf(_) => rendered,
                    });
                }
                format!("| {}", parts.join(" & "))
            }
        };

        let mut row = vec![
            param.name().to_string(),
            format!("\"--{} \"", param.name()),
            type_code,
            format!("({})", values.join(", ")),
            condition,
        ];
        if let Some(comment) = param.comment() {
            row.push(format!("# {}", comment));
        }
        Ok(row)
    }

    /// The `digits` IRACE needs for the real bounds, if more than the configured default
    fn required_digits(&self, space: &ParameterSpace) -> Option<usize> {
        space
            .parameters()
            .filter_map(|p| match p.domain() {
                Domain::Real { lower, upper } => {
                    Some(fraction_digits(*lower).max(fraction_digits(*upper)))
                }
                _ => None,
            })
            .max()
            .filter(|digits| *digits > self.options.irace_digits)
    }
}

impl PcsWriter for IraceWriter {
    fn compile(&self, space: &ParameterSpace) -> Result<Compiled> {
        self.options.validate()?;
        space.validate()?;

        let mut warnings = Vec::new();
        let mut rows = vec![HEADER.iter().map(|h| h.to_string()).collect::<Vec<_>>()];
        for param in space.parameters() {
            rows.push(self.row(space, param, &mut warnings)?);
        }
        let mut text = tabulate(&rows);
        if let Some(digits) = self.required_digits(space) {
            text.push_str(&format!("\n[global]\ndigits={}", digits));
        }

        let mut forbidden = Vec::new();
        for clause in space.forbidden_clauses() {
            match &clause.expression {
                ForbiddenExpression::Simple { pairs } => {
                    let terms: Vec<String> = pairs
                        .iter()
                        .map(|pair| format!("({} = {})", pair.parameter, pair.value))
                        .collect();
                    forbidden.push(terms.join(" & "));
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
            rows = rows.len() - 1,
            forbidden = forbidden.len(),
            "compiled IRACE document"
        );
        Ok(Compiled {
            text,
            forbidden: Some(forbidden.join("\n")),
            warnings,
        })
    }
}

fn render_tree(
    space: &ParameterSpace,
    tree: &ConditionTree,
    warnings: &mut Vec<ConversionWarning>,
) -> Result<String> {
    match tree {
        ConditionTree::Leaf(clause) => render_clause(space, clause, warnings),
        ConditionTree::Group { op, left, right } => {
            let mut lhs = render_tree(space, left, warnings)?;
            if left.needs_parens_as_left_of(*op) {
                lhs = format!("({})", lhs);
            }
            let mut rhs = render_tree(space, right, warnings)?;
            if matches!(**right, ConditionTree::Group { .. }) {
                rhs = format!("({})", rhs);
            }
            let connective = match op {
                LogicalOp::And => "&",
                LogicalOp::Or => "|",
            };
            Ok(format!("{} {} {}", lhs, connective, rhs))
        }
    }
}

/// Categorical and ordinal parents always render as `%in%` over the matching values;
/// numeric parents keep R comparisons
fn render_clause(
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

    let vector = match parent.structure() {
        Structure::Integer => "i",
        Structure::Real => "f",
        Structure::Categorical | Structure::Ordinal => {
            let values: Vec<String> = select_domain_values(TARGET, parent, clause, warnings)?
                .iter()
                .map(|v| quote(v))
                .collect();
            return Ok(format!(
                "{} %in% c({})",
                clause.parameter(),
                values.join(", ")
            ));
        }
    };

    match clause {
        ConditionClause::Categorical { parameter, items } => {
            let items: Vec<String> = items
                .iter()
                .map(|item| r_literal(parent, item))
                .collect::<Result<_>>()?;
            Ok(format!("{} %in% {}({})", parameter, vector, items.join(", ")))
        }
        ConditionClause::Numerical {
            parameter,
            quantifier: Quantifier::Equal,
            value,
        } => Ok(format!(
            "{} %in% {}({})",
            parameter,
            vector,
            r_literal(parent, value)?
        )),
        ConditionClause::Numerical {
            parameter,
            quantifier,
            value,
        } => Ok(format!(
            "{} {} {}",
            parameter,
            quantifier,
            r_literal(parent, value)?
        )),
    }
}

/// A numeric literal as R sees it
fn r_literal(parent: &Parameter, literal: &str) -> Result<String> {
    Ok(parent.coerce(literal)?.to_string())
}

fn quote(value: &str) -> String {
    format!("\"{}\"", value)
}

fn fraction_digits(value: f64) -> usize {
    format_real(value)
        .split_once('.')
        .map_or(0, |(_, fraction)| fraction.len())
}

/// Lay rows out in left-aligned columns separated by two spaces
fn tabulate(rows: &[Vec<String>]) -> String {
    let columns = rows.iter().map(Vec::len).max().unwrap_or_default();
    let widths: Vec<usize> = (0..columns)
        .map(|col| {
            rows.iter()
                .filter_map(|row| row.get(col))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or_default()
        })
        .collect();

    rows.iter()
        .map(|row| {
            let line: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
                .collect();
            line.join("  ").trim_end().to_string()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
