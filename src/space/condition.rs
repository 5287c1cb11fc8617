//! Conditional activation rules between parameters
//!
//! A [`Constraint`] makes a child parameter active only when a boolean expression over
//! its parents holds. The expression is first read as a linear [`ConditionChain`] of
//! `(operator, term)` segments exactly as written, then folded strictly left to right
//! into a [`ConditionTree`]. No operator precedence is applied: `A && B || C` always
//! means `(A && B) || C`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Comparison of a numerical condition clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quantifier {
    /// Equal to (==)
    #[serde(rename = "==")]
    Equal,

    /// Not equal to (!=)
    #[serde(rename = "!=")]
    NotEqual,

    /// Less than (<)
    #[serde(rename = "<")]
    LessThan,

    /// Less than or equal to (<=)
    #[serde(rename = "<=")]
    LessThanOrEqual,

    /// Greater than (>)
    #[serde(rename = ">")]
    GreaterThan,

    /// Greater than or equal to (>=)
    #[serde(rename = ">=")]
    GreaterThanOrEqual,
}

impl Quantifier {
    /// Convert the quantifier to its operator token
    pub fn as_operator(&self) -> &'static str {
        match self {
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::LessThan => "<",
            Self::LessThanOrEqual => "<=",
            Self::GreaterThan => ">",
            Self::GreaterThanOrEqual => ">=",
        }
    }

    /// Look up a quantifier by operator token; a single `=` reads as `==`
    pub fn from_operator(op: &str) -> Option<Self> {
        match op {
            "==" | "=" => Some(Self::Equal),
            "!=" => Some(Self::NotEqual),
            "<" => Some(Self::LessThan),
            "<=" => Some(Self::LessThanOrEqual),
            ">" => Some(Self::GreaterThan),
            ">=" => Some(Self::GreaterThanOrEqual),
            _ => None,
        }
    }

    /// Check the quantifier against the ordering of a value relative to the literal
    pub fn holds(&self, ordering: std::cmp::Ordering) -> bool {
        use std::cmp::Ordering::*;
        match self {
            Self::Equal => ordering == Equal,
            Self::NotEqual => ordering != Equal,
            Self::LessThan => ordering == Less,
            Self::LessThanOrEqual => ordering != Greater,
            Self::GreaterThan => ordering == Greater,
            Self::GreaterThanOrEqual => ordering != Less,
        }
    }
}

impl fmt::Display for Quantifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_operator())
    }
}

/// Boolean connective between condition terms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogicalOp {
    #[serde(rename = "&&")]
    And,
    #[serde(rename = "||")]
    Or,
}

impl LogicalOp {
    pub fn as_operator(&self) -> &'static str {
        match self {
            Self::And => "&&",
            Self::Or => "||",
        }
    }
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_operator())
    }
}

/// A single comparison against a parent parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ConditionClause {
    /// `parent quantifier value`
    Numerical {
        parameter: String,
        quantifier: Quantifier,
        value: String,
    },

    /// `parent in {item, ...}`
    Categorical { parameter: String, items: Vec<String> },
}

impl ConditionClause {
    /// Name of the parent parameter the clause tests
    pub fn parameter(&self) -> &str {
        match self {
            Self::Numerical { parameter, .. } | Self::Categorical { parameter, .. } => parameter,
        }
    }
}

impl fmt::Display for ConditionClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numerical {
                parameter,
                quantifier,
                value,
            } => write!(f, "{} {} {}", parameter, quantifier, value),
            Self::Categorical { parameter, items } => {
                write!(f, "{} in {{{}}}", parameter, items.join(", "))
            }
        }
    }
}

/// Recursive boolean expression over condition clauses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "lowercase")]
pub enum ConditionTree {
    Leaf(ConditionClause),
    Group {
        op: LogicalOp,
        left: Box<ConditionTree>,
        right: Box<ConditionTree>,
    },
}

impl ConditionTree {
    /// Combine two trees under a connective
    pub fn group(op: LogicalOp, left: ConditionTree, right: ConditionTree) -> Self {
        Self::Group {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// All clauses of the tree, left to right
    pub fn clauses(&self) -> Vec<&ConditionClause> {
        let mut out = Vec::new();
        self.collect_clauses(&mut out);
        out
    }

    fn collect_clauses<'a>(&'a self, out: &mut Vec<&'a ConditionClause>) {
        match self {
            Self::Leaf(clause) => out.push(clause),
            Self::Group { left, right, .. } => {
                left.collect_clauses(out);
                right.collect_clauses(out);
            }
        }
    }

    /// Names of all parent parameters, sorted and deduplicated
    pub fn parameters(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .clauses()
            .iter()
            .map(|c| c.parameter().to_string())
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

impl fmt::Display for ConditionTree {
    /// Renders with the parentheses needed so that both a left-to-right reader and a
    /// reader giving `&&` precedence over `||` see the same grouping.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(clause) => write!(f, "{}", clause),
            Self::Group { op, left, right } => {
                if left.needs_parens_as_left_of(*op) {
                    write!(f, "({})", left)?;
                } else {
                    write!(f, "{}", left)?;
                }
                write!(f, " {} ", op)?;
                if matches!(**right, Self::Group { .. }) {
                    write!(f, "({})", right)
                } else {
                    write!(f, "{}", right)
                }
            }
        }
    }
}

impl ConditionTree {
    /// An `||` group feeding an `&&` must keep its parentheses.
    pub(crate) fn needs_parens_as_left_of(&self, parent: LogicalOp) -> bool {
        matches!(
            (self, parent),
            (
                Self::Group {
                    op: LogicalOp::Or,
                    ..
                },
                LogicalOp::And
            )
        )
    }
}

/// One term of a condition chain
#[derive(Debug, Clone, PartialEq)]
pub enum ChainTerm {
    Leaf(ConditionClause),
    Group(ConditionChain),
}

/// The linear `(operator, term)` sequence of a condition as written
///
/// The first segment has no operator; every later segment records the operator that
/// preceded it.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionChain {
    first: Box<ChainTerm>,
    rest: Vec<(LogicalOp, ChainTerm)>,
}

impl ConditionChain {
    /// Start a chain with its first term
    pub fn new(first: ChainTerm) -> Self {
        Self {
            first: Box::new(first),
            rest: Vec::new(),
        }
    }

    /// Append a term preceded by an operator
    pub fn push(&mut self, op: LogicalOp, term: ChainTerm) {
        self.rest.push((op, term));
    }

    /// Number of segments in the chain
    pub fn len(&self) -> usize {
        1 + self.rest.len()
    }

    /// Chains always hold at least one term
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The segments as `(preceding operator, term)` pairs
    pub fn segments(&self) -> Vec<(Option<LogicalOp>, &ChainTerm)> {
        std::iter::once((None, self.first.as_ref()))
            .chain(self.rest.iter().map(|(op, term)| (Some(*op), term)))
            .collect()
    }

    /// Fold the chain left to right into a tree
    ///
    /// The first term seeds the accumulator; each later term is combined with the
    /// accumulator using its own operator, in encounter order.
    pub fn fold(self) -> ConditionTree {
        let seed = Self::term_tree(*self.first);
        self.rest.into_iter().fold(seed, |acc, (op, term)| {
            ConditionTree::group(op, acc, Self::term_tree(term))
        })
    }

    fn term_tree(term: ChainTerm) -> ConditionTree {
        match term {
            ChainTerm::Leaf(clause) => ConditionTree::Leaf(clause),
            ChainTerm::Group(chain) => chain.fold(),
        }
    }
}

/// A conditional activation rule for a child parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    /// The dependent (child) parameter
    pub parameter: String,

    /// When the child is active
    pub conditions: ConditionTree,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Constraint {
    pub fn new(parameter: &str, conditions: ConditionTree, comment: Option<&str>) -> Self {
        Self {
            parameter: parameter.trim().to_string(),
            conditions,
            comment: comment
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {}", self.parameter, self.conditions)
    }
}
