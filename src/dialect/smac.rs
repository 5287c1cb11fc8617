//! SMAC-style PCS reader
//!
//! Every line is matched against the productions below, in order; the first match wins.
//!
//! ```text
//! x integer [1, 100] [10] log   # parameter
//! y categorical {a, b, c} [a]   # parameter
//! y | x > 50 && x != 75         # constraint
//! {x=1, y=b}                    # simple forbidden clause
//! {x > 3 || y == c}             # advanced forbidden clause
//! # comment
//! ```
//!
//! A `#` anywhere on a line starts its trailing comment. Blank lines are ignored and
//! any other line aborts the parse with [`PcsError::MalformedLine`].

use crate::dialect::conditions::{parameter_name, parse_condition_chain};
use crate::dialect::PcsReader;
use crate::error::{PcsError, Result};
use crate::space::{
    Constraint, ForbiddenClause, ForbiddenExpression, ForbiddenPair, Parameter, ParameterError,
    ParameterSpace, Scale, Structure,
};
use nom::{
    branch::alt,
    bytes::complete::{is_not, tag, take_till1},
    character::complete::{alpha1, char, multispace0, multispace1},
    combinator::{all_consuming, map, opt, rest, verify},
    sequence::{delimited, preceded},
    IResult, Parser,
};

/// Reader for the SMAC-style dialect
#[derive(Debug, Clone, Copy, Default)]
pub struct SmacReader;

impl SmacReader {
    pub fn new() -> Self {
        Self
    }
}

impl PcsReader for SmacReader {
    fn parse(&self, text: &str) -> Result<ParameterSpace> {
        let mut space = ParameterSpace::new();
        for (index, line) in text.lines().enumerate() {
            parse_line(&mut space, index + 1, line)?;
        }
        tracing::debug!(
            declarations = space.len(),
            parameters = space.parameters().count(),
            "parsed SMAC document"
        );
        Ok(space)
    }
}

/// The fields of a parameter declaration line
#[derive(Debug, PartialEq)]
struct RawParameter<'a> {
    name: &'a str,
    structure: &'a str,
    domain: &'a str,
    default: &'a str,
    log: bool,
}

fn parse_line(space: &mut ParameterSpace, line_number: usize, line: &str) -> Result<()> {
    let malformed = |reason: String| PcsError::MalformedLine {
        line_number,
        line: line.to_string(),
        reason,
    };

    if line.trim().is_empty() {
        return Ok(());
    }

    let (body, comment) = split_comment(line);

    if let Ok((_, raw)) = parameter_line(body) {
        let declare = |space: &mut ParameterSpace| -> std::result::Result<(), ParameterError> {
            let structure: Structure = raw.structure.parse()?;
            let domain: Vec<&str> = raw.domain.split(',').collect();
            let scale = if raw.log { Scale::Log } else { Scale::Linear };
            space.add(Parameter::new(
                raw.name, structure, &domain, scale, raw.default, comment,
            )?)
        };
        return declare(space).map_err(|source| PcsError::InvalidDeclaration {
            line_number,
            line: line.to_string(),
            source,
        });
    }

    if let Ok((_, (child, conditions))) = constraint_line(body) {
        let chain = parse_condition_chain(conditions).map_err(|err| match err {
            PcsError::MalformedCondition { reason, .. } => malformed(reason),
            other => other,
        })?;
        space.add_constraint(Constraint::new(child, chain.fold(), comment));
        return Ok(());
    }

    if let Ok((_, clauses)) = forbidden_line(body) {
        let clause = classify_forbidden(clauses, comment).map_err(malformed)?;
        space.add_forbidden(clause);
        return Ok(());
    }

    if body.trim().is_empty() {
        space.add_comment(comment.unwrap_or_default());
        return Ok(());
    }

    Err(malformed(
        "matches no parameter, constraint, forbidden or comment production".to_string(),
    ))
}

/// Split a line at its first `#`
fn split_comment(line: &str) -> (&str, Option<&str>) {
    match line.split_once('#') {
        Some((body, comment)) => (body, Some(comment)),
        None => (line, None),
    }
}

/// Decide whether a forbidden body is a conjunction of `param=value` pairs
fn classify_forbidden(
    body: &str,
    comment: Option<&str>,
) -> std::result::Result<ForbiddenClause, String> {
    if !(body.contains("&&") || body.contains("||")) {
        let pairs: Option<Vec<ForbiddenPair>> = body
            .split(',')
            .map(|segment| forbidden_pair(segment).ok().map(|(_, pair)| pair))
            .collect();
        if let Some(pairs) = pairs {
            return Ok(ForbiddenClause::simple(pairs, comment));
        }
    }

    let clause = ForbiddenClause::advanced(body, comment);
    match &clause.expression {
        ForbiddenExpression::Advanced { segments, .. } if segments.is_empty() => {
            Err("forbidden clause is empty".to_string())
        }
        _ => Ok(clause),
    }
}

// Line productions

fn bracketed(input: &str) -> IResult<&str, &str> {
    delimited(char('['), is_not("]"), char(']')).parse(input)
}

fn braced(input: &str) -> IResult<&str, &str> {
    delimited(char('{'), is_not("}"), char('}')).parse(input)
}

/// `name structure [lower, upper]|{v1, ...} [default] log?`
fn parameter_line(input: &str) -> IResult<&str, RawParameter<'_>> {
    map(
        all_consuming((
            preceded(multispace0, parameter_name),
            preceded(multispace1, alpha1),
            preceded(multispace1, alt((bracketed, braced))),
            preceded(multispace0, bracketed),
            opt(preceded(multispace0, tag("log"))),
            multispace0,
        )),
        |(name, structure, domain, default, log, _)| RawParameter {
            name,
            structure,
            domain,
            default,
            log: log.is_some(),
        },
    )
    .parse(input)
}

/// `child | conditions`
fn constraint_line(input: &str) -> IResult<&str, (&str, &str)> {
    map(
        (
            preceded(multispace0, parameter_name),
            preceded(multispace0, char('|')),
            rest,
        ),
        |(child, _, conditions)| (child, conditions),
    )
    .parse(input)
}

/// `{clauses}`
fn forbidden_line(input: &str) -> IResult<&str, &str> {
    all_consuming(delimited(multispace0, braced, multispace0)).parse(input)
}

/// `param=value`
fn forbidden_pair(input: &str) -> IResult<&str, ForbiddenPair> {
    map(
        all_consuming((
            preceded(multispace0, parameter_name),
            delimited(multispace0, char('='), multispace0),
            verify(
                take_till1(|c: char| c.is_whitespace() || matches!(c, '"' | '\'' | ',')),
                |value: &str| !value.contains(&['=', '<', '>', '!'][..]),
            ),
            multispace0,
        )),
        |(parameter, _, value, _)| ForbiddenPair::new(parameter, value),
    )
    .parse(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::space::{
        ConditionClause, ConditionTree, Domain, LogicalOp, Quantifier,
    };

    fn parse(text: &str) -> Result<ParameterSpace> {
        SmacReader::new().parse(text)
    }

    #[test]
    fn test_parameter_lines() {
        let space = parse(
            "x integer [1, 100] [10]\n\
             y categorical {a,b,c} [a]\n\
             alpha real [0.001, 1.0] [0.1] log # step size\n\
             level ordinal {low, mid, high} [mid]",
        )
        .unwrap();

        let x = space.get("x").unwrap();
        assert_eq!(x.domain(), &Domain::Integer { lower: 1, upper: 100 });
        assert_eq!(x.default(), "10");
        assert_eq!(x.scale(), Scale::Linear);

        let y = space.get("y").unwrap();
        assert_eq!(y.domain().values().unwrap(), &["a", "b", "c"]);

        let alpha = space.get("alpha").unwrap();
        assert!(alpha.is_log());
        assert_eq!(alpha.comment(), Some("step size"));

        assert_eq!(space.get("level").unwrap().structure(), Structure::Ordinal);
    }

    #[test]
    fn test_constraint_line() {
        let space = parse(
            "x integer [1, 100] [10]\n\
             y categorical {a,b,c} [a]\n\
             y | x > 50 # only for large x",
        )
        .unwrap();

        let constraint = space.constraints().next().unwrap();
        assert_eq!(constraint.parameter, "y");
        assert_eq!(constraint.comment.as_deref(), Some("only for large x"));
        assert_eq!(
            constraint.conditions,
            ConditionTree::Leaf(ConditionClause::Numerical {
                parameter: "x".to_string(),
                quantifier: Quantifier::GreaterThan,
                value: "50".to_string(),
            })
        );
    }

    #[test]
    fn test_constraint_fold_and_single_equals() {
        let space = parse("z | a = 1 && b == 2 || c in {x, y}").unwrap();
        let constraint = space.constraints().next().unwrap();
        match &constraint.conditions {
            ConditionTree::Group { op, left, .. } => {
                assert_eq!(*op, LogicalOp::Or);
                assert!(matches!(**left, ConditionTree::Group { op: LogicalOp::And, .. }));
            }
            _ => panic!("Expected a group"),
        }
        assert_eq!(
            constraint.conditions.to_string(),
            "a == 1 && b == 2 || c in {x, y}"
        );
    }

    #[test]
    fn test_forbidden_classification() {
        let space = parse(
            "{x=1, y=b}\n\
             {x=1}\n\
             {x > 3 || y == c}\n\
             {x > 3}",
        )
        .unwrap();

        let clauses: Vec<&ForbiddenClause> = space.forbidden_clauses().collect();
        assert_eq!(clauses.len(), 4);
        assert_eq!(
            clauses[0].pairs().unwrap(),
            &[ForbiddenPair::new("x", "1"), ForbiddenPair::new("y", "b")]
        );
        assert!(clauses[1].is_simple());
        match &clauses[2].expression {
            ForbiddenExpression::Advanced { segments, .. } => {
                assert_eq!(segments, &vec!["x > 3", "y == c"]);
            }
            _ => panic!("Expected advanced clause"),
        }
        assert!(!clauses[3].is_simple());
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let space = parse("# header\n\n   \nx integer [1, 2] [1]\n  # indented").unwrap();
        let comments: Vec<&str> = space.comments().map(|c| c.text.as_str()).collect();
        assert_eq!(comments, vec!["header", "indented"]);
        assert_eq!(space.len(), 3);
    }

    #[test]
    fn test_malformed_line_reports_line() {
        match parse("x integer [1, 100] [10]\nthis is not pcs\n") {
            Err(PcsError::MalformedLine {
                line_number, line, ..
            }) => {
                assert_eq!(line_number, 2);
                assert_eq!(line, "this is not pcs");
            }
            other => panic!("Expected MalformedLine, got {:?}", other),
        }

        assert!(matches!(
            parse("y | x >> 5"),
            Err(PcsError::MalformedLine { line_number: 1, .. })
        ));
        assert!(matches!(
            parse("y | (x > 5"),
            Err(PcsError::MalformedLine { .. })
        ));
        assert!(matches!(parse("{ }"), Err(PcsError::MalformedLine { .. })));
    }

    #[test]
    fn test_declaration_errors() {
        assert!(matches!(
            parse("x boolean [0, 1] [0]"),
            Err(PcsError::InvalidDeclaration {
                line_number: 1,
                source: ParameterError::UnsupportedStructure { .. },
                ..
            })
        ));
        assert!(matches!(
            parse("x integer [1, 100, 1000] [10]"),
            Err(PcsError::InvalidDeclaration {
                source: ParameterError::InvalidDomain { .. },
                ..
            })
        ));

        match parse("# header
x integer [1, 100] [10]

x integer [1, 5] [1]") {
            Err(PcsError::InvalidDeclaration {
                line_number,
                line,
                source: ParameterError::DuplicateName { .. },
            }) => {
                assert_eq!(line_number, 4);
                assert_eq!(line, "x integer [1, 5] [1]");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parsing_does_not_check_references() {
        let space = parse("y | missing == 1").unwrap();
        assert!(matches!(
            space.validate(),
            Err(PcsError::UnknownParameterReference { .. })
        ));
    }
}
