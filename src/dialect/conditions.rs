//! Condition expression parsing
//!
//! A condition such as `a == 1 && (b in {x, y} || c > 2)` is scanned character by
//! character while tracking parenthesis depth. Balanced groups at depth zero are parsed
//! recursively; `&&` and `||` at depth zero split the remaining text into terms. The
//! result is a [`ConditionChain`] that records every term with the operator that
//! preceded it, exactly as written.

use crate::error::{PcsError, Result};
use crate::space::condition::{ChainTerm, ConditionChain, ConditionClause, LogicalOp, Quantifier};
use crate::space::parameter::RESERVED_NAME_CHARS;
use nom::{
    branch::alt,
    bytes::complete::{is_not, tag, take_till1, take_while1},
    character::complete::{char, multispace0, multispace1},
    combinator::{all_consuming, map, map_opt, verify},
    sequence::{delimited, preceded},
    IResult, Parser,
};

/// Parse a condition expression into its linear chain
///
/// # Examples
///
/// ```
/// use pcs_rs::dialect::conditions::parse_condition_chain;
///
/// let chain = parse_condition_chain("a == 1 && b > 2 || c in {x, y}").unwrap();
/// assert_eq!(chain.len(), 3);
/// ```
pub fn parse_condition_chain(expression: &str) -> Result<ConditionChain> {
    scan_chain(expression).map_err(|reason| PcsError::MalformedCondition {
        expression: expression.trim().to_string(),
        reason,
    })
}

/// Parse a single comparison such as `x > 5` or `y in {a, b}`
pub fn parse_clause(text: &str) -> Result<ConditionClause> {
    parse_leaf(text).map_err(|reason| PcsError::MalformedCondition {
        expression: text.trim().to_string(),
        reason,
    })
}

fn scan_chain(text: &str) -> std::result::Result<ConditionChain, String> {
    let mut chain: Option<ConditionChain> = None;
    let mut pending: Option<LogicalOp> = None;
    let mut depth = 0usize;
    let mut group_start = 0;
    let mut term_start = 0;
    // The current term was a parenthesized group that has already been appended.
    let mut group_closed = false;

    let mut chars = text.char_indices().peekable();
    while let Some((pos, ch)) = chars.next() {
        match ch {
            '(' => {
                if depth == 0 {
                    if group_closed || !text[term_start..pos].trim().is_empty() {
                        return Err(format!("unexpected '(' at position {}", pos));
                    }
                    group_start = pos;
                }
                depth += 1;
            }
            ')' => {
                if depth == 0 {
                    return Err(format!("unbalanced ')' at position {}", pos));
                }
                depth -= 1;
                if depth == 0 {
                    let inner = scan_chain(&text[group_start + 1..pos])?;
                    append(&mut chain, pending.take(), ChainTerm::Group(inner))?;
                    group_closed = true;
                    term_start = pos + 1;
                }
            }
            '&' | '|' if depth == 0 => {
                let op = match (ch, chars.peek()) {
                    ('&', Some((_, '&'))) => LogicalOp::And,
                    ('|', Some((_, '|'))) => LogicalOp::Or,
                    _ => continue,
                };
                chars.next();

                let term = &text[term_start..pos];
                if group_closed {
                    if !term.trim().is_empty() {
                        return Err(format!("unexpected '{}' after a group", term.trim()));
                    }
                } else {
                    let clause = parse_leaf(term)?;
                    append(&mut chain, pending.take(), ChainTerm::Leaf(clause))?;
                }
                pending = Some(op);
                term_start = pos + 2;
                group_closed = false;
            }
            _ => {}
        }
    }

    if depth != 0 {
        return Err("unbalanced parentheses".to_string());
    }

    let tail = &text[term_start..];
    if group_closed {
        if !tail.trim().is_empty() {
            return Err(format!("unexpected '{}' after a group", tail.trim()));
        }
    } else {
        let clause = parse_leaf(tail)?;
        append(&mut chain, pending.take(), ChainTerm::Leaf(clause))?;
    }

    chain.ok_or_else(|| "empty condition".to_string())
}

fn append(
    chain: &mut Option<ConditionChain>,
    op: Option<LogicalOp>,
    term: ChainTerm,
) -> std::result::Result<(), String> {
    match op {
        None if chain.is_none() => {
            *chain = Some(ConditionChain::new(term));
            Ok(())
        }
        Some(op) => match chain {
            Some(existing) => {
                existing.push(op, term);
                Ok(())
            }
            None => Err(format!("operator '{}' without a preceding term", op)),
        },
        None => Err("missing '&&' or '||' between terms".to_string()),
    }
}

fn parse_leaf(text: &str) -> std::result::Result<ConditionClause, String> {
    if text.trim().is_empty() {
        return Err("empty term".to_string());
    }

    let mut parser = all_consuming(alt((numerical_clause, categorical_clause)));
    match parser.parse(text) {
        Ok((_, ConditionClause::Categorical { items, .. })) if items.is_empty() => {
            Err(format!("'{}' has an empty value set", text.trim()))
        }
        Ok((_, clause)) => Ok(clause),
        Err(_) => Err(format!(
            "'{}' is neither a comparison nor an 'in {{...}}' clause",
            text.trim()
        )),
    }
}

// Parser functions using nom

fn is_name_char(c: char) -> bool {
    !(c.is_whitespace() || RESERVED_NAME_CHARS.contains(&c))
}

/// Parse a parameter name
pub(crate) fn parameter_name(input: &str) -> IResult<&str, &str> {
    take_while1(is_name_char).parse(input)
}

/// Parse a comparison operator, longest match first
fn quantifier(input: &str) -> IResult<&str, Quantifier> {
    map_opt(
        alt((
            tag("=="),
            tag("!="),
            tag("<="),
            tag(">="),
            tag("<"),
            tag(">"),
            tag("="),
        )),
        Quantifier::from_operator,
    )
    .parse(input)
}

/// Parse the literal on the right of a comparison
fn value_token(input: &str) -> IResult<&str, &str> {
    verify(
        take_till1(|c: char| {
            c.is_whitespace() || matches!(c, '"' | '\'' | ',' | '(' | ')' | '{' | '}')
        }),
        |value: &str| !value.starts_with(&['=', '<', '>', '!'][..]),
    )
    .parse(input)
}

/// Parse `parameter quantifier value`
fn numerical_clause(input: &str) -> IResult<&str, ConditionClause> {
    map(
        (
            preceded(multispace0, parameter_name),
            preceded(multispace0, quantifier),
            delimited(multispace0, value_token, multispace0),
        ),
        |(parameter, quantifier, value)| ConditionClause::Numerical {
            parameter: parameter.to_string(),
            quantifier,
            value: value.to_string(),
        },
    )
    .parse(input)
}

/// Parse `parameter in {item, ...}`
fn categorical_clause(input: &str) -> IResult<&str, ConditionClause> {
    map(
        (
            preceded(multispace0, parameter_name),
            delimited(multispace1, tag("in"), multispace0),
            delimited(char('{'), is_not("}"), char('}')),
            multispace0,
        ),
        |(parameter, _, items, _): (&str, &str, &str, &str)| ConditionClause::Categorical {
            parameter: parameter.to_string(),
            items: split_items(items),
        },
    )
    .parse(input)
}

/// Split a comma separated value list, dropping blanks
pub(crate) fn split_items(items: &str) -> Vec<String> {
    items
        .split(',')
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}
