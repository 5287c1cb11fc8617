//! Integration tests for the SMAC-style reader

use crate::test_helpers::{smac, SOLVER_PCS};
use pcs_rs::dialect::smac::SmacReader;
use pcs_rs::dialect::PcsReader;
use pcs_rs::space::{
    ConditionClause, ConditionTree, Declaration, ForbiddenExpression, LogicalOp, Quantifier,
    Structure,
};
use pcs_rs::PcsError;

#[test]
fn test_declaration_order_is_kept() {
    let space = smac(SOLVER_PCS);

    let kinds: Vec<&str> = space
        .declarations()
        .iter()
        .map(|d| match d {
            Declaration::Parameter(_) => "parameter",
            Declaration::Constraint(_) => "constraint",
            Declaration::Forbidden(_) => "forbidden",
            Declaration::Comment(_) => "comment",
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            "comment",
            "parameter",
            "parameter",
            "parameter",
            "parameter",
            "constraint",
            "constraint",
            "forbidden",
            "forbidden",
        ]
    );
    assert_eq!(space.names(), vec!["x", "y", "r", "o"]);
    assert_eq!(space.get("o").unwrap().structure(), Structure::Ordinal);
    assert!(space.validate().is_ok());
}

#[test]
fn test_mixed_chain_folds_left_to_right() {
    let space = smac(
        "a integer [0, 5] [1]\n\
         b integer [0, 5] [1]\n\
         c integer [0, 5] [1]\n\
         z integer [0, 5] [1]\n\
         z | a == 1 && b == 1 || c == 1",
    );
    let constraint = space.constraints_for("z").next().unwrap();

    // ((a == 1) && (b == 1)) || (c == 1)
    match &constraint.conditions {
        ConditionTree::Group { op, left, right } => {
            assert_eq!(*op, LogicalOp::Or);
            assert!(matches!(
                left.as_ref(),
                ConditionTree::Group {
                    op: LogicalOp::And,
                    ..
                }
            ));
            assert!(matches!(
                right.as_ref(),
                ConditionTree::Leaf(ConditionClause::Numerical {
                    quantifier: Quantifier::Equal,
                    ..
                })
            ));
        }
        other => panic!("expected a group, got {:?}", other),
    }
}

#[test]
fn test_forbidden_classification() {
    let space = smac(SOLVER_PCS);
    let clauses: Vec<_> = space.forbidden_clauses().collect();
    assert_eq!(clauses.len(), 2);
    assert!(clauses[0].is_simple());
    assert_eq!(clauses[0].pairs().unwrap().len(), 2);
    assert!(matches!(
        clauses[1].expression,
        ForbiddenExpression::Advanced { .. }
    ));
}

#[test]
fn test_unparseable_line_reports_its_number() {
    let err = SmacReader::new()
        .parse("x integer [1, 10] [5]\n\nthis is not pcs")
        .unwrap_err();
    match err {
        PcsError::MalformedLine { line_number, .. } => assert_eq!(line_number, 3),
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_declaration_errors_carry_the_line() {
    let reader = SmacReader::new();
    assert!(matches!(
        reader.parse("x integer [10, 1] [5]"),
        Err(PcsError::InvalidDeclaration { line_number: 1, .. })
    ));
    assert!(matches!(
        reader.parse("x integer [1, 10] [5]\nx real [0, 1] [0.5]"),
        Err(PcsError::InvalidDeclaration { line_number: 2, .. })
    ));

    let err = reader.parse("\n\nx vector [1, 10] [5]").unwrap_err();
    assert!(matches!(err, PcsError::InvalidDeclaration { line_number: 3, .. }));
    assert!(err.to_string().contains("x vector [1, 10] [5]"));
}
