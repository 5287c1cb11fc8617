//! Integration tests for building a configuration space from a parameter space

use crate::test_helpers::{smac, SOLVER_PCS};
use pcs_rs::configspace::{build, Condition, Hyperparameter};
use pcs_rs::space::Value;
use pcs_rs::{Configuration, ConversionWarning, PcsError};

#[test]
fn test_solver_space() {
    let report = build(&smac(SOLVER_PCS)).unwrap();
    let cs = &report.space;

    assert_eq!(cs.len(), 4);
    assert!(matches!(
        cs.get("r"),
        Some(Hyperparameter::UniformFloat { log: true, .. })
    ));
    assert!(matches!(cs.get("o"), Some(Hyperparameter::Ordinal { .. })));
    assert_eq!(cs.conditions().len(), 2);
    assert_eq!(cs.forbidden_clauses().len(), 1);
    assert_eq!(report.warnings.len(), 1);
    assert!(matches!(
        report.warnings[0],
        ConversionWarning::AdvancedForbiddenSkipped { .. }
    ));
}

#[test]
fn test_default_configuration_respects_conditions() {
    let report = build(&smac(SOLVER_PCS)).unwrap();
    let cs = &report.space;

    // x = 10 leaves y inactive, which in turn leaves r inactive.
    let defaults = cs.default_configuration();
    assert_eq!(defaults.get("x"), Some(&Value::Integer(10)));
    assert!(!defaults.contains("y"));
    assert!(!defaults.contains("r"));
    assert_eq!(defaults.get("o"), Some(&Value::Text("mid".to_string())));
    assert!(cs.check_configuration(&defaults).is_ok());
}

#[test]
fn test_activation_and_forbidden_checks() {
    let cs = build(&smac(SOLVER_PCS)).unwrap().space;

    let mut config = Configuration::new();
    config.insert("x", Value::Integer(80));
    config.insert("y", Value::Text("c".to_string()));
    config.insert("o", Value::Text("high".to_string()));
    assert!(cs.is_active("r", &config));
    assert!(cs.check_configuration(&config).is_err());

    config.insert("r", Value::Real(0.5));
    assert!(cs.check_configuration(&config).is_ok());

    config.insert("o", Value::Text("low".to_string()));
    assert!(!cs.is_active("r", &config));

    let mut forbidden = Configuration::new();
    forbidden.insert("x", Value::Integer(1));
    forbidden.insert("y", Value::Text("b".to_string()));
    assert!(cs.is_forbidden(&forbidden));
}

#[test]
fn test_concrete_condition_shape() {
    let cs = build(&smac(
        "x integer [1, 100] [10]\n\
         y categorical {a,b,c} [a]\n\
         y | x > 50",
    ))
    .unwrap()
    .space;

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
fn test_unknown_reference_fails() {
    let space = smac("z integer [0, 5] [1]\nz | ghost > 1");
    assert!(matches!(
        build(&space),
        Err(PcsError::UnknownParameterReference { .. })
    ));
}
