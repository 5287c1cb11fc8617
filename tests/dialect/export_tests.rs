//! Integration tests for the ParamILS and IRACE writers

use crate::test_helpers::{smac, SOLVER_PCS};
use approx::assert_relative_eq;
use pcs_rs::dialect::irace::IraceWriter;
use pcs_rs::dialect::paramils::{discretize, ParamIlsWriter};
use pcs_rs::dialect::PcsWriter;
use pcs_rs::space::{Scale, Structure, Value};
use pcs_rs::{ConversionWarning, ExportOptions, ParameterSpace, PcsError};

#[test]
fn test_discretization_stays_within_bounds() {
    let options = ExportOptions::default();
    let mut space = ParameterSpace::new();
    space
        .add_param("i", Structure::Integer, &["-50", "50"], Scale::Linear, "7", None)
        .unwrap();
    space
        .add_param("l", Structure::Real, &["0.0001", "100"], Scale::Log, "0.3", None)
        .unwrap();
    space
        .add_param("f", Structure::Real, &["-1", "1"], Scale::Linear, "0", None)
        .unwrap();

    for param in space.parameters() {
        let values = discretize(param, &options).unwrap();
        let (lower, upper) = (
            values[0].as_f64().unwrap(),
            values[values.len() - 1].as_f64().unwrap(),
        );
        assert!(values.len() <= options.granularity + 1, "{}", param.name());
        assert!(values.contains(&param.default_value().unwrap()));
        assert!(values.windows(2).all(|w| w[0].as_f64() < w[1].as_f64()));
        match param.name() {
            "i" => assert_eq!((lower, upper), (-50.0, 50.0)),
            "l" => {
                assert_relative_eq!(lower, 0.0001, max_relative = 1e-9);
                assert_relative_eq!(upper, 100.0, max_relative = 1e-9);
            }
            _ => assert_eq!((lower, upper), (-1.0, 1.0)),
        }
    }
}

#[test]
fn test_small_integer_range_has_no_repeats() {
    let mut space = ParameterSpace::new();
    space
        .add_param("k", Structure::Integer, &["1", "4"], Scale::Linear, "2", None)
        .unwrap();
    let values = discretize(space.get("k").unwrap(), &ExportOptions::default()).unwrap();
    assert_eq!(
        values,
        (1..=4).map(Value::Integer).collect::<Vec<_>>()
    );
}

#[test]
fn test_advanced_forbidden_warns_once_per_writer() {
    let space = smac(SOLVER_PCS);

    let paramils = ParamIlsWriter::default().compile(&space).unwrap();
    let irace = IraceWriter::default().compile(&space).unwrap();

    for warnings in [&paramils.warnings, &irace.warnings] {
        let skipped: Vec<_> = warnings
            .iter()
            .filter(|w| matches!(w, ConversionWarning::AdvancedForbiddenSkipped { .. }))
            .collect();
        assert_eq!(skipped.len(), 1);
    }

    assert!(paramils.text.contains("{x=1,y=b}"));
    assert!(!paramils.text.contains("||"));
    assert_eq!(irace.forbidden.as_deref(), Some("(x = 1) & (y = b)"));
}

#[test]
fn test_compile_is_deterministic() {
    let space = smac(SOLVER_PCS);
    for writer in [
        Box::new(ParamIlsWriter::default()) as Box<dyn PcsWriter>,
        Box::new(IraceWriter::default()),
    ] {
        let first = writer.compile(&space).unwrap();
        let second = writer.compile(&space).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn test_irace_rows() {
    let compiled = IraceWriter::default().compile(&smac(SOLVER_PCS)).unwrap();
    let rows: Vec<&str> = compiled.text.lines().collect();

    assert!(rows[0].starts_with("# name"));
    assert!(rows[1].starts_with("x "));
    assert!(rows[2].contains("| x > 50"));
    assert!(rows[2].ends_with("# the choice"));
    assert!(rows[3].contains("r,log"));
    assert!(rows[3].contains("| y %in% c(\"b\", \"c\") & o %in% c(\"mid\", \"high\")"));
    assert!(rows[4].contains("(\"low\", \"mid\", \"high\")"));
}

#[test]
fn test_paramils_ordinal_condition_uses_sequence_order() {
    let compiled = ParamIlsWriter::default().compile(&smac(SOLVER_PCS)).unwrap();
    assert!(compiled
        .text
        .lines()
        .any(|line| line == "r | y in {b, c} && o in {mid, high}"));
}

#[test]
fn test_out_of_domain_condition_values_warn_in_both_writers() {
    let space = smac(
        "y categorical {a,b,c} [a]\n\
         z real [0, 1] [0.5]\n\
         z | y in {a, d}",
    );

    let paramils = ParamIlsWriter::default().compile(&space).unwrap();
    let irace = IraceWriter::default().compile(&space).unwrap();

    assert!(paramils.text.lines().any(|line| line == "z | y in {a}"));
    assert!(irace.text.lines().nth(2).unwrap().ends_with("| y %in% c(\"a\")"));
    for warnings in [&paramils.warnings, &irace.warnings] {
        assert_eq!(warnings.len(), 1);
        assert!(matches!(
            &warnings[0],
            ConversionWarning::ConditionValuesDropped { parameter, values, .. }
                if parameter == "y" && values == &vec!["d".to_string()]
        ));
    }
}

#[test]
fn test_unsatisfiable_condition_is_never_an_empty_set() {
    let space = smac(
        "x integer [1, 100] [10]\n\
         z real [0, 1] [0.5]\n\
         z | x > 500",
    );
    assert!(matches!(
        ParamIlsWriter::default().compile(&space),
        Err(PcsError::UnsupportedCondition { .. })
    ));

    // IRACE keeps numeric comparisons as R expressions.
    let irace = IraceWriter::default().compile(&space).unwrap();
    assert!(irace.text.contains("| x > 500"));
}
