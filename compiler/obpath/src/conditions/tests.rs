use crate::context::{Context, ResolvedArg};
use crate::value::Value;

/// Run the named built-in with `values` as its candidate set.
fn run(name: &str, values: &[Value], literals: &[ResolvedArg<'_>]) -> bool {
    let context = Context::new();
    let Some(condition) = context.condition(name) else {
        panic!("missing built-in {name}");
    };
    let mut args = vec![ResolvedArg::Candidates(values.iter().collect())];
    args.extend(literals.iter().cloned());
    condition.test(&args)
}

#[test]
fn test_eq() {
    let prices = [Value::Float(8.95), Value::Float(8.99)];
    assert!(run("eq", &prices, &[ResolvedArg::Float(8.99)]));
    assert!(!run("eq", &prices, &[ResolvedArg::Float(9.0)]));

    let authors = [Value::string("Louis L'Amour")];
    assert!(run("eq", &authors, &[ResolvedArg::Str("Louis L'Amour")]));
    assert!(!run("eq", &authors, &[ResolvedArg::Str("louis l'amour")]));
}

#[test]
fn test_eq_numbers_across_kinds() {
    assert!(run("eq", &[Value::Int(8)], &[ResolvedArg::Float(8.0)]));
    assert!(run("eq", &[Value::Float(8.0)], &[ResolvedArg::Int(8)]));
    assert!(run("eq", &[Value::Int(8)], &[ResolvedArg::Int(8)]));
    assert!(!run("eq", &[Value::string("8")], &[ResolvedArg::Int(8)]));
    assert!(!run("eq", &[Value::Bool(true)], &[ResolvedArg::Int(1)]));
}

#[test]
fn test_contains() {
    let titles = [Value::string("The Lord of the Rings"), Value::string("Moby Dick")];
    assert!(run("contains", &titles, &[ResolvedArg::Str("R")]));
    assert!(!run("contains", &titles, &[ResolvedArg::Str("r of x")]));
    assert!(!run("contains", &[Value::string("moby dick")], &[ResolvedArg::Str("D")]));
}

#[test]
fn test_cicontains() {
    let titles = [Value::string("Moby Dick")];
    assert!(run("cicontains", &titles, &[ResolvedArg::Str("dick")]));
    assert!(run("cicontains", &titles, &[ResolvedArg::Str("MOBY")]));
    assert!(!run("cicontains", &titles, &[ResolvedArg::Str("whale")]));
}

#[test]
fn test_contains_uses_string_form() {
    assert!(run("contains", &[Value::Int(1984)], &[ResolvedArg::Str("98")]));
    assert!(!run("contains", &[Value::list(["abc"])], &[ResolvedArg::Str("abc")]));
}

#[test]
fn test_numeric_comparisons() {
    let prices = [Value::string("free"), Value::Float(5.52), Value::Int(12)];
    assert!(run("gt", &prices, &[ResolvedArg::Int(9)]));
    assert!(!run("gt", &prices, &[ResolvedArg::Int(12)]));
    assert!(run("gte", &prices, &[ResolvedArg::Int(12)]));
    assert!(run("lt", &prices, &[ResolvedArg::Float(5.53)]));
    assert!(!run("lt", &prices, &[ResolvedArg::Float(5.52)]));
    assert!(run("lte", &prices, &[ResolvedArg::Float(5.52)]));
}

#[test]
fn test_numeric_skips_non_numbers() {
    let values = [Value::Null, Value::string("100"), Value::Bool(true)];
    assert!(!run("gt", &values, &[ResolvedArg::Int(0)]));
    assert!(!run("lt", &values, &[ResolvedArg::Int(1000)]));
}

#[test]
fn test_between_is_strict() {
    let literals = [ResolvedArg::Int(8), ResolvedArg::Int(10)];
    assert!(run("between", &[Value::Float(8.99)], &literals));
    assert!(!run("between", &[Value::Int(8)], &literals));
    assert!(!run("between", &[Value::Int(10)], &literals));
    assert!(!run("between", &[Value::Float(12.99)], &literals));
    assert!(run("between", &[Value::Int(8), Value::Int(9)], &literals));
}

#[test]
fn test_has() {
    assert!(run("has", &[Value::string("0-553-21311-3")], &[]));
    assert!(run("has", &[Value::Null], &[]));
    assert!(!run("has", &[], &[]));
}

#[test]
fn test_empty() {
    assert!(run("empty", &[], &[]));
    assert!(run("empty", &[Value::string(""), Value::Int(0)], &[]));
    assert!(!run("empty", &[Value::string(""), Value::string("x")], &[]));
    assert!(!run("empty", &[Value::Float(0.1)], &[]));
}
