//! Built-in conditions.
//!
//! Every built-in takes a path-reference first and tests the resulting
//! candidate set against the remaining literal arguments. Candidates of
//! the wrong kind are skipped, never reported.

use crate::context::{ArgKind, Context, ResolvedArg};
use crate::value::Value;

/// Register all built-in conditions on `context`.
pub(crate) fn register_builtins(context: &mut Context) {
    // Equality and text search
    context.register("eq", [ArgKind::PATH, ArgKind::LITERAL], test_equals);
    context.register("contains", [ArgKind::PATH, ArgKind::STRING], test_contains);
    context.register("cicontains", [ArgKind::PATH, ArgKind::STRING], test_ci_contains);

    // Numeric comparison
    context.register("gt", [ArgKind::PATH, ArgKind::NUMBER], |args| {
        compare(args, |candidate, limit| candidate > limit)
    });
    context.register("lt", [ArgKind::PATH, ArgKind::NUMBER], |args| {
        compare(args, |candidate, limit| candidate < limit)
    });
    context.register("gte", [ArgKind::PATH, ArgKind::NUMBER], |args| {
        compare(args, |candidate, limit| candidate >= limit)
    });
    context.register("lte", [ArgKind::PATH, ArgKind::NUMBER], |args| {
        compare(args, |candidate, limit| candidate <= limit)
    });
    context.register(
        "between",
        [ArgKind::PATH, ArgKind::NUMBER, ArgKind::NUMBER],
        test_between,
    );

    // Presence
    context.register("has", [ArgKind::PATH], |args| {
        !candidates(args).is_empty()
    });
    context.register("empty", [ArgKind::PATH], test_empty);
}

fn candidates<'s, 'a>(args: &'s [ResolvedArg<'a>]) -> &'s [&'a Value] {
    match args.first() {
        Some(arg) => arg.candidates(),
        None => &[],
    }
}

fn test_equals(args: &[ResolvedArg<'_>]) -> bool {
    let Some(literal) = args.get(1) else {
        return false;
    };
    candidates(args)
        .iter()
        .any(|candidate| equals_literal(candidate, literal))
}

/// Strings compare byte-wise, numbers compare numerically across
/// integer and float.
fn equals_literal(candidate: &Value, literal: &ResolvedArg<'_>) -> bool {
    match (candidate, literal) {
        (Value::Str(s), ResolvedArg::Str(lit)) => s.as_str() == *lit,
        (Value::Int(n), ResolvedArg::Int(lit)) => n == lit,
        (Value::Int(_) | Value::Float(_), ResolvedArg::Int(_) | ResolvedArg::Float(_)) => {
            candidate.as_f64() == literal.as_f64()
        }
        _ => false,
    }
}

fn test_contains(args: &[ResolvedArg<'_>]) -> bool {
    let Some(needle) = args.get(1).and_then(ResolvedArg::as_str) else {
        return false;
    };
    candidates(args).iter().any(|candidate| {
        candidate
            .string_form()
            .is_some_and(|text| text.contains(needle))
    })
}

fn test_ci_contains(args: &[ResolvedArg<'_>]) -> bool {
    let Some(needle) = args.get(1).and_then(ResolvedArg::as_str) else {
        return false;
    };
    let needle = needle.to_lowercase();
    candidates(args).iter().any(|candidate| {
        candidate
            .string_form()
            .is_some_and(|text| text.to_lowercase().contains(&needle))
    })
}

/// True if any numeric candidate satisfies `op(candidate, limit)`.
fn compare(args: &[ResolvedArg<'_>], op: impl Fn(f64, f64) -> bool) -> bool {
    let Some(limit) = args.get(1).and_then(ResolvedArg::as_f64) else {
        return false;
    };
    candidates(args)
        .iter()
        .filter_map(|candidate| candidate.as_f64())
        .any(|candidate| op(candidate, limit))
}

/// Strict on both bounds.
fn test_between(args: &[ResolvedArg<'_>]) -> bool {
    let (Some(low), Some(high)) = (
        args.get(1).and_then(ResolvedArg::as_f64),
        args.get(2).and_then(ResolvedArg::as_f64),
    ) else {
        return false;
    };
    candidates(args)
        .iter()
        .filter_map(|candidate| candidate.as_f64())
        .any(|candidate| candidate > low && candidate < high)
}

fn test_empty(args: &[ResolvedArg<'_>]) -> bool {
    candidates(args).iter().all(|candidate| candidate.is_zero())
}

#[cfg(test)]
mod tests;
