#![allow(clippy::unwrap_used, clippy::expect_used)]

use pretty_assertions::assert_eq;

use super::*;
use crate::context::{ArgKind, ResolvedArg};
use crate::value::Value;

fn steps(expression: &str) -> Vec<Step> {
    compile(expression, &Context::new()).unwrap().steps
}

fn descendant_context() -> Context {
    let mut context = Context::new();
    context.allow_descendants(true);
    context
}

fn error(expression: &str) -> (usize, String) {
    let error = compile(expression, &Context::new()).unwrap_err();
    (error.offset(), error.message().to_owned())
}

fn filter(step: &Step) -> &Expression {
    step.condition.as_ref().expect("step has a filter")
}

// Member steps

#[test]
fn test_child_steps() {
    let steps = steps(".store.books.*");
    let targets: Vec<_> = steps.iter().map(|s| s.target.clone()).collect();
    assert_eq!(
        targets,
        vec![
            Target::Child(Selector::Name("store".into())),
            Target::Child(Selector::Name("books".into())),
            Target::Child(Selector::Wildcard),
        ]
    );
    assert!(steps.iter().all(|s| s.condition.is_none()));
}

#[test]
fn test_name_bytes() {
    let steps = steps(".foo-bar_2.épée");
    assert_eq!(steps[0].target, Target::Child(Selector::Name("foo-bar_2".into())));
    assert_eq!(steps[1].target, Target::Child(Selector::Name("épée".into())));
}

#[test]
fn test_descendants_rejected_by_default() {
    let (offset, message) = error(".store..Author");
    assert_eq!(offset, 6);
    assert_eq!(message, "descendant selectors are not enabled");
}

#[test]
fn test_descendants_allowed() {
    let path = compile(".store..Author", &descendant_context()).unwrap();
    assert_eq!(
        path.steps[1].target,
        Target::Descendant(Selector::Name("Author".into()))
    );

    let path = compile("..*", &descendant_context()).unwrap();
    assert_eq!(path.steps[0].target, Target::Descendant(Selector::Wildcard));
}

#[test]
fn test_missing_name() {
    assert_eq!(
        error("."),
        (1, "unexpected end of path, expected a field name or '*'".into())
    );
    assert_eq!(
        error(".a.[0]"),
        (3, "unexpected '[', expected a field name or '*'".into())
    );
}

// Item steps

#[test]
fn test_item_ranges() {
    let cases = [
        ("[*]", Some(Slice::FULL)),
        ("[3]", Some(Slice::index(3))),
        ("[+1]", Some(Slice::index(1))),
        ("[3:10]", Some(Slice { start: 3, end: 10 })),
        ("[1:2]", Some(Slice { start: 1, end: 2 })),
        ("[-2:]", Some(Slice { start: -2, end: -1 })),
        ("[:1]", Some(Slice { start: 0, end: 1 })),
        ("[:]", Some(Slice::FULL)),
        ("[]", None),
    ];
    for (expression, range) in cases {
        assert_eq!(steps(expression)[0].target, Target::Item(range), "{expression}");
    }
}

#[test]
fn test_unterminated_bracket() {
    assert_eq!(
        error(".books["),
        (7, "unexpected end of path, expected ']'".into())
    );
    assert_eq!(
        error(".books[1"),
        (8, "unexpected end of path, expected ']'".into())
    );
    assert_eq!(error(".books[x]"), (7, "unexpected 'x', expected ']'".into()));
}

#[test]
fn test_range_bound_overflow() {
    assert_eq!(
        error(".books[99999999999999999999]"),
        (7, "failed to parse range bound".into())
    );
}

// Top level

#[test]
fn test_empty_expression() {
    assert_eq!(error(""), (0, "empty path".into()));
}

#[test]
fn test_leading_paren() {
    assert_eq!(
        error("("),
        (0, "unexpected '(', expected '.' or '['".into())
    );
}

#[test]
fn test_trailing_garbage() {
    assert_eq!(
        error(".a b"),
        (2, "unexpected ' ', expected '.' or '['".into())
    );
}

#[test]
fn test_source_is_kept() {
    let path = compile(".books[0].Title", &Context::new()).unwrap();
    assert_eq!(path.source(), ".books[0].Title");
    assert_eq!(path.to_string(), ".books[0].Title");
}

// Filters

#[test]
fn test_filter_with_spaces_and_inverse() {
    let steps = steps(".books[*]( ! empty( @.ISBN ) )");
    let expression = filter(&steps[1]);
    assert_eq!(expression.condition.name(), "empty");
    assert!(expression.inverse);
    assert_eq!(expression.arguments.len(), 1);
    let Argument::Path(nested) = &expression.arguments[0] else {
        panic!("expected a path argument, got {:?}", expression.arguments[0]);
    };
    assert_eq!(nested.source(), ".ISBN");
}

#[test]
fn test_nested_path_stops_at_outer_tokens() {
    let steps = steps(".a(eq(@.b[0], 1)).c");
    assert_eq!(steps.len(), 2);
    assert_eq!(steps[1].target, Target::Child(Selector::Name("c".into())));

    let Argument::Path(nested) = &filter(&steps[0]).arguments[0] else {
        panic!("expected a path argument");
    };
    assert_eq!(nested.source(), ".b[0]");
    assert_eq!(nested.steps().len(), 2);
}

#[test]
fn test_literal_arguments() {
    let cases = [
        (".a(eq(@.x, 'single'))", "Str(\"single\")"),
        (".a(eq(@.x, \"double\"))", "Str(\"double\")"),
        (".a(eq(@.x, `tick`))", "Str(\"tick\")"),
        (".a(eq(@.x, \"it's\"))", "Str(\"it's\")"),
        (".a(eq(@.x, 42))", "Int(42)"),
        (".a(eq(@.x, +3))", "Int(3)"),
        (".a(eq(@.x, -1.5))", "Float(-1.5)"),
        (".a(eq(@.x, 8.99))", "Float(8.99)"),
    ];
    for (expression, expected) in cases {
        let steps = steps(expression);
        let argument = &filter(&steps[0]).arguments[1];
        assert_eq!(format!("{argument:?}"), expected, "{expression}");
    }
}

#[test]
fn test_nested_filters() {
    let steps = steps(".a(has(@.b(eq(@.c, 1))))");
    let Argument::Path(nested) = &filter(&steps[0]).arguments[0] else {
        panic!("expected a path argument");
    };
    assert_eq!(filter(&nested.steps()[0]).condition.name(), "eq");
}

#[test]
fn test_deeply_nested_references() {
    let depth = 500;
    let expression = format!("{}.a{}", ".a(has(@".repeat(depth), "))".repeat(depth));
    let path = compile(&expression, &Context::new()).unwrap();
    assert_eq!(path.steps().len(), 1);
}

#[test]
fn test_unknown_condition() {
    assert_eq!(
        error(".books(nope(@.x))"),
        (
            7,
            "unknown condition \"nope\", expected one of: between, cicontains, contains, \
             empty, eq, gt, gte, has, lt, lte"
                .into()
        )
    );
}

#[test]
fn test_missing_condition_name() {
    assert_eq!(
        error(".a(!(@.x))"),
        (4, "unexpected '(', expected a condition name".into())
    );
}

#[test]
fn test_too_few_arguments() {
    assert_eq!(
        error(".books(eq(@.Price))"),
        (17, "too few arguments to \"eq\", expected 2, found 1".into())
    );
    assert_eq!(
        error(".books(has())"),
        (11, "too few arguments to \"has\", expected 1, found 0".into())
    );
}

#[test]
fn test_too_many_arguments() {
    assert_eq!(
        error(".books(has(@.ISBN, 1))"),
        (19, "too many arguments to \"has\", expected 1".into())
    );
}

#[test]
fn test_argument_kind_mismatch() {
    assert_eq!(
        error(".books(gt(@.Price, 'x'))"),
        (
            19,
            "argument 2 to \"gt\" must be float or integer, found string".into()
        )
    );
    assert_eq!(
        error(".books(has(5))"),
        (11, "argument 1 to \"has\" must be path, found integer".into())
    );
}

#[test]
fn test_unterminated_string() {
    assert_eq!(
        error(".a(eq(@.Title, \"abc))"),
        (15, "missing closing '\"'".into())
    );
}

#[test]
fn test_unclosed_filter() {
    assert_eq!(
        error(".a(eq(@.x, 1)"),
        (13, "unexpected end of path, expected ')'".into())
    );
}

#[test]
fn test_empty_reference() {
    assert_eq!(
        error(".a(has(@))"),
        (8, "unexpected ')', expected a path after '@'".into())
    );
}

#[test]
fn test_bad_argument() {
    assert_eq!(
        error(".a(has(x))"),
        (7, "unexpected 'x', expected an argument".into())
    );
    assert_eq!(
        error(".a(eq(@.x, -))"),
        (11, "failed to parse integer literal".into())
    );
}

// Context interaction

#[test]
fn test_zero_arity_condition() {
    let mut context = Context::new();
    context.register("always", Vec::<ArgKind>::new(), |_| true);

    let path = compile(".a(always())", &context).unwrap();
    assert!(filter(&path.steps[0]).arguments.is_empty());

    let error = compile(".a(always(1))", &context).unwrap_err();
    assert_eq!(error.offset(), 10);
}

#[test]
fn test_later_registration_does_not_change_compiled_path() {
    let mut context = Context::new();
    let path = compile(".a(has(@.b))", &context).unwrap();
    context.register("has", [ArgKind::PATH], |_| false);

    let value = Value::from(1);
    let args = [ResolvedArg::Candidates(vec![&value])];
    assert!(filter(&path.steps[0]).condition.test(&args));
}

#[test]
fn test_error_display() {
    let error = compile("(", &Context::new()).unwrap_err();
    assert_eq!(
        error.to_string(),
        "syntax error in path \"(\" at character 0: unexpected '(', expected '.' or '['"
    );
    assert_eq!(error.expression(), "(");
}

#[test]
#[should_panic(expected = "syntax error in path")]
fn test_compile_or_abort_panics() {
    compile_or_abort(".books[", &Context::new());
}

#[test]
fn test_compile_or_abort_returns_path() {
    let path = compile_or_abort(".books[*].Title", &Context::new());
    assert_eq!(path.steps().len(), 3);
}
