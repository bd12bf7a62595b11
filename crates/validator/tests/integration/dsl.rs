//! DSL compilation against the built-in registry.

use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;
use sieve_validator::dsl::{self, Arg, ArgValue, RuleToken};
use sieve_validator::prelude::*;

#[test]
fn tokens_keep_order_and_coerce_arguments() {
    let tokens = dsl::parse("required|between:1,2.5|in:a,7,-3").unwrap();
    assert_eq!(
        tokens,
        [
            RuleToken {
                name: "required".into(),
                args: vec![],
            },
            RuleToken {
                name: "between".into(),
                args: vec!["1".into(), "2.5".into()],
            },
            RuleToken {
                name: "in".into(),
                args: vec!["a".into(), "7".into(), "-3".into()],
            },
        ]
    );
    assert_eq!(
        tokens[2].args.iter().map(Arg::value).collect::<Vec<_>>(),
        [ArgValue::Text, ArgValue::Int(7), ArgValue::Int(-3)]
    );
}

#[rstest]
#[case("regex:010", "x10", false)]
#[case("regex:010", "x010", true)]
#[case("regex:1e3", "1000", false)]
#[case("regex:1e3", "x1e3", true)]
#[case("in_list:01,02", "01", true)]
#[case("in_list:01,02", "1", false)]
#[case("not_in:1.0", "1.0", false)]
fn text_arguments_keep_their_written_form(
    #[case] spec: &str,
    #[case] value: &str,
    #[case] passes: bool,
) {
    let chain = dsl::compile(spec, RuleRegistry::builtin()).unwrap();
    let messages = chain.evaluate("f", &json!({ "f": value })).unwrap();
    assert_eq!(messages.is_empty(), passes, "`{spec}` against {value:?}");
}

#[test]
fn cross_field_arguments_keep_their_written_form() {
    let chain = dsl::compile("same:007", RuleRegistry::builtin()).unwrap();
    let tree = json!({ "007": "a", "7": "b", "f": "a" });
    assert!(chain.evaluate("f", &tree).unwrap().is_empty());
}

#[rstest]
#[case("")]
#[case("required||string")]
#[case("9lives")]
#[case("min-length:3")]
#[case(":3")]
fn malformed_specs_fail_to_parse(#[case] spec: &str) {
    assert!(dsl::parse(spec).is_err(), "`{spec}` should not parse");
}

#[test]
fn unknown_rule_is_a_compile_error() {
    let error = dsl::compile("required|strnig", RuleRegistry::builtin()).unwrap_err();
    assert_eq!(
        error,
        CompileError::UnknownRule {
            name: "strnig".into()
        }
    );
}

#[rstest]
#[case("min")]
#[case("min:x")]
#[case("between:1")]
#[case("required:yes")]
#[case("bail:1")]
#[case("in")]
#[case("regex:[")]
fn bad_arguments_are_compile_errors(#[case] spec: &str) {
    let error = dsl::compile(spec, RuleRegistry::builtin()).unwrap_err();
    assert!(
        matches!(error, CompileError::InvalidArgument { .. }),
        "`{spec}` gave {error:?}"
    );
}

#[test]
fn dsl_and_programmatic_chains_are_interchangeable() {
    let compiled = dsl::compile("bail|required|string|min:3", RuleRegistry::builtin()).unwrap();
    let built = RuleChain::new(vec![required(), string(), min(3.0)]).bail();

    for value in [json!({}), json!({ "f": 1 }), json!({ "f": "ab" }), json!({ "f": "abc" })] {
        assert_eq!(
            compiled.evaluate("f", &value).unwrap(),
            built.evaluate("f", &value).unwrap()
        );
    }
}

#[test]
fn compiling_twice_is_result_equivalent() {
    let spec = "required|numeric|min:2|max:32";
    let first = dsl::compile(spec, RuleRegistry::builtin()).unwrap();
    let second = dsl::compile(spec, RuleRegistry::builtin()).unwrap();

    for tree in [json!({}), json!({ "age": 1 }), json!({ "age": 50 }), json!({ "age": "x" })] {
        assert_eq!(first.evaluate("age", &tree).unwrap(), second.evaluate("age", &tree).unwrap());
    }
}

#[test]
fn modifiers_may_appear_anywhere() {
    let chain = dsl::compile("string|nullable|max:3|bail", RuleRegistry::builtin()).unwrap();
    assert!(chain.is_bail());
    assert!(chain.is_nullable());
    assert_eq!(
        chain.rules().iter().map(Rule::name).collect::<Vec<_>>(),
        ["string", "max"]
    );
}

#[test]
fn registry_lists_the_catalog() {
    let names = RuleRegistry::builtin().names();
    for expected in [
        "accepted",
        "array",
        "between",
        "boolean",
        "declined",
        "different",
        "email",
        "filled",
        "in",
        "in_list",
        "integer",
        "map",
        "max",
        "min",
        "not_in",
        "numeric",
        "present",
        "regex",
        "required",
        "required_with",
        "same",
        "size",
        "string",
    ] {
        assert!(names.contains(&expected), "missing `{expected}`");
    }
    assert!(!names.contains(&"bail"));
}
