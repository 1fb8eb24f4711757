//! End-to-end expansion tests over the in-memory test tree.

use rstest::rstest;
use varexp::testing::{ChildNode, MapNode, TestValue};
use varexp::{expand, EvalError, ExpandError, Options, ParseError};

/// A tree with one string value per (dotted key, value) pair.
fn tree(entries: &[(&str, &str)]) -> MapNode {
    let mut node = MapNode::new();
    for (key, value) in entries {
        node.set(key, TestValue::str(*value));
    }
    node
}

#[rstest]
#[case("")]
#[case("plain text")]
#[case("a:b")]
#[case("a}b")]
#[case("no placeholders at all, just words.")]
fn identity_on_dollar_free_text(#[case] input: &str) {
    let tree = tree(&[]);
    let opts = Options::new();
    assert_eq!(expand(input, Some(&tree), &opts).unwrap(), input);
}

#[rstest]
#[case("$$", "$")]
#[case("a$$b", "a$b")]
#[case("$$$$", "$$")]
#[case("cost: $$5", "cost: $5")]
fn escaped_dollars_collapse(#[case] input: &str, #[case] expected: &str) {
    let tree = tree(&[]);
    let opts = Options::new();
    assert_eq!(expand(input, Some(&tree), &opts).unwrap(), expected);
}

#[test]
fn simple_reference() {
    let tree = tree(&[("a", "x")]);
    let opts = Options::new();
    assert_eq!(expand("${a}", Some(&tree), &opts).unwrap(), "x");
}

#[test]
fn reference_embedded_in_text() {
    let tree = tree(&[("name", "world")]);
    let opts = Options::new();
    assert_eq!(
        expand("hello ${name}!", Some(&tree), &opts).unwrap(),
        "hello world!"
    );
}

#[test]
fn dotted_path_reference() {
    let tree = tree(&[("a.b", "nested")]);
    let opts = Options::new();
    assert_eq!(expand("${a.b}", Some(&tree), &opts).unwrap(), "nested");
}

#[test]
fn custom_separator_changes_path_splitting() {
    // Same tree, different spelling of the path.
    let tree = tree(&[("a.b", "nested")]);
    let opts = Options::new().with_path_sep("/");
    assert_eq!(expand("${a/b}", Some(&tree), &opts).unwrap(), "nested");
}

#[test]
fn default_used_when_missing() {
    let tree = tree(&[]);
    let opts = Options::new();
    assert_eq!(
        expand("${missing:default}", Some(&tree), &opts).unwrap(),
        "default"
    );
}

#[test]
fn default_ignored_when_present() {
    let tree = tree(&[("key", "value")]);
    let opts = Options::new();
    assert_eq!(expand("${key:default}", Some(&tree), &opts).unwrap(), "value");
}

#[test]
fn default_masks_failing_computed_left_side() {
    // The left side is itself an expansion over a missing key; the default
    // still applies instead of surfacing that failure.
    let tree = tree(&[]);
    let opts = Options::new();
    assert_eq!(
        expand("${${missing}:fallback}", Some(&tree), &opts).unwrap(),
        "fallback"
    );
}

#[test]
fn alternative_used_when_present() {
    let tree = tree(&[("present", "anything")]);
    let opts = Options::new();
    assert_eq!(expand("${present:+alt}", Some(&tree), &opts).unwrap(), "alt");
}

#[test]
fn alternative_empty_when_missing() {
    let tree = tree(&[]);
    let opts = Options::new();
    assert_eq!(expand("${present:+alt}", Some(&tree), &opts).unwrap(), "");
}

#[test]
fn error_op_fails_with_message_when_missing() {
    let tree = tree(&[]);
    let opts = Options::new();
    assert_eq!(
        expand("${missing:?boom}", Some(&tree), &opts),
        Err(ExpandError::Eval(EvalError::User("boom".into())))
    );
}

#[test]
fn error_op_returns_value_without_touching_message() {
    // The message branch would fail if evaluated.
    let tree = tree(&[("present", "value")]);
    let opts = Options::new();
    assert_eq!(
        expand("${present:?${also.missing}}", Some(&tree), &opts).unwrap(),
        "value"
    );
}

#[test]
fn nested_expansion_computes_path() {
    let tree = tree(&[("inner", "target"), ("target", "resolved")]);
    let opts = Options::new();
    assert_eq!(expand("${${inner}}", Some(&tree), &opts).unwrap(), "resolved");
}

#[test]
fn computed_path_from_mixed_pieces() {
    let tree = tree(&[("env", "prod"), ("prod.host", "db1")]);
    let opts = Options::new();
    assert_eq!(expand("${${env}.host}", Some(&tree), &opts).unwrap(), "db1");
}

#[rstest]
#[case("${a", ParseError::UnterminatedExpansion)]
#[case("x${a:b", ParseError::UnterminatedExpansion)]
#[case("${}", ParseError::EmptyExpansion)]
#[case("${:}", ParseError::EmptyExpansion)]
#[case("${a:b:c}", ParseError::UnexpectedSeparator)]
fn malformed_inputs_fail_to_parse(#[case] input: &str, #[case] expected: ParseError) {
    let tree = tree(&[]);
    let opts = Options::new();
    assert_eq!(
        expand(input, Some(&tree), &opts),
        Err(ExpandError::Parse(expected))
    );
}

#[test]
fn expansion_is_idempotent_on_resolved_text() {
    let tree = tree(&[("a", "fully resolved")]);
    let opts = Options::new();
    let once = expand("${a} and more", Some(&tree), &opts).unwrap();
    let twice = expand(&once, Some(&tree), &opts).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn resolution_starts_from_root_ancestor() {
    let mut root = MapNode::new();
    root.set("key", TestValue::str("root-value"));
    let child = ChildNode::new(&root);
    let opts = Options::new();
    assert_eq!(expand("${key}", Some(&child), &opts).unwrap(), "root-value");
}

#[test]
fn fallback_root_supplies_missing_key() {
    let primary = tree(&[]);
    let fallback = tree(&[("key", "from-fallback")]);
    let mut opts = Options::new();
    opts.push_fallback_root(&fallback);
    assert_eq!(
        expand("${key}", Some(&primary), &opts).unwrap(),
        "from-fallback"
    );
}

#[test]
fn fallback_root_beats_resolver_callback() {
    let primary = tree(&[]);
    let fallback = tree(&[("key", "from-tree")]);
    let mut opts = Options::new();
    opts.push_fallback_root(&fallback);
    opts.push_resolver(|_| Ok("from-callback".to_string()));
    assert_eq!(expand("${key}", Some(&primary), &opts).unwrap(), "from-tree");
}

#[test]
fn resolver_callback_answers_last() {
    let primary = tree(&[]);
    let mut opts = Options::new();
    opts.push_resolver(|key| match key {
        "env.user" => Ok("alice".to_string()),
        other => Err(EvalError::Missing(other.to_string())),
    });
    assert_eq!(expand("${env.user}", Some(&primary), &opts).unwrap(), "alice");
}

#[test]
fn no_tree_fails_with_missing() {
    let opts = Options::new();
    assert!(matches!(
        expand("${a}", None, &opts),
        Err(ExpandError::Eval(EvalError::Missing(_)))
    ));
}

#[test]
fn no_tree_still_expands_plain_text() {
    let opts = Options::new();
    assert_eq!(expand("no refs here", None, &opts).unwrap(), "no refs here");
}

#[test]
fn integer_values_render_as_strings() {
    let mut node = MapNode::new();
    node.set("port", TestValue::Int(5432));
    let opts = Options::new();
    assert_eq!(expand("port=${port}", Some(&node), &opts).unwrap(), "port=5432");
}

#[test]
fn unconvertible_value_fails_conversion() {
    let mut node = MapNode::new();
    node.set("blob", TestValue::Opaque);
    let opts = Options::new();
    assert!(matches!(
        expand("${blob}", Some(&node), &opts),
        Err(ExpandError::Eval(EvalError::Conversion(_)))
    ));
}

#[test]
fn multiple_references_in_one_string() {
    let tree = tree(&[("host", "db"), ("port", "5432")]);
    let opts = Options::new();
    assert_eq!(
        expand("${host}:${port:?port is required}", Some(&tree), &opts).unwrap(),
        "db:5432"
    );
}
