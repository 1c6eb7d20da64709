//! Tests for whole grammars: productions, consumption of all input,
//! statistics, events and error reporting

use parslets::error::diagnostics;
use parslets::{
    Error, Grammar, GrammarBuilder, GrammarError, Location, ParseConfig, ParseEvent, Parslet, Value,
};
use serde_json::json;

fn regex(pattern: &str) -> Parslet {
    Parslet::regex(pattern).expect("valid pattern")
}

fn json_of(value: &Value) -> serde_json::Value {
    serde_json::to_value(value).expect("serializable value")
}

/// Identifiers, integers, assignments and right-associative additions,
/// each producing an AST node.
fn ast_grammar() -> Grammar {
    GrammarBuilder::new()
        .start_rule("expression")
        .rule("identifier", regex("[a-zA-Z_][a-zA-Z0-9_]*"))
        .node("identifier", None)
        .production("identifier", &[])
        .rule("integer_literal", regex("[0-9]+"))
        .node("integer_literal", None)
        .production("integer_literal", &[])
        .rule(
            "expression",
            Parslet::rule("assignment_expression")
                .or(Parslet::rule("addition_expression"))
                .or(Parslet::rule("identifier"))
                .or(Parslet::rule("integer_literal")),
        )
        .node("expression", None)
        .rule(
            "assignment_expression",
            Parslet::rule("identifier")
                .then(Parslet::literal("=").skip())
                .then(Parslet::rule("expression")),
        )
        .node("assignment_expression", Some("expression"))
        .production("assignment_expression", &["target", "value"])
        .rule(
            "addition_expression",
            Parslet::rule("identifier")
                .or(Parslet::rule("integer_literal"))
                .then(Parslet::literal("+").skip())
                .then(Parslet::rule("expression")),
        )
        .node("addition_expression", Some("expression"))
        .production("addition_expression", &["summee", "summor"])
        .build()
        .expect("Failed to build grammar")
}

#[test]
fn test_terminal_productions_store_lexeme() {
    let grammar = ast_grammar();

    let value = grammar.parse("hello").expect("parses");
    let node = value.as_node().expect("node");
    assert_eq!(node.kind(), "identifier");
    assert_eq!(node.lexeme().map(|lexeme| lexeme == "hello"), Some(true));

    let value = grammar.parse("1234").expect("parses");
    assert_eq!(json_of(&value), json!({"node": "integer_literal", "lexeme": "1234"}));
}

#[test]
fn test_productions_spread_fields() {
    let grammar = ast_grammar();

    let value = grammar.parse("foo=bar").expect("parses");
    let node = value.as_node().expect("node");
    assert!(node.is_a("expression"));
    assert!(node.is_a("assignment_expression"));
    assert!(!node.is_a("addition_expression"));
    assert_eq!(
        json_of(&value),
        json!({
            "node": "assignment_expression",
            "target": {"node": "identifier", "lexeme": "foo"},
            "value": {"node": "identifier", "lexeme": "bar"},
        })
    );

    let value = grammar.parse("foo=abc+123").expect("parses");
    assert_eq!(
        json_of(&value),
        json!({
            "node": "assignment_expression",
            "target": {"node": "identifier", "lexeme": "foo"},
            "value": {
                "node": "addition_expression",
                "summee": {"node": "identifier", "lexeme": "abc"},
                "summor": {"node": "integer_literal", "lexeme": "123"},
            },
        })
    );
}

#[test]
fn test_nested_additions() {
    let value = ast_grammar().parse("a+b+2").expect("parses");
    let node = value.as_node().expect("node");
    assert!(node.is_a("expression"));
    assert_eq!(node.kind(), "addition_expression");

    let summor = node.field("summor").and_then(Value::as_node).expect("nested node");
    assert!(summor.is_a("addition_expression"));
    assert_eq!(
        json_of(&value),
        json!({
            "node": "addition_expression",
            "summee": {"node": "identifier", "lexeme": "a"},
            "summor": {
                "node": "addition_expression",
                "summee": {"node": "identifier", "lexeme": "b"},
                "summor": {"node": "integer_literal", "lexeme": "2"},
            },
        })
    );
    assert_eq!(value.span().source_text, "a+b+2");
    assert_eq!(summor.field("summee").map(|v| v.span().start), Some(Location::new(0, 2)));
}

/// translation_unit := word_list & end_of_string.and? | end_of_string
/// word_list := word >> (whitespace.skip & word)*
fn complaining_grammar() -> Grammar {
    GrammarBuilder::new()
        .start_rule("translation_unit")
        .rule(
            "translation_unit",
            Parslet::rule("word_list")
                .then(Parslet::rule("end_of_string").and_predicate())
                .or(Parslet::rule("end_of_string")),
        )
        .rule("end_of_string", regex(r"\z"))
        .rule("whitespace", regex(r"\s+"))
        .rule("word", regex("[a-z]+"))
        .rule(
            "word_list",
            Parslet::rule("word").merge_with(
                Parslet::rule("whitespace")
                    .skip()
                    .then(Parslet::rule("word"))
                    .zero_or_more(),
            ),
        )
        .build()
        .expect("Failed to build grammar")
}

#[test]
fn test_grammar_requires_all_input() {
    let grammar = complaining_grammar();
    assert_eq!(grammar.parse("").expect("parses"), "");
    assert_eq!(grammar.parse("foo").expect("parses"), "foo");
    assert_eq!(json_of(&grammar.parse("foo bar").expect("parses")), json!(["foo", "bar"]));

    for input in ["...", "foo...", "foo bar..."] {
        assert!(
            matches!(grammar.parse(input), Err(Error::Parse(_))),
            "input {input:?} should be rejected"
        );
    }
}

#[test]
fn test_rightmost_failure_is_reported_with_context() {
    let source = "foo bar...";
    let error = complaining_grammar().parse(source).expect_err("trailing junk");
    assert_eq!(error.location(), Some(Location::new(0, 7)));

    let parse_error = error.as_parse_error().expect("parse error");
    let rendered = diagnostics::format_error_with_context(parse_error, source, 1);
    assert!(rendered.contains("--> 1:8"), "{rendered}");
    assert!(rendered.contains("1 | foo bar..."), "{rendered}");
    assert!(rendered.ends_with("|        ^"), "{rendered}");

    assert_eq!(
        diagnostics::format_error_with_location(parse_error, Some("words.txt")),
        format!("words.txt:1:8: {parse_error}")
    );
}

#[test]
fn test_production_arity_mismatch_is_grammar_error() {
    let grammar = GrammarBuilder::new()
        .start_rule("pair")
        .rule("pair", Parslet::rule("word").then(",").then(Parslet::rule("word")))
        .rule("word", regex("[a-z]+"))
        .node("pair", None)
        .production("pair", &["left", "right"])
        .build()
        .expect("Failed to build grammar");

    match grammar.parse("a,b") {
        Err(Error::Grammar(GrammarError::ProductionArity {
            rule,
            expected,
            found,
        })) => {
            assert_eq!(rule, "pair");
            assert_eq!(expected, 2);
            assert_eq!(found, 3);
        }
        other => panic!("expected an arity error, got {other:?}"),
    }
}

#[test]
fn test_stats_count_cache_use() {
    let grammar = ast_grammar();
    let (result, stats) = grammar.parse_with_stats("a+b+2", &ParseConfig::default());
    assert!(result.is_ok());
    assert!(stats.rule_invocations > 0);
    assert!(stats.cache_hits > 0, "identifier is reused across alternatives");
    assert!(stats.backtracks > 0);
    assert!(stats.max_depth > 0);

    let (_, unmemoized) =
        grammar.parse_with_stats("a+b+2", &ParseConfig::default().with_memoize(false));
    assert_eq!(unmemoized.cache_hits, 0);
    assert!(unmemoized.rule_invocations > stats.rule_invocations);
}

#[test]
fn test_stats_can_be_disabled() {
    let config = ParseConfig::default().with_collect_stats(false);
    let (result, stats) = ast_grammar().parse_with_stats("foo=bar", &config);
    assert!(result.is_ok());
    assert_eq!(stats, parslets::ParseStats::default());
}

#[test]
fn test_events_trace_rule_entry_and_exit() {
    let grammar = ast_grammar();
    let config = ParseConfig::default().with_trace_events(true);
    let mut events: Vec<ParseEvent> = Vec::new();

    let (result, _) = grammar.parse_with_handler("hello", &config, &mut events);
    assert!(result.is_ok());
    assert_eq!(
        events.first(),
        Some(&ParseEvent::EnterRule {
            rule: "expression".into(),
            location: Location::new(0, 0),
        })
    );
    assert_eq!(
        events.last(),
        Some(&ParseEvent::ExitRule {
            rule: "expression".into(),
            success: true,
        })
    );
    assert!(events.iter().any(|event| matches!(event, ParseEvent::Backtrack { .. })));

    let entered = events
        .iter()
        .filter(|event| matches!(event, ParseEvent::EnterRule { .. }))
        .count();
    let exited = events
        .iter()
        .filter(|event| matches!(event, ParseEvent::ExitRule { .. }))
        .count();
    assert_eq!(entered, exited);
}

#[test]
fn test_events_are_off_by_default() {
    let mut events: Vec<ParseEvent> = Vec::new();
    let (result, _) = ast_grammar().parse_with_handler("hello", &ParseConfig::default(), &mut events);
    assert!(result.is_ok());
    assert!(events.is_empty());
}

#[test]
fn test_grammar_is_shared_between_threads() {
    let grammar = std::sync::Arc::new(ast_grammar());
    let handles: Vec<_> = ["a+1", "x=y", "42"]
        .into_iter()
        .map(|input| {
            let grammar = std::sync::Arc::clone(&grammar);
            std::thread::spawn(move || grammar.parse(input).map(|value| json_of(&value)))
        })
        .collect();

    for handle in handles {
        assert!(handle.join().expect("thread completes").is_ok());
    }
}

#[test]
fn test_error_locations_display_one_based() {
    let error = ast_grammar().parse("\n+").expect_err("no expression");
    let location = error.location().expect("parse error");
    assert_eq!(location, Location::new(0, 0));
    assert_eq!(location.to_string(), "1:1");
}
