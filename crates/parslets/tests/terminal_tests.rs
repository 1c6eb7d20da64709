//! Tests for literal, regular expression and closure-backed parslets

use parslets::{Error, Location, ParseError, ParseErrorKind, Parslet, Value};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn regex(pattern: &str) -> Parslet {
    Parslet::regex(pattern).expect("valid pattern")
}

fn parse_error(result: Result<Value, Error>) -> ParseError {
    match result {
        Err(Error::Parse(error)) => error,
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn test_literal_consumes_exactly_its_text() {
    let value = Parslet::literal("foo").parse("foobar").expect("prefix matches");
    assert_eq!(value, "foo");
    assert_eq!(value.span().start, Location::new(0, 0));
    assert_eq!(value.span().end, Location::new(0, 3));
    assert_eq!(value.span().source_text, "foo");
}

#[test]
fn test_literal_mismatch_reports_last_matched_position() {
    let error = parse_error(Parslet::literal("foo").parse("fob"));
    assert_eq!(error.kind, ParseErrorKind::UnexpectedCharacter);
    assert_eq!(error.end, Location::new(0, 2));

    let error = parse_error(Parslet::literal("foo").parse("fo"));
    assert_eq!(error.kind, ParseErrorKind::UnexpectedEndOfInput);
    assert_eq!(error.end, Location::new(0, 2));
}

#[test]
fn test_literal_counts_code_points_and_line_breaks() {
    let value = Parslet::literal("héllo").parse("héllo wörld").expect("matches");
    assert_eq!(value.span().end, Location::new(0, 5));

    let value = Parslet::literal("a\r\nb").parse("a\r\nbc").expect("matches");
    assert_eq!(value.span().end, Location::new(1, 1));

    let value = Parslet::literal("a\n\rb").parse("a\n\rb").expect("matches");
    assert_eq!(value.span().end, Location::new(2, 1));
}

#[test]
fn test_regex_position_across_crlf() {
    let dot_all = regex("(?s).+");

    let value = dot_all.parse("hello\r\nworld").expect("matches");
    assert_eq!(value.span().end, Location::new(1, 5));
    assert_eq!(value, "hello\r\nworld");

    let value = dot_all.parse("hello\r").expect("matches");
    assert_eq!(value.span().end, Location::new(1, 0));
}

#[test]
fn test_regex_is_anchored_at_current_position() {
    let error = parse_error(regex("[0-9]+").parse("abc123"));
    assert_eq!(error.kind, ParseErrorKind::PatternMismatch);
    assert_eq!(error.end, Location::new(0, 0));
    assert!(error.message.contains("/[0-9]+/"));
}

#[test]
fn test_regex_keeps_capture_groups() {
    let value = regex("([a-z]+)=([0-9]+)?").parse("key=").expect("matches");
    let found = value.as_match().expect("regex match");
    assert_eq!(found.as_str(), "key=");
    assert_eq!(found.group(1), Some("key"));
    assert_eq!(found.group(2), None);
    assert_eq!(found.len(), 3);

    assert_eq!(value, Value::spanning("key=", Location::default()));
}

#[test]
fn test_empty_match_is_zero_width_value() {
    let value = regex("a*").parse("bbb").expect("empty match");
    assert_eq!(value, "");
    assert!(value.span().is_empty());
}

#[test]
fn test_invalid_pattern_is_grammar_error() {
    let error = Parslet::regex("(unclosed").expect_err("does not compile");
    assert!(error.to_string().contains("(unclosed"));
}

#[test]
fn test_closure_parslet() {
    let x = Parslet::from_fn(|input: &str, start: Location| {
        if input.starts_with('x') {
            Ok(Value::spanning("x", start))
        } else {
            Err(ParseError::custom("expected an x", start))
        }
    });

    let value = Parslet::literal("a").then(x.clone()).parse("ax").expect("matches");
    assert_eq!(serde_json::to_value(&value).unwrap(), serde_json::json!(["a", "x"]));

    let error = parse_error(Parslet::literal("a").then(x).parse("ay"));
    assert_eq!(error.kind, ParseErrorKind::Custom);
    assert_eq!(error.end, Location::new(0, 1));
}

#[test]
fn test_closure_parslets_compare_by_identity() {
    let calls = Arc::new(AtomicUsize::new(0));
    let make = |calls: Arc<AtomicUsize>| {
        Parslet::from_fn(move |_input: &str, start: Location| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(Value::spanning("", start))
        })
    };

    let first = make(Arc::clone(&calls));
    let second = make(Arc::clone(&calls));
    assert_eq!(first, first.clone());
    assert_ne!(first, second);
}
