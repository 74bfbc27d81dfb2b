//! Tests for delimited content parsing and escapes.

use parseworks::error::Kind;
use parseworks::prelude::*;
use parseworks_testing::{assert_consumes, assert_fails, run_rule};

fn q() -> Rule {
    quoted().of(any_char())
}

fn q_escaped() -> Rule {
    quoted().of_escaped(any_char(), backslash_escape().lit_c('n', '\n'))
}

fn content(outcome: &parseworks_testing::Outcome) -> Vec<Value> {
    match outcome.values.first() {
        Some(Value::List(items)) => items.clone(),
        other => panic!["expected a list value, got {other:?}"],
    }
}

#[test]
fn quoted_content_is_one_run() {
    let outcome = run_rule(&q(), "\"abc\"");
    assert_eq!(outcome.consumed, Some(5));
    let items = content(&outcome);
    assert_eq!(items.len(), 1);
    let Value::Lexeme(lexeme) = items[0] else {
        panic!["expected a lexeme, got {:?}", items[0]]
    };
    assert_eq!(lexeme.begin().to_usize(), 1);
    assert_eq!(lexeme.end().to_usize(), 4);
}

#[test]
fn close_is_consumed_exactly_once() {
    let outcome = run_rule(&q(), "\"abc\"");
    let close_events: Vec<_> = outcome
        .tokens
        .iter()
        .filter(|(kind, lexeme)| *kind == TokenKind::Literal && lexeme.begin().to_usize() == 4)
        .collect();
    assert_eq!(close_events.len(), 1);
    // The close is not part of any content lexeme.
    for item in content(&outcome) {
        let Value::Lexeme(lexeme) = item else {
            continue;
        };
        assert!(lexeme.end().to_usize() <= 4);
    }
}

#[test]
fn unterminated_content() {
    let outcome = run_rule(&q(), "\"ab");
    assert_eq!(outcome.consumed, None);
    assert_eq!(outcome.first_error(), Some("missing delimiter"));
    let Kind::Span(span) = outcome.errors[0].kind else {
        panic!["missing delimiter must carry a span"]
    };
    assert_eq!(span.begin().to_usize(), 1);
    assert_eq!(span.end().to_usize(), 3);
}

#[test]
fn escaped_newline() {
    let outcome = run_rule(&q_escaped(), "\"a\\nb\"");
    assert_eq!(outcome.consumed, Some(6));
    let items = content(&outcome);
    assert_eq!(items.len(), 3);
    let Value::Lexeme(a) = items[0] else {
        panic!["expected a lexeme, got {:?}", items[0]]
    };
    assert_eq!((a.begin().to_usize(), a.end().to_usize()), (1, 2));
    assert_eq!(items[1], Value::Char('\n'));
    let Value::Lexeme(b) = items[2] else {
        panic!["expected a lexeme, got {:?}", items[2]]
    };
    assert_eq!((b.begin().to_usize(), b.end().to_usize()), (4, 5));
}

#[test]
fn invalid_escape() {
    let outcome = run_rule(&q_escaped(), "\"\\q\"");
    assert_eq!(outcome.consumed, None);
    assert_eq!(outcome.first_error(), Some("invalid escape sequence"));
    let Kind::Position(position) = outcome.errors[0].kind else {
        panic!["invalid escape sequence must carry a position"]
    };
    assert_eq!(position.to_usize(), 2);
}

#[test]
fn symmetric_shorthand_equals_pair() {
    let shorthand = delimited(lit("\"")).of(any_char());
    let pair = delimited((lit("\""), lit("\""))).of(any_char());
    for input in ["\"abc\"", "\"ab", "\"\"", "x"] {
        let lhs = run_rule(&shorthand, input);
        let rhs = run_rule(&pair, input);
        assert_eq!(lhs.consumed, rhs.consumed, "input {input:?}");
        assert_eq!(lhs.values, rhs.values, "input {input:?}");
    }
}

#[test]
fn content_round_trips() {
    let input = "(hello, world)";
    let rule = delimited((lit("("), lit(")"))).of(any_char());
    let outcome = run_rule(&rule, input);
    assert_eq!(outcome.consumed, Some(input.len()));
    let mut concatenated = String::new();
    for item in content(&outcome) {
        let Value::Lexeme(lexeme) = item else {
            panic!["expected a lexeme, got {item:?}"]
        };
        concatenated.push_str(&input[lexeme.begin().to_usize()..lexeme.end().to_usize()]);
    }
    assert_eq!(concatenated, "hello, world");
}

#[test]
fn whitespace_applies_only_around_the_open() {
    let rule = quoted().whitespaced(ascii_space()).of(any_char());
    let outcome = run_rule(&rule, "  \" a\"");
    assert_eq!(outcome.consumed, Some(6));
    let items = content(&outcome);
    assert_eq!(items.len(), 1);
    let Value::Lexeme(lexeme) = items[0] else {
        panic!["expected a lexeme, got {:?}", items[0]]
    };
    // The space inside the delimiters is content, not whitespace.
    assert_eq!((lexeme.begin().to_usize(), lexeme.end().to_usize()), (3, 5));
}

#[test]
fn escape_capture_delivers_the_lexeme() {
    let rule = quoted().of_escaped(any_char(), backslash_escape().capture(any_char()));
    let outcome = run_rule(&rule, "\"a\\qb\"");
    assert_eq!(outcome.consumed, Some(6));
    let items = content(&outcome);
    // The captured `q` lexeme is adjacent to the following content run, so
    // the list sink coalesces them.
    assert_eq!(items.len(), 2);
    let Value::Lexeme(qb) = items[1] else {
        panic!["expected a lexeme, got {:?}", items[1]]
    };
    assert_eq!((qb.begin().to_usize(), qb.end().to_usize()), (3, 5));
}

#[test]
fn string_escape_delivers_the_replacement() {
    let rule = quoted().of_escaped(any_char(), dollar_escape().lit("name", "NAME"));
    let outcome = run_rule(&rule, "\"x$namey\"");
    assert_eq!(outcome.consumed, Some(9));
    let items = content(&outcome);
    assert_eq!(items[1], Value::Str("NAME".into()));
}

#[test]
fn close_values_follow_the_sink_value() {
    let rule = delimited((lit("("), lit(")") >> value('!'))).of(any_char());
    let outcome = run_rule(&rule, "(ab)");
    assert_eq!(outcome.consumed, Some(4));
    assert_eq!(outcome.values.len(), 2);
    assert!(matches!(outcome.values[0], Value::List(_)));
    assert_eq!(outcome.values[1], Value::Char('!'));
}

parseworks_testing::rule_suite![
    rule: double_backticked().of(any_char()),
    consume_tests((empty_backticks, "````", 4), (backticked_content, "``ab``", 6),),
    failure_tests((unterminated_backticks, "``ab", "missing delimiter"),),
];

#[test]
fn empty_quoted() {
    assert_consumes(&q(), "\"\"", 2);
    let outcome = run_rule(&q(), "\"\"");
    assert_eq!(content(&outcome).len(), 0);
}

#[test]
fn missing_open_is_a_token_error() {
    assert_fails(&q(), "abc", "expected literal");
}
