//! Tests for the iteration combinators.

use parseworks::prelude::*;
use parseworks_testing::{assert_fails, run_rule};

parseworks_testing::rule_suite![
    rule: while_(lit("ab")) + lit("!"),
    consume_tests(
        (zero_iterations, "!", 1),
        (one_iteration, "ab!", 3),
        (three_iterations, "ababab!", 7),
    ),
    failure_tests((partial_iteration_stops, "aba!", "expected literal"),),
];

#[test]
fn while_one_equals_once_then_while() {
    let lhs = while_one(lit("ab"));
    let rhs = lit("ab") + while_(lit("ab"));
    for input in ["", "x", "ab", "abab", "ababx"] {
        let lhs_outcome = run_rule(&lhs, input);
        let rhs_outcome = run_rule(&rhs, input);
        assert_eq!(lhs_outcome.consumed, rhs_outcome.consumed, "input {input:?}");
    }
}

#[test]
fn do_while_equals_then_plus_conditional_while() {
    let lhs = do_while(lit("a"), lit(","));
    let rhs = lit("a") + while_(lit(",") >> lit("a"));
    for input in ["a", "a,a", "a,a,a", "a,a,ax", "ax"] {
        let lhs_outcome = run_rule(&lhs, input);
        let rhs_outcome = run_rule(&rhs, input);
        assert_eq!(lhs_outcome.consumed, rhs_outcome.consumed, "input {input:?}");
    }
}

#[test]
fn do_while_separated_values() {
    let rule = do_while(capture(char_class("ASCII digit", |c| c.is_ascii_digit())), lit(","));
    let outcome = run_rule(&rule, "1,2,3");
    assert_eq!(outcome.consumed, Some(5));
    assert_eq!(outcome.values.len(), 3);
}

#[test]
fn committed_condition_makes_body_failure_fatal() {
    // After the separator commits, a missing digit is an error, not the end
    // of the loop.
    let rule = do_while(char_class("ASCII digit", |c| c.is_ascii_digit()), lit(","));
    assert_fails(&rule, "1,", "expected char class");
}

#[test]
fn while_matcher_succeeds_and_restores_on_body_failure() {
    let rule = while_(lit(",") >> lit("a"));
    let mut reader = Reader::new("a");
    assert!(rule.matches(&mut reader));
    assert_eq!(reader.position().to_usize(), 0);

    // The third iteration's condition commits but its body fails; the reader
    // is restored to the start of that iteration.
    let mut reader = Reader::new(",a,a,b");
    assert!(rule.matches(&mut reader));
    assert_eq!(reader.position().to_usize(), 4);
}

#[test]
fn reader_position_never_decreases_on_success() {
    let rule = while_(lit("ab"));
    for input in ["", "ab", "abab", "abx"] {
        let outcome = run_rule(&rule, input);
        let consumed = outcome.consumed.unwrap();
        assert!(consumed <= input.len());
    }
}
