/*!
parseworks unit testing library

This is a crate for writing unit tests for code that uses parseworks.
It is used extensively in the parseworks test suite itself, so those tests
are good examples of what this crate can do.

## Basic usage

The core entry point is [run_rule], which drives a rule over an input with a
recording [TestHandler] and returns a structured [Outcome]:

```
use parseworks::prelude::*;
use parseworks_testing::run_rule;

let rule = lit("abc");
let outcome = run_rule(&rule, "abcdef");
assert_eq!(outcome.consumed, Some(3));
```

`consumed` is `Some(n)` when the parse succeeded having consumed `n` bytes,
and `None` when it failed; on failure [Outcome::errors] records every
reported error in order.

## The test suite macro

Suites of input/outcome tests are best written with the [rule_suite] macro,
which generates one `#[test]` function per case:

```
use parseworks::prelude::*;

parseworks_testing::rule_suite![
    rule: lit("ab") + lit("c"),
    consume_tests((matches, "abc", 3), (matches_with_rest, "abcd", 3),),
    failure_tests((mismatch, "abd", "expected literal"),),
];
```
*/

use parseworks::context::Handler;
use parseworks::error::{Kind, TracedError};
use parseworks::parser;
use parseworks::reader::{Lexeme, Pos};
use parseworks::rule::Rule;
use parseworks::token::TokenKind;
use parseworks::value::Value;

/// A handler that records everything the parse reports.
pub struct TestHandler {
    pub errors: Vec<TracedError>,
    pub tokens: Vec<(TokenKind, Lexeme)>,
    pub entered: Vec<(&'static str, Pos)>,
    pub exited: Vec<&'static str>,
    pub recursion_limit: usize,
}

impl Default for TestHandler {
    fn default() -> TestHandler {
        TestHandler {
            errors: vec![],
            tokens: vec![],
            entered: vec![],
            exited: vec![],
            recursion_limit: 512,
        }
    }
}

impl Handler for TestHandler {
    fn error(&mut self, error: TracedError) {
        self.errors.push(error);
    }

    fn token(&mut self, kind: TokenKind, lexeme: Lexeme) {
        self.tokens.push((kind, lexeme));
    }

    fn enter_production(&mut self, production: &'static str, start: Pos) {
        self.entered.push((production, start));
    }

    fn exit_production(&mut self, production: &'static str) {
        self.exited.push(production);
    }

    fn recursion_limit(&self) -> usize {
        self.recursion_limit
    }
}

/// One reported error, summarized for assertions.
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorSummary {
    /// The error kind's stable name, e.g. `missing delimiter`.
    pub name: String,
    /// Where the error occurred.
    pub kind: Kind,
    pub title: String,
}

/// The result of driving a rule over an input.
#[derive(Debug)]
pub struct Outcome {
    /// Bytes consumed on success; `None` on failure.
    pub consumed: Option<usize>,
    /// The arguments the rule delivered.
    pub values: Vec<Value>,
    /// Every reported error, in report order.
    pub errors: Vec<ErrorSummary>,
    /// Every observed token span, in match order.
    pub tokens: Vec<(TokenKind, Lexeme)>,
    /// Every committed production invocation, in entry order.
    pub entered: Vec<(&'static str, Pos)>,
    /// Every finished production invocation, in exit order.
    pub exited: Vec<&'static str>,
}

impl Outcome {
    /// The name of the first reported error.
    pub fn first_error(&self) -> Option<&str> {
        self.errors.first().map(|e| e.name.as_str())
    }
}

/// Drives `rule` over `input` with a fresh recording handler.
pub fn run_rule(rule: &Rule, input: &str) -> Outcome {
    run_rule_with(rule, input, TestHandler::default())
}

/// Drives `rule` over `input` with a caller-configured handler.
pub fn run_rule_with(rule: &Rule, input: &str, mut handler: TestHandler) -> Outcome {
    let result = parser::parse_rule(rule, input, &mut handler);
    let (consumed, values) = match result {
        Ok(outcome) => (Some(outcome.end.to_usize()), outcome.values),
        Err(parser::Failed) => (None, vec![]),
    };
    Outcome {
        consumed,
        values,
        errors: handler
            .errors
            .iter()
            .map(|traced| ErrorSummary {
                name: traced.error.name().into(),
                kind: traced.error.kind(),
                title: traced.error.title(),
            })
            .collect(),
        tokens: handler.tokens,
        entered: handler.entered,
        exited: handler.exited,
    }
}

/// Asserts that `rule` parses `input` successfully, consuming exactly `want`
/// bytes.
pub fn assert_consumes(rule: &Rule, input: &str, want: usize) {
    let outcome = run_rule(rule, input);
    match outcome.consumed {
        Some(got) => {
            if got != want {
                panic![
                    "parse of {input:?} consumed {got} bytes, want {want} (values: {:?})",
                    outcome.values
                ];
            }
        }
        None => panic![
            "parse of {input:?} failed, want success consuming {want} bytes (errors: {:?})",
            outcome.errors
        ],
    }
}

/// Asserts that `rule` fails on `input` and that the first reported error
/// has the provided name.
pub fn assert_fails(rule: &Rule, input: &str, error_name: &str) {
    let outcome = run_rule(rule, input);
    if outcome.consumed.is_some() {
        panic![
            "parse of {input:?} succeeded consuming {} bytes, want failure with `{error_name}`",
            outcome.consumed.unwrap()
        ];
    }
    match outcome.first_error() {
        Some(got) => {
            if got != error_name {
                panic![
                    "parse of {input:?} failed with `{got}`, want `{error_name}` (all errors: {:?})",
                    outcome.errors
                ];
            }
        }
        None => panic![
            "parse of {input:?} failed without reporting an error, want `{error_name}`"
        ],
    }
}

/// Generates a suite of `#[test]` functions for one rule.
///
/// Each consume test asserts success and the number of bytes consumed; each
/// failure test asserts failure and the name of the first reported error.
/// The rule expression is evaluated fresh in every generated test.
#[macro_export]
macro_rules! rule_suite {
    (
        rule: $rule: expr,
        consume_tests( $( ($name: ident, $input: expr, $want: expr $(,)?) ),* $(,)? ),
        failure_tests( $( ($fail_name: ident, $fail_input: expr, $fail_error: expr $(,)?) ),* $(,)? ) $(,)?
    ) => {
        $(
            #[test]
            fn $name() {
                let rule = $rule;
                $crate::assert_consumes(&rule, $input, $want);
            }
        )*
        $(
            #[test]
            fn $fail_name() {
                let rule = $rule;
                $crate::assert_fails(&rule, $fail_input, $fail_error);
            }
        )*
    };
}
