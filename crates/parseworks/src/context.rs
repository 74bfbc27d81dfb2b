//! Parse contexts and the host handler seam.

use crate::error::{ParseError, TracedError};
use crate::reader::{Lexeme, Pos};
use crate::rule::Rule;
use crate::token::TokenKind;
use crate::value::{ListSink, Sink, Value};
use std::collections::HashMap;

/// The host side of a parse.
///
/// A handler receives everything a parse produces: values through sinks and
/// production value folding, errors, and token observations. All methods
/// except [error](Handler::error) have defaults, so a minimal host only
/// decides what to do with errors.
pub trait Handler {
    /// Returns a fresh sink for a list-like rule.
    fn sink(&mut self) -> Box<dyn Sink> {
        Box::<ListSink>::default()
    }

    /// Called for every reported error.
    ///
    /// The engine always reports before unwinding; whether the parse
    /// continues afterwards is decided by the rules, not by this method.
    fn error(&mut self, error: TracedError);

    /// Observes a matched token span.
    fn token(&mut self, kind: TokenKind, lexeme: Lexeme) {
        let _ = (kind, lexeme);
    }

    /// Called when a production invocation commits.
    fn enter_production(&mut self, production: &'static str, start: Pos) {
        let _ = (production, start);
    }

    /// Called when a production invocation finishes, regardless of outcome.
    fn exit_production(&mut self, production: &'static str) {
        let _ = production;
    }

    /// Folds the values a production's rule produced into the production's
    /// value.
    ///
    /// The default delivers nothing for zero values, the value itself for one,
    /// and a [Value::List] otherwise.
    fn production_value(&mut self, production: &'static str, mut values: Vec<Value>) -> Option<Value> {
        let _ = production;
        match values.len() {
            0 => None,
            1 => values.pop(),
            _ => Some(Value::List(values)),
        }
    }

    /// The maximum number of nested production invocations.
    fn recursion_limit(&self) -> usize {
        512
    }
}

/// One entered production.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub production: &'static str,
    pub start: Pos,
}

/// The engine-owned state of a parse.
///
/// The context holds the handler, the production stack and the table of
/// productions resolved so far. It is created by the drive functions in
/// [`crate::parser`] and threaded through every rule; rules never retain it
/// across a return.
pub struct Context<'a> {
    handler: &'a mut dyn Handler,
    source: &'a str,
    stack: Vec<Frame>,
    productions: HashMap<&'static str, Rule>,
    error_count: usize,
}

impl<'a> Context<'a> {
    pub fn new(handler: &'a mut dyn Handler, source: &'a str) -> Context<'a> {
        Context {
            handler,
            source,
            stack: Vec::new(),
            productions: HashMap::new(),
            error_count: 0,
        }
    }

    /// The number of errors reported so far.
    pub fn error_count(&self) -> usize {
        self.error_count
    }

    /// The currently entered productions, outermost first.
    pub fn stack(&self) -> &[Frame] {
        &self.stack
    }

    pub(crate) fn sink(&mut self) -> Box<dyn Sink> {
        self.handler.sink()
    }

    pub(crate) fn error(&mut self, error: Box<dyn ParseError>) {
        self.error_count += 1;
        self.handler
            .error(TracedError::new(error, self.source, &self.stack));
    }

    pub(crate) fn token(&mut self, kind: TokenKind, lexeme: Lexeme) {
        self.handler.token(kind, lexeme);
    }

    pub(crate) fn enter_production(&mut self, production: &'static str, start: Pos) {
        self.handler.enter_production(production, start);
        self.stack.push(Frame { production, start });
    }

    pub(crate) fn exit_production(&mut self) {
        if let Some(frame) = self.stack.pop() {
            self.handler.exit_production(frame.production);
        }
    }

    pub(crate) fn depth(&self) -> usize {
        self.stack.len()
    }

    pub(crate) fn recursion_limit(&self) -> usize {
        self.handler.recursion_limit()
    }

    pub(crate) fn production_value(
        &mut self,
        production: &'static str,
        values: Vec<Value>,
    ) -> Option<Value> {
        self.handler.production_value(production, values)
    }

    /// Resolves a production tag to its rule, materializing the rule on first
    /// use. Forward references and mutual recursion work because
    /// materialization happens at parse time, not at grammar construction
    /// time.
    pub(crate) fn resolve(&mut self, production: &'static str, rule: fn() -> Rule) -> Rule {
        self.productions
            .entry(production)
            .or_insert_with(rule)
            .clone()
    }
}
