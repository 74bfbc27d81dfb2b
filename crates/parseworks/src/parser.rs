//! Rule evaluation.
//!
//! This module is the single dispatch point over the rule tree. Each rule
//! kind is evaluated in up to three forms:
//!
//! - [parse_expr]: the committed parse. On failure an error has already been
//!   reported through the context.
//! - [try_parse_expr]: the branch protocol, returning the three-valued
//!   [TryParseResult]. The branch's condition is first matched context-free
//!   on a copy of the reader; if it declines the branch backtracks having
//!   touched nothing, and if it matches the rule is parsed through the
//!   committed path, so observation and error reporting happen in exactly
//!   one place.
//! - [match_expr]: the matcher form. Context-free, value-free, restores the
//!   reader on failure. Used for branch conditions, whitespace skipping and
//!   `while_` iteration.
//!
//! The drive functions [parse] and [parse_rule] create the context and
//! reader and hand them to the root rule.

use crate::context::{Context, Handler};
use crate::error;
use crate::production::Production;
use crate::reader::{Lexeme, Pos, Reader};
use crate::rule::{DelimitedRule, Expr, RaiseKind, Rule};
use crate::token::TokenRule;
use crate::value::Value;

/// Marker returned when a rule has failed.
///
/// The error itself has already been reported through the context; this type
/// only unwinds the parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Failed;

pub(crate) type Status = Result<(), Failed>;

/// The three-valued outcome of trying a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TryParseResult {
    /// The branch committed and succeeded.
    Ok,
    /// The branch committed and then failed. No further alternatives may be
    /// tried; an error has been reported.
    Canceled,
    /// The branch did not commit. The reader is untouched.
    Backtracked,
}

/// Result of driving a rule over an input.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    /// The arguments the rule produced.
    pub values: Vec<Value>,
    /// The reader position after the parse.
    pub end: Pos,
}

/// Parses an input as the production `P`.
///
/// Returns the production's value on success. On failure every error has
/// been reported through the handler.
pub fn parse<P: Production>(
    source: &str,
    handler: &mut dyn Handler,
) -> Result<Option<Value>, Failed> {
    let rule = crate::production::p::<P>();
    let outcome = parse_rule(&rule, source, handler)?;
    Ok(outcome.values.into_iter().next())
}

/// Parses an input with an anonymous rule.
///
/// This is the entry point used by tests and by hosts that embed a rule
/// without declaring a production for it.
pub fn parse_rule(rule: &Rule, source: &str, handler: &mut dyn Handler) -> Result<Outcome, Failed> {
    if u32::try_from(source.len()).is_err() {
        panic!["inputs of 4 GiB or more are not supported"];
    }
    let mut context = Context::new(handler, source);
    let mut reader = Reader::new(source);
    let mut values = Vec::new();
    parse_expr(&mut context, &mut reader, rule, None, &mut values)?;
    Ok(Outcome {
        values,
        end: reader.position(),
    })
}

pub(crate) fn parse_expr(
    context: &mut Context,
    reader: &mut Reader,
    rule: &Rule,
    ws: Option<&Rule>,
    values: &mut Vec<Value>,
) -> Status {
    match &*rule.expr {
        Expr::Token(token) => parse_token(context, reader, token, ws),
        Expr::Capture(token) => {
            skip_whitespace(reader, ws);
            let begin = reader.position();
            match token.engine().run(reader) {
                Ok(()) => {
                    let lexeme = Lexeme::new(begin, reader.position());
                    context.token(token.kind(), lexeme);
                    values.push(Value::Lexeme(lexeme));
                    Ok(())
                }
                Err(code) => {
                    token.token_error(context, reader, code);
                    Err(Failed)
                }
            }
        }
        Expr::Value(value) => {
            values.push(value.clone());
            Ok(())
        }
        Expr::Seq(elements) => {
            for element in elements {
                parse_expr(context, reader, element, ws, values)?;
            }
            Ok(())
        }
        Expr::Choice(alternatives) => {
            for alternative in alternatives {
                match try_parse_expr(context, reader, alternative, ws, values) {
                    TryParseResult::Ok => return Ok(()),
                    TryParseResult::Canceled => return Err(Failed),
                    TryParseResult::Backtracked => continue,
                }
            }
            context.error(Box::new(error::ExhaustedChoice {
                position: reader.position(),
            }));
            Err(Failed)
        }
        Expr::Branch { condition, then } => {
            parse_expr(context, reader, condition, ws, values)?;
            match then {
                Some(then) => parse_expr(context, reader, then, ws, values),
                None => Ok(()),
            }
        }
        Expr::While { condition, then } => {
            loop {
                let iteration_start = *reader;
                if !match_expr(reader, condition, ws) {
                    return Ok(());
                }
                if let Some(then) = then {
                    parse_expr(context, reader, then, ws, values)?;
                }
                // A zero-width iteration would never terminate.
                if reader.position() == iteration_start.position() {
                    return Ok(());
                }
            }
        }
        Expr::Delimited(delimited) => parse_delimited(context, reader, delimited, values),
        Expr::Production { name, rule, .. } => {
            parse_production(context, reader, *name, *rule, ws, values)
        }
        Expr::Whitespaced { rule, ws } => parse_expr(context, reader, rule, Some(ws), values),
        Expr::NoWhitespace(rule) => parse_expr(context, reader, rule, None, values),
        Expr::Raise(kind) => {
            context.error(raise_error(*kind, reader.position()));
            Err(Failed)
        }
    }
}

pub(crate) fn try_parse_expr(
    context: &mut Context,
    reader: &mut Reader,
    rule: &Rule,
    ws: Option<&Rule>,
    values: &mut Vec<Value>,
) -> TryParseResult {
    match &*rule.expr {
        Expr::Whitespaced { rule, ws } => try_parse_expr(context, reader, rule, Some(ws), values),
        Expr::NoWhitespace(rule) => try_parse_expr(context, reader, rule, None, values),
        Expr::Choice(alternatives) => {
            for alternative in alternatives {
                match try_parse_expr(context, reader, alternative, ws, values) {
                    TryParseResult::Backtracked => continue,
                    committed => return committed,
                }
            }
            TryParseResult::Backtracked
        }
        _ => {
            let mut probe = *reader;
            if !match_condition(context, &mut probe, rule, ws) {
                return TryParseResult::Backtracked;
            }
            match parse_expr(context, reader, rule, ws, values) {
                Ok(()) => TryParseResult::Ok,
                Err(Failed) => TryParseResult::Canceled,
            }
        }
    }
}

/// Matches the condition of a branch on a probe reader.
///
/// Only the part of the rule that decides whether the branch commits is
/// matched; for a `condition >> then` branch that is the condition alone.
/// Unconditional branches (values, raises, `while_`) always commit.
fn match_condition(
    context: &mut Context,
    reader: &mut Reader,
    rule: &Rule,
    ws: Option<&Rule>,
) -> bool {
    match &*rule.expr {
        Expr::Token(token) | Expr::Capture(token) => {
            skip_whitespace(reader, ws);
            token.engine().run(reader).is_ok()
        }
        Expr::Value(_) | Expr::Raise(_) | Expr::While { .. } => true,
        Expr::Seq(_) => match_expr(reader, rule, ws),
        Expr::Branch { condition, .. } => match_expr(reader, condition, ws),
        Expr::Choice(alternatives) => alternatives.iter().any(|alternative| {
            let mut probe = *reader;
            match_condition(context, &mut probe, alternative, ws)
        }),
        Expr::Delimited(delimited) => {
            skip_whitespace(reader, delimited.ws.as_ref());
            match_expr(reader, &delimited.open, None)
        }
        Expr::Production { name, rule, .. } => {
            let resolved = context.resolve(*name, *rule);
            match_condition(context, reader, &resolved, ws)
        }
        Expr::Whitespaced { rule, ws } => match_condition(context, reader, rule, Some(ws)),
        Expr::NoWhitespace(rule) => match_condition(context, reader, rule, None),
    }
}

/// The matcher form: context-free, value-free, restores the reader on
/// failure.
///
/// Panics on rule kinds that have no matcher (values, captures, delimited
/// content, productions); such rules cannot appear where a matcher is
/// required because construction validates pattern capability.
pub(crate) fn match_expr(reader: &mut Reader, rule: &Rule, ws: Option<&Rule>) -> bool {
    match &*rule.expr {
        Expr::Token(token) => {
            let save = *reader;
            skip_whitespace(reader, ws);
            if token.engine().run(reader).is_ok() {
                true
            } else {
                *reader = save;
                false
            }
        }
        Expr::Seq(elements) => {
            let save = *reader;
            for element in elements {
                if !match_expr(reader, element, ws) {
                    *reader = save;
                    return false;
                }
            }
            true
        }
        Expr::Choice(alternatives) => alternatives
            .iter()
            .any(|alternative| match_expr(reader, alternative, ws)),
        Expr::Branch { condition, then } => {
            let save = *reader;
            if !match_expr(reader, condition, ws) {
                return false;
            }
            if let Some(then) = then {
                if !match_expr(reader, then, ws) {
                    *reader = save;
                    return false;
                }
            }
            true
        }
        Expr::While { condition, then } => {
            loop {
                let iteration_start = *reader;
                if !match_expr(reader, condition, ws) {
                    return true;
                }
                if let Some(then) = then {
                    if !match_expr(reader, then, ws) {
                        // The failed iteration is discarded; the matcher
                        // itself still succeeds.
                        *reader = iteration_start;
                        return true;
                    }
                }
                if reader.position() == iteration_start.position() {
                    return true;
                }
            }
        }
        Expr::Whitespaced { rule, ws } => match_expr(reader, rule, Some(ws)),
        Expr::NoWhitespace(rule) => match_expr(reader, rule, None),
        Expr::Capture(_)
        | Expr::Value(_)
        | Expr::Delimited(_)
        | Expr::Production { .. }
        | Expr::Raise(_) => {
            panic!["this rule kind has no matcher; only patterns can be matched"]
        }
    }
}

fn parse_token(
    context: &mut Context,
    reader: &mut Reader,
    token: &TokenRule,
    ws: Option<&Rule>,
) -> Status {
    skip_whitespace(reader, ws);
    let begin = reader.position();
    match token.engine().run(reader) {
        Ok(()) => {
            context.token(token.kind(), Lexeme::new(begin, reader.position()));
            Ok(())
        }
        Err(code) => {
            token.token_error(context, reader, code);
            Err(Failed)
        }
    }
}

fn skip_whitespace(reader: &mut Reader, ws: Option<&Rule>) {
    let Some(ws) = ws else { return };
    loop {
        let before = reader.position();
        if !match_expr(reader, ws, None) || reader.position() == before {
            return;
        }
    }
}

/// The delimited content loop.
///
/// Whitespace applies only around the opening delimiter; from the open to
/// past the close, whitespace is disabled.
fn parse_delimited(
    context: &mut Context,
    reader: &mut Reader,
    delimited: &DelimitedRule,
    values: &mut Vec<Value>,
) -> Status {
    skip_whitespace(reader, delimited.ws.as_ref());
    parse_expr(context, reader, &delimited.open, None, values)?;

    let del_begin = reader.position();
    let mut sink = context.sink();
    loop {
        // Try to finish: the close is tried before the content matcher so a
        // greedy content matcher cannot swallow the closing delimiter.
        let mark = values.len();
        match try_parse_expr(context, reader, &delimited.close, None, values) {
            TryParseResult::Ok => {
                values.insert(mark, sink.finish());
                return Ok(());
            }
            TryParseResult::Canceled => return Err(Failed),
            TryParseResult::Backtracked => {}
        }

        if reader.eof() {
            context.error(Box::new(error::MissingDelimiter {
                span: Lexeme::new(del_begin, reader.position()),
            }));
            return Err(Failed);
        }

        // The escape is tried before plain content, so escapes take priority.
        if let Some(escape) = &delimited.escape {
            let mut escaped = Vec::new();
            match try_parse_expr(context, reader, escape, None, &mut escaped) {
                TryParseResult::Ok => {
                    for value in escaped {
                        sink.push(value);
                    }
                    continue;
                }
                TryParseResult::Canceled => return Err(Failed),
                TryParseResult::Backtracked => {}
            }
        }

        let begin = reader.position();
        match delimited.content.engine().run(reader) {
            Ok(()) => {
                let lexeme = Lexeme::new(begin, reader.position());
                context.token(delimited.content.kind(), lexeme);
                sink.push(Value::Lexeme(lexeme));
            }
            Err(code) => {
                delimited.content.token_error(context, reader, code);
                return Err(Failed);
            }
        }
    }
}

fn parse_production(
    context: &mut Context,
    reader: &mut Reader,
    name: &'static str,
    rule: fn() -> Rule,
    ws: Option<&Rule>,
    values: &mut Vec<Value>,
) -> Status {
    let resolved = context.resolve(name, rule);
    if context.depth() >= context.recursion_limit() {
        context.error(Box::new(error::RecursionLimitExceeded {
            position: reader.position(),
            limit: context.recursion_limit(),
        }));
        return Err(Failed);
    }

    context.enter_production(name, reader.position());
    let mut production_values = Vec::new();
    let status = parse_expr(context, reader, &resolved, ws, &mut production_values);
    let result = match status {
        Ok(()) => {
            if let Some(value) = context.production_value(name, production_values) {
                values.push(value);
            }
            Ok(())
        }
        Err(failed) => Err(failed),
    };
    // The frame pops on every exit path.
    context.exit_production();
    result
}

fn raise_error(kind: RaiseKind, position: Pos) -> Box<dyn error::ParseError> {
    match kind {
        RaiseKind::InvalidEscape => Box::new(error::InvalidEscapeSequence { position }),
    }
}
