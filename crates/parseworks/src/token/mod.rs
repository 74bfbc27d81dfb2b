//! Tokens: terminal rules backed by engines.
//!
//! A token wraps an [Engine](engine::Engine), the low-level matcher, together
//! with a [TokenKind] for observation. The adapter that turns a token into a
//! rule lives in [`crate::parser`]: on success it reports the matched span
//! through the context's token observer and on failure it builds the
//! structured error the engine's code describes.

pub mod engine;
pub mod trace;

use crate::context::Context;
use crate::error;
use crate::reader::{Lexeme, Reader};
use crate::rule::{Expr, Rule};
use self::engine::{Code, Engine};
use std::rc;

/// The kind of a matched token, reported to the context's token observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TokenKind {
    Literal,
    CharClass,
    Any,
    Until,
    Minus,
}

/// A terminal rule: an engine plus the kind it reports.
#[derive(Debug, Clone)]
pub struct TokenRule {
    engine: rc::Rc<dyn Engine>,
    kind: TokenKind,
}

impl TokenRule {
    pub(crate) fn new(engine: rc::Rc<dyn Engine>, kind: TokenKind) -> TokenRule {
        TokenRule { engine, kind }
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub(crate) fn engine(&self) -> &rc::Rc<dyn Engine> {
        &self.engine
    }

    /// Builds and reports the structured error for a failed engine run.
    ///
    /// The reader must be positioned where the engine left it, which is the
    /// failure position.
    pub(crate) fn token_error(&self, context: &mut Context, reader: &Reader, code: Code) {
        let position = reader.position();
        let error: Box<dyn error::ParseError> = match code {
            Code::Literal { literal, index } => Box::new(error::ExpectedLiteral {
                position,
                literal,
                index,
            }),
            Code::Class { name } => Box::new(error::ExpectedCharClass { position, name }),
            Code::Minus { begin, end } => Box::new(error::MinusFailure {
                span: Lexeme::new(begin, end),
            }),
        };
        context.error(error);
    }
}

fn token(engine: rc::Rc<dyn Engine>, kind: TokenKind) -> Rule {
    Rule::new(Expr::Token(TokenRule::new(engine, kind)))
}

/// Matches the literal `text`.
///
/// Panics if `text` is empty.
pub fn lit(text: impl Into<String>) -> Rule {
    let text = text.into();
    if text.is_empty() {
        panic!["literal tokens must not be empty"];
    }
    token(
        rc::Rc::new(engine::LiteralEngine { text }),
        TokenKind::Literal,
    )
}

/// Matches the single character `c`.
pub fn lit_c(c: char) -> Rule {
    lit(c.to_string())
}

/// Matches any single code point. Fails only at the end of input.
pub fn any_char() -> Rule {
    token(rc::Rc::new(engine::CodePointEngine), TokenKind::CharClass)
}

/// Matches everything up to the end of input, including nothing.
///
/// This token cannot fail and can match empty, so it is rejected as
/// `delimited` content.
pub fn any() -> Rule {
    token(rc::Rc::new(engine::AnyEngine), TokenKind::Any)
}

/// Matches everything up to and including a match of `condition`.
///
/// Fails at the end of input if `condition` never matched, with
/// `condition`'s own error.
pub fn until(condition: Rule) -> Rule {
    let condition = expect_token(&condition, "until");
    token(
        rc::Rc::new(engine::UntilEngine {
            condition: condition.engine().clone(),
        }),
        TokenKind::Until,
    )
}

/// Matches a single code point satisfying `pred`. The name appears in errors.
pub fn char_class(name: &'static str, pred: fn(char) -> bool) -> Rule {
    token(
        rc::Rc::new(engine::ClassEngine { name, pred }),
        TokenKind::CharClass,
    )
}

/// Matches one ASCII whitespace character. The usual whitespace argument for
/// [Rule::whitespaced] and [crate::delimited::Delimited::whitespaced].
pub fn ascii_space() -> Rule {
    char_class("ASCII whitespace", |c| c.is_ascii_whitespace())
}

pub(crate) fn minus(inner: &Rule, except: &Rule) -> Rule {
    let inner = expect_token(inner, "the left operand of minus");
    let except = expect_token(except, "the right operand of minus");
    token(
        rc::Rc::new(engine::MinusEngine {
            inner: inner.engine().clone(),
            except: except.engine().clone(),
        }),
        TokenKind::Minus,
    )
}

/// Extracts the token out of a rule, panicking with a construction error if
/// the rule is not a token.
pub(crate) fn expect_token(rule: &Rule, what: &str) -> TokenRule {
    match &*rule.expr {
        Expr::Token(token) => token.clone(),
        _ => panic!["{what} requires a token, got a composite rule"],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        assert_eq!(expect_token(&lit("ab"), "test").kind(), TokenKind::Literal);
        assert_eq!(expect_token(&any(), "test").kind(), TokenKind::Any);
        assert_eq!(
            expect_token(&until(lit("!")), "test").kind(),
            TokenKind::Until
        );
        assert_eq!(
            expect_token(&ascii_space(), "test").kind(),
            TokenKind::CharClass
        );
    }

    #[test]
    #[should_panic]
    fn empty_literal() {
        lit("");
    }

    #[test]
    #[should_panic]
    fn until_of_composite() {
        until(lit("a") + lit("b"));
    }
}
