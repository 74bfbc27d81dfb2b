//! Error handling.
//!
//! Errors are structured values, not strings. Every error kind is a Rust type
//! implementing [ParseError] with a stable name and a small set of positional
//! fields. The engine reports errors through the context as they are
//! detected, wrapped in a [TracedError] that joins the error with its source
//! line and a snapshot of the production stack; rules then return failure.
//! Backtracking is not an error and reports nothing.

use crate::context::Frame;
use crate::reader::{Lexeme, Pos};
use crate::token::trace::{self, SourceTrace};

pub mod display;
#[cfg(feature = "serde")]
mod serde;
#[cfg(feature = "serde")]
use self::serde::{deserialize_error, serialize_error};

/// Where in the input an error occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub enum Kind {
    /// The error covers a span of input.
    Span(Lexeme),
    /// The error points at a single position.
    Position(Pos),
    /// The error was detected at the end of input.
    EndOfInput(Pos),
}

impl Kind {
    pub(crate) fn span(&self) -> (Pos, Pos) {
        match self {
            Kind::Span(lexeme) => (lexeme.begin(), lexeme.end()),
            Kind::Position(pos) | Kind::EndOfInput(pos) => (*pos, *pos),
        }
    }
}

/// A structured parse error.
pub trait ParseError: std::fmt::Debug + 'static {
    /// The stable name of this error kind.
    fn name(&self) -> &str;

    /// Where the error occurred.
    fn kind(&self) -> Kind;

    /// A one-line description of the error.
    fn title(&self) -> String;

    fn notes(&self) -> Vec<display::Note> {
        vec![]
    }

    /// The text shown next to the caret underline in the rendered error.
    fn source_annotation(&self) -> String {
        match self.kind() {
            Kind::Span(_) => "in this input".into(),
            Kind::Position(_) => "here".into(),
            Kind::EndOfInput(_) => "the input ended here".into(),
        }
    }
}

/// The reader reached the end of input before the closing delimiter.
///
/// The span runs from the end of the opening delimiter to the position where
/// the end of input was observed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingDelimiter {
    pub span: Lexeme,
}

impl ParseError for MissingDelimiter {
    fn name(&self) -> &str {
        "missing delimiter"
    }

    fn kind(&self) -> Kind {
        Kind::Span(self.span)
    }

    fn title(&self) -> String {
        "missing closing delimiter".into()
    }

    fn source_annotation(&self) -> String {
        "the input ended inside this delimited content".into()
    }
}

/// An escape marker matched but none of the escape alternatives did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidEscapeSequence {
    pub position: Pos,
}

impl ParseError for InvalidEscapeSequence {
    fn name(&self) -> &str {
        "invalid escape sequence"
    }

    fn kind(&self) -> Kind {
        Kind::Position(self.position)
    }

    fn title(&self) -> String {
        "invalid escape sequence".into()
    }

    fn source_annotation(&self) -> String {
        "no escape rule matches here".into()
    }
}

/// A literal token failed to match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedLiteral {
    /// The position of the first mismatched character.
    pub position: Pos,
    pub literal: String,
    /// How many characters of the literal had already matched.
    pub index: usize,
}

impl ParseError for ExpectedLiteral {
    fn name(&self) -> &str {
        "expected literal"
    }

    fn kind(&self) -> Kind {
        Kind::Position(self.position)
    }

    fn title(&self) -> String {
        format!["expected the literal `{}`", self.literal]
    }

    fn notes(&self) -> Vec<display::Note> {
        if self.index == 0 {
            return vec![];
        }
        vec![format![
            "the first {} character(s) of the literal already matched",
            self.index
        ]
        .into()]
    }
}

/// A character class token failed to match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpectedCharClass {
    pub position: Pos,
    pub name: &'static str,
}

impl ParseError for ExpectedCharClass {
    fn name(&self) -> &str {
        "expected char class"
    }

    fn kind(&self) -> Kind {
        Kind::Position(self.position)
    }

    fn title(&self) -> String {
        format!["expected a {} character", self.name]
    }
}

/// A minus exception matched the whole of the inner token's match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinusFailure {
    pub span: Lexeme,
}

impl ParseError for MinusFailure {
    fn name(&self) -> &str {
        "minus failure"
    }

    fn kind(&self) -> Kind {
        Kind::Span(self.span)
    }

    fn title(&self) -> String {
        "the matched input is excluded by a minus rule".into()
    }
}

/// A choice was parsed unconditionally and every alternative backtracked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExhaustedChoice {
    pub position: Pos,
}

impl ParseError for ExhaustedChoice {
    fn name(&self) -> &str {
        "exhausted choice"
    }

    fn kind(&self) -> Kind {
        Kind::Position(self.position)
    }

    fn title(&self) -> String {
        "no alternative of the choice matched".into()
    }
}

/// A production invocation exceeded the handler's recursion limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecursionLimitExceeded {
    pub position: Pos,
    pub limit: usize,
}

impl ParseError for RecursionLimitExceeded {
    fn name(&self) -> &str {
        "recursion limit exceeded"
    }

    fn kind(&self) -> Kind {
        Kind::Position(self.position)
    }

    fn title(&self) -> String {
        format![
            "the grammar recursed through more than {} productions",
            self.limit
        ]
    }

    fn notes(&self) -> Vec<display::Note> {
        vec!["the limit is configured by the handler's recursion_limit method".into()]
    }
}

/// One production on the stack at the time an error was reported.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct StackFrame {
    pub production: String,
    pub start: Pos,
    pub trace: SourceTrace,
}

/// A reported error joined with its source trace and production provenance.
///
/// Note that serializing and deserializing this type erases the concrete
/// error type; the round-tripped error reports the same name, kind, title and
/// notes but is no longer downcastable.
#[derive(Debug)]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct TracedError {
    #[cfg_attr(
        feature = "serde",
        serde(
            serialize_with = "serialize_error",
            deserialize_with = "deserialize_error"
        )
    )]
    pub error: Box<dyn ParseError>,
    /// Trace of the error's own location.
    pub trace: SourceTrace,
    /// The production stack at the time of the report, outermost first.
    pub stack: Vec<StackFrame>,
}

impl TracedError {
    pub(crate) fn new(error: Box<dyn ParseError>, source: &str, stack: &[Frame]) -> TracedError {
        let (begin, end) = error.kind().span();
        TracedError {
            trace: trace::trace(source, begin, end),
            stack: stack
                .iter()
                .map(|frame| StackFrame {
                    production: frame.production.into(),
                    start: frame.start,
                    trace: trace::trace(source, frame.start, frame.start),
                })
                .collect(),
            error,
        }
    }
}

impl std::fmt::Display for TracedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        display::format_error(f, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_annotations() {
        let error = ExpectedCharClass {
            position: Pos::default(),
            name: "ASCII digit",
        };
        assert_eq!(error.source_annotation(), "here");
        assert_eq!(error.name(), "expected char class");
        assert_eq!(error.title(), "expected a ASCII digit character");
    }

    #[test]
    fn traced_error_stack() {
        let source = "abc\ndef";
        let error = Box::new(ExhaustedChoice {
            position: Pos::from_usize(5),
        });
        let frames = [Frame {
            production: "root",
            start: Pos::default(),
        }];
        let traced = TracedError::new(error, source, &frames);
        assert_eq!(traced.trace.line_number, 2);
        assert_eq!(traced.stack.len(), 1);
        assert_eq!(traced.stack[0].production, "root");
        assert_eq!(traced.stack[0].trace.line_number, 1);
    }
}
