//! Delimited content parsing and escape sequences.
//!
//! [delimited] builds rules of the shape *open, content, close*: everything
//! between the delimiters is matched by a content token and aggregated into
//! a sink, one lexeme per unbroken content run. An optional escape branch is
//! tried between content matches; [escape] builds such branches fluently.
//!
//! ```
//! use parseworks::prelude::*;
//!
//! // "…" strings where \n escapes a newline and \\ escapes a backslash.
//! let string = quoted().of_escaped(
//!     any_char(),
//!     backslash_escape().lit_c('n', '\n').lit_c_self('\\'),
//! );
//! # let _ = string;
//! ```
//!
//! The closing delimiter is tried before the content token, so a greedy
//! content matcher never swallows it. Reaching the end of input before the
//! close reports a [missing delimiter](crate::error::MissingDelimiter)
//! spanning the unterminated content.

use crate::rule::{DelimitedRule, Expr, RaiseKind, Rule};
use crate::token::{self, TokenRule};
use crate::value::Value;

/// Builder for paired-delimiter rules. Created by [delimited].
#[derive(Debug, Clone)]
pub struct Delimited {
    open: Rule,
    close: Rule,
    ws: Option<Rule>,
}

/// Builds a paired-delimiter rule.
///
/// Accepts either a single rule, used as both the open and the close
/// delimiter, or an `(open, close)` pair. Both delimiters must be branches.
pub fn delimited(delimiters: impl Into<Delimited>) -> Delimited {
    delimiters.into()
}

impl From<Rule> for Delimited {
    fn from(delimiter: Rule) -> Delimited {
        (delimiter.clone(), delimiter).into()
    }
}

impl From<(Rule, Rule)> for Delimited {
    fn from((open, close): (Rule, Rule)) -> Delimited {
        if !open.is_branch() || !close.is_branch() {
            panic!["delimiters must be branches"];
        }
        Delimited {
            open,
            close,
            ws: None,
        }
    }
}

impl Delimited {
    /// Attaches whitespace handling around the opening delimiter.
    ///
    /// Once the open matches, whitespace is disabled for the entire body
    /// until after the close.
    pub fn whitespaced(mut self, ws: Rule) -> Delimited {
        if !ws.is_pattern() {
            panic!["a whitespace rule must be a pattern"];
        }
        self.ws = Some(ws);
        self
    }

    /// The opening delimiter alone.
    pub fn open(&self) -> Rule {
        self.open.clone()
    }

    /// The closing delimiter alone. The close never has any whitespace.
    pub fn close(&self) -> Rule {
        self.close.clone()
    }

    /// The delimited rule with `content` matching the content.
    pub fn of(self, content: Rule) -> Rule {
        self.build(content, None)
    }

    /// The delimited rule with an escape branch tried between content
    /// matches.
    pub fn of_escaped(self, content: Rule, escape: impl Into<Rule>) -> Rule {
        let escape = escape.into();
        if !escape.is_branch() {
            panic!["an escape must be a branch"];
        }
        self.build(content, Some(escape))
    }

    fn build(self, content: Rule, escape: Option<Rule>) -> Rule {
        let content = token::expect_token(&content, "delimited content");
        reject_zero_width(&content);
        Rule::new(Expr::Delimited(DelimitedRule {
            open: self.open,
            close: self.close,
            content,
            escape,
            ws: self.ws,
        }))
    }
}

/// A content token that cannot reject and can match empty would make the
/// content loop spin forever at the same position; such grammars are
/// rejected when they are built.
fn reject_zero_width(content: &TokenRule) {
    let engine = content.engine();
    if !engine.can_fail() && engine.can_match_empty() {
        panic![
            "delimited content must be a token that consumes input; \
             an infallible zero-width token like any() would never \
             reach the closing delimiter"
        ];
    }
}

/// `"`-delimited content.
pub fn quoted() -> Delimited {
    delimited(token::lit("\""))
}

/// `"""`-delimited content.
pub fn triple_quoted() -> Delimited {
    delimited(token::lit("\"\"\""))
}

/// `'`-delimited content.
pub fn single_quoted() -> Delimited {
    delimited(token::lit("'"))
}

/// `` ` ``-delimited content.
pub fn backticked() -> Delimited {
    delimited(token::lit("`"))
}

/// ` `` `-delimited content.
pub fn double_backticked() -> Delimited {
    delimited(token::lit("``"))
}

/// ` ``` `-delimited content.
pub fn triple_backticked() -> Delimited {
    delimited(token::lit("```"))
}

/// Builder for escape-sequence branches. Created by [escape].
///
/// The built rule is a branch: if the escape token does not match, the branch
/// backtracks; if it matches but none of the added cases do, an
/// [invalid escape sequence](crate::error::InvalidEscapeSequence) error is
/// reported and the branch cancels.
#[derive(Debug, Clone)]
pub struct Escape {
    token: Rule,
    cases: Vec<Rule>,
}

/// Builds an escape branch starting with the marker `token`.
pub fn escape(token: Rule) -> Escape {
    if !token.is_token() {
        panic!["the escape marker must be a token"];
    }
    Escape {
        token,
        cases: vec![],
    }
}

impl Escape {
    /// Adds a generic branch tried after the escape marker.
    pub fn rule(mut self, branch: Rule) -> Escape {
        if !branch.is_branch() {
            panic!["escape cases must be branches"];
        }
        self.cases.push(branch);
        self
    }

    /// Adds a case that matches `token` and delivers its lexeme.
    pub fn capture(self, token: Rule) -> Escape {
        self.rule(crate::rule::capture(token))
    }

    /// Adds a case that matches the character `c` and delivers `value`.
    pub fn lit_c(self, c: char, value: impl Into<Value>) -> Escape {
        self.rule(token::lit_c(c) >> crate::rule::value(value))
    }

    /// Adds a case that matches the character `c` and delivers `c` itself.
    pub fn lit_c_self(self, c: char) -> Escape {
        self.lit_c(c, c)
    }

    /// Adds a case that matches the literal `s` and delivers `value`.
    pub fn lit(self, s: &str, value: impl Into<Value>) -> Escape {
        self.rule(token::lit(s) >> crate::rule::value(value))
    }

    /// Adds a case that matches the literal `s` and delivers `s` itself.
    pub fn lit_self(self, s: &str) -> Escape {
        self.lit(s, s)
    }
}

impl From<Escape> for Rule {
    fn from(escape: Escape) -> Rule {
        if escape.cases.is_empty() {
            return escape.token;
        }
        let mut alternatives = escape.cases;
        alternatives.push(Rule::new(Expr::Raise(RaiseKind::InvalidEscape)));
        escape.token >> Rule::choice(alternatives)
    }
}

/// An escape branch starting with a backslash.
pub fn backslash_escape() -> Escape {
    escape(token::lit_c('\\'))
}

/// An escape branch starting with a dollar sign.
pub fn dollar_escape() -> Escape {
    escape(token::lit_c('$'))
}
