//! # parseworks
//!
//! A parser combinator library. Grammars are built by composing small,
//! typed grammar fragments ([rules](rule::Rule)) into
//! [productions](production::Production), and a single-pass,
//! backtracking-capable engine drives the parse over an input
//! [reader](reader::Reader), delivering values to a host-supplied
//! [handler](context::Handler) and reporting
//! [structured errors](error::ParseError).
//!
//! The building blocks:
//!
//! - terminal [tokens](token) backed by low-level matching
//!   [engines](token::engine);
//! - the composition operators `+` (sequence), `|` (choice), `>>` (branch)
//!   and `-` (minus) on [Rule](rule::Rule);
//! - [delimited] content parsing with [escape](delimited::escape)
//!   sequences;
//! - [iteration](repeat) with `while_`, `while_one` and `do_while`;
//! - [production](production) invocation with `p` and `recurse`, including
//!   forward references and mutual recursion;
//! - [terminator](terminator) sugar for rules ending in a fixed token.
//!
//! Grammars are fixed at build time; invalid compositions (for example a
//! choice alternative that can never decline) panic when the grammar is
//! built, not during a parse.

pub mod context;
pub mod delimited;
pub mod error;
pub mod parser;
pub mod production;
pub mod reader;
pub mod repeat;
pub mod rule;
pub mod terminator;
pub mod token;
pub mod value;

/// Exports the grammar declaration surface.
pub mod prelude {
    pub use crate::context::Handler;
    pub use crate::delimited::{
        backslash_escape, backticked, delimited, dollar_escape, double_backticked, escape, quoted,
        single_quoted, triple_backticked, triple_quoted, Delimited, Escape,
    };
    pub use crate::parser::{parse, parse_rule, Failed, TryParseResult};
    pub use crate::production::{p, recurse, Production};
    pub use crate::reader::{Lexeme, Pos, Reader};
    pub use crate::repeat::{do_while, while_, while_one};
    pub use crate::rule::{capture, no_whitespace, value, Rule};
    pub use crate::terminator::term;
    pub use crate::token::{
        any, any_char, ascii_space, char_class, lit, lit_c, until, TokenKind,
    };
    pub use crate::value::{Sink, Value};
}
