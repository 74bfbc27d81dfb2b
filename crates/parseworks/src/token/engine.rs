//! Token engines.
//!
//! An engine is the lowest layer of the token machinery: a small matcher that
//! either advances the reader past a match, or leaves the reader at the
//! failure position and returns an error code. The token adapter in
//! [`crate::parser`] turns engine failures into structured errors; engines
//! themselves never talk to the context, which is what makes them usable in
//! the context-free matcher forms (branch conditions, whitespace skipping,
//! `while_` iteration).

use crate::reader::{Pos, Reader};
use std::rc;

/// The error code returned by a failing engine.
///
/// Unlike the numeric codes of table-driven matchers, the code carries the
/// data the adapter needs to build the structured error directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Code {
    /// A literal failed to match; `index` is the offset of the first
    /// mismatched character within the literal.
    Literal { literal: String, index: usize },
    /// A character class failed to match.
    Class { name: &'static str },
    /// A minus exception matched the whole of the inner token's lexeme.
    Minus { begin: Pos, end: Pos },
}

/// A low-level matcher with an error-code result.
pub trait Engine: std::fmt::Debug {
    /// Attempts a match at the reader's current position.
    ///
    /// On success the reader is advanced past the match. On failure the
    /// reader is left at the position where the failure was detected.
    fn run(&self, reader: &mut Reader) -> Result<(), Code>;

    /// Whether this engine can reject input.
    fn can_fail(&self) -> bool {
        true
    }

    /// Whether this engine can succeed without consuming input.
    fn can_match_empty(&self) -> bool {
        false
    }
}

/// Matches an exact string.
#[derive(Debug)]
pub(crate) struct LiteralEngine {
    pub text: String,
}

impl Engine for LiteralEngine {
    fn run(&self, reader: &mut Reader) -> Result<(), Code> {
        for (index, expected) in self.text.chars().enumerate() {
            match reader.peek() {
                Some(c) if c == expected => reader.bump(),
                _ => {
                    return Err(Code::Literal {
                        literal: self.text.clone(),
                        index,
                    })
                }
            }
        }
        Ok(())
    }
}

/// Matches any single code point. Fails only at the end of input.
#[derive(Debug)]
pub(crate) struct CodePointEngine;

impl Engine for CodePointEngine {
    fn run(&self, reader: &mut Reader) -> Result<(), Code> {
        match reader.peek() {
            Some(_) => {
                reader.bump();
                Ok(())
            }
            None => Err(Code::Class { name: "code point" }),
        }
    }
}

/// Matches a single code point satisfying a predicate.
#[derive(Debug)]
pub(crate) struct ClassEngine {
    pub name: &'static str,
    pub pred: fn(char) -> bool,
}

impl Engine for ClassEngine {
    fn run(&self, reader: &mut Reader) -> Result<(), Code> {
        match reader.peek() {
            Some(c) if (self.pred)(c) => {
                reader.bump();
                Ok(())
            }
            _ => Err(Code::Class { name: self.name }),
        }
    }
}

/// Matches the entire rest of the input, including nothing at all.
#[derive(Debug)]
pub(crate) struct AnyEngine;

impl Engine for AnyEngine {
    fn run(&self, reader: &mut Reader) -> Result<(), Code> {
        let rest = reader.source().len() - reader.position().to_usize();
        reader.advance_bytes(rest);
        Ok(())
    }

    fn can_fail(&self) -> bool {
        false
    }

    fn can_match_empty(&self) -> bool {
        true
    }
}

/// Consumes input until the condition engine matches, and consumes the
/// condition's match too. Fails with the condition's own error code if the
/// input ends first.
#[derive(Debug)]
pub(crate) struct UntilEngine {
    pub condition: rc::Rc<dyn Engine>,
}

impl Engine for UntilEngine {
    fn run(&self, reader: &mut Reader) -> Result<(), Code> {
        loop {
            let save = *reader;
            match self.condition.run(reader) {
                Ok(()) => return Ok(()),
                Err(code) => {
                    *reader = save;
                    if reader.eof() {
                        return Err(code);
                    }
                    reader.bump();
                }
            }
        }
    }

    fn can_match_empty(&self) -> bool {
        self.condition.can_match_empty()
    }
}

/// Matches the inner engine, then fails if the exception matches the whole of
/// the inner match.
#[derive(Debug)]
pub(crate) struct MinusEngine {
    pub inner: rc::Rc<dyn Engine>,
    pub except: rc::Rc<dyn Engine>,
}

impl Engine for MinusEngine {
    fn run(&self, reader: &mut Reader) -> Result<(), Code> {
        let begin = reader.position();
        self.inner.run(reader)?;
        let end = reader.position();
        let matched = &reader.source()[begin.to_usize()..end.to_usize()];
        let mut sub = Reader::new(matched);
        if self.except.run(&mut sub).is_ok() && sub.eof() {
            return Err(Code::Minus { begin, end });
        }
        Ok(())
    }

    fn can_match_empty(&self) -> bool {
        self.inner.can_match_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(engine: &dyn Engine, input: &str) -> (Result<(), Code>, usize) {
        let mut reader = Reader::new(input);
        let result = engine.run(&mut reader);
        (result, reader.position().to_usize())
    }

    #[test]
    fn literal() {
        let engine = LiteralEngine { text: "abc".into() };
        assert_eq!(run(&engine, "abcd"), (Ok(()), 3));
        assert_eq!(
            run(&engine, "abx"),
            (
                Err(Code::Literal {
                    literal: "abc".into(),
                    index: 2
                }),
                2
            )
        );
        assert_eq!(
            run(&engine, ""),
            (
                Err(Code::Literal {
                    literal: "abc".into(),
                    index: 0
                }),
                0
            )
        );
    }

    #[test]
    fn code_point() {
        assert_eq!(run(&CodePointEngine, "é"), (Ok(()), 2));
        assert_eq!(
            run(&CodePointEngine, ""),
            (Err(Code::Class { name: "code point" }), 0)
        );
    }

    #[test]
    fn class() {
        let engine = ClassEngine {
            name: "ASCII digit",
            pred: |c| c.is_ascii_digit(),
        };
        assert_eq!(run(&engine, "7x"), (Ok(()), 1));
        assert_eq!(
            run(&engine, "x7"),
            (Err(Code::Class { name: "ASCII digit" }), 0)
        );
    }

    #[test]
    fn any() {
        assert_eq!(run(&AnyEngine, "abc"), (Ok(()), 3));
        assert_eq!(run(&AnyEngine, ""), (Ok(()), 0));
        assert!(!AnyEngine.can_fail());
        assert!(AnyEngine.can_match_empty());
    }

    #[test]
    fn until() {
        let engine = UntilEngine {
            condition: rc::Rc::new(LiteralEngine { text: "!".into() }),
        };
        assert_eq!(run(&engine, "!"), (Ok(()), 1));
        assert_eq!(run(&engine, "aaa!b"), (Ok(()), 4));
        assert_eq!(
            run(&engine, "aaa"),
            (
                Err(Code::Literal {
                    literal: "!".into(),
                    index: 0
                }),
                3
            )
        );
    }

    #[test]
    fn minus() {
        let engine = MinusEngine {
            inner: rc::Rc::new(UntilEngine {
                condition: rc::Rc::new(LiteralEngine { text: "!".into() }),
            }),
            except: rc::Rc::new(LiteralEngine { text: "aa!".into() }),
        };
        assert_eq!(run(&engine, "aaa!"), (Ok(()), 4));
        let (result, _) = run(&engine, "aa!");
        assert_eq!(
            result,
            Err(Code::Minus {
                begin: Pos::default(),
                end: Pos::from_usize(3),
            })
        );
    }
}
