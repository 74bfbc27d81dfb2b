//! Parse values and value sinks.

use crate::reader::Lexeme;

/// A value produced during parsing.
///
/// Rules append values to the argument list as they parse; list-like rules
/// aggregate values through a [Sink]. Which values a grammar produces is
/// determined entirely by its rules: tokens produce none, [capture](crate::rule::capture)
/// produces a [Lexeme], [value](crate::rule::value) injects a constant, and
/// productions produce whatever the host's value folding returns.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    Char(char),
    Str(String),
    Lexeme(Lexeme),
    List(Vec<Value>),
}

impl From<char> for Value {
    fn from(c: char) -> Value {
        Value::Char(c)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Value {
        Value::Str(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Value {
        Value::Str(s)
    }
}

impl From<Lexeme> for Value {
    fn from(lexeme: Lexeme) -> Value {
        Value::Lexeme(lexeme)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Value {
        Value::List(values)
    }
}

/// A value aggregator for list-like rules.
///
/// The delimited content loop obtains a fresh sink from the handler, pushes
/// one value per content match or escape, and finishes the sink when the
/// closing delimiter is found.
pub trait Sink {
    fn push(&mut self, value: Value);
    fn finish(self: Box<Self>) -> Value;
}

/// The default sink: collects values into a [Value::List].
///
/// Adjacent lexemes coalesce: pushing a lexeme whose begin equals the end of
/// the previously pushed lexeme extends that lexeme instead of starting a new
/// one. A content matcher that consumes one code point at a time therefore
/// yields one lexeme per unbroken content run.
#[derive(Debug, Default)]
pub struct ListSink {
    values: Vec<Value>,
}

impl Sink for ListSink {
    fn push(&mut self, value: Value) {
        if let (Some(Value::Lexeme(prev)), Value::Lexeme(next)) = (self.values.last_mut(), &value) {
            if prev.end() == next.begin() {
                *prev = Lexeme::new(prev.begin(), next.end());
                return;
            }
        }
        self.values.push(value);
    }

    fn finish(self: Box<Self>) -> Value {
        Value::List(self.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::{Pos, Reader};

    fn lexeme(reader: &mut Reader, n: usize) -> Lexeme {
        let begin = reader.position();
        for _ in 0..n {
            reader.bump();
        }
        Lexeme::new(begin, reader.position())
    }

    #[test]
    fn adjacent_lexemes_coalesce() {
        let mut reader = Reader::new("abcd");
        let a = lexeme(&mut reader, 1);
        let b = lexeme(&mut reader, 1);
        reader.bump();
        let d = lexeme(&mut reader, 1);

        let mut sink: Box<ListSink> = Default::default();
        sink.push(a.into());
        sink.push(b.into());
        sink.push(Value::Char('x'));
        sink.push(d.into());
        let Value::List(values) = sink.finish() else {
            panic!["list sink must finish to a list"]
        };
        assert_eq!(
            values,
            vec![
                Value::Lexeme(Lexeme::new(Pos::default(), b.end())),
                Value::Char('x'),
                Value::Lexeme(d),
            ]
        );
    }
}
