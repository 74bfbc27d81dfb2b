//! Tracing positions back to source lines.
//!
//! Error reporting needs to show the line an error occurred on. Rather than
//! carrying line and column on every position, positions are plain byte
//! offsets and this module recovers the line information on demand, when an
//! error is actually being reported. Tracing walks the source once per
//! reported error, which is fine because errors are cold.

use crate::reader::Pos;

/// The source line a span of input came from.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceTrace {
    /// 1-based line number.
    pub line_number: usize,
    /// Content of the line, without the trailing newline.
    pub line_content: String,
    /// Byte index of the span's start within the line.
    pub index: usize,
    /// Byte length of the span within the line, at least 1.
    pub length: usize,
}

/// Traces the span `[begin, end)` of the source.
///
/// The trace covers the part of the span that lies on the line containing
/// `begin`; a span reaching past the end of its line is clipped. A span that
/// is empty or starts at the end of input is given length 1 so that there is
/// always something to point at.
pub fn trace(source: &str, begin: Pos, end: Pos) -> SourceTrace {
    let begin = begin.to_usize().min(source.len());
    let end = end.to_usize().min(source.len());

    let line_start = match source[..begin].rfind('\n') {
        Some(newline) => newline + 1,
        None => 0,
    };
    let line_end = match source[begin..].find('\n') {
        Some(newline) => begin + newline,
        None => source.len(),
    };
    let line_number = source[..line_start].matches('\n').count() + 1;
    let index = begin - line_start;
    let length = end.max(begin + 1).min(line_end.max(begin + 1)) - begin;

    SourceTrace {
        line_number,
        line_content: source[line_start..line_end].into(),
        index,
        length,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(u: usize) -> Pos {
        Pos::from_usize(u)
    }

    #[test]
    fn first_line() {
        let got = trace("abc def\nghi", pos(4), pos(7));
        assert_eq!(
            got,
            SourceTrace {
                line_number: 1,
                line_content: "abc def".into(),
                index: 4,
                length: 3,
            }
        );
    }

    #[test]
    fn later_line() {
        let got = trace("abc\ndef\nghi", pos(8), pos(9));
        assert_eq!(got.line_number, 3);
        assert_eq!(got.line_content, "ghi");
        assert_eq!(got.index, 0);
        assert_eq!(got.length, 1);
    }

    #[test]
    fn empty_span_gets_length_one() {
        let got = trace("abc", pos(1), pos(1));
        assert_eq!(got.length, 1);
    }

    #[test]
    fn end_of_input() {
        let got = trace("abc", pos(3), pos(3));
        assert_eq!(got.line_number, 1);
        assert_eq!(got.index, 3);
        assert_eq!(got.length, 1);
    }

    #[test]
    fn span_clipped_to_line() {
        let got = trace("ab\ncd", pos(1), pos(5));
        assert_eq!(got.line_content, "ab");
        assert_eq!(got.index, 1);
        assert_eq!(got.length, 1);
    }
}
