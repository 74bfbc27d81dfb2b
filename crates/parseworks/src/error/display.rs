//! Rendering of traced errors.

use crate::error;
use crate::token::trace::SourceTrace;
use colored::*;

/// A note attached to an error, rendered below the source excerpt.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Note(String);

impl<T: Into<String>> From<T> for Note {
    fn from(value: T) -> Self {
        Note(value.into())
    }
}

impl std::fmt::Display for Note {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub fn format_error(f: &mut std::fmt::Formatter<'_>, err: &error::TracedError) -> std::fmt::Result {
    let margin = err.trace.line_number.to_string().len() + 1;
    writeln!(
        f,
        "{}: {}",
        "Error".bright_red().bold(),
        err.error.title().bold()
    )?;
    fmt_source_trace(
        f,
        &err.trace,
        margin,
        &err.error.source_annotation(),
        colored::Color::BrightRed,
    )?;

    for note in err.error.notes() {
        margin_line(f, margin, "", '|', "")?;
        margin_line(
            f,
            margin,
            "",
            '=',
            &format!["{} {note}", "note:".bold()],
        )?;
    }

    for frame in err.stack.iter().rev() {
        writeln!(
            f,
            "{}: while parsing the production `{}`, entered here:",
            "Context".yellow().bold(),
            frame.production
        )?;
        fmt_source_trace(f, &frame.trace, margin, "", colored::Color::Yellow)?;
    }
    Ok(())
}

fn margin_line(
    f: &mut std::fmt::Formatter<'_>,
    width: usize,
    margin_content: &str,
    separator: char,
    content: &str,
) -> std::fmt::Result {
    let pad = width.saturating_sub(margin_content.len());
    let margin = format!["{}{} {separator} ", " ".repeat(pad), margin_content];
    if content.is_empty() {
        writeln!(f, "{}", margin.trim_end().bright_cyan())
    } else {
        writeln!(f, "{}{content}", margin.bright_cyan())
    }
}

fn fmt_source_trace(
    f: &mut std::fmt::Formatter<'_>,
    trace: &SourceTrace,
    margin: usize,
    annotation: &str,
    color: colored::Color,
) -> std::fmt::Result {
    writeln!(
        f,
        "{}{} input:{}:{}",
        " ".repeat(margin),
        ">>>".bright_cyan().bold(),
        trace.line_number,
        trace.index + 1
    )?;
    margin_line(f, margin, "", '|', "")?;
    margin_line(
        f,
        margin,
        &trace.line_number.to_string(),
        '|',
        &highlight_substring(&trace.line_content, trace.index, trace.length),
    )?;
    margin_line(
        f,
        margin,
        "",
        '|',
        &format![
            "{}{} {}",
            " ".repeat(trace.index),
            "^".repeat(trace.length).color(color).bold(),
            annotation.color(color).bold(),
        ],
    )
}

fn highlight_substring(line: &str, start: usize, length: usize) -> String {
    if line.len() < start + length {
        return line.into();
    }
    format![
        "{}{}{}",
        &line[..start],
        line[start..start + length].bold(),
        line[start + length..].trim_end(),
    ]
}

#[cfg(test)]
mod tests {
    use crate::error::{ExpectedLiteral, ParseError, TracedError};
    use crate::reader::Pos;

    #[test]
    fn render_without_color() {
        colored::control::set_override(false);
        let error = ExpectedLiteral {
            position: Pos::from_usize(4),
            literal: "!".into(),
            index: 0,
        };
        assert_eq!(error.name(), "expected literal");
        let traced = TracedError::new(Box::new(error), "abc def", &[]);
        let rendered = traced.to_string();
        assert!(rendered.contains("Error: expected the literal `!`"));
        assert!(rendered.contains("abc def"));
        assert!(rendered.contains("^"));
        colored::control::unset_override();
    }
}
