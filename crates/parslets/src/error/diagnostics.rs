//! # Diagnostic Utilities
//!
//! Human-readable rendering of parse errors against their source text.
//! Locations are zero-based internally and displayed one-based.

use crate::error::ParseError;
use crate::syntax::text;
use std::fmt::Write;

/// Splits `source` into lines, treating `\r\n`, `\r` and `\n` alike.
///
/// The returned lines do not include their terminators.
pub fn lines(source: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut rest = source;
    while let Some(len) = text::strip_line(rest) {
        let line = &rest[..len];
        lines.push(line.trim_end_matches(['\r', '\n']));
        rest = &rest[len..];
    }
    lines.push(rest);
    lines
}

/// Extract the lines surrounding `line`
///
/// Returns (line number, text) pairs for up to `context_lines` lines before
/// and after the given zero-based line, or `None` if the source has no such
/// line.
pub fn extract_context(source: &str, line: usize, context_lines: usize) -> Option<Vec<(usize, &str)>> {
    let all = lines(source);
    if line >= all.len() {
        return None;
    }
    let first = line.saturating_sub(context_lines);
    let last = (line + context_lines).min(all.len() - 1);
    Some((first..=last).map(|n| (n, all[n])).collect())
}

/// Format an error with surrounding source lines and a caret under the
/// failing column
pub fn format_error_with_context(error: &ParseError, source: &str, context_lines: usize) -> String {
    let mut result = String::new();
    let _ = write!(result, "error: {error}\n  --> {}", error.end);

    if let Some(context) = extract_context(source, error.end.line, context_lines) {
        let width = context
            .last()
            .map_or(1, |(n, _)| (n + 1).to_string().len());
        let _ = write!(result, "\n{:width$} |", "");
        for (n, line) in context {
            let _ = write!(result, "\n{:>width$} | {line}", n + 1);
            if n == error.end.line {
                let column = error.end.column.min(text::char_len(line));
                let _ = write!(result, "\n{:width$} | {:column$}^", "", "");
            }
        }
    }

    result
}

/// Format error with line/column information
pub fn format_error_with_location(error: &ParseError, filename: Option<&str>) -> String {
    match filename {
        Some(filename) => format!("{filename}:{}: {error}", error.end),
        None => format!("{}: {error}", error.end),
    }
}
