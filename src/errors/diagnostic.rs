//! Pretty error reporting using ariadne
//!
//! Renders a [`CompileError`] with the offending source line underlined.

use std::io::IsTerminal;

use ariadne::{Color, Config, Label, Report, ReportKind, Source};

use crate::errors::CompileError;

/// Print an error with source context to stderr
///
/// Colors are only used when stderr is a terminal.
pub fn print_error(source: &str, filename: &str, error: &CompileError) {
    let Some(span) = error.span() else {
        eprintln!("Error: {}", error);
        return;
    };

    let range = span.start..span.end;
    let mut report = Report::build(ReportKind::Error, (filename.to_string(), range.clone()))
        .with_config(Config::default().with_color(std::io::stderr().is_terminal()))
        .with_message(error.kind())
        .with_label(
            Label::new((filename.to_string(), range))
                .with_message(error.to_string())
                .with_color(Color::Red),
        );
    if let Some((related, note)) = error.related() {
        report.add_label(
            Label::new((filename.to_string(), related.start..related.end))
                .with_message(note)
                .with_color(Color::Blue),
        );
    }
    let report = report.finish();

    if report
        .eprint((filename.to_string(), Source::from(source)))
        .is_err()
    {
        eprintln!("Error: {}", error);
    }
}

/// Format an error as a string without colors (for tests and logs)
pub fn format_error(source: &str, filename: &str, error: &CompileError) -> String {
    let Some(span) = error.span() else {
        return format!("Error: {}", error);
    };

    let range = span.start..span.end;
    let mut report = Report::build(ReportKind::Error, (filename.to_string(), range.clone()))
        .with_config(Config::default().with_color(false))
        .with_message(error.kind())
        .with_label(Label::new((filename.to_string(), range)).with_message(error.to_string()));
    if let Some((related, note)) = error.related() {
        report.add_label(
            Label::new((filename.to_string(), related.start..related.end)).with_message(note),
        );
    }
    let report = report.finish();

    let mut output = Vec::new();
    if report
        .write((filename.to_string(), Source::from(source)), &mut output)
        .is_err()
    {
        return format!("Error: {}", error);
    }

    String::from_utf8_lossy(&output).into_owned()
}

/// Get the line and column (both 1-based) for a byte offset
pub fn offset_to_line_col(source: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut col = 1;

    for (i, c) in source.char_indices() {
        if i >= offset {
            break;
        }
        if c == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }

    (line, col)
}
