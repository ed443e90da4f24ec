//! Error types and diagnostic reporting

use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};
use thiserror::Error;
use super::Span;

/// Trace error with source location
#[derive(Error, Debug)]
pub enum TraceError {
    #[error("Lexer error at {span:?}: {message}")]
    Lexer { message: String, span: Span },

    #[error("Parser error at {span:?}: {message}")]
    Parser { message: String, span: Span },

    #[error("Invalid value at {span:?}: {message}")]
    Value { message: String, span: Span },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TraceError {
    pub fn lexer(message: impl Into<String>, span: Span) -> Self {
        Self::Lexer {
            message: message.into(),
            span,
        }
    }

    pub fn parser(message: impl Into<String>, span: Span) -> Self {
        Self::Parser {
            message: message.into(),
            span,
        }
    }

    pub fn value(message: impl Into<String>, span: Span) -> Self {
        Self::Value {
            message: message.into(),
            span,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            TraceError::Lexer { span, .. }
            | TraceError::Parser { span, .. }
            | TraceError::Value { span, .. } => Some(*span),
            TraceError::Io(_) => None,
        }
    }
}

pub type TraceResult<T> = Result<T, TraceError>;

/// Diagnostic reporter for pretty error output
pub struct DiagnosticReporter {
    files: SimpleFiles<String, String>,
    writer: StandardStream,
    config: term::Config,
}

impl DiagnosticReporter {
    pub fn new() -> Self {
        Self {
            files: SimpleFiles::new(),
            writer: StandardStream::stderr(ColorChoice::Auto),
            config: term::Config::default(),
        }
    }

    pub fn add_file(&mut self, name: impl Into<String>, source: impl Into<String>) -> usize {
        self.files.add(name.into(), source.into())
    }

    /// Build the diagnostic for `error` without printing it
    pub fn diagnostic(&self, file_id: usize, error: &TraceError) -> Diagnostic<usize> {
        match error {
            TraceError::Lexer { message, span } => Diagnostic::error()
                .with_message("Lexer error")
                .with_labels(vec![
                    Label::primary(file_id, span.start..span.end).with_message(message)
                ]),

            TraceError::Parser { message, span } => Diagnostic::error()
                .with_message("Syntax error")
                .with_labels(vec![
                    Label::primary(file_id, span.start..span.end).with_message(message)
                ]),

            TraceError::Value { message, span } => Diagnostic::error()
                .with_message("Invalid value")
                .with_labels(vec![
                    Label::primary(file_id, span.start..span.end).with_message(message)
                ]),

            TraceError::Io(err) => {
                Diagnostic::error().with_message(format!("IO error: {}", err))
            }
        }
    }

    pub fn report_error(&self, file_id: usize, error: &TraceError) {
        let diagnostic = self.diagnostic(file_id, error);
        let _ = term::emit(&mut self.writer.lock(), &self.config, &self.files, &diagnostic);
    }
}

impl Default for DiagnosticReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_carries_span() {
        let mut reporter = DiagnosticReporter::new();
        let file_id = reporter.add_file("pads.trace", "frame { port 3: unplugged }");
        let error = TraceError::value("port must be 1 or 2", Span::new(13, 14));

        let diagnostic = reporter.diagnostic(file_id, &error);
        assert_eq!(diagnostic.message, "Invalid value");
        assert_eq!(diagnostic.labels.len(), 1);
        assert_eq!(diagnostic.labels[0].range, 13..14);
        assert_eq!(error.span(), Some(Span::new(13, 14)));
    }

    #[test]
    fn test_io_diagnostic_has_no_label() {
        let reporter = DiagnosticReporter::new();
        let error = TraceError::from(std::io::Error::from(std::io::ErrorKind::NotFound));

        let diagnostic = reporter.diagnostic(0, &error);
        assert!(diagnostic.message.starts_with("IO error: "));
        assert!(diagnostic.labels.is_empty());
    }
}
