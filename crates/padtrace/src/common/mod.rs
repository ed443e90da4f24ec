//! Common infrastructure shared by the lexer, parser and replay

mod error;
mod span;

pub use error::{DiagnosticReporter, TraceError, TraceResult};
pub use span::Span;
