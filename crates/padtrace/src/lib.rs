//! padtrace - controller trace replay for the smpc port table
//!
//! A trace describes what each Saturn connector reports, frame by frame:
//! a directly wired pad, a multitap with its taps, or nothing at all.
//! Replaying a trace stages every frame on an in-memory bus, polls the port
//! table once, and reports what each virtual port sees.
//!
//! ## Architecture
//!
//! - **Common** (`common/`): spans, errors and diagnostics
//! - **Lexer** (`lexer/`): logos tokenizer for trace sources
//! - **Parser** (`parser`): trace sources into [`Trace`]
//! - **Replay** (`replay`): playback through [`smpc::ports::PortTable`]

pub mod common;
pub mod lexer;
pub mod parser;
pub mod replay;
pub mod trace;

pub use common::{DiagnosticReporter, Span, TraceError, TraceResult};
pub use parser::{parse, read_source};
pub use replay::{FrameReport, PortReport, ReplayConfig, Replayer};
pub use trace::{FrameSpec, Trace};
