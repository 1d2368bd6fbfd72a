//! Build-side plumbing around the diagnostic extractor.
//!
//! Spawning the compiler is the host's job. This crate takes over from the
//! moment the host has the child's output streams:
//!
//! - [`BuildSession`] accumulates stdout into a [`RawOutputBuffer`], mirrors
//!   stderr to the log, and runs the extractor exactly once when finished.
//! - [`publish`] hands the result to a [`DiagnosticSink`], keyed by a
//!   canonical [`DocumentKey`].
//! - [`DiagnosticsStore`] is an in-memory sink with a sorted
//!   [`DiagnosticsSnapshot`] view.

mod buffer;
mod publish;
mod session;
mod store;

pub use buffer::RawOutputBuffer;
pub use publish::{DiagnosticSink, DocumentKey, canonicalize, publish};
pub use session::{BuildReport, BuildSession};
pub use store::{DiagnosticsSnapshot, DiagnosticsStore};
