//! Diagnostic extraction from raw compiler output.
//!
//! The compiler prints diagnostics as a header line followed by optional
//! context lines:
//!
//! ```text
//! /src/main.swift:10:5: error: missing return
//!     return
//!     ^
//! ```
//!
//! Extraction runs in four steps over one complete output snapshot:
//!
//! 1. [`classify`] decides whether a line opens a new block.
//! 2. [`segment`] groups lines into [`DiagnosticBlock`]s, dropping noise
//!    printed before the first header.
//! 3. [`build_diagnostic`] turns each block into a diagnostic or a
//!    [`BlockError`](buildlens_types::BlockError).
//! 4. [`extract`] folds the results into a
//!    [`DiagnosticsByLocation`](buildlens_types::DiagnosticsByLocation).
//!
//! There is no formal grammar for the output format. Header detection is a
//! colon-counting heuristic and can be fooled by source text that happens to
//! look like a header.

mod aggregate;
mod builder;
mod classify;
mod segment;

pub use aggregate::{Extraction, SkippedBlock, extract, extract_report};
pub use builder::build_diagnostic;
pub use classify::{LineKind, SEVERITY_TOKENS, classify, is_block_start};
pub use segment::{BlockSegmenter, DiagnosticBlock, Segments, segment};
