//! The extraction entry points.

use buildlens_types::{BlockError, DiagnosticsByLocation};

use crate::builder::build_diagnostic;
use crate::segment::segment;

/// A block that was recognized but could not be built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedBlock {
    line_number: usize,
    header: String,
    error: BlockError,
}

impl SkippedBlock {
    /// 1-based line number of the block's header.
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    #[must_use]
    pub fn header(&self) -> &str {
        &self.header
    }

    #[must_use]
    pub fn error(&self) -> &BlockError {
        &self.error
    }
}

/// Full result of one extraction pass.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    diagnostics: DiagnosticsByLocation,
    skipped: Vec<SkippedBlock>,
    ignored_lines: usize,
}

impl Extraction {
    #[must_use]
    pub fn diagnostics(&self) -> &DiagnosticsByLocation {
        &self.diagnostics
    }

    #[must_use]
    pub fn into_diagnostics(self) -> DiagnosticsByLocation {
        self.diagnostics
    }

    /// Malformed blocks, in output order.
    #[must_use]
    pub fn skipped(&self) -> &[SkippedBlock] {
        &self.skipped
    }

    /// Lines printed before the first header.
    #[must_use]
    pub fn ignored_lines(&self) -> usize {
        self.ignored_lines
    }
}

/// Extract diagnostics from a complete compiler output snapshot.
///
/// Malformed blocks are dropped; use [`extract_report`] to see them.
#[must_use]
pub fn extract(raw: &str) -> DiagnosticsByLocation {
    extract_report(raw).into_diagnostics()
}

/// Extract diagnostics and report what was skipped along the way.
#[must_use]
pub fn extract_report(raw: &str) -> Extraction {
    let mut blocks = segment(raw);
    let mut extraction = blocks.by_ref().fold(Extraction::default(), |mut acc, block| {
        match build_diagnostic(&block) {
            Ok(diagnostic) => acc.diagnostics.push(diagnostic),
            Err(error) => {
                tracing::warn!(
                    line = block.line_number(),
                    header = block.header(),
                    "Skipping malformed diagnostic block: {error}"
                );
                acc.skipped.push(SkippedBlock {
                    line_number: block.line_number(),
                    header: block.header().to_string(),
                    error,
                });
            }
        }
        acc
    });
    extraction.ignored_lines = blocks.ignored_lines();

    tracing::debug!(
        locations = extraction.diagnostics.len(),
        diagnostics = extraction.diagnostics.total_count(),
        skipped = extraction.skipped.len(),
        ignored_lines = extraction.ignored_lines,
        "Extracted diagnostics"
    );
    extraction
}
