//! Header line detection.

/// Severity tokens that mark a header line.
pub const SEVERITY_TOKENS: [&str; 3] = ["error", "warning", "note"];

/// Index of the severity field in a `path:line:col: severity: message` header.
const SEVERITY_FIELD: usize = 3;

/// How a single output line relates to diagnostic blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Opens a new diagnostic block.
    BlockStart,
    /// Belongs to the open block, or is noise if none is open.
    Continuation,
}

/// Classify one line of compiler output.
#[must_use]
pub fn classify(line: &str) -> LineKind {
    if is_block_start(line) {
        LineKind::BlockStart
    } else {
        LineKind::Continuation
    }
}

/// A line opens a block when it splits on `:` into more than four fields and
/// the fourth field, trimmed, is one of [`SEVERITY_TOKENS`].
///
/// Best-effort: a source snippet containing four colons followed by one of
/// the tokens is misread as a header.
#[must_use]
pub fn is_block_start(line: &str) -> bool {
    let mut fields = line.split(':');
    let Some(severity) = fields.nth(SEVERITY_FIELD) else {
        return false;
    };
    // A fifth field (the message, possibly empty) must follow.
    fields.next().is_some() && SEVERITY_TOKENS.contains(&severity.trim())
}
