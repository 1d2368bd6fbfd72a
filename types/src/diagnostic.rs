//! A single compiler diagnostic and its parts.

use std::fmt;
use std::path::Path;

use serde::Serialize;

/// Severity level for a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error = 1,
    Warning = 2,
    Info = 3,
}

impl Severity {
    /// Map a compiler severity token (`error`, `warning`, `note`).
    ///
    /// The token is trimmed first. Unknown tokens map to [`Severity::Info`]
    /// rather than failing; the line classifier only lets the three known
    /// tokens through, so the fallback is not reached from extracted output.
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        match token.trim() {
            "error" => Self::Error,
            "warning" => Self::Warning,
            _ => Self::Info,
        }
    }

    #[must_use]
    pub fn is_error(self) -> bool {
        self == Self::Error
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where a diagnostic was reported.
///
/// The raw identifier from the compiler output is kept verbatim and is the
/// grouping key. Most identifiers are file paths; compiler-internal
/// pseudo-sources such as `<unknown>` or `<module-includes>` are opaque.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Location {
    raw: String,
}

impl Location {
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// The identifier exactly as the compiler printed it.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The identifier as a file path, or `None` for pseudo-sources.
    ///
    /// Purely lexical: the filesystem is never consulted.
    #[must_use]
    pub fn file_path(&self) -> Option<&Path> {
        let trimmed = self.raw.trim();
        if trimmed.is_empty() || trimmed.chars().any(char::is_control) {
            return None;
        }
        if trimmed.starts_with('<') && trimmed.ends_with('>') {
            return None;
        }
        Some(Path::new(trimmed))
    }

    #[must_use]
    pub fn is_file(&self) -> bool {
        self.file_path().is_some()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// A single diagnostic extracted from compiler output.
///
/// Positions are 0-indexed. The range `start_col..end_col` is half-open and
/// `end_col` is always derived from a width, so `end_col >= start_col` holds
/// for every value of this type. The end is clamped at `u32::MAX`; only
/// there can `width()` be shorter than the width passed to [`Diagnostic::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    location: Location,
    severity: Severity,
    message: String,
    line: u32,
    start_col: u32,
    end_col: u32,
}

impl Diagnostic {
    /// Construct a diagnostic covering `width` columns from `start_col`.
    #[must_use]
    pub fn new(
        location: Location,
        severity: Severity,
        message: String,
        line: u32,
        start_col: u32,
        width: u32,
    ) -> Self {
        Self {
            location,
            severity,
            message,
            line,
            start_col,
            end_col: start_col.saturating_add(width),
        }
    }

    #[must_use]
    pub fn location(&self) -> &Location {
        &self.location
    }

    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Message text exactly as it followed the severity token, leading
    /// space included.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// 0-indexed line number.
    #[must_use]
    pub fn line(&self) -> u32 {
        self.line
    }

    /// 0-indexed start column (inclusive).
    #[must_use]
    pub fn start_col(&self) -> u32 {
        self.start_col
    }

    /// 0-indexed end column (exclusive).
    #[must_use]
    pub fn end_col(&self) -> u32 {
        self.end_col
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.end_col - self.start_col
    }

    /// Format in the compiler's own header shape, 1-indexed:
    /// `location:line:col: severity:message`.
    ///
    /// Non-empty ranges get a ` [col..end]` suffix.
    #[must_use]
    pub fn display_line(&self) -> String {
        let one_based = |value: u32| u64::from(value) + 1;
        let mut out = format!(
            "{}:{}:{}: {}:{}",
            self.location,
            one_based(self.line),
            one_based(self.start_col),
            self.severity,
            self.message,
        );
        if self.end_col > self.start_col {
            out.push_str(&format!(
                " [{}..{}]",
                one_based(self.start_col),
                one_based(self.end_col)
            ));
        }
        out
    }
}
