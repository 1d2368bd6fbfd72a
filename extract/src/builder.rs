//! Turning a diagnostic block into a [`Diagnostic`].

use buildlens_types::{BlockError, Diagnostic, Location, PositionField, Severity};

use crate::segment::DiagnosticBlock;

/// `path`, `line`, `column`, `severity`, `message`.
const HEADER_FIELDS: usize = 5;

/// Build the diagnostic described by `block`.
///
/// The header is `path:line:column: severity:message` with 1-based line and
/// column. The message keeps everything after the fourth colon verbatim,
/// colons and leading space included. The range width is the length of the
/// block's third line with surrounding whitespace stripped, or zero when the
/// block has fewer than three lines.
pub fn build_diagnostic(block: &DiagnosticBlock<'_>) -> Result<Diagnostic, BlockError> {
    let fields: Vec<&str> = block.header().splitn(HEADER_FIELDS, ':').collect();
    let &[path, line, column, severity, message] = fields.as_slice() else {
        return Err(BlockError::TooFewFields {
            found: fields.len(),
        });
    };

    let line = parse_position(line, PositionField::Line)?;
    let start_col = parse_position(column, PositionField::Column)?;
    let width = block.annotation_line().map_or(0, annotation_width);

    Ok(Diagnostic::new(
        Location::new(path),
        Severity::from_token(severity),
        message.to_string(),
        line,
        start_col,
        width,
    ))
}

/// Parse a 1-based position field into a 0-based value.
///
/// `0` clamps to `0`: pseudo-sources such as `<unknown>:0:0` carry no
/// position but are still real diagnostics.
fn parse_position(raw: &str, field: PositionField) -> Result<u32, BlockError> {
    let value: u32 = raw.trim().parse().map_err(|_| BlockError::NotAnInteger {
        field,
        value: raw.to_string(),
    })?;
    Ok(value.saturating_sub(1))
}

fn annotation_width(line: &str) -> u32 {
    u32::try_from(line.trim().chars().count()).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::segment::segment;

    fn build(text: &str) -> Result<Diagnostic, BlockError> {
        let block = segment(text).next().expect("text has a header");
        build_diagnostic(&block)
    }

    #[test]
    fn test_header_with_caret() {
        let diag = build("/a/b.swift:10:5: error: missing return\n    return\n    ^\n").unwrap();
        assert_eq!(diag.location().raw(), "/a/b.swift");
        assert_eq!(diag.line(), 9);
        assert_eq!(diag.start_col(), 4);
        assert_eq!(diag.end_col(), 5);
        assert_eq!(diag.severity(), Severity::Error);
        assert_eq!(diag.message(), " missing return");
    }

    #[test]
    fn test_header_only_is_zero_width() {
        let diag = build("/a/b.swift:3:1: warning: unused variable 'x'\n").unwrap();
        assert_eq!(diag.start_col(), 0);
        assert_eq!(diag.end_col(), 0);
        assert_eq!(diag.severity(), Severity::Warning);
    }

    #[test]
    fn test_two_lines_is_zero_width() {
        let diag = build("a.swift:2:7: note: here\n  let x = 1\n").unwrap();
        assert_eq!(diag.end_col(), diag.start_col());
        assert_eq!(diag.severity(), Severity::Info);
    }

    #[test]
    fn test_underline_width() {
        let diag = build(
            "a.swift:4:9: error: type mismatch\n    let y: String = x\n        ^~~~~~~  \n",
        )
        .unwrap();
        assert_eq!(diag.start_col(), 8);
        assert_eq!(diag.end_col() - diag.start_col(), 7);
    }

    #[test]
    fn test_width_counts_chars_not_bytes() {
        let diag = build("a.swift:1:1: error: x\n  src\n  ~é~\n").unwrap();
        assert_eq!(diag.width(), 3);
    }

    #[test]
    fn test_third_line_need_not_be_a_caret() {
        // Width is taken from whatever the third line holds.
        let diag = build("a.swift:1:3: error: x\nsource\n  anything at all  \n").unwrap();
        assert_eq!(diag.width(), "anything at all".len() as u32);
    }

    #[test]
    fn test_blank_third_line_is_zero_width() {
        let diag = build("a.swift:1:3: error: x\nsource\n   \n").unwrap();
        assert_eq!(diag.width(), 0);
    }

    #[test]
    fn test_message_keeps_colons_and_spacing() {
        let diag = build("a.swift:1:1: error:  cannot convert 'A' to 'B': see docs: here").unwrap();
        assert_eq!(diag.message(), "  cannot convert 'A' to 'B': see docs: here");
    }

    #[test]
    fn test_position_fields_trimmed() {
        let diag = build("a.swift: 12 : 3 : error: x").unwrap();
        assert_eq!(diag.line(), 11);
        assert_eq!(diag.start_col(), 2);
    }

    #[test]
    fn test_non_numeric_line() {
        let err = build("/a.swift:x:y: error: bad").unwrap_err();
        assert_eq!(
            err,
            BlockError::NotAnInteger {
                field: PositionField::Line,
                value: "x".to_string(),
            }
        );
    }

    #[test]
    fn test_non_numeric_column() {
        let err = build("/a.swift:3:y: error: bad").unwrap_err();
        assert_eq!(
            err,
            BlockError::NotAnInteger {
                field: PositionField::Column,
                value: "y".to_string(),
            }
        );
    }

    #[test]
    fn test_negative_position_rejected() {
        let err = build("/a.swift:-3:1: error: bad").unwrap_err();
        assert!(matches!(err, BlockError::NotAnInteger { .. }));
    }

    #[test]
    fn test_zero_position_clamps_to_origin() {
        let diag = build("/a.swift:0:1: error: bad").unwrap();
        assert_eq!(diag.line(), 0);
        assert_eq!(diag.start_col(), 0);
    }

    #[test]
    fn test_unknown_zero_zero_is_kept() {
        let diag = build("<unknown>:0:0: error: unable to load standard library\n").unwrap();
        assert_eq!(diag.location().raw(), "<unknown>");
        assert_eq!(diag.severity(), Severity::Error);
        assert_eq!(diag.line(), 0);
        assert_eq!(diag.start_col(), 0);
        assert_eq!(diag.end_col(), 0);
        assert_eq!(diag.message(), " unable to load standard library");
    }

    #[test]
    fn test_max_column_with_caret_clamps_and_displays() {
        let diag = build("a.swift:1:4294967295: error: x\nsrc\n  ^\n").unwrap();
        assert_eq!(diag.start_col(), u32::MAX - 1);
        assert_eq!(diag.end_col(), u32::MAX);
        assert_eq!(
            diag.display_line(),
            "a.swift:1:4294967295: error: x [4294967295..4294967296]"
        );
    }

    #[test]
    fn test_pseudo_source_location() {
        let diag = build("<unknown>:1:1: error: internal").unwrap();
        assert_eq!(diag.location().raw(), "<unknown>");
        assert!(!diag.location().is_file());
    }
}
