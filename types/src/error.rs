use std::fmt;

use thiserror::Error;

/// Which numeric header field failed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionField {
    Line,
    Column,
}

impl fmt::Display for PositionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Line => f.write_str("line"),
            Self::Column => f.write_str("column"),
        }
    }
}

/// Why a diagnostic block could not be turned into a diagnostic.
///
/// A block error only ever drops its own block; extraction continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockError {
    #[error("header has {found} colon-separated fields, expected at least 5")]
    TooFewFields { found: usize },
    #[error("{field} `{value}` is not an integer")]
    NotAnInteger { field: PositionField, value: String },
}
