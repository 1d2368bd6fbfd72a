//! Core diagnostic types for buildlens.
//!
//! This crate contains pure domain types with no IO, no async, and minimal dependencies.
//! The extractor produces these types; the build layer and the CLI consume them.

mod by_location;
mod diagnostic;
mod error;

pub use by_location::DiagnosticsByLocation;
pub use diagnostic::{Diagnostic, Location, Severity};
pub use error::{BlockError, PositionField};
