//! Handing extracted diagnostics to a rendering surface.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use buildlens_types::{Diagnostic, DiagnosticsByLocation, Location};
use url::Url;

/// Canonical key a sink files diagnostics under.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DocumentKey {
    /// Absolute `file://` URI of a source file.
    File(Url),
    /// A compiler pseudo-source, kept as printed.
    Opaque(String),
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(uri) => write!(f, "{uri}"),
            Self::Opaque(raw) => f.write_str(raw),
        }
    }
}

/// A surface that displays diagnostics, e.g. an editor's problems view.
pub trait DiagnosticSink {
    /// Drop everything previously displayed.
    fn clear(&mut self);

    /// Display `items` for `key`, replacing anything shown for it.
    fn set(&mut self, key: DocumentKey, items: Vec<Diagnostic>);
}

/// Canonicalize a location against `workspace_root`.
///
/// Relative paths are joined onto the root and `.`/`..` are resolved
/// lexically; the filesystem is not consulted. Locations that are not file
/// paths, or that cannot form a file URI, stay opaque.
#[must_use]
pub fn canonicalize(location: &Location, workspace_root: &Path) -> DocumentKey {
    let Some(path) = location.file_path() else {
        return DocumentKey::Opaque(location.raw().to_string());
    };
    let absolute = normalize_path(&workspace_root.join(path));
    match Url::from_file_path(&absolute) {
        Ok(uri) => DocumentKey::File(uri),
        Err(()) => {
            tracing::debug!(
                location = location.raw(),
                "Location is not representable as a file URI"
            );
            DocumentKey::Opaque(location.raw().to_string())
        }
    }
}

/// Replace everything `sink` shows with `result`.
///
/// Locations that canonicalize to the same document (`a.swift` and
/// `./a.swift`) are merged in output order before the sink sees them.
pub fn publish<S: DiagnosticSink + ?Sized>(
    sink: &mut S,
    result: &DiagnosticsByLocation,
    workspace_root: &Path,
) {
    let mut documents: Vec<(DocumentKey, Vec<Diagnostic>)> = Vec::new();
    for (location, items) in result.iter() {
        let key = canonicalize(location, workspace_root);
        match documents.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, merged)) => merged.extend_from_slice(items),
            None => documents.push((key, items.to_vec())),
        }
    }

    sink.clear();
    for (key, items) in documents {
        sink.set(key, items);
    }
}

fn normalize_path(path: &Path) -> PathBuf {
    let mut out = Vec::new();
    for c in path.components() {
        match c {
            Component::ParentDir => {
                if matches!(out.last(), Some(Component::Normal(_))) {
                    out.pop();
                }
            }
            Component::CurDir => {}
            other => out.push(other),
        }
    }
    out.iter().collect()
}
