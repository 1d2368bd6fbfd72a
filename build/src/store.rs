//! Diagnostics store: an in-memory sink holding the last published build.

use std::collections::HashMap;

use buildlens_types::{Diagnostic, Severity};

use crate::publish::{DiagnosticSink, DocumentKey};

#[derive(Debug, Default)]
pub struct DiagnosticsStore {
    data: HashMap<DocumentKey, Vec<Diagnostic>>,
}

impl DiagnosticsStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &DocumentKey) -> Option<&[Diagnostic]> {
        self.data.get(key).map(Vec::as_slice)
    }

    #[must_use]
    pub fn snapshot(&self) -> DiagnosticsSnapshot {
        let mut documents: Vec<(DocumentKey, Vec<Diagnostic>)> = self
            .data
            .iter()
            .map(|(key, items)| (key.clone(), items.clone()))
            .collect();

        // Sort: documents with errors first, then by key
        documents.sort_by(|a, b| {
            let a_has_errors = a.1.iter().any(|d| d.severity().is_error());
            let b_has_errors = b.1.iter().any(|d| d.severity().is_error());
            b_has_errors.cmp(&a_has_errors).then_with(|| a.0.cmp(&b.0))
        });

        DiagnosticsSnapshot { documents }
    }
}

impl DiagnosticSink for DiagnosticsStore {
    fn clear(&mut self) {
        self.data.clear();
    }

    fn set(&mut self, key: DocumentKey, items: Vec<Diagnostic>) {
        if items.is_empty() {
            self.data.remove(&key);
        } else {
            self.data.insert(key, items);
        }
    }
}

/// Immutable view of a [`DiagnosticsStore`], suitable for rendering.
///
/// Counts are computed from `documents` rather than cached.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticsSnapshot {
    /// Per-document diagnostics, error-containing documents first.
    documents: Vec<(DocumentKey, Vec<Diagnostic>)>,
}

impl DiagnosticsSnapshot {
    /// Per-document diagnostics, error-containing documents first.
    #[must_use]
    pub fn documents(&self) -> &[(DocumentKey, Vec<Diagnostic>)] {
        &self.documents
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn count_by_severity(&self, severity: Severity) -> usize {
        self.documents
            .iter()
            .flat_map(|(_, items)| items)
            .filter(|d| d.severity() == severity)
            .count()
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.count_by_severity(Severity::Error)
    }

    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.count_by_severity(Severity::Warning)
    }

    #[must_use]
    pub fn info_count(&self) -> usize {
        self.count_by_severity(Severity::Info)
    }

    #[must_use]
    pub fn total_count(&self) -> usize {
        self.documents.iter().map(|(_, items)| items.len()).sum()
    }

    /// Format a compact status string like "E:3 W:5".
    #[must_use]
    pub fn status_string(&self) -> String {
        if self.is_empty() {
            return String::new();
        }
        format!("E:{} W:{}", self.error_count(), self.warning_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buildlens_types::Location;

    fn key(name: &str) -> DocumentKey {
        DocumentKey::Opaque(name.to_string())
    }

    fn make_diag(severity: Severity, msg: &str, line: u32) -> Diagnostic {
        Diagnostic::new(Location::new("test"), severity, msg.to_string(), line, 0, 0)
    }

    #[test]
    fn test_empty_snapshot() {
        let store = DiagnosticsStore::new();
        let snap = store.snapshot();
        assert!(snap.is_empty());
        assert_eq!(snap.error_count(), 0);
        assert_eq!(snap.warning_count(), 0);
        assert_eq!(snap.status_string(), "");
    }

    #[test]
    fn test_set_and_snapshot() {
        let mut store = DiagnosticsStore::new();
        store.set(
            key("main.swift"),
            vec![
                make_diag(Severity::Error, "missing return", 10),
                make_diag(Severity::Warning, "unused variable", 20),
                make_diag(Severity::Info, "declared here", 2),
            ],
        );

        let snap = store.snapshot();
        assert_eq!(snap.error_count(), 1);
        assert_eq!(snap.warning_count(), 1);
        assert_eq!(snap.info_count(), 1);
        assert_eq!(snap.total_count(), 3);
        assert_eq!(snap.documents().len(), 1);
        assert_eq!(snap.documents()[0].0, key("main.swift"));
        assert_eq!(snap.status_string(), "E:1 W:1");
    }

    #[test]
    fn test_empty_items_removes_document() {
        let mut store = DiagnosticsStore::new();
        store.set(key("main.swift"), vec![make_diag(Severity::Error, "err", 1)]);
        assert_eq!(store.snapshot().documents().len(), 1);

        store.set(key("main.swift"), vec![]);
        assert!(store.snapshot().is_empty());
        assert!(store.get(&key("main.swift")).is_none());
    }

    #[test]
    fn test_clear_drops_stale_documents() {
        let mut store = DiagnosticsStore::new();
        store.set(key("old.swift"), vec![make_diag(Severity::Error, "err", 1)]);
        store.clear();
        store.set(key("new.swift"), vec![make_diag(Severity::Warning, "w", 1)]);

        let snap = store.snapshot();
        assert_eq!(snap.documents().len(), 1);
        assert_eq!(snap.documents()[0].0, key("new.swift"));
    }

    #[test]
    fn test_errors_first_sorting() {
        let mut store = DiagnosticsStore::new();
        store.set(key("b.swift"), vec![make_diag(Severity::Warning, "warn", 1)]);
        store.set(key("a.swift"), vec![make_diag(Severity::Warning, "warn", 1)]);
        store.set(key("c.swift"), vec![make_diag(Severity::Error, "err", 1)]);

        let snap = store.snapshot();
        // c.swift has an error, so it sorts first despite the key order
        assert_eq!(snap.documents()[0].0, key("c.swift"));
        assert_eq!(snap.documents()[1].0, key("a.swift"));
        assert_eq!(snap.documents()[2].0, key("b.swift"));
    }

    #[test]
    fn test_set_replaces_previous() {
        let mut store = DiagnosticsStore::new();
        store.set(
            key("main.swift"),
            vec![
                make_diag(Severity::Error, "err1", 1),
                make_diag(Severity::Error, "err2", 2),
            ],
        );
        assert_eq!(store.snapshot().error_count(), 2);

        store.set(key("main.swift"), vec![make_diag(Severity::Error, "err1", 1)]);
        assert_eq!(store.snapshot().error_count(), 1);
        assert_eq!(store.get(&key("main.swift")).unwrap().len(), 1);
    }
}
