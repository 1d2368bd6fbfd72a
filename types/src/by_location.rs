//! Diagnostics grouped by the location they were reported against.

use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::diagnostic::{Diagnostic, Location};

/// Ordered mapping from location to the diagnostics reported there.
///
/// Locations iterate in the order they were first seen, and each location's
/// diagnostics keep the order they were pushed. This is the whole result of
/// one extraction pass; consumers replace their previous state with it rather
/// than merging.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiagnosticsByLocation {
    entries: Vec<(Location, Vec<Diagnostic>)>,
    /// Raw location identifier -> index into `entries`.
    index: HashMap<String, usize>,
}

impl DiagnosticsByLocation {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a diagnostic under its own location.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        if let Some(&slot) = self.index.get(diagnostic.location().raw()) {
            self.entries[slot].1.push(diagnostic);
            return;
        }
        let location = diagnostic.location().clone();
        self.index
            .insert(location.raw().to_string(), self.entries.len());
        self.entries.push((location, vec![diagnostic]));
    }

    /// Diagnostics for a raw location identifier, in input order.
    #[must_use]
    pub fn get(&self, raw_location: &str) -> Option<&[Diagnostic]> {
        self.index
            .get(raw_location)
            .map(|&slot| self.entries[slot].1.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Location, &[Diagnostic])> {
        self.entries
            .iter()
            .map(|(location, items)| (location, items.as_slice()))
    }

    pub fn locations(&self) -> impl Iterator<Item = &Location> {
        self.entries.iter().map(|(location, _)| location)
    }

    /// Every diagnostic, grouped by location, in location first-seen order.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().flat_map(|(_, items)| items)
    }

    /// Number of distinct locations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total diagnostic count across all locations.
    #[must_use]
    pub fn total_count(&self) -> usize {
        self.entries.iter().map(|(_, items)| items.len()).sum()
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.diagnostics().any(|d| d.severity().is_error())
    }
}

impl FromIterator<Diagnostic> for DiagnosticsByLocation {
    fn from_iter<I: IntoIterator<Item = Diagnostic>>(iter: I) -> Self {
        let mut out = Self::new();
        for diagnostic in iter {
            out.push(diagnostic);
        }
        out
    }
}

impl Serialize for DiagnosticsByLocation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (location, items) in &self.entries {
            map.serialize_entry(location.raw(), items)?;
        }
        map.end()
    }
}
