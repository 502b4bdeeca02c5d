//! Subject resolution over a scanned manifest.
//!
//! The resolver answers "which documents belong to subject X" for the
//! generate stage and the dev server API. Views are computed once per
//! registered subject when the resolver is built and cached by subject id,
//! so repeated lookups never re-filter the manifest.
//!
//! Scoping is purely prefix-based on the document path: `cc104/m-1` belongs
//! to `cc104`, and the separator is part of the match, so `cc1045/m-1` does
//! not. Only registered subjects resolve at all. A directory full of files
//! whose name is not in the registry behaves exactly like a missing
//! directory, while a registered subject with no files yields an empty view.

use crate::config::SubjectConfig;
use crate::types::{Document, Manifest, MetaEntry};
use std::collections::HashMap;

/// Per-subject lookup over a [`Manifest`].
pub struct Resolver<'a> {
    views: HashMap<&'a str, ScopedView<'a>>,
}

/// All manifest data visible from one subject's perspective.
pub struct ScopedView<'a> {
    subject: &'a SubjectConfig,
    documents: Vec<&'a Document>,
    meta: Vec<&'a MetaEntry>,
}

impl<'a> Resolver<'a> {
    pub fn new(manifest: &'a Manifest) -> Self {
        let mut views = HashMap::new();
        for subject in &manifest.config.subjects {
            let prefix = format!("{}/", subject.id);
            let documents = manifest
                .documents
                .iter()
                .filter(|d| d.path.starts_with(&prefix))
                .collect();
            // Meta entries pass through unfiltered: they are not documents
            // and are never subject to scoping.
            let meta = manifest.meta.iter().collect();
            views.insert(
                subject.id.as_str(),
                ScopedView {
                    subject,
                    documents,
                    meta,
                },
            );
        }
        Self { views }
    }

    /// Look up the cached view for a subject id.
    ///
    /// Returns `None` for any id that is not in the registry, regardless of
    /// what exists on disk.
    pub fn resolve(&self, subject_id: &str) -> Option<&ScopedView<'a>> {
        self.views.get(subject_id)
    }
}

impl<'a> ScopedView<'a> {
    pub fn subject(&self) -> &'a SubjectConfig {
        self.subject
    }

    /// Documents in this subject's scope, in manifest (scan) order.
    /// Drafts are included; filtering them is a presentation concern.
    pub fn documents(&self) -> &[&'a Document] {
        &self.documents
    }

    /// Fetch a single document by its output slug, the path relative to the
    /// subject directory (`m-1`, `modules/sql-basics`).
    ///
    /// The match is exact: no normalization, no fuzzy matching. Drafts are
    /// returned like any other document.
    pub fn get(&self, output: &str) -> Option<&'a Document> {
        let full = format!("{}/{}", self.subject.id, output);
        self.documents.iter().find(|d| d.path == full).copied()
    }

    /// All meta entries in the manifest, unfiltered.
    pub fn meta(&self) -> &[&'a MetaEntry] {
        &self.meta
    }

    /// The subject's own `meta.json` entry, if one exists.
    pub fn subject_meta(&self) -> Option<&'a MetaEntry> {
        let own = format!("{}/meta.json", self.subject.id);
        self.meta.iter().find(|m| m.path == own).copied()
    }

    /// A document's output slug: its path with the subject prefix removed.
    pub fn output_slug(&self, doc: &'a Document) -> &'a str {
        doc.path
            .strip_prefix(self.subject.id.as_str())
            .and_then(|rest| rest.strip_prefix('/'))
            .unwrap_or(&doc.path)
    }
}
