//! Term classification of subject documents.
//!
//! Documents are bucketed by literal path markers: a `/m-` segment prefix
//! marks midterm work, `/f-` marks final work. The two checks are
//! independent predicates over the whole path, so a document whose path
//! carries both markers (`cc104/m-3/f-3`) appears in both buckets, and a
//! document with neither appears in no bucket while still counting toward
//! the subject total.
//!
//! Drafts are dropped before any classification, so they never reach a
//! bucket or the total even though their pages exist.
//!
//! Within a bucket, documents are ordered by the first run of decimal
//! digits in their title (`Lab 2` before `Lab 10`); titles without digits
//! key as 0. The sort is stable, so equal keys keep scan order.

use crate::present;
use crate::types::Document;

const MIDTERM_MARKER: &str = "/m-";
const FINAL_MARKER: &str = "/f-";

/// Result of classifying one subject's documents.
pub struct Classified<'a> {
    pub midterm: Vec<&'a Document>,
    pub finals: Vec<&'a Document>,
    /// Count of all non-draft documents in scope, bucketed or not.
    pub total: usize,
}

pub fn classify<'a>(documents: &[&'a Document]) -> Classified<'a> {
    let published: Vec<&Document> = documents.iter().filter(|d| !d.draft).copied().collect();
    let total = published.len();

    let mut midterm: Vec<&Document> = published
        .iter()
        .filter(|d| d.path.contains(MIDTERM_MARKER))
        .copied()
        .collect();
    let mut finals: Vec<&Document> = published
        .iter()
        .filter(|d| d.path.contains(FINAL_MARKER))
        .copied()
        .collect();
    midterm.sort_by_key(|d| present::ordering_key(&d.title));
    finals.sort_by_key(|d| present::ordering_key(&d.title));

    Classified {
        midterm,
        finals,
        total,
    }
}

/// Module handouts: non-draft documents under `{subject_id}/modules/`,
/// ordered like the term buckets.
pub fn modules<'a>(documents: &[&'a Document], subject_id: &str) -> Vec<&'a Document> {
    let prefix = format!("{subject_id}/modules/");
    let mut modules: Vec<&Document> = documents
        .iter()
        .filter(|d| !d.draft && d.path.starts_with(&prefix))
        .copied()
        .collect();
    modules.sort_by_key(|d| present::ordering_key(&d.title));
    modules
}
