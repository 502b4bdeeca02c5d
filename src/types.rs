//! Shared types used across both pipeline stages.
//!
//! These types are serialized to JSON between stages (scan → generate)
//! and must be identical across both modules.

use crate::config::SiteConfig;
use serde::{Deserialize, Serialize};

/// Manifest output from the scan stage, consumed by the generate stage.
#[derive(Debug, Serialize, Deserialize)]
pub struct Manifest {
    pub documents: Vec<Document>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub meta: Vec<MetaEntry>,
    pub config: SiteConfig,
}

/// A content document parsed from a markdown file.
///
/// The `path` is the file's path relative to the content root with the
/// extension stripped (`cc104/m-1.md` → `cc104/m-1`), unique across the
/// whole store. The first path segment is the subject namespace; documents
/// under `{subject}/modules/` are listed as modules rather than term work.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Extension-stripped path relative to the content root, forward slashes.
    pub path: String,
    /// Source file relative to the content root, extension intact.
    pub source_path: String,
    /// Title from frontmatter (required).
    pub title: String,
    /// Short description shown on listing cards.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Draft documents are addressable by URL but excluded from all listings.
    #[serde(default)]
    pub draft: bool,
    /// Difficulty rating displayed as a badge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    /// Number of deliverable files for this output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<u32>,
    /// Raw markdown body (frontmatter block removed).
    pub body: String,
}

/// A `meta.json` entry found in the content tree.
///
/// Meta entries are not documents: subject views carry them through
/// unfiltered, and listings never include them. A subject-level entry
/// (`{subject}/meta.json`) can add a description to that subject's
/// listing page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaEntry {
    /// Path of the meta file relative to the content root.
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Difficulty rating from frontmatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}
