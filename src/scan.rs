//! Filesystem scanning and manifest generation.
//!
//! Stage 1 of the labfolio build pipeline. Walks the content tree to discover
//! markdown documents and `meta.json` files, producing a structured manifest
//! that the generate stage consumes.
//!
//! ## Directory Structure
//!
//! The content root holds one directory per subject, named by the subject id
//! from the config registry:
//!
//! ```text
//! content/
//! ├── config.toml                  # Site configuration (optional)
//! ├── cc104/                       # Subject directory (id from config)
//! │   ├── meta.json                # Subject description (optional)
//! │   ├── m-1.md                   # Midterm output ("m-" marker)
//! │   ├── m-2.md
//! │   ├── f-1.md                   # Final output ("f-" marker)
//! │   └── modules/
//! │       └── sql-basics.md        # Module handout (listed separately)
//! └── itwst01/
//!     ├── m-1-lab-markup.md
//!     └── f-1.md
//! ```
//!
//! ## Naming Conventions
//!
//! - A document's path is its source path with the extension stripped
//!   (`cc104/m-1.md` → `cc104/m-1`), unique across the whole tree.
//! - The first path segment is the subject id; later stages scope documents
//!   to subjects by this prefix and never match across subject boundaries.
//! - `m-`/`f-` filename markers classify term work; `modules/` holds
//!   handouts. Classification happens in the generate stage, not here.
//!
//! ## Validation
//!
//! The scanner enforces these rules:
//! - Every markdown file must start with a valid frontmatter block
//!   (`title` is required)
//! - Every `meta.json` must be well-formed JSON
//! - Stripped document paths must be unique
//! - A root-level document must not shadow a subject listing page

use crate::config::{self, SiteConfig};
use crate::frontmatter::{self, FrontmatterError};
use crate::types::{Document, Manifest, MetaEntry};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Invalid frontmatter in {path}: {source}")]
    Frontmatter {
        path: String,
        source: FrontmatterError,
    },
    #[error("Invalid meta.json at {path}: {source}")]
    MetaJson {
        path: String,
        source: serde_json::Error,
    },
    #[error("Duplicate document path: {0}")]
    DuplicatePath(String),
    #[error("Document {0}.md would overwrite the {0} subject listing page")]
    ReservedPath(String),
}

/// Recognized keys of a `meta.json` file. Extra keys are ignored.
#[derive(Deserialize)]
struct MetaFile {
    title: Option<String>,
    description: Option<String>,
}

/// Scan a content tree into a [`Manifest`].
///
/// Files are visited in lexicographic filename order at every level, so
/// manifest order is deterministic for a given tree.
pub fn scan(root: &Path) -> Result<Manifest, ScanError> {
    let config = config::load_config(root)?;

    let mut documents = Vec::new();
    let mut meta = Vec::new();
    let mut seen_paths: HashSet<String> = HashSet::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry.path().strip_prefix(root).unwrap();

        if entry.file_name() == "meta.json" {
            meta.push(parse_meta(entry.path(), rel)?);
            continue;
        }

        let is_markdown = rel
            .extension()
            .map(|e| e.eq_ignore_ascii_case("md"))
            .unwrap_or(false);
        if !is_markdown {
            continue;
        }

        let document = parse_document(entry.path(), rel)?;
        if !seen_paths.insert(document.path.clone()) {
            return Err(ScanError::DuplicatePath(document.path));
        }
        if config.subject(&document.path).is_some() {
            return Err(ScanError::ReservedPath(document.path));
        }
        documents.push(document);
    }

    warn_unassigned(&documents, &config);

    Ok(Manifest {
        documents,
        meta,
        config,
    })
}

fn parse_document(abs: &Path, rel: &Path) -> Result<Document, ScanError> {
    let source_path = join_components(rel);
    let raw = fs::read_to_string(abs)?;
    let (front, body) = frontmatter::parse(&raw).map_err(|source| ScanError::Frontmatter {
        path: source_path.clone(),
        source,
    })?;

    Ok(Document {
        path: join_components(&rel.with_extension("")),
        source_path,
        title: front.title,
        description: front.description,
        draft: front.draft,
        difficulty: front.difficulty,
        files: front.files,
        body: body.to_string(),
    })
}

fn parse_meta(abs: &Path, rel: &Path) -> Result<MetaEntry, ScanError> {
    let path = join_components(rel);
    let raw = fs::read_to_string(abs)?;
    let parsed: MetaFile = serde_json::from_str(&raw).map_err(|source| ScanError::MetaJson {
        path: path.clone(),
        source,
    })?;

    Ok(MetaEntry {
        path,
        title: parsed.title,
        description: parsed.description,
    })
}

/// Join path components with forward slashes regardless of platform.
fn join_components(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Skip dotfiles and dot-directories. Depth 0 is the root itself, which may
/// legitimately be a hidden directory (tempdirs during tests).
fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_string_lossy()
            .starts_with('.')
}

/// Documents outside any registered subject stay in the manifest (they show
/// up in `scan`/`check` output) but no pages are generated for them.
fn warn_unassigned(documents: &[Document], config: &SiteConfig) {
    for doc in documents {
        let subject_id = doc.path.split('/').next().unwrap_or("");
        if config.subject(subject_id).is_none() {
            eprintln!(
                "Warning: {} is outside any registered subject and will not be published",
                doc.source_path
            );
        }
    }
}
