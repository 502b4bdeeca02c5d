//! Shared test utilities for the labfolio test suite.
//!
//! Provides fixture setup, lookup helpers, and bulk extractors for the
//! manifest produced by the scan stage.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let manifest = scan(tmp.path()).unwrap();
//!
//! let doc = find_document(&manifest, "cc104/m-1");
//! assert_eq!(doc.title, "Lab 1: ER Modeling");
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::types::{Document, Manifest};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

// =========================================================================
// Manifest lookups, panicking with a clear message on miss
// =========================================================================

/// Find a document by path. Panics if not found.
pub fn find_document<'a>(manifest: &'a Manifest, path: &str) -> &'a Document {
    manifest
        .documents
        .iter()
        .find(|d| d.path == path)
        .unwrap_or_else(|| {
            let paths = document_paths(manifest);
            panic!("document '{path}' not found. Available: {paths:?}")
        })
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// All document paths in manifest order.
pub fn document_paths(manifest: &Manifest) -> Vec<&str> {
    manifest
        .documents
        .iter()
        .map(|d| d.path.as_str())
        .collect()
}
