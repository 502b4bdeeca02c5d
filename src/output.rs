//! CLI output formatting for both pipeline stages.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. The primary display
//! for every entity (subject, document) is its semantic identity, title and
//! positional index, with filesystem paths shown as secondary context via
//! indented `Source:` lines. This makes the output readable as a content
//! inventory while still letting users trace data back to specific files.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Subjects
//! 001 CC-104 Information Management (5 documents)
//!     Source: cc104/
//!     Design, model, and query relational data.
//!     Midterm
//!         001 Lab 1: ER Modeling
//!             Source: cc104/m-1.md
//!     Final
//!         001 Lab 3: Stored Procedures
//!             Source: cc104/f-1.md
//!     Modules
//!         001 Module 1: SQL Basics
//!             Source: cc104/modules/sql-basics.md
//!     Drafts
//!         Lab 9: Query Optimization (WIP)
//!             Source: cc104/m-9.md
//! 002 IT-WST01 Web Systems and Technologies 1 (0 documents)
//!
//! Config
//!     config.toml
//! ```
//!
//! ## Generate
//!
//! ```text
//! Home → index.html
//! 404 → 404.html
//! 001 CC-104 Information Management → cc104/index.html
//!     001 Lab 1: ER Modeling → cc104/m-1/index.html
//!     002 Lab 9: Query Optimization (WIP) → cc104/m-9/index.html (draft)
//! Generated 2 subject pages, 5 document pages
//! ```
//!
//! # Architecture
//!
//! Each stage has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure,
//! with no I/O beyond the existence checks in the scan Config section.

use crate::classify;
use crate::present;
use crate::resolve::Resolver;
use crate::types::{Document, Manifest};
use std::path::Path;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format an entity header: positional index + title, with optional detail.
///
/// Used for subjects (with document count) and documents (without).
///
/// ```text
/// 001 CC-104 Information Management (5 documents)
/// 001 Lab 1: ER Modeling
/// ```
fn entity_header(index: usize, title: &str, count: Option<usize>) -> String {
    match count {
        Some(n) => format!("{} {} ({} documents)", format_index(index), title, n),
        None => format!("{} {}", format_index(index), title),
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

fn subject_display(id: &str, name: &str) -> String {
    format!("{} {}", present::format_subject_code(id), name)
}

// ============================================================================
// Stage 1: Scan output
// ============================================================================

/// Format scan stage output showing the discovered content inventory.
///
/// Subjects come out in registry order; their documents come out grouped the
/// way the listing pages will group them (Midterm, Final, Modules), with
/// drafts shown separately so nothing silently disappears.
pub fn format_scan_output(manifest: &Manifest, source_root: &Path) -> Vec<String> {
    let mut lines = Vec::new();
    let resolver = Resolver::new(manifest);

    lines.push("Subjects".to_string());

    for (i, subject) in manifest.config.subjects.iter().enumerate() {
        let view = resolver.resolve(&subject.id).unwrap();
        let display = subject_display(&subject.id, &subject.name);
        lines.push(entity_header(i + 1, &display, Some(view.documents().len())));
        lines.push(format!("{}Source: {}/", indent(1), subject.id));

        if let Some(meta) = view.subject_meta()
            && let Some(desc) = &meta.description
        {
            let truncated = truncate_desc(desc.trim(), 60);
            if !truncated.is_empty() {
                lines.push(format!("{}{}", indent(1), truncated));
            }
        }

        let classified = classify::classify(view.documents());
        let modules = classify::modules(view.documents(), &subject.id);

        push_bucket(&mut lines, "Midterm", &classified.midterm);
        push_bucket(&mut lines, "Final", &classified.finals);
        push_bucket(&mut lines, "Modules", &modules);

        // Drafts are unnumbered: they hold no position in any listing
        let drafts: Vec<&Document> = view
            .documents()
            .iter()
            .filter(|d| d.draft)
            .copied()
            .collect();
        if !drafts.is_empty() {
            lines.push(format!("{}Drafts", indent(1)));
            for doc in drafts {
                lines.push(format!("{}{}", indent(2), doc.title));
                lines.push(format!("{}Source: {}", indent(3), doc.source_path));
            }
        }
    }

    // Documents outside every registered subject
    let unassigned: Vec<&Document> = manifest
        .documents
        .iter()
        .filter(|d| {
            let first = d.path.split('/').next().unwrap_or(&d.path);
            manifest.config.subject(first).is_none()
        })
        .collect();
    if !unassigned.is_empty() {
        lines.push(String::new());
        lines.push("Unassigned".to_string());
        for doc in unassigned {
            lines.push(format!("{}{}", indent(1), doc.source_path));
        }
    }

    // Config section
    lines.push(String::new());
    lines.push("Config".to_string());
    if source_root.join("config.toml").exists() {
        lines.push(format!("{}config.toml", indent(1)));
    } else {
        lines.push(format!("{}(built-in defaults)", indent(1)));
    }

    lines
}

fn push_bucket(lines: &mut Vec<String>, heading: &str, documents: &[&Document]) {
    if documents.is_empty() {
        return;
    }
    lines.push(format!("{}{}", indent(1), heading));
    for (i, doc) in documents.iter().enumerate() {
        lines.push(format!(
            "{}{}",
            indent(2),
            entity_header(i + 1, &doc.title, None)
        ));
        lines.push(format!("{}Source: {}", indent(3), doc.source_path));
    }
}

/// Print scan output to stdout.
pub fn print_scan_output(manifest: &Manifest, source_root: &Path) {
    for line in format_scan_output(manifest, source_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Stage 2: Generate output
// ============================================================================

/// Format generate stage output showing generated HTML files.
///
/// Information-first: each entity leads with its positional index and title,
/// followed by `→` and the output path. Document pages come out in manifest
/// order, which is also generation order.
pub fn format_generate_output(manifest: &Manifest) -> Vec<String> {
    let mut lines = Vec::new();
    let mut total_document_pages = 0;

    lines.push("Home \u{2192} index.html".to_string());
    lines.push("404 \u{2192} 404.html".to_string());

    let resolver = Resolver::new(manifest);

    for (i, subject) in manifest.config.subjects.iter().enumerate() {
        let view = resolver.resolve(&subject.id).unwrap();
        let display = subject_display(&subject.id, &subject.name);
        lines.push(format!(
            "{} \u{2192} {}/index.html",
            entity_header(i + 1, &display, None),
            subject.id
        ));

        for (idx, doc) in view.documents().iter().enumerate() {
            let draft_marker = if doc.draft { " (draft)" } else { "" };
            lines.push(format!(
                "{}{} \u{2192} {}/index.html{}",
                indent(1),
                entity_header(idx + 1, &doc.title, None),
                doc.path,
                draft_marker
            ));
            total_document_pages += 1;
        }
    }

    lines.push(format!(
        "Generated {} subject pages, {} document pages",
        manifest.config.subjects.len(),
        total_document_pages
    ));

    lines
}

/// Print generate output to stdout.
pub fn print_generate_output(manifest: &Manifest) {
    for line in format_generate_output(manifest) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
