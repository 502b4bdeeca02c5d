//! Presentation mapping for listing cards.
//!
//! Pure functions from document metadata to display attributes: content
//! type (icon + label), difficulty badge, ordering key, and the small text
//! formatters shared by the page renderers. Everything here is
//! deterministic and free of I/O so the generate stage and the dev server
//! produce identical cards for identical input.

use crate::types::Difficulty;

/// Content type derived from a document's path.
///
/// The variant set is closed: every document maps to exactly one of these,
/// with [`ContentType::Default`] as the fallback. Display data lives in a
/// lookup table indexed by variant, so adding a variant without its table
/// entry fails to compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Laboratory,
    Exercise,
    CaseStudy,
    Default,
}

/// Display attributes for a content type.
pub struct TypeInfo {
    pub label: &'static str,
    pub icon: &'static str,
}

static TYPE_INFO: [TypeInfo; 4] = [
    TypeInfo {
        label: "Laboratory",
        icon: include_str!("../static/icons/laptop.svg"),
    },
    TypeInfo {
        label: "Exercise",
        icon: include_str!("../static/icons/pencil.svg"),
    },
    TypeInfo {
        label: "Case Study",
        icon: include_str!("../static/icons/briefcase.svg"),
    },
    TypeInfo {
        label: "Document",
        icon: include_str!("../static/icons/file-text.svg"),
    },
];

/// Icon for module handout cards.
pub const MODULE_ICON: &str = include_str!("../static/icons/book-open.svg");

/// Icon for the visit counter badge.
pub const VISIT_ICON: &str = include_str!("../static/icons/eye.svg");

impl ContentType {
    /// Derive the content type from a document path.
    ///
    /// Substring checks in fixed precedence: `lab`, then `exercise`, then
    /// `case`. Matching is case-sensitive, so `LAB-1` falls through to
    /// [`ContentType::Default`].
    pub fn from_path(path: &str) -> Self {
        if path.contains("lab") {
            ContentType::Laboratory
        } else if path.contains("exercise") {
            ContentType::Exercise
        } else if path.contains("case") {
            ContentType::CaseStudy
        } else {
            ContentType::Default
        }
    }

    pub fn info(self) -> &'static TypeInfo {
        &TYPE_INFO[self as usize]
    }
}

/// Badge shown for a document's difficulty rating.
pub struct Badge {
    pub label: &'static str,
    pub class: &'static str,
}

pub fn difficulty_badge(difficulty: Difficulty) -> Badge {
    match difficulty {
        Difficulty::Easy => Badge {
            label: "Easy",
            class: "badge-easy",
        },
        Difficulty::Medium => Badge {
            label: "Medium",
            class: "badge-medium",
        },
        Difficulty::Hard => Badge {
            label: "Hard",
            class: "badge-hard",
        },
    }
}

/// Ordering key for listing sort: the first run of decimal digits in the
/// title, or 0 when there is none (or the run does not fit in a `u32`).
pub fn ordering_key(title: &str) -> u32 {
    let digits: String = title
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

/// Format a subject id as its display code: uppercased, with a dash after
/// a leading `IT` or `CC` department prefix.
///
/// `cc104` → `CC-104`, `itwst01` → `IT-WST01`. Ids without a known prefix
/// are just uppercased.
pub fn format_subject_code(id: &str) -> String {
    let upper = id.to_uppercase();
    for prefix in ["IT", "CC"] {
        if let Some(rest) = upper.strip_prefix(prefix)
            && !rest.is_empty()
        {
            return format!("{prefix}-{rest}");
        }
    }
    upper
}

/// Zero-padded position number for a listing card.
pub fn lab_number(position: usize) -> String {
    format!("{position:02}")
}

pub fn format_visits(count: u64) -> String {
    if count == 1 {
        "1 visit".to_string()
    } else {
        format!("{count} visits")
    }
}

pub fn format_files(count: u32) -> String {
    if count == 1 {
        "1 file".to_string()
    } else {
        format!("{count} files")
    }
}
