//! Site configuration module.
//!
//! Handles loading, validating, and merging the `config.toml` at the content
//! root. Stock defaults are overridden by whatever keys the user config file
//! specifies.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "Coursework Portfolio"
//! description = "Laboratory outputs, exercises, and case studies."
//!
//! # One entry per subject. Subject ids double as content directory names:
//! # documents under content/cc104/ belong to the cc104 subject. Declaring
//! # any [[subjects]] entry replaces the stock registry entirely.
//! [[subjects]]
//! id = "cc104"
//! name = "Information Management"
//! instructor = "J. Dela Cruz"       # optional
//! section = "BSIT 2-1"              # optional
//! year = "2024-2025"                # optional
//! case_study_url = "https://..."    # optional
//!
//! [colors.light]
//! background = "#ffffff"
//! text = "#111111"
//! text_muted = "#666666"    # Card descriptions, back links, badges
//! border = "#e0e0e0"
//! link = "#333333"
//! link_hover = "#000000"
//!
//! [colors.dark]
//! background = "#0a0a0a"
//! text = "#eeeeee"
//! text_muted = "#999999"
//! border = "#333333"
//! link = "#cccccc"
//! link_hover = "#ffffff"
//!
//! [serve]
//! interface = "127.0.0.1"   # Dev server bind address
//! port = 4000               # Dev server port
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse: override just the values you want:
//!
//! ```toml
//! # Only override the light mode background
//! [colors.light]
//! background = "#fafafa"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site-wide metadata (title, description).
    pub site: SiteMeta,
    /// The subject registry. Only documents under a registered subject id
    /// get listing pages; declaring any entry replaces the stock registry.
    pub subjects: Vec<SubjectConfig>,
    /// Color schemes for light and dark modes.
    pub colors: ColorConfig,
    /// Dev server settings.
    pub serve: ServeConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site: SiteMeta::default(),
            subjects: default_subjects(),
            colors: ColorConfig::default(),
            serve: ServeConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Look up a subject by its registered id.
    pub fn subject(&self, id: &str) -> Option<&SubjectConfig> {
        self.subjects.iter().find(|s| s.id == id)
    }

    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site.title.trim().is_empty() {
            return Err(ConfigError::Validation("site.title must not be empty".into()));
        }
        if self.subjects.is_empty() {
            return Err(ConfigError::Validation(
                "at least one [[subjects]] entry is required".into(),
            ));
        }
        let mut seen = std::collections::HashSet::new();
        for subject in &self.subjects {
            if subject.id.is_empty()
                || !subject
                    .id
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
            {
                return Err(ConfigError::Validation(format!(
                    "subject id {:?} must be non-empty lowercase alphanumeric",
                    subject.id
                )));
            }
            if subject.name.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "subject {:?} must have a non-empty name",
                    subject.id
                )));
            }
            if !seen.insert(subject.id.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "duplicate subject id {:?}",
                    subject.id
                )));
            }
        }
        if self.serve.port == 0 {
            return Err(ConfigError::Validation("serve.port must be non-zero".into()));
        }
        Ok(())
    }
}

/// Site-wide metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteMeta {
    /// Site title, shown on the home page and in `<title>` tags.
    pub title: String,
    /// Site description, used in meta tags and on the home page.
    pub description: String,
}

impl Default for SiteMeta {
    fn default() -> Self {
        Self {
            title: "Coursework Portfolio".to_string(),
            description: "Laboratory outputs, exercises, and case studies.".to_string(),
        }
    }
}

/// A registered subject (course).
///
/// The `id` doubles as the content directory name: documents under
/// `content/{id}/` belong to this subject. Ids must be lowercase
/// alphanumeric so they map cleanly onto URLs and display codes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubjectConfig {
    /// Subject id, e.g. `"cc104"`. Lowercase alphanumeric, unique.
    pub id: String,
    /// Full course name, e.g. `"Information Management"`.
    pub name: String,
    /// Instructor name, shown on the home page course card.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructor: Option<String>,
    /// Class section, e.g. `"BSIT 2-1"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// Academic year, e.g. `"2024-2025"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    /// External link to the subject's case study deliverable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_study_url: Option<String>,
}

impl SubjectConfig {
    fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            instructor: None,
            section: None,
            year: None,
            case_study_url: None,
        }
    }
}

/// The stock subject registry.
fn default_subjects() -> Vec<SubjectConfig> {
    vec![
        SubjectConfig::new("cc104", "Information Management"),
        SubjectConfig::new("cc105", "Applications Development and Emerging Technologies"),
        SubjectConfig::new("ithci01", "Introduction to Human Computer Interaction"),
        SubjectConfig::new("itipt01", "Integrative Programming and Technologies 1"),
        SubjectConfig::new("itipt02", "Integrative Programming and Technologies 2"),
        SubjectConfig::new("itpf01", "Object-Oriented Programming 1"),
        SubjectConfig::new("itpf02", "Object-Oriented Programming 2"),
        SubjectConfig::new("itwst01", "Web Systems and Technologies 1"),
        SubjectConfig::new("itwst02", "Web Systems and Technologies 2"),
        SubjectConfig::new("itwst03", "Web Systems and Technologies 3"),
        SubjectConfig::new("itwst05", "Web Security"),
    ]
}

/// Dev server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServeConfig {
    /// Bind address.
    pub interface: String,
    /// TCP port. The server retries consecutive ports when this one is taken.
    pub port: u16,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: "127.0.0.1".to_string(),
            port: 4000,
        }
    }
}

/// Color configuration for light and dark modes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Light mode color scheme.
    pub light: ColorScheme,
    /// Dark mode color scheme.
    pub dark: ColorScheme,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            light: ColorScheme::default_light(),
            dark: ColorScheme::default_dark(),
        }
    }
}

/// Individual color scheme (light or dark).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorScheme {
    /// Background color.
    pub background: String,
    /// Primary text color.
    pub text: String,
    /// Muted/secondary text color (card descriptions, back links, badges).
    pub text_muted: String,
    /// Border color.
    pub border: String,
    /// Link color.
    pub link: String,
    /// Link hover color.
    pub link_hover: String,
}

impl ColorScheme {
    pub fn default_light() -> Self {
        Self {
            background: "#ffffff".to_string(),
            text: "#111111".to_string(),
            text_muted: "#666666".to_string(),
            border: "#e0e0e0".to_string(),
            link: "#333333".to_string(),
            link_hover: "#000000".to_string(),
        }
    }

    pub fn default_dark() -> Self {
        Self {
            background: "#0a0a0a".to_string(),
            text: "#eeeeee".to_string(),
            text_muted: "#999999".to_string(),
            border: "#333333".to_string(),
            link: "#cccccc".to_string(),
            link_hover: "#ffffff".to_string(),
        }
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::default_light()
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely. In
///   particular, a user `[[subjects]]` list replaces the stock registry
///   rather than appending to it.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Labfolio Configuration
# ======================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Place this file at the content root (content/config.toml). Each key
# overrides the stock default; unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site metadata
# ---------------------------------------------------------------------------
[site]
title = "Coursework Portfolio"
description = "Laboratory outputs, exercises, and case studies."

# ---------------------------------------------------------------------------
# Subject registry
# ---------------------------------------------------------------------------
# One entry per subject. The id doubles as the content directory name:
# documents under content/cc104/ belong to the cc104 subject. Ids must be
# lowercase alphanumeric and unique.
#
# Declaring any [[subjects]] entry replaces this stock registry entirely,
# so list every subject you want served.
#
# Optional keys per subject (shown commented below):
#   instructor     = "J. Dela Cruz"    # shown on the home page card
#   section        = "BSIT 2-1"        # class section
#   year           = "2024-2025"       # academic year
#   case_study_url = "https://..."     # external case study link

[[subjects]]
id = "cc104"
name = "Information Management"

[[subjects]]
id = "cc105"
name = "Applications Development and Emerging Technologies"

[[subjects]]
id = "ithci01"
name = "Introduction to Human Computer Interaction"

[[subjects]]
id = "itipt01"
name = "Integrative Programming and Technologies 1"

[[subjects]]
id = "itipt02"
name = "Integrative Programming and Technologies 2"

[[subjects]]
id = "itpf01"
name = "Object-Oriented Programming 1"

[[subjects]]
id = "itpf02"
name = "Object-Oriented Programming 2"

[[subjects]]
id = "itwst01"
name = "Web Systems and Technologies 1"

[[subjects]]
id = "itwst02"
name = "Web Systems and Technologies 2"

[[subjects]]
id = "itwst03"
name = "Web Systems and Technologies 3"

[[subjects]]
id = "itwst05"
name = "Web Security"

# ---------------------------------------------------------------------------
# Colors - Light mode (prefers-color-scheme: light)
# ---------------------------------------------------------------------------
[colors.light]
background = "#ffffff"
text = "#111111"
text_muted = "#666666"    # Card descriptions, back links, badges
border = "#e0e0e0"
link = "#333333"
link_hover = "#000000"

# ---------------------------------------------------------------------------
# Colors - Dark mode (prefers-color-scheme: dark)
# ---------------------------------------------------------------------------
[colors.dark]
background = "#0a0a0a"
text = "#eeeeee"
text_muted = "#999999"
border = "#333333"
link = "#cccccc"
link_hover = "#ffffff"

# ---------------------------------------------------------------------------
# Dev server
# ---------------------------------------------------------------------------
[serve]
interface = "127.0.0.1"
port = 4000
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-bg: {light_bg};
    --color-text: {light_text};
    --color-text-muted: {light_text_muted};
    --color-border: {light_border};
    --color-link: {light_link};
    --color-link-hover: {light_link_hover};
}}

@media (prefers-color-scheme: dark) {{
    :root {{
        --color-bg: {dark_bg};
        --color-text: {dark_text};
        --color-text-muted: {dark_text_muted};
        --color-border: {dark_border};
        --color-link: {dark_link};
        --color-link-hover: {dark_link_hover};
    }}
}}"#,
        light_bg = colors.light.background,
        light_text = colors.light.text,
        light_text_muted = colors.light.text_muted,
        light_border = colors.light.border,
        light_link = colors.light.link,
        light_link_hover = colors.light.link_hover,
        dark_bg = colors.dark.background,
        dark_text = colors.dark.text,
        dark_text_muted = colors.dark.text_muted,
        dark_border = colors.dark.border,
        dark_link = colors.dark.link,
        dark_link_hover = colors.dark.link_hover,
    )
}
