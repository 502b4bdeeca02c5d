//! YAML frontmatter parsing for content documents.
//!
//! Every markdown file in the content tree starts with a `---` delimited
//! YAML block. The schema is validated here, at the scan boundary, so the
//! generate stage can assume every document in the manifest is well formed.
//! Unknown keys are ignored rather than rejected: authors are free to
//! annotate files with extra fields without breaking the build.

use serde::Deserialize;
use thiserror::Error;

use crate::types::Difficulty;

#[derive(Debug, Error)]
pub enum FrontmatterError {
    #[error("file does not start with a '---' frontmatter block")]
    Missing,
    #[error("frontmatter block is not terminated by a closing '---'")]
    Unterminated,
    #[error("invalid frontmatter: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Frontmatter fields recognized by the scanner.
#[derive(Debug, Deserialize)]
pub struct Frontmatter {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub draft: bool,
    pub difficulty: Option<Difficulty>,
    pub files: Option<u32>,
}

/// Splits `raw` into its parsed frontmatter and the markdown body.
///
/// The opening `---` must be the first line of the file. The closing
/// delimiter is the next line consisting of `---`; everything after it is
/// the body, returned verbatim. Line endings may be LF or CRLF.
pub fn parse(raw: &str) -> Result<(Frontmatter, &str), FrontmatterError> {
    let rest = match raw.split_once('\n') {
        Some((first, rest)) if first.trim_end() == "---" => rest,
        _ => return Err(FrontmatterError::Missing),
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let front = serde_yaml::from_str(&rest[..offset])?;
            return Ok((front, &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    Err(FrontmatterError::Unterminated)
}
