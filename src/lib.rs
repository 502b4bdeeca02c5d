//! # Labfolio
//!
//! A static site generator for academic coursework portfolios. Your
//! filesystem is the data source: top-level directories are subjects,
//! markdown files are laboratory outputs, and filename markers assign each
//! output to the midterm or final term.
//!
//! # Architecture: Two-Stage Pipeline
//!
//! Labfolio processes content through two independent stages with a JSON
//! manifest between them:
//!
//! ```text
//! 1. Scan      content/  →  manifest.json    (filesystem → structured data)
//! 2. Generate  manifest  →  dist/            (final HTML site)
//! ```
//!
//! This separation exists for three reasons:
//!
//! - **Debuggability**: the manifest is human-readable JSON you can inspect.
//! - **Validation**: `check` runs the scan stage alone and reports every
//!   frontmatter problem without writing a single page.
//! - **Testability**: everything after the scan is a pure function of the
//!   manifest, so pipeline logic is tested without touching the filesystem.
//!
//! The `serve` command hosts the generated site locally and adds the two
//! dynamic endpoints the pages call: visit tracking and social preview cards.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Stage 1: walks the content directory, parses frontmatter and `meta.json`, produces the manifest |
//! | [`generate`] | Stage 2: renders the final HTML site from the manifest using Maud |
//! | [`serve`] | Local HTTP server for the output, plus the visit and preview endpoints |
//! | [`config`] | `config.toml` loading, validation, merging, and CSS generation |
//! | [`types`] | Shared manifest types serialized between stages |
//! | [`frontmatter`] | YAML frontmatter parser for document sources |
//! | [`resolve`] | Subject-scoped views over the manifest |
//! | [`classify`] | Midterm/final bucketing and module grouping |
//! | [`present`] | Pure display mapping: content types, badges, subject codes, ordering |
//! | [`views`] | Remote visit counter client (Upstash-style Redis REST) |
//! | [`output`] | CLI output formatting: tree-based display of pipeline results |
//!
//! # Design Decisions
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/), a compile-time HTML
//! macro system, rather than Handlebars or Tera. Advantages:
//!
//! - **Compile-time checking**: malformed HTML is a build error, not a runtime surprise.
//! - **Type-safe**: template variables are Rust expressions, not stringly-typed lookups.
//! - **XSS-safe by default**: all interpolation is auto-escaped.
//! - **Zero runtime files**: no template directory to ship or get out of sync.
//!
//! ## Frontmatter Validated at the Boundary
//!
//! The scan stage is the only place that reads document sources. Frontmatter
//! is parsed against a typed schema right there, so a missing title or a
//! misspelled difficulty fails the scan with the file named, and every later
//! stage can trust the manifest without re-checking anything.
//!
//! ## A Fixed Subject Registry
//!
//! Subjects come from `config.toml` (or the built-in registry), not from
//! whatever directories happen to exist. A stray directory cannot invent a
//! course page; it is reported and skipped. Registry order is display order
//! on the home page.
//!
//! ## Path Markers Over Frontmatter Terms
//!
//! A document lands in the midterm or final bucket because its filename
//! starts with `m-` or `f-`, not because of a frontmatter field. The
//! filesystem stays the single source of truth for organization; frontmatter
//! carries presentation only (title, difficulty, attachments).
//!
//! ## Fail-Open Visit Counter
//!
//! The visit counter talks to an Upstash-style Redis REST endpoint. Every
//! failure path (unset environment, network errors, malformed replies)
//! degrades to a count of zero. A dead counter must never take down a build
//! or a page view.
//!
//! ## SVG Social Cards
//!
//! The `/api/og` preview is an SVG rendered through the same Maud templates
//! as the site. No headless browser, no raster pipeline; the card is a few
//! hundred bytes of markup that any crawler can rasterize itself.
//!
//! # Plain Output
//!
//! The generated site is plain HTML and CSS with one small tracking script.
//! Dropped on any static file server it works without Node or a database.
//! The dynamic endpoints are additive: without them, pages simply keep the
//! visit counts they were built with.

pub mod classify;
pub mod config;
pub mod frontmatter;
pub mod generate;
pub mod output;
pub mod present;
pub mod resolve;
pub mod scan;
pub mod serve;
pub mod types;
pub mod views;

#[cfg(test)]
pub(crate) mod test_helpers;
