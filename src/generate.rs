//! HTML site generation.
//!
//! Stage 2 of the labfolio build pipeline. Takes the scanned manifest and
//! generates the final static HTML site.
//!
//! ## Generated Pages
//!
//! - **Home page** (`/index.html`): Course grid, one card per registered subject
//! - **Subject pages** (`/{subject}/index.html`): Midterm/Final/Modules listings
//! - **Document pages** (`/{subject}/{output}/index.html`): Rendered markdown
//!   with a live visit badge
//! - **404 page** (`/404.html`): Served for any missing path
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html                   # Home page
//! ├── 404.html
//! ├── cc104/
//! │   ├── index.html               # Subject listing
//! │   ├── m-1/
//! │   │   └── index.html           # Document page
//! │   └── modules/
//! │       └── sql-basics/
//! │           └── index.html
//! └── itwst01/
//!     └── ...
//! ```
//!
//! Draft documents get pages (they stay addressable by URL) but never appear
//! on a listing. Documents outside any registered subject are skipped.
//!
//! ## CSS and JavaScript
//!
//! Static assets are embedded at compile time:
//! - `static/style.css`: Base styles (colors injected from config)
//! - `static/track.js`: Visit tracking beacon for document pages
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating.
//! Templates are type-safe Rust code with automatic XSS escaping. The
//! social preview card is an SVG rendered through the same templates.

use crate::classify;
use crate::config::{self, SiteConfig, SubjectConfig};
use crate::present::{self, ContentType, TypeInfo};
use crate::resolve::{Resolver, ScopedView};
use crate::types::{Document, Manifest};
use crate::views::VisitStore;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};
use rayon::prelude::*;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

const CSS_STATIC: &str = include_str!("../static/style.css");
const TRACK_JS: &str = include_str!("../static/track.js");

static MODULE_INFO: TypeInfo = TypeInfo {
    label: "Module",
    icon: present::MODULE_ICON,
};

pub fn generate(
    manifest_path: &Path,
    output_dir: &Path,
    store: &VisitStore,
) -> Result<(), GenerateError> {
    let manifest_content = fs::read_to_string(manifest_path)?;
    let manifest: Manifest = serde_json::from_str(&manifest_content)?;

    // Generate CSS with colors from config
    let color_css = config::generate_color_css(&manifest.config.colors);
    let css = format!("{}\n\n{}", color_css, CSS_STATIC);

    let resolver = Resolver::new(&manifest);

    fs::create_dir_all(output_dir)?;

    let home_html = render_home(&manifest, &css);
    fs::write(output_dir.join("index.html"), home_html.into_string())?;
    println!("Generated index.html");

    let not_found_html = render_not_found(&manifest.config, &css);
    fs::write(output_dir.join("404.html"), not_found_html.into_string())?;
    println!("Generated 404.html");

    for subject in &manifest.config.subjects {
        // The resolver is built from this same registry
        let view = resolver.resolve(&subject.id).unwrap();
        let code = present::format_subject_code(&subject.id);

        let subject_dir = output_dir.join(&subject.id);
        fs::create_dir_all(&subject_dir)?;
        let subject_html = render_subject_page(view, &css);
        fs::write(subject_dir.join("index.html"), subject_html.into_string())?;
        println!("Generated {}/index.html", subject.id);

        // Visit counts are fetched up front on one connection; rendering the
        // pages is pure after that and fans out across the thread pool.
        let docs: Vec<(&Document, u64)> = view
            .documents()
            .iter()
            .map(|&doc| (doc, store.read(&subject.id, view.output_slug(doc))))
            .collect();

        docs.par_iter().try_for_each(|&(doc, count)| {
            let page_dir = output_dir.join(&doc.path);
            fs::create_dir_all(&page_dir)?;
            let page_html = render_document_page(view, doc, count, &css);
            fs::write(page_dir.join("index.html"), page_html.into_string())
        })?;
        println!("Generated {} document pages for {}", docs.len(), code);
    }

    println!("Site generated at {}", output_dir.display());
    Ok(())
}

// ============================================================================
// HTML Components
// ============================================================================

/// Renders the base HTML document structure
fn base_document(
    title: &str,
    css: &str,
    description: Option<&str>,
    og_image: Option<&str>,
    content: Markup,
) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                meta property="og:title" content=(title);
                @if let Some(desc) = description {
                    meta name="description" content=(desc);
                    meta property="og:description" content=(desc);
                }
                @if let Some(image) = og_image {
                    meta property="og:image" content=(image);
                    meta name="twitter:card" content="summary_large_image";
                }
                style { (css) }
            }
            body {
                (content)
            }
        }
    }
}

fn back_link(href: &str, label: &str) -> Markup {
    html! {
        a.back-link href=(href) { "← " (label) }
    }
}

/// Renders one listing card. `position` is the 1-based position within the
/// section, shown zero-padded.
fn lab_card(position: usize, doc: &Document, info: &TypeInfo) -> Markup {
    html! {
        li.lab-card {
            a href={ "/" (doc.path) "/" } {
                span.lab-number { (present::lab_number(position)) }
                span.lab-icon aria-label=(info.label) { (PreEscaped(info.icon)) }
                div.lab-body {
                    h3 { (doc.title) }
                    @if let Some(desc) = &doc.description {
                        p.lab-description { (desc) }
                    }
                }
                div.lab-meta {
                    @if let Some(difficulty) = doc.difficulty {
                        @let badge = present::difficulty_badge(difficulty);
                        span class={ "badge " (badge.class) } { (badge.label) }
                    }
                    @if let Some(files) = doc.files {
                        span.lab-files { (present::format_files(files)) }
                    }
                }
            }
        }
    }
}

fn card_section(heading: &str, documents: &[&Document], info_for: fn(&Document) -> &'static TypeInfo) -> Markup {
    html! {
        section.card-section {
            h2 { (heading) }
            ul.lab-list {
                @for (idx, doc) in documents.iter().enumerate() {
                    (lab_card(idx + 1, doc, info_for(doc)))
                }
            }
        }
    }
}

fn term_info(doc: &Document) -> &'static TypeInfo {
    ContentType::from_path(&doc.path).info()
}

fn module_info(_doc: &Document) -> &'static TypeInfo {
    &MODULE_INFO
}

// ============================================================================
// Page Renderers
// ============================================================================

/// Renders the home page with the course grid
fn render_home(manifest: &Manifest, css: &str) -> Markup {
    let site = &manifest.config.site;

    let content = html! {
        main.home-page {
            header.site-header {
                h1 { (site.title) }
                p.site-description { (site.description) }
            }
            div.course-grid {
                @for subject in &manifest.config.subjects {
                    (course_card(subject))
                }
            }
        }
    };

    base_document(&site.title, css, Some(&site.description), None, content)
}

fn course_card(subject: &SubjectConfig) -> Markup {
    let code = present::format_subject_code(&subject.id);

    html! {
        div.course-card {
            div.course-head {
                span.course-code { (code) }
                @if let Some(section) = &subject.section {
                    span.course-section { (section) }
                }
            }
            h2.course-name { (subject.name) }
            @if let Some(year) = &subject.year {
                p.course-year { "A.Y. " (year) }
            }
            @if let Some(instructor) = &subject.instructor {
                p.course-instructor { (instructor) }
            }
            div.course-links {
                a href={ "/" (subject.id) "/" } { "Laboratory Outputs" }
                @if let Some(url) = &subject.case_study_url {
                    a href=(url) target="_blank" rel="noopener" { "Case Study" }
                }
            }
        }
    }
}

/// Renders a subject listing page.
///
/// An empty subject (no published documents at all) gets a single empty
/// state. Otherwise, term sections appear only when their bucket is
/// non-empty, and modules get their own section.
fn render_subject_page(view: &ScopedView, css: &str) -> Markup {
    let subject = view.subject();
    let code = present::format_subject_code(&subject.id);
    let classified = classify::classify(view.documents());
    let modules = classify::modules(view.documents(), &subject.id);
    let description = view.subject_meta().and_then(|m| m.description.as_deref());

    let content = html! {
        main.subject-page {
            (back_link("/", "All subjects"))
            header.subject-header {
                span.course-code { (code) }
                h1 { (subject.name) }
                @if let Some(desc) = description {
                    p.subject-description { (desc) }
                }
            }
            @if classified.total == 0 {
                section.empty-state {
                    p { "No laboratory/case problems found." }
                }
            } @else {
                @if !classified.midterm.is_empty() {
                    (card_section("Midterm", &classified.midterm, term_info))
                }
                @if !classified.finals.is_empty() {
                    (card_section("Final", &classified.finals, term_info))
                }
            }
            @if !modules.is_empty() {
                (card_section("Modules", &modules, module_info))
            }
        }
    };

    let title = format!("{} | {}", code, subject.name);
    base_document(&title, css, description, None, content)
}

/// Renders a document page from markdown content
fn render_document_page<'a>(
    view: &ScopedView<'a>,
    doc: &'a Document,
    initial_visits: u64,
    css: &str,
) -> Markup {
    let subject = view.subject();
    let code = present::format_subject_code(&subject.id);
    let output = view.output_slug(doc);
    let og_image = format!(
        "/api/og?title={}&subject={}",
        urlencoding::encode(&doc.title),
        urlencoding::encode(&code)
    );

    // Convert markdown to HTML
    let parser = Parser::new(&doc.body);
    let mut body_html = String::new();
    md_html::push_html(&mut body_html, parser);

    let content = html! {
        main.document-page {
            (back_link(&format!("/{}/", subject.id), &code))
            header.document-header {
                h1 { (doc.title) }
                span.visit-badge data-subject=(subject.id) data-output=(output) {
                    span.visit-icon { (PreEscaped(present::VISIT_ICON)) }
                    span.visit-count { (present::format_visits(initial_visits)) }
                }
            }
            article.prose {
                (PreEscaped(body_html))
            }
        }
        script { (PreEscaped(TRACK_JS)) }
    };

    base_document(
        &doc.title,
        css,
        doc.description.as_deref(),
        Some(&og_image),
        content,
    )
}

/// Renders the 404 page. Every kind of miss gets this same page; the
/// server does not distinguish unknown subjects from unknown documents.
fn render_not_found(config: &SiteConfig, css: &str) -> Markup {
    let content = html! {
        main.not-found-page {
            h1 { "404" }
            p { "This page does not exist." }
            (back_link("/", &config.site.title))
        }
    };

    base_document("404 Not Found", css, None, None, content)
}

/// Renders the social preview card as a standalone SVG document.
///
/// Both parameters are optional and capped at 100 characters (on char
/// boundaries). Dimensions follow the usual 1200x630 preview size.
pub fn render_og_card(title: Option<&str>, subject: Option<&str>) -> String {
    let title = truncate_chars(title.unwrap_or("My default title"), 100);
    let subject = truncate_chars(subject.unwrap_or("Subject"), 100);

    html! {
        svg xmlns="http://www.w3.org/2000/svg" width="1200" height="630" viewBox="0 0 1200 630" {
            rect width="1200" height="630" fill="#ffffff" {}
            text x="600" y="300" text-anchor="middle" font-family="Geist, system-ui, sans-serif"
                font-size="64" font-weight="700" fill="#111111" { (title) }
            text x="600" y="380" text-anchor="middle" font-family="Geist, system-ui, sans-serif"
                font-size="30" fill="#737373" { (subject) }
        }
    }
    .into_string()
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

// ============================================================================
// Tests
// ============================================================================
