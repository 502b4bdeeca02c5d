//! End-to-end pipeline test: scan the fixture content, generate the site,
//! and assert on the HTML that lands in the output directory.
//!
//! Run with: cargo test --test pipeline

use labfolio::views::VisitStore;
use labfolio::{generate, scan};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

struct BuiltSite {
    _content: TempDir,
    out: TempDir,
}

impl BuiltSite {
    fn exists(&self, rel: &str) -> bool {
        self.out.path().join(rel).exists()
    }

    fn page(&self, rel: &str) -> String {
        let path = self.out.path().join(rel);
        fs::read_to_string(&path)
            .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()))
    }
}

/// Run the full pipeline over `fixtures/content` with the counter disabled.
fn build_site() -> BuiltSite {
    let content = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, content.path()).unwrap();

    let manifest = scan::scan(content.path()).unwrap();
    let manifest_path = content.path().join("manifest.json");
    fs::write(
        &manifest_path,
        serde_json::to_string_pretty(&manifest).unwrap(),
    )
    .unwrap();

    let out = TempDir::new().unwrap();
    generate::generate(&manifest_path, out.path(), &VisitStore::disabled()).unwrap();

    BuiltSite {
        _content: content,
        out,
    }
}

#[test]
fn generates_every_expected_page() {
    let site = build_site();

    assert!(site.exists("index.html"));
    assert!(site.exists("404.html"));
    assert!(site.exists("cc104/index.html"));
    assert!(site.exists("itwst01/index.html"));
    assert!(site.exists("itpf01/index.html"));
    assert!(site.exists("cc104/m-1/index.html"));
    assert!(site.exists("cc104/f-2-case-study/index.html"));
    assert!(site.exists("cc104/modules/sql-basics/index.html"));
    assert!(site.exists("itwst01/m-1-lab-markup/index.html"));
}

#[test]
fn home_page_lists_the_registry_in_order() {
    let site = build_site();
    let home = site.page("index.html");

    assert!(home.contains("Test Portfolio"));
    let cc104 = home.find("CC-104").unwrap();
    let itwst01 = home.find("IT-WST01").unwrap();
    let itpf01 = home.find("IT-PF01").unwrap();
    assert!(cc104 < itwst01);
    assert!(itwst01 < itpf01);
    assert!(home.contains(r#"href="/cc104/""#));
}

#[test]
fn home_page_case_study_link_only_where_configured() {
    let site = build_site();
    let home = site.page("index.html");

    assert_eq!(home.matches("Case Study").count(), 1);
    assert!(home.contains("https://example.com/itwst01-case"));
    assert!(home.contains("R. Santos"));
    assert!(home.contains("A.Y. 2024-2025"));
}

#[test]
fn listing_page_groups_sections_in_order() {
    let site = build_site();
    let listing = site.page("cc104/index.html");

    let midterm = listing.find("Midterm").unwrap();
    let finals = listing.find("Final").unwrap();
    let modules = listing.find("Modules").unwrap();
    assert!(midterm < finals);
    assert!(finals < modules);

    assert!(listing.contains("Lab 1: ER Modeling"));
    assert!(listing.contains("Lab 3: Stored Procedures"));
    assert!(listing.contains("Module 1: SQL Basics"));
    assert!(listing.contains("Design, model, and query relational data."));
}

#[test]
fn listing_orders_documents_by_title_number() {
    let site = build_site();
    let listing = site.page("cc104/index.html");

    let lab1 = listing.find("Lab 1: ER Modeling").unwrap();
    let lab2 = listing.find("Lab 2: Normalization").unwrap();
    assert!(lab1 < lab2);
}

#[test]
fn listing_shows_difficulty_and_files() {
    let site = build_site();
    let listing = site.page("cc104/index.html");

    assert!(listing.contains("badge-easy"));
    assert!(listing.contains("badge-hard"));
    assert!(listing.contains("2 files"));
    assert!(listing.contains("1 file"));
}

#[test]
fn draft_gets_a_page_but_stays_off_the_listing() {
    let site = build_site();

    assert!(site.exists("cc104/m-9/index.html"));
    let listing = site.page("cc104/index.html");
    assert!(!listing.contains("Lab 9"));
}

#[test]
fn empty_subject_renders_one_empty_state() {
    let site = build_site();
    let listing = site.page("itpf01/index.html");

    assert_eq!(
        listing.matches("No laboratory/case problems found.").count(),
        1
    );
    assert!(!listing.contains("Midterm"));
    assert!(listing.contains("Object-Oriented Programming 1"));
}

#[test]
fn document_page_carries_tracking_attributes() {
    let site = build_site();
    let page = site.page("cc104/m-1/index.html");

    assert!(page.contains(r#"data-subject="cc104""#));
    assert!(page.contains(r#"data-output="m-1""#));
    assert!(page.contains("0 visits"));
    assert!(page.contains("/api/track-visits"));
}

#[test]
fn document_page_renders_markdown_body() {
    let site = build_site();
    let page = site.page("cc104/m-1/index.html");

    assert!(page.contains("<h2>Entities</h2>"));
    assert!(page.contains("CREATE TABLE student"));
    assert!(!page.contains("difficulty: easy"));
}

#[test]
fn document_page_links_social_preview() {
    let site = build_site();
    let page = site.page("cc104/m-1/index.html");

    assert!(page.contains("/api/og?title=Lab%201%3A%20ER%20Modeling"));
    assert!(page.contains("subject=CC-104"));
}

#[test]
fn nested_module_page_uses_full_output_slug() {
    let site = build_site();
    let page = site.page("cc104/modules/sql-basics/index.html");

    assert!(page.contains(r#"data-output="modules/sql-basics""#));
}

#[test]
fn colors_from_config_reach_the_pages() {
    let site = build_site();
    let home = site.page("index.html");

    assert!(home.contains("--color-bg:"));
    assert!(home.contains("prefers-color-scheme: dark"));
}
