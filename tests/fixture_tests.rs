//! Integration tests using fixture files.
//!
//! Each `*.html` file under `fixtures/convert` is paired with a `*.md` file
//! holding the exact Markdown the converter must produce for it.

mod common;

use common::{convert_fixture, fixtures_dir, read_fixture};
use pico_export::convert::html_to_markdown;
use pretty_assertions::assert_eq;

fn assert_fixture(stem: &str) {
    let html = read_fixture(&convert_fixture(&format!("{stem}.html")));
    let expected = read_fixture(&convert_fixture(&format!("{stem}.md")));
    assert_eq!(html_to_markdown(&html), expected.trim_end());
}

// ===========================================
// Fixture Layout
// ===========================================

#[test]
fn convert_fixtures_directory_exists() {
    let dir = fixtures_dir().join("convert");
    assert!(dir.exists(), "convert fixtures directory should exist: {:?}", dir);
}

#[test]
fn every_html_fixture_has_expected_markdown() {
    let dir = fixtures_dir().join("convert");
    let mut count = 0;
    for entry in std::fs::read_dir(&dir).unwrap() {
        let path = entry.unwrap().path();
        if path.extension().is_some_and(|ext| ext == "html") {
            assert!(
                path.with_extension("md").exists(),
                "missing expected output for {}",
                path.display()
            );
            count += 1;
        }
    }
    assert!(count > 0, "no HTML fixtures found in {}", dir.display());
}

// ===========================================
// Conversion Fixtures
// ===========================================

#[test]
fn convert_article_fixture() {
    assert_fixture("article");
}

#[test]
fn convert_lists_fixture() {
    assert_fixture("lists");
}

#[test]
fn convert_code_fixture() {
    assert_fixture("code");
}

#[test]
fn convert_all_fixtures_are_stable() {
    let dir = fixtures_dir().join("convert");
    for entry in std::fs::read_dir(&dir).unwrap() {
        let path = entry.unwrap().path();
        if path.extension().is_some_and(|ext| ext == "html") {
            let html = read_fixture(&path);
            assert_eq!(
                html_to_markdown(&html),
                html_to_markdown(&html),
                "non-deterministic output for {}",
                path.display()
            );
        }
    }
}
