//! Injection of the viewer style and navigation script into a lesson's
//! `index.html`.
//!
//! The SCORM export ships its own menu chrome and opens on a table of
//! contents; the injected CSS hides that chrome and the injected JS jumps to
//! the lesson route once the page has loaded. Both injections are idempotent:
//! a block is only added when no element with exactly the same text content
//! already exists, and a fully patched file is left byte-identical.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use scraper::{Html, Selector};
use tracing::debug;

use scormchef_shared::{ChefError, Result};

/// CSS appended to `<head>`, hiding the exporter's menu elements.
pub const STYLE_ADDITION: &str = r#"
/*  Added for kolibri usage */
.lesson--open {
padding-left: 0px !important;
}
.blocks-button__button, .classic .page__menu, .default .page__menu {
display: none;
}
"#;

/// JS template appended to `<head>`; the placeholder is replaced with the
/// lesson route before injection.
pub const SCRIPT_TEMPLATE: &str = r#"
/*  Added for kolibri usage */
    document.addEventListener('DOMContentLoaded', function() {
        window.location.hash = '#/lessons/TO_REPLACE_BY_LESSON_ID';
    });

"#;

/// Placeholder token substituted with the lesson route.
pub const ROUTE_PLACEHOLDER: &str = "TO_REPLACE_BY_LESSON_ID";

static HEAD_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</head\s*>").expect("valid regex"));
// `(\s[^>]*)?` keeps `<header>` and friends from matching.
static HEAD_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<head(\s[^>]*)?>").expect("valid regex"));
static HTML_OPEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<html(\s[^>]*)?>").expect("valid regex"));
static DOCTYPE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<!doctype[^>]*>").expect("valid regex"));

/// Patch a lesson index page in place.
///
/// Ensures the document has a `<head>`, then appends the fixed style block
/// and the route-specific script block to it, skipping each block that is
/// already present with identical text. When both blocks exist the file is
/// not rewritten.
pub fn patch_index(index_path: &Path, route: &str) -> Result<()> {
    let html = match std::fs::read_to_string(index_path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ChefError::patch(format!(
                "missing index page at {}",
                index_path.display()
            )));
        }
        Err(e) => return Err(ChefError::io(index_path, e)),
    };

    let script_block = SCRIPT_TEMPLATE.replace(ROUTE_PLACEHOLDER, route);

    let doc = Html::parse_document(&html);
    let has_style = element_with_exact_text(&doc, "style", STYLE_ADDITION);
    let has_script = element_with_exact_text(&doc, "script", &script_block);

    if has_style && has_script {
        debug!(path = %index_path.display(), "index page already patched");
        return Ok(());
    }

    let mut injection = String::new();
    if !has_style {
        injection.push_str(&format!("<style>{STYLE_ADDITION}</style>"));
    }
    if !has_script {
        injection.push_str(&format!(
            "<script type=\"text/javascript\">{script_block}</script>"
        ));
    }

    let patched = splice_into_head(&html, &injection);
    std::fs::write(index_path, patched).map_err(|e| ChefError::io(index_path, e))?;

    debug!(path = %index_path.display(), route, "index page patched");
    Ok(())
}

/// True when the document contains a `tag` element whose text content equals
/// `text` exactly. Whitespace differences defeat the match.
fn element_with_exact_text(doc: &Html, tag: &str, text: &str) -> bool {
    let selector = Selector::parse(tag).expect("valid selector");
    doc.select(&selector)
        .any(|el| el.text().collect::<String>() == text)
}

/// Insert `injection` inside the document's `<head>`, creating the element
/// as the document's first child when the markup has none.
fn splice_into_head(html: &str, injection: &str) -> String {
    if let Some(m) = HEAD_CLOSE_RE.find(html) {
        return splice(html, m.start(), injection);
    }
    if let Some(m) = HEAD_OPEN_RE.find(html) {
        // Opened but never closed; the parser will still scope this to head.
        return splice(html, m.end(), injection);
    }

    let head_block = format!("<head>{injection}</head>");
    if let Some(m) = HTML_OPEN_RE.find(html) {
        return splice(html, m.end(), &head_block);
    }
    if let Some(m) = DOCTYPE_RE.find(html) {
        return splice(html, m.end(), &head_block);
    }
    format!("{head_block}{html}")
}

fn splice(html: &str, at: usize, insert: &str) -> String {
    let mut out = String::with_capacity(html.len() + insert.len());
    out.push_str(&html[..at]);
    out.push_str(insert);
    out.push_str(&html[at..]);
    out
}
