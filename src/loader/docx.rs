//! Text runs from Office Open XML (`.docx`) documents.

use std::io::{Cursor, Read};
use std::sync::LazyLock;

use regex::Regex;

const DOCUMENT_PART: &str = "word/document.xml";

static BREAK_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</w:p>|<w:br[^>]*/>|<w:cr[^>]*/>").expect("valid regex"));

static TAB_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<w:tab[^>]*/>").expect("valid regex"));

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));

pub fn extract_text(bytes: &[u8]) -> Result<String, String> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|err| format!("open archive: {err}"))?;
    let mut part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|err| format!("{DOCUMENT_PART}: {err}"))?;
    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .map_err(|err| format!("read {DOCUMENT_PART}: {err}"))?;
    Ok(xml_to_text(&xml))
}

/// Paragraph and line breaks become newlines, tabs become tabs, all other
/// markup is dropped and the predefined XML entities are decoded.
pub fn xml_to_text(xml: &str) -> String {
    let with_breaks = BREAK_REGEX.replace_all(xml, "\n");
    let with_tabs = TAB_REGEX.replace_all(&with_breaks, "\t");
    let stripped = TAG_REGEX.replace_all(&with_tabs, "");
    decode_entities(&stripped)
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
