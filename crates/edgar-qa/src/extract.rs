//! Filing markup cleanup.
//!
//! SEC filings arrive as large, frequently malformed HTML. Cleaning
//! strips tags and structural noise down to the running text the
//! chunker windows over: `<script>`/`<style>` bodies are dropped
//! entirely, entities are unescaped, and all whitespace runs collapse
//! to single spaces.
//!
//! The reader runs in lenient mode (no end-name checking) and treats a
//! hard parse error as end-of-document rather than failing the file:
//! whatever text was recovered up to that point still gets indexed,
//! and the ingestion layer decides whether the remainder was enough.

use quick_xml::events::Event;
use quick_xml::Reader;

/// Elements whose text content is structural noise, not document text.
const SKIP_ELEMENTS: &[&[u8]] = &[b"script", b"style"];

/// Older filings use uppercase tag names.
fn is_skip_element(name: &[u8]) -> bool {
    SKIP_ELEMENTS.iter().any(|s| name.eq_ignore_ascii_case(s))
}

/// Strip markup from a filing document and collapse whitespace.
///
/// Plain-text input passes through unchanged apart from whitespace
/// normalization, so `.txt` filings can share the same path.
pub fn clean_markup(raw: &str) -> String {
    let mut reader = Reader::from_str(raw);
    let config = reader.config_mut();
    config.check_end_names = false;
    config.trim_text(true);

    let mut out = String::new();
    let mut skip_depth = 0usize;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                if is_skip_element(e.local_name().as_ref()) {
                    skip_depth += 1;
                }
            }
            Ok(Event::End(e)) => {
                if is_skip_element(e.local_name().as_ref()) && skip_depth > 0 {
                    skip_depth -= 1;
                }
            }
            Ok(Event::Text(t)) => {
                if skip_depth == 0 {
                    // Standard entities plus nbsp, which filings use heavily.
                    let unescaped = t.unescape_with(|entity| match entity {
                        "nbsp" => Some(" "),
                        _ => None,
                    });
                    match unescaped {
                        Ok(text) => {
                            out.push_str(&text);
                            out.push(' ');
                        }
                        Err(_) => {
                            // Unknown entity; keep the raw bytes.
                            out.push_str(&String::from_utf8_lossy(t.as_ref()));
                            out.push(' ');
                        }
                    }
                }
            }
            Ok(Event::CData(t)) => {
                if skip_depth == 0 {
                    out.push_str(&String::from_utf8_lossy(t.as_ref()));
                    out.push(' ');
                }
            }
            Ok(Event::Eof) => break,
            Err(_) => break,
            Ok(_) => {}
        }
    }

    collapse_whitespace(&out)
}

/// Collapse all whitespace runs (spaces, newlines, NBSP after
/// unescaping) to single spaces and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
