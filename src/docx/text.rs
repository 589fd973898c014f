use anyhow::Context;

use crate::docx::package::DocxPackage;
use crate::docx::xml::{parse_xml_part, XmlEvent, XmlPart};
use crate::entities::decode_entities;
use crate::normalize::normalize_extracted_text;

const PARAGRAPH_TAG: &str = "w:p";
const RUN_TEXT_TAG: &str = "w:t";

/// Best-effort plain-text rendering of a document container.
///
/// Any failure to read the container or its XML yields an empty string, so
/// callers must treat "" as "extraction failed", not "document is empty".
pub fn extract_document_text(bytes: &[u8]) -> String {
    try_extract(bytes).unwrap_or_default()
}

fn try_extract(bytes: &[u8]) -> anyhow::Result<String> {
    let pkg = DocxPackage::from_bytes(bytes)?;
    let mut part_texts: Vec<String> = Vec::new();
    for ent in pkg.text_parts() {
        if ent.data.is_empty() {
            continue;
        }
        let part = parse_xml_part(&ent.name, &ent.data)
            .with_context(|| format!("parse xml part: {}", ent.name))?;
        let text = extract_part_text(&part);
        if !text.is_empty() {
            part_texts.push(text);
        }
    }
    Ok(normalize_extracted_text(&part_texts.join(" ")))
}

fn extract_part_text(part: &XmlPart) -> String {
    let mut paragraphs: Vec<String> = Vec::new();
    let mut saw_paragraph = false;
    let mut in_paragraph = false;
    let mut in_run_text = false;
    let mut fragments: Vec<String> = Vec::new();

    for ev in &part.events {
        match ev {
            XmlEvent::Start { name, .. } => {
                if name == PARAGRAPH_TAG {
                    saw_paragraph = true;
                    in_paragraph = true;
                    fragments.clear();
                } else if name == RUN_TEXT_TAG && in_paragraph {
                    in_run_text = true;
                }
            }
            XmlEvent::End { name } => {
                if name == PARAGRAPH_TAG && in_paragraph {
                    let joined = join_run_fragments(&fragments);
                    if !joined.is_empty() {
                        paragraphs.push(joined);
                    }
                    in_paragraph = false;
                    fragments.clear();
                } else if name == RUN_TEXT_TAG {
                    in_run_text = false;
                }
            }
            XmlEvent::Text { text } => {
                if in_run_text {
                    fragments.push(decode_entities(text));
                }
            }
            // Self-closing run-text elements carry no text.
            XmlEvent::Empty { .. } => {}
        }
    }

    if !saw_paragraph {
        // Malformed or non-standard part: flatten every run-text element.
        return flatten_run_texts(part);
    }
    paragraphs.join("\n")
}

fn flatten_run_texts(part: &XmlPart) -> String {
    let mut in_run_text = false;
    let mut fragments: Vec<String> = Vec::new();
    for ev in &part.events {
        match ev {
            XmlEvent::Start { name, .. } if name == RUN_TEXT_TAG => in_run_text = true,
            XmlEvent::End { name } if name == RUN_TEXT_TAG => in_run_text = false,
            XmlEvent::Text { text } if in_run_text => fragments.push(decode_entities(text)),
            _ => {}
        }
    }
    join_run_fragments(&fragments)
}

fn join_run_fragments(fragments: &[String]) -> String {
    fragments
        .iter()
        .map(|f| f.trim())
        .filter(|f| !f.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
