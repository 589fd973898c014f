use std::fmt::Write as _;
use std::path::Path;

use anyhow::{anyhow, Context};
use serde::Deserialize;
use serde_json::Value;

/// Context kept on each side of a match, in bytes of the scanned string.
const SNIPPET_RADIUS: usize = 40;
/// Matches enumerated in full before the report truncates.
const MAX_REPORTED: usize = 40;

pub const RAW_TEXT_PATH: &str = "$.raw";

#[derive(Clone, Debug, Deserialize)]
pub struct PhraseRules {
    pub version: u32,
    #[serde(default)]
    pub phrases: Vec<String>,
}

impl Default for PhraseRules {
    fn default() -> Self {
        Self {
            version: 1,
            phrases: [
                "as an ai",
                "language model",
                "i am not a lawyer",
                "cannot provide legal advice",
                "consult a qualified attorney",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        }
    }
}

impl PhraseRules {
    pub fn from_toml_path(path: &Path) -> anyhow::Result<Self> {
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("read phrase rules: {}", path.display()))?;
        let rules: PhraseRules = toml::from_str(&s).context("parse phrase rules (toml)")?;
        if rules.version != 1 {
            return Err(anyhow!(
                "unsupported phrase rules version: {} (expected 1)",
                rules.version
            ));
        }
        Ok(rules)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputFormat {
    Structured,
    Raw,
}

#[derive(Clone, Debug)]
pub struct PhraseMatch {
    pub path: String,
    pub phrase: String,
    pub snippet: String,
}

#[derive(Debug)]
pub struct ScanReport {
    pub strings_scanned: usize,
    pub format: InputFormat,
    pub matches: Vec<PhraseMatch>,
}

impl ScanReport {
    pub fn total_matches(&self) -> usize {
        self.matches.len()
    }

    pub fn render(&self) -> String {
        let format = match self.format {
            InputFormat::Structured => "structured",
            InputFormat::Raw => "raw",
        };
        let mut out = String::new();
        let _ = writeln!(
            out,
            "scanned {} string(s), {format} input",
            self.strings_scanned
        );
        if self.matches.is_empty() {
            let _ = writeln!(out, "disallowed phrases: none detected");
            return out;
        }
        let _ = writeln!(out, "disallowed phrases: {} match(es)", self.matches.len());
        for m in self.matches.iter().take(MAX_REPORTED) {
            let _ = writeln!(out, "  {} [{}]: ...{}...", m.path, m.phrase, m.snippet);
        }
        if self.matches.len() > MAX_REPORTED {
            let _ = writeln!(
                out,
                "  ({} more match(es) not shown)",
                self.matches.len() - MAX_REPORTED
            );
        }
        out
    }
}

pub fn scan_value(value: &Value, rules: &PhraseRules) -> ScanReport {
    scan_leaves(collect_string_leaves(value), InputFormat::Structured, rules)
}

pub fn scan_raw_text(text: &str, rules: &PhraseRules) -> ScanReport {
    let leaves = vec![(RAW_TEXT_PATH.to_string(), text.to_string())];
    scan_leaves(leaves, InputFormat::Raw, rules)
}

/// Every string leaf of a JSON value, tagged with its location path
/// (`$` root, `.key` for mapping keys, `[i]` for sequence indices).
pub fn collect_string_leaves(value: &Value) -> Vec<(String, String)> {
    let mut out = Vec::new();
    collect_into(value, "$", &mut out);
    out
}

fn collect_into(value: &Value, path: &str, out: &mut Vec<(String, String)>) {
    match value {
        Value::String(s) => out.push((path.to_string(), s.clone())),
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                collect_into(item, &format!("{path}[{i}]"), out);
            }
        }
        Value::Object(map) => {
            for (k, v) in map {
                collect_into(v, &format!("{path}.{k}"), out);
            }
        }
        _ => {}
    }
}

fn scan_leaves(
    leaves: Vec<(String, String)>,
    format: InputFormat,
    rules: &PhraseRules,
) -> ScanReport {
    let mut matches: Vec<PhraseMatch> = Vec::new();
    for (path, text) in &leaves {
        let lowered = text.to_lowercase();
        // Snippets come from the original string when byte offsets line up;
        // lowercasing can change byte lengths for some non-ASCII input.
        let snippet_source = if lowered.len() == text.len() {
            text.as_str()
        } else {
            lowered.as_str()
        };
        for phrase in &rules.phrases {
            let needle = phrase.to_lowercase();
            if needle.is_empty() {
                continue;
            }
            let mut from = 0usize;
            while let Some(pos) = lowered[from..].find(&needle) {
                let start = from + pos;
                let end = start + needle.len();
                matches.push(PhraseMatch {
                    path: path.clone(),
                    phrase: phrase.clone(),
                    snippet: snippet_around(snippet_source, start, end),
                });
                from = end;
            }
        }
    }
    ScanReport {
        strings_scanned: leaves.len(),
        format,
        matches,
    }
}

fn snippet_around(text: &str, start: usize, end: usize) -> String {
    let from = floor_char_boundary(text, start.saturating_sub(SNIPPET_RADIUS));
    let to = ceil_char_boundary(text, (end + SNIPPET_RADIUS).min(text.len()));
    let mut out = String::with_capacity(to - from);
    let mut last_was_space = false;
    for ch in text[from..to].chars() {
        if ch.is_whitespace() {
            if !last_was_space {
                out.push(' ');
            }
            last_was_space = true;
        } else {
            out.push(ch);
            last_was_space = false;
        }
    }
    out.trim().to_string()
}

fn floor_char_boundary(text: &str, mut idx: usize) -> usize {
    while idx > 0 && !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn ceil_char_boundary(text: &str, mut idx: usize) -> usize {
    while idx < text.len() && !text.is_char_boundary(idx) {
        idx += 1;
    }
    idx
}

#[cfg(test)]
mod tests {
    use super::{scan_raw_text, scan_value, InputFormat, PhraseRules};

    fn rules(phrases: &[&str]) -> PhraseRules {
        PhraseRules {
            version: 1,
            phrases: phrases.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn finds_repeated_occurrences_case_insensitively() {
        let report = scan_raw_text("do NOT hesitate, do not hesitate", &rules(&["do not"]));
        assert_eq!(report.total_matches(), 2);
        assert_eq!(report.format, InputFormat::Raw);
        assert_eq!(report.matches[0].path, super::RAW_TEXT_PATH);
    }

    #[test]
    fn tags_structured_matches_with_paths() {
        let value = serde_json::json!({"a": {"b": "please do not hesitate"}});
        let report = scan_value(&value, &rules(&["do not"]));
        assert_eq!(report.total_matches(), 1);
        assert_eq!(report.matches[0].path, "$.a.b");
        assert_eq!(report.format, InputFormat::Structured);
    }

    #[test]
    fn walks_arrays_and_counts_strings() {
        let value = serde_json::json!({
            "clauses": ["fine text", "you should consult a qualified attorney"],
            "score": 3,
        });
        let report = scan_value(&value, &PhraseRules::default());
        assert_eq!(report.strings_scanned, 2);
        assert_eq!(report.total_matches(), 1);
        assert_eq!(report.matches[0].path, "$.clauses[1]");
    }

    #[test]
    fn snippet_collapses_internal_whitespace() {
        let report = scan_raw_text("please\n\ndo not   hesitate", &rules(&["do not"]));
        assert_eq!(report.matches[0].snippet, "please do not hesitate");
    }

    #[test]
    fn zero_matches_render_as_none_detected() {
        let report = scan_raw_text("all clear", &rules(&["do not"]));
        assert_eq!(report.total_matches(), 0);
        assert!(report.render().contains("none detected"));
    }

    #[test]
    fn report_truncates_after_forty_matches() {
        let text = "bad ".repeat(45);
        let report = scan_raw_text(&text, &rules(&["bad"]));
        assert_eq!(report.total_matches(), 45);
        let rendered = report.render();
        assert!(rendered.contains("45 match(es)"));
        assert!(rendered.contains("(5 more match(es) not shown)"));
    }

    #[test]
    fn default_rules_carry_a_phrase_list() {
        let rules = PhraseRules::default();
        assert_eq!(rules.version, 1);
        assert!(!rules.phrases.is_empty());
    }
}
