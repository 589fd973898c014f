use once_cell::sync::Lazy;
use regex::Regex;

static XPACKET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<\?xpacket begin.*?<\?xpacket end[^?]*\?>").expect("xpacket regex")
});
static XMPMETA_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<x:xmpmeta.*?</x:xmpmeta>").expect("xmpmeta regex"));
static RDF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<rdf:RDF.*?</rdf:RDF>").expect("rdf regex"));
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("tag regex"));
static NUMERIC_ESCAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\\d{3}").expect("numeric escape regex"));
static HSPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").expect("hspace regex"));
static MULTI_NEWLINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("newline regex"));

/// Turn raw extracted text into clean, displayable plain text.
///
/// Lossy: anything outside printable ASCII (plus newlines) is dropped, so
/// accented characters and non-Latin scripts do not survive.
pub fn normalize_extracted_text(text: &str) -> String {
    let s = XPACKET_RE.replace_all(text, "");
    let s = XMPMETA_RE.replace_all(&s, "");
    let s = RDF_RE.replace_all(&s, "");
    let s = TAG_RE.replace_all(&s, "");
    let s = NUMERIC_ESCAPE_RE.replace_all(&s, "");
    let s = HSPACE_RE.replace_all(&s, " ");
    let s: String = s
        .chars()
        .filter(|c| matches!(*c, ' '..='~' | '\n' | '\r'))
        .collect();
    let s = s.replace("\r\n", "\n").replace('\r', "\n");
    // Trim lines before collapsing blank runs; whitespace-only lines would
    // otherwise hide a 3+-newline run and break idempotence.
    let s = s.lines().map(str::trim).collect::<Vec<_>>().join("\n");
    let s = MULTI_NEWLINE_RE.replace_all(&s, "\n\n");
    s.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::normalize_extracted_text;

    #[test]
    fn strips_packet_wrappers_and_metadata_blocks() {
        let input = concat!(
            "<?xpacket begin=\"\" id=\"W5M0\"?>",
            "<x:xmpmeta xmlns:x=\"adobe:ns:meta/\">junk</x:xmpmeta>",
            "<?xpacket end=\"w\"?>",
            "Hello <b>world</b>",
        );
        assert_eq!(normalize_extracted_text(input), "Hello world");
    }

    #[test]
    fn strips_rdf_blocks_and_stray_tags() {
        let input = "a <rdf:RDF xmlns:rdf=\"x\">meta</rdf:RDF> b <w:t>c</w:t>";
        assert_eq!(normalize_extracted_text(input), "a b c");
    }

    #[test]
    fn removes_numeric_escape_sequences() {
        assert_eq!(normalize_extracted_text("foo\\123bar \\045"), "foobar");
    }

    #[test]
    fn collapses_whitespace_and_blank_runs() {
        let input = "  line   one \t x \r\n\r\n\r\n\r\n line two  ";
        assert_eq!(normalize_extracted_text(input), "line one x\n\nline two");
    }

    #[test]
    fn drops_non_ascii() {
        assert_eq!(normalize_extracted_text("caf\u{e9} \u{2603} ok"), "caf ok");
    }

    #[test]
    fn is_idempotent() {
        let input = "a <x>b</x>\r\n \r\n \r\n c\\123  d \u{e9}";
        let once = normalize_extracted_text(input);
        assert_eq!(normalize_extracted_text(&once), once);
    }

    #[test]
    fn no_line_has_edge_whitespace() {
        let out = normalize_extracted_text("  a  \n\n\n  b  \n  c  ");
        for line in out.lines() {
            assert_eq!(line, line.trim());
        }
        assert!(!out.contains("\n\n\n"));
    }
}
