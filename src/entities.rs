const ENTITIES: [(&str, char); 5] = [
    ("&amp;", '&'),
    ("&lt;", '<'),
    ("&gt;", '>'),
    ("&quot;", '"'),
    ("&#39;", '\''),
];

/// Decode the five standard XML character entities. Anything else after an
/// ampersand is passed through unchanged.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    'scan: while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        for (entity, ch) in ENTITIES {
            if tail.starts_with(entity) {
                out.push(ch);
                rest = &tail[entity.len()..];
                continue 'scan;
            }
        }
        out.push('&');
        rest = &tail[1..];
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::decode_entities;

    #[test]
    fn decodes_standard_entities() {
        assert_eq!(decode_entities("A &amp; B &lt;tag&gt;"), "A & B <tag>");
        assert_eq!(decode_entities("&quot;x&quot; &#39;y&#39;"), "\"x\" 'y'");
    }

    #[test]
    fn passes_unknown_sequences_through() {
        assert_eq!(decode_entities("fish &chips; &amp"), "fish &chips; &amp");
        assert_eq!(decode_entities("no entities here"), "no entities here");
    }
}
