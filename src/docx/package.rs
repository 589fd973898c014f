use std::io::{Cursor, Read};

use anyhow::Context;
use once_cell::sync::Lazy;
use regex::Regex;
use zip::ZipArchive;

pub const BODY_PART: &str = "word/document.xml";

static TEXT_PART_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^word/(?:document\.xml|header\d+\.xml|footer\d+\.xml|footnotes\.xml|endnotes\.xml)$")
        .expect("text part regex")
});

pub struct DocxPackage {
    pub entries: Vec<DocxEntry>,
}

pub struct DocxEntry {
    pub name: String,
    pub data: Vec<u8>,
}

impl DocxPackage {
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let mut zip = ZipArchive::new(Cursor::new(bytes)).context("read zip")?;
        let mut entries = Vec::new();
        for i in 0..zip.len() {
            let mut file = zip.by_index(i).context("zip entry")?;
            if file.is_dir() {
                continue;
            }
            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data).context("read zip entry")?;
            entries.push(DocxEntry {
                name: file.name().to_string(),
                data,
            });
        }
        Ok(Self { entries })
    }

    /// Text-bearing parts: the body, numbered headers/footers, and note
    /// parts. Body first, remainder in lexical order.
    pub fn text_parts(&self) -> Vec<&DocxEntry> {
        let mut parts: Vec<&DocxEntry> = self
            .entries
            .iter()
            .filter(|e| TEXT_PART_RE.is_match(&e.name))
            .collect();
        parts.sort_by(|a, b| {
            let a_body = a.name == BODY_PART;
            let b_body = b.name == BODY_PART;
            b_body.cmp(&a_body).then_with(|| a.name.cmp(&b.name))
        });
        parts
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    use super::DocxPackage;

    fn zip_with_entries(names: &[&str]) -> Vec<u8> {
        let mut cursor = std::io::Cursor::new(Vec::new());
        let mut zip = ZipWriter::new(&mut cursor);
        for name in names {
            zip.start_file(name.to_string(), SimpleFileOptions::default())
                .expect("start zip file");
            zip.write_all(b"<x/>").expect("write zip file");
        }
        zip.finish().expect("finish zip");
        cursor.into_inner()
    }

    #[test]
    fn selects_text_parts_body_first() {
        let bytes = zip_with_entries(&[
            "word/header2.xml",
            "word/styles.xml",
            "word/footnotes.xml",
            "word/document.xml",
            "word/footer1.xml",
            "docProps/core.xml",
        ]);
        let pkg = DocxPackage::from_bytes(&bytes).expect("read package");
        let names: Vec<&str> = pkg.text_parts().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "word/document.xml",
                "word/footer1.xml",
                "word/footnotes.xml",
                "word/header2.xml",
            ]
        );
    }

    #[test]
    fn rejects_non_zip_bytes() {
        assert!(DocxPackage::from_bytes(b"definitely not a zip").is_err());
    }
}
