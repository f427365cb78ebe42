//! # File Content Extraction
//!
//! Turns a file on disk into plain text for the chat input, dispatching on
//! the (lowercased) extension: `txt` is read directly, `pdf` goes through
//! `pdf-extract`, and `docx` is unpacked from its zip container with the
//! text runs collected out of `word/document.xml`.

use std::fmt;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

use quick_xml::events::Event;
use quick_xml::Reader;

#[derive(Debug)]
pub enum ExtractError {
    /// The path has no extension at all.
    MissingExtension,
    /// The extension is not one of `txt`, `pdf`, `docx`.
    Unsupported(String),
    Io(io::Error),
    Pdf(String),
    Docx(String),
}

impl fmt::Display for ExtractError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractError::MissingExtension => write!(f, "invalid file extension"),
            ExtractError::Unsupported(ext) => write!(f, "unsupported file format: .{ext}"),
            ExtractError::Io(e) => write!(f, "read error: {e}"),
            ExtractError::Pdf(msg) => write!(f, "PDF extraction failed: {msg}"),
            ExtractError::Docx(msg) => write!(f, "DOCX extraction failed: {msg}"),
        }
    }
}

impl std::error::Error for ExtractError {}

impl From<io::Error> for ExtractError {
    fn from(e: io::Error) -> Self {
        ExtractError::Io(e)
    }
}

/// Extracts the text content of `path` based on its extension.
pub fn extract_content(path: &Path) -> Result<String, ExtractError> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .ok_or(ExtractError::MissingExtension)?;

    match extension.as_str() {
        "txt" => Ok(fs::read_to_string(path)?),
        "pdf" => extract_pdf(path),
        "docx" => extract_docx(path),
        other => Err(ExtractError::Unsupported(other.to_string())),
    }
}

fn extract_pdf(path: &Path) -> Result<String, ExtractError> {
    pdf_extract::extract_text(path).map_err(|e| ExtractError::Pdf(e.to_string()))
}

/// A .docx is a zip archive; the document body lives in `word/document.xml`
/// with visible text inside `<w:t>` runs and paragraphs as `<w:p>` elements.
fn extract_docx(path: &Path) -> Result<String, ExtractError> {
    let file = fs::File::open(path)?;
    let mut archive =
        zip::ZipArchive::new(file).map_err(|e| ExtractError::Docx(e.to_string()))?;
    let mut entry = archive
        .by_name("word/document.xml")
        .map_err(|e| ExtractError::Docx(e.to_string()))?;
    let mut xml = String::new();
    entry.read_to_string(&mut xml)?;

    document_xml_text(&xml)
}

fn document_xml_text(xml: &str) -> Result<String, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) if e.name().as_ref() == b"w:t" => in_text_run = true,
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text_run => {
                let chunk = t
                    .unescape()
                    .map_err(|e| ExtractError::Docx(e.to_string()))?;
                text.push_str(&chunk);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(ExtractError::Docx(e.to_string())),
        }
    }

    Ok(text.trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    struct TempDir(PathBuf);

    impl TempDir {
        fn new() -> Self {
            let dir = std::env::temp_dir().join(format!("quill-extract-{}", uuid::Uuid::new_v4()));
            fs::create_dir_all(&dir).unwrap();
            Self(dir)
        }

        fn path(&self, name: &str) -> PathBuf {
            self.0.join(name)
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn test_txt_is_read_verbatim() {
        let dir = TempDir::new();
        let path = dir.path("notes.txt");
        fs::write(&path, "line one\nline two").unwrap();
        assert_eq!(extract_content(&path).unwrap(), "line one\nline two");
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        let dir = TempDir::new();
        let path = dir.path("notes.TXT");
        fs::write(&path, "content").unwrap();
        assert_eq!(extract_content(&path).unwrap(), "content");
    }

    #[test]
    fn test_missing_extension() {
        assert!(matches!(
            extract_content(Path::new("/tmp/no-extension")),
            Err(ExtractError::MissingExtension)
        ));
    }

    #[test]
    fn test_unsupported_format() {
        match extract_content(Path::new("/tmp/notes.md")) {
            Err(ExtractError::Unsupported(ext)) => assert_eq!(ext, "md"),
            other => panic!("expected Unsupported, got {other:?}"),
        }
    }

    #[test]
    fn test_docx_text_runs() {
        let dir = TempDir::new();
        let path = dir.path("doc.docx");

        let xml = concat!(
            r#"<?xml version="1.0" encoding="UTF-8"?>"#,
            "<w:document><w:body>",
            "<w:p><w:r><w:t>Hello</w:t></w:r><w:r><w:t xml:space=\"preserve\"> world</w:t></w:r></w:p>",
            "<w:p><w:r><w:t>Second &amp; last</w:t></w:r></w:p>",
            "</w:body></w:document>",
        );

        let file = fs::File::create(&path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        writer
            .start_file("word/document.xml", zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap();

        let text = extract_content(&path).unwrap();
        assert_eq!(text, "Hello world\nSecond & last");
    }

    #[test]
    fn test_docx_without_document_xml() {
        let dir = TempDir::new();
        let path = dir.path("broken.docx");

        let file = fs::File::create(&path).unwrap();
        let mut writer = zip::ZipWriter::new(file);
        writer
            .start_file("unrelated.txt", zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"nope").unwrap();
        writer.finish().unwrap();

        assert!(matches!(
            extract_content(&path),
            Err(ExtractError::Docx(_))
        ));
    }
}
