use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

const DOCX_BODY: &str = "word/document.xml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Text,
    Pdf,
    Docx,
    /// Legacy Word binary; recognised only so it can be reported as skipped.
    LegacyDoc,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "txt" => Some(Self::Text),
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "doc" => Some(Self::LegacyDoc),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("pdf could not be parsed: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("docx archive could not be opened: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("docx body could not be parsed: {0}")]
    Xml(#[from] quick_xml::Error),
    #[error("unsupported DOC file (convert to .docx or .pdf)")]
    Unsupported,
}

pub fn extract(path: &Path, format: DocumentFormat) -> Result<String, ExtractError> {
    match format {
        DocumentFormat::Text => extract_text(path),
        DocumentFormat::Pdf => extract_pdf(path),
        DocumentFormat::Docx => extract_docx(path),
        DocumentFormat::LegacyDoc => Err(ExtractError::Unsupported),
    }
}

fn extract_text(path: &Path) -> Result<String, ExtractError> {
    let bytes = fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Concatenates page text in page order, one trailing newline per page.
fn extract_pdf(path: &Path) -> Result<String, ExtractError> {
    let document = lopdf::Document::load(path)?;
    let mut text = String::new();

    for page_number in document.get_pages().keys() {
        let page_text = document.extract_text(&[*page_number])?;
        if !page_text.trim().is_empty() {
            text.push_str(&page_text);
            text.push('\n');
        }
    }

    Ok(text)
}

fn extract_docx(path: &Path) -> Result<String, ExtractError> {
    let mut archive = zip::ZipArchive::new(File::open(path)?)?;
    let mut xml = String::new();
    archive.by_name(DOCX_BODY)?.read_to_string(&mut xml)?;
    paragraphs_from_document_xml(&xml)
}

/// One output line per `w:p` paragraph, built from its `w:t` runs.
pub(crate) fn paragraphs_from_document_xml(xml: &str) -> Result<String, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_paragraph = false;
    let mut in_run_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(element) => match element.local_name().as_ref() {
                b"p" => {
                    in_paragraph = true;
                    current.clear();
                }
                b"t" => in_run_text = true,
                _ => {}
            },
            Event::Empty(element) => match element.local_name().as_ref() {
                b"tab" if in_paragraph => current.push('\t'),
                b"br" if in_paragraph => current.push('\n'),
                b"p" => paragraphs.push(String::new()),
                _ => {}
            },
            Event::Text(text) if in_run_text => {
                let unescaped = text.unescape().map_err(quick_xml::Error::from)?;
                current.push_str(&unescaped);
            }
            Event::End(element) => match element.local_name().as_ref() {
                b"t" => in_run_text = false,
                b"p" => {
                    in_paragraph = false;
                    paragraphs.push(std::mem::take(&mut current));
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_extensions_case_insensitively() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("Agenda.PDF")),
            Some(DocumentFormat::Pdf)
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("minutes.doc")),
            Some(DocumentFormat::LegacyDoc)
        );
        assert_eq!(DocumentFormat::from_path(Path::new("photo.png")), None);
        assert_eq!(DocumentFormat::from_path(Path::new("README")), None);
    }

    #[test]
    fn docx_paragraphs_become_lines() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:t>Cannabis Retail</w:t></w:r><w:r><w:t xml:space="preserve"> Ordinance</w:t></w:r></w:p><w:p/><w:p><w:r><w:t>Fees &amp; taxes</w:t></w:r></w:p></w:body></w:document>"#;

        let text = paragraphs_from_document_xml(xml).expect("parse docx body");
        assert_eq!(text, "Cannabis Retail Ordinance\n\nFees & taxes");
    }
}
