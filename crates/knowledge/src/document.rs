//! Text extraction for uploaded documents.
//!
//! Plain text and Markdown are stored as-is. Word `.docx` files are zip
//! archives; the body lives in `word/document.xml`. PDF text is pulled out
//! page by page with `pdf-extract`. Everything else, including legacy
//! `.doc`, is rejected as unsupported.

use crate::scrape::decode_entities;
use brandbot_core::error::KnowledgeError;
use brandbot_core::knowledge::{KnowledgeEntry, SourceKind};
use regex_lite::Regex;
use std::io::{Cursor, Read};

/// Upload size accepted before any parsing.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentType {
    Text,
    Markdown,
    Docx,
    Pdf,
}

impl DocumentType {
    /// Detect by file extension.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let ext = filename.rsplit_once('.')?.1.to_ascii_lowercase();
        match ext.as_str() {
            "txt" => Some(DocumentType::Text),
            "md" | "markdown" => Some(DocumentType::Markdown),
            "docx" => Some(DocumentType::Docx),
            "pdf" => Some(DocumentType::Pdf),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::Text => "TXT",
            DocumentType::Markdown => "MD",
            DocumentType::Docx => "DOCX",
            DocumentType::Pdf => "PDF",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub filename: String,
    pub kind: DocumentType,
    pub size_bytes: usize,
    pub content: String,
}

impl ExtractedDocument {
    pub fn to_entry(&self) -> KnowledgeEntry {
        KnowledgeEntry::new(self.filename.clone(), self.content.clone(), SourceKind::Document)
            .with_metadata("filename", serde_json::json!(self.filename))
            .with_metadata("type", serde_json::json!(self.kind.label()))
            .with_metadata("size_bytes", serde_json::json!(self.size_bytes))
    }
}

pub fn extract(filename: &str, bytes: &[u8]) -> Result<ExtractedDocument, KnowledgeError> {
    let kind = DocumentType::from_filename(filename).ok_or_else(|| {
        KnowledgeError::Unsupported(format!(
            "'{filename}' is not a supported document; upload .pdf, .docx, .txt or .md"
        ))
    })?;

    if bytes.len() > MAX_UPLOAD_BYTES {
        return Err(KnowledgeError::Unsupported(format!(
            "'{filename}' is larger than {} MB",
            MAX_UPLOAD_BYTES / (1024 * 1024)
        )));
    }

    let content = match kind {
        DocumentType::Text | DocumentType::Markdown => String::from_utf8_lossy(bytes).into_owned(),
        DocumentType::Docx => docx_text(filename, bytes)?,
        DocumentType::Pdf => pdf_text(filename, bytes)?,
    };
    let content = content.trim().to_string();

    if content.is_empty() {
        return Err(KnowledgeError::Extract {
            source_name: filename.into(),
            reason: "document contains no text".into(),
        });
    }

    Ok(ExtractedDocument {
        filename: filename.to_string(),
        kind,
        size_bytes: bytes.len(),
        content,
    })
}

fn docx_text(filename: &str, bytes: &[u8]) -> Result<String, KnowledgeError> {
    let extract_err = |reason: String| KnowledgeError::Extract {
        source_name: filename.into(),
        reason,
    };

    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| extract_err(e.to_string()))?;
    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| extract_err(format!("missing word/document.xml: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| extract_err(e.to_string()))?;

    Ok(docx_xml_to_text(&xml))
}

fn pdf_text(filename: &str, bytes: &[u8]) -> Result<String, KnowledgeError> {
    let text = pdf_extract::extract_text_from_mem(bytes).map_err(|e| KnowledgeError::Extract {
        source_name: filename.into(),
        reason: format!("unreadable PDF: {e}"),
    })?;
    Ok(text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Paragraph ends become newlines, tabs become tabs, all other tags vanish.
fn docx_xml_to_text(xml: &str) -> String {
    let marked = xml
        .replace("</w:p>", "\n")
        .replace("<w:tab/>", "\t")
        .replace("<w:br/>", "\n");
    let stripped = match Regex::new(r"(?s)<[^>]*>") {
        Ok(re) => re.replace_all(&marked, "").into_owned(),
        Err(_) => marked,
    };
    decode_entities(&stripped)
        .lines()
        .map(str::trim_end)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
