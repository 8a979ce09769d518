use std::io::{Cursor, Read};

use regex::Regex;

use crate::domain::DomainError;

pub const MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOCX: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const MIME_TEXT: &str = "text/plain";

pub const SUPPORTED_MIME_TYPES: [&str; 3] = [MIME_PDF, MIME_DOCX, MIME_TEXT];

pub fn is_supported(mime_type: &str) -> bool {
    SUPPORTED_MIME_TYPES.contains(&mime_type)
}

/// Extracts plain text from an uploaded resume.
pub fn extract_text(data: &[u8], mime_type: &str) -> Result<String, DomainError> {
    match mime_type {
        MIME_PDF => extract_pdf(data),
        MIME_DOCX => extract_docx(data),
        MIME_TEXT => Ok(String::from_utf8_lossy(data).into_owned()),
        other => Err(DomainError::validation(format!(
            "Unsupported file type: {other}"
        ))),
    }
}

fn extract_pdf(data: &[u8]) -> Result<String, DomainError> {
    pdf_extract::extract_text_from_mem(data)
        .map_err(|e| DomainError::validation(format!("PDF processing failed: {e}")))
}

/// A .docx file is a zip archive; the document body lives in
/// `word/document.xml`. Paragraph ends become newlines, remaining markup is
/// stripped.
fn extract_docx(data: &[u8]) -> Result<String, DomainError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data))
        .map_err(|e| DomainError::validation(format!("Word document processing failed: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|e| DomainError::validation(format!("Word document processing failed: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| DomainError::validation(format!("Word document processing failed: {e}")))?;

    let with_breaks = xml.replace("</w:p>", "</w:p>\n");
    let tags = Regex::new(r"<[^>]+>").map_err(|e| DomainError::internal(e.to_string()))?;
    let text = tags.replace_all(&with_breaks, "");

    Ok(decode_entities(text.trim()))
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}
