//! Text extraction for uploaded resumes.
//!
//! The declared format comes from the filename extension; each format has its
//! own reader and every failure is mapped onto [`ExtractionError`].

use bytes::Bytes;
use thiserror::Error;

mod docx;
mod pdf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Txt,
}

impl DocumentFormat {
    /// Resolves the format from a filename extension, case-insensitively.
    pub fn from_filename(filename: &str) -> Result<Self, ExtractionError> {
        let extension = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.trim().to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" => Ok(DocumentFormat::Docx),
            "txt" => Ok(DocumentFormat::Txt),
            _ => Err(ExtractionError::UnsupportedFormat(filename.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Docx => "docx",
            DocumentFormat::Txt => "txt",
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file format for '{0}'. Please upload PDF, DOCX, or TXT files.")]
    UnsupportedFormat(String),

    #[error("Could not read {format} document: {detail}")]
    CorruptDocument { format: &'static str, detail: String },

    #[error("Text file is not valid UTF-8: {0}")]
    Encoding(String),
}

impl ExtractionError {
    pub(crate) fn corrupt(format: DocumentFormat, detail: impl Into<String>) -> Self {
        ExtractionError::CorruptDocument {
            format: format.as_str(),
            detail: detail.into(),
        }
    }
}

/// An uploaded document together with the text pulled out of it.
#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub raw_bytes: Bytes,
    pub declared_format: DocumentFormat,
    pub text: String,
}

impl ExtractedDocument {
    /// Character count of the trimmed text.
    pub fn content_chars(&self) -> usize {
        self.text.trim().chars().count()
    }
}

/// Extracts plain text from `raw_bytes`. CPU-bound; callers on the async
/// runtime should run it through `spawn_blocking`.
pub fn extract(
    raw_bytes: Bytes,
    declared_format: DocumentFormat,
) -> Result<ExtractedDocument, ExtractionError> {
    let text = match declared_format {
        DocumentFormat::Pdf => pdf::extract_text(&raw_bytes)?,
        DocumentFormat::Docx => docx::extract_text(&raw_bytes)?,
        DocumentFormat::Txt => decode_text(&raw_bytes)?,
    };

    Ok(ExtractedDocument {
        raw_bytes,
        declared_format,
        text,
    })
}

fn decode_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|e| ExtractionError::Encoding(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_filename() {
        assert_eq!(
            DocumentFormat::from_filename("resume.PDF").unwrap(),
            DocumentFormat::Pdf
        );
        assert_eq!(
            DocumentFormat::from_filename("cv.final.docx").unwrap(),
            DocumentFormat::Docx
        );
        assert_eq!(
            DocumentFormat::from_filename("notes.txt").unwrap(),
            DocumentFormat::Txt
        );
    }

    #[test]
    fn test_unknown_or_missing_extension_is_unsupported() {
        for name in ["resume.rtf", "resume", "", "archive.doc"] {
            assert!(
                matches!(
                    DocumentFormat::from_filename(name),
                    Err(ExtractionError::UnsupportedFormat(_))
                ),
                "{name} should be unsupported"
            );
        }
    }

    #[test]
    fn test_txt_strips_bom() {
        let raw = Bytes::from_static(b"\xEF\xBB\xBFJohn Doe\njohn@doe.com");
        let doc = extract(raw, DocumentFormat::Txt).unwrap();
        assert_eq!(doc.text, "John Doe\njohn@doe.com");
        assert_eq!(doc.declared_format, DocumentFormat::Txt);
        assert_eq!(doc.raw_bytes.len(), 3 + "John Doe\njohn@doe.com".len());
    }

    #[test]
    fn test_invalid_utf8_is_encoding_error() {
        let raw = Bytes::from_static(&[b'a', 0xFF, 0xFE, b'b']);
        assert!(matches!(
            extract(raw, DocumentFormat::Txt),
            Err(ExtractionError::Encoding(_))
        ));
    }

    #[test]
    fn test_content_chars_ignores_surrounding_whitespace() {
        let doc = extract(Bytes::from_static(b"  \n abc \n"), DocumentFormat::Txt).unwrap();
        assert_eq!(doc.content_chars(), 3);
    }
}
