use std::panic;

use super::{DocumentFormat, ExtractionError};

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Concatenated page text of a PDF held in memory.
pub(super) fn extract_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    if !bytes.starts_with(PDF_MAGIC) {
        return Err(ExtractionError::corrupt(
            DocumentFormat::Pdf,
            "missing %PDF- header",
        ));
    }

    // pdf-extract can panic on malformed object streams.
    match panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(ExtractionError::corrupt(DocumentFormat::Pdf, e.to_string())),
        Err(_) => Err(ExtractionError::corrupt(
            DocumentFormat::Pdf,
            "parser aborted on malformed content",
        )),
    }
}
