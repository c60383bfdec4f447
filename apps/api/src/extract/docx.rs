use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use super::{DocumentFormat, ExtractionError};

const DOCUMENT_PART: &str = "word/document.xml";

/// Upper bound on the decompressed main document part.
const MAX_DOCUMENT_PART_BYTES: u64 = 32 * 1024 * 1024;

fn corrupt(detail: impl Into<String>) -> ExtractionError {
    ExtractionError::corrupt(DocumentFormat::Docx, detail)
}

/// Body text of a DOCX package, one line per paragraph.
pub(super) fn extract_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| corrupt(format!("Failed to open archive: {e}")))?;

    let mut part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| corrupt(format!("{DOCUMENT_PART} not readable: {e}")))?;

    let mut xml = Vec::new();
    (&mut part)
        .take(MAX_DOCUMENT_PART_BYTES + 1)
        .read_to_end(&mut xml)
        .map_err(|e| corrupt(format!("Failed to decompress {DOCUMENT_PART}: {e}")))?;
    if xml.len() as u64 > MAX_DOCUMENT_PART_BYTES {
        return Err(corrupt(format!(
            "{DOCUMENT_PART} exceeds {MAX_DOCUMENT_PART_BYTES} bytes"
        )));
    }

    paragraphs_text(&xml)
}

/// Walks WordprocessingML, keeping `w:t` runs and turning paragraph ends,
/// tabs and breaks into whitespace.
fn paragraphs_text(xml: &[u8]) -> Result<String, ExtractionError> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(false);

    let mut buf = Vec::with_capacity(4096);
    let mut text = String::new();
    let mut in_run = false;
    let mut in_text = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.name().as_ref() {
                b"w:r" => in_run = true,
                b"w:t" => in_text = true,
                b"w:tab" if in_run => text.push('\t'),
                b"w:br" | b"w:cr" if in_run => text.push('\n'),
                _ => {}
            },
            // Tab stops in paragraph properties are also `w:tab`; only runs count.
            Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                b"w:tab" if in_run => text.push('\t'),
                b"w:br" | b"w:cr" if in_run => text.push('\n'),
                _ => {}
            },
            Ok(Event::Text(ref e)) if in_text => {
                let unescaped = e
                    .unescape()
                    .map_err(|err| corrupt(format!("Bad text node: {err}")))?;
                text.push_str(&unescaped);
            }
            Ok(Event::CData(ref e)) if in_text => {
                text.push_str(&String::from_utf8_lossy(e.as_ref()));
            }
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"w:r" => in_run = false,
                b"w:t" => in_text = false,
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(corrupt(format!(
                    "Malformed XML at byte {}: {e}",
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(text)
}
