use thiserror::Error;
use tracing::debug;

/// Extracted resumes shorter than this are treated as unreadable (scanned, image-only).
pub const MIN_RESUME_CHARS: usize = 50;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("could not read PDF: {0}")]
    Extraction(String),

    #[error("extracted only {chars} characters of text (minimum {MIN_RESUME_CHARS})")]
    TooShort { chars: usize },
}

/// Extracts plain text from PDF bytes.
///
/// Whitespace inside each page is collapsed to single spaces; pages are
/// joined with newlines. Fails when the result is shorter than
/// [`MIN_RESUME_CHARS`].
pub fn extract_text_from_pdf(bytes: &[u8]) -> Result<String, PdfError> {
    let raw = pdf_extract::extract_text_from_mem(bytes)
        .map_err(|e| PdfError::Extraction(e.to_string()))?;

    let text = normalize_pages(&raw);
    let chars = text.trim().chars().count();
    debug!(chars, "extracted text from PDF");

    if chars < MIN_RESUME_CHARS {
        return Err(PdfError::TooShort { chars });
    }
    Ok(text)
}

/// pdf-extract separates pages with form feeds.
fn normalize_pages(raw: &str) -> String {
    raw.split('\u{000C}')
        .map(|page| page.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
