use crate::error::{AppError, Result};

/// Suffix appended to every excerpt, including ones shorter than the limit.
pub const EXCERPT_SUFFIX: &str = "...";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContentKind {
    Pdf,
    Text,
}

impl ContentKind {
    /// Classifies an upload by its declared content type.
    pub fn from_mime(content_type: Option<&str>) -> Self {
        let essence = content_type
            .and_then(|ct| ct.split(';').next())
            .map(|ct| ct.trim().to_ascii_lowercase());

        match essence.as_deref() {
            Some("application/pdf") => ContentKind::Pdf,
            _ => ContentKind::Text,
        }
    }
}

/// Pulls the text out of an uploaded file. PDFs contribute their first page only.
pub fn extract(bytes: &[u8], kind: ContentKind) -> Result<String> {
    match kind {
        ContentKind::Pdf => first_page_text(bytes),
        ContentKind::Text => std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|e| AppError::ExtractionError(format!("upload is not valid UTF-8: {}", e))),
    }
}

fn first_page_text(bytes: &[u8]) -> Result<String> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| AppError::ExtractionError(format!("could not read PDF: {}", e)))?;

    // A page without a text layer still comes back as layout whitespace
    let first = pages.into_iter().next().unwrap_or_default();
    if first.trim().is_empty() {
        return Ok(String::new());
    }
    Ok(first)
}

/// Truncates `text` to `max_chars` characters and appends [`EXCERPT_SUFFIX`].
/// Returns `None` when extraction produced no text at all.
pub fn excerpt(text: &str, max_chars: usize) -> Option<String> {
    if text.is_empty() {
        return None;
    }

    let mut result = String::with_capacity(max_chars.min(text.len()) + EXCERPT_SUFFIX.len());
    result.extend(text.chars().take(max_chars));
    result.push_str(EXCERPT_SUFFIX);
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_pdf_types_are_recognised() {
        assert_eq!(ContentKind::from_mime(Some("application/pdf")), ContentKind::Pdf);
        assert_eq!(ContentKind::from_mime(Some("Application/PDF; name=x")), ContentKind::Pdf);
        assert_eq!(ContentKind::from_mime(Some("text/plain")), ContentKind::Text);
        assert_eq!(ContentKind::from_mime(Some("application/octet-stream")), ContentKind::Text);
        assert_eq!(ContentKind::from_mime(None), ContentKind::Text);
    }

    #[test]
    fn short_text_still_gets_the_suffix() {
        assert_eq!(excerpt("hello", 500).as_deref(), Some("hello..."));
    }

    #[test]
    fn long_text_is_cut_at_the_character_limit() {
        let text = "a".repeat(600);
        let out = excerpt(&text, 500).unwrap();
        assert_eq!(out.len(), 503);
        assert!(out.starts_with(&"a".repeat(500)));
        assert!(out.ends_with("..."));
    }

    #[test]
    fn limit_counts_characters_not_bytes() {
        let text = "ü".repeat(10);
        assert_eq!(excerpt(&text, 4).as_deref(), Some("üüüü..."));
    }

    #[test]
    fn only_empty_text_has_no_excerpt() {
        assert_eq!(excerpt("", 500), None);
        assert_eq!(excerpt("   \n", 500).as_deref(), Some("   \n..."));
    }

    #[test]
    fn text_uploads_decode_as_utf8() {
        assert_eq!(extract(b"plain words", ContentKind::Text).unwrap(), "plain words");

        let err = extract(&[0xff, 0xfe, 0x00], ContentKind::Text).unwrap_err();
        assert!(matches!(err, AppError::ExtractionError(_)));
    }

    #[test]
    fn corrupt_pdf_is_an_extraction_error() {
        let err = extract(b"plain text pretending to be a pdf", ContentKind::Pdf).unwrap_err();
        assert!(matches!(err, AppError::ExtractionError(_)));
    }
}
