//! PDF text extraction for uploaded source documents.

/// Korean client-facing message for an unusable upload.
pub const INVALID_PDF_MESSAGE: &str = "유효한 PDF 파일이 필요합니다.";

#[derive(Debug)]
pub struct PdfExtract {
    pub text: String,
    pub pages: usize,
    /// PDF format version reported by the document header.
    pub version: String,
}

#[derive(Debug, thiserror::Error)]
#[error("{INVALID_PDF_MESSAGE}")]
pub struct InvalidPdf;

/// Extracts and normalizes the text of a PDF. Newline runs and whitespace
/// runs collapse to single spaces so downstream prompt truncation works on
/// prose rather than layout artifacts.
pub fn extract_text(bytes: &[u8]) -> Result<PdfExtract, InvalidPdf> {
    let raw = pdf_extract::extract_text_from_mem(bytes).map_err(|_| InvalidPdf)?;
    let document = lopdf::Document::load_mem(bytes).map_err(|_| InvalidPdf)?;
    Ok(PdfExtract {
        text: normalize(&raw),
        pages: document.get_pages().len(),
        version: document.version.clone(),
    })
}

fn normalize(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalization_collapses_newline_and_whitespace_runs() {
        let raw = "  첫 번째 줄\n\n두 번째   줄\t세 번째\n";
        assert_eq!(normalize(raw), "첫 번째 줄 두 번째 줄 세 번째");
    }

    #[test]
    fn garbage_bytes_are_rejected_with_the_korean_message() {
        let err = extract_text(b"not a pdf").unwrap_err();
        assert_eq!(err.to_string(), INVALID_PDF_MESSAGE);
    }
}
