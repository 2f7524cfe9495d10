//! PDF text extraction.

pub fn extract_text(bytes: &[u8]) -> Result<String, String> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|err| format!("pdf: {err}"))
}
