use crate::error::{CoreError, CoreResult};
use lopdf::Document;
use tracing::debug;

/// Text of every page that yields any, joined by a single space. Pages with
/// nothing extractable are skipped.
pub fn extract_pdf_text(bytes: &[u8]) -> CoreResult<String> {
    if !bytes.starts_with(b"%PDF") {
        return Err(CoreError::Extraction("Invalid PDF format".to_string()));
    }
    let doc = Document::load_mem(bytes)
        .map_err(|e| CoreError::Extraction(format!("unreadable PDF: {}", e)))?;

    let mut pages = Vec::new();
    for page_num in doc.get_pages().keys() {
        match doc.extract_text(&[*page_num]) {
            Ok(text) => {
                let text = text.trim();
                if text.is_empty() {
                    debug!(page = page_num, "page has no text");
                } else {
                    pages.push(text.to_string());
                }
            }
            Err(e) => debug!(page = page_num, error = %e, "page text not extractable"),
        }
    }
    Ok(pages.join(" "))
}
