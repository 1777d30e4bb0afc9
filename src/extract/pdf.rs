use lopdf::Document;
use tracing::warn;

use super::ExtractionError;

/// Text of every page in page order, joined with single spaces.
/// A page whose text cannot be decoded contributes an empty string.
pub fn extract_text(data: &[u8]) -> Result<String, ExtractionError> {
    let doc = Document::load_mem(data)?;

    let pages: Vec<String> = doc
        .get_pages()
        .keys()
        .map(|page_number| match doc.extract_text(&[*page_number]) {
            Ok(text) => text,
            Err(e) => {
                warn!(page = page_number, error = %e, "Failed to extract text from PDF page");
                String::new()
            }
        })
        .collect();

    Ok(pages.join(" "))
}
