use std::io::Cursor;

use docx_rust::document::BodyContent;
use docx_rust::DocxFile;

use super::ExtractionError;

/// Text of the top-level body paragraphs, one per line.
/// Tables, headers and footers are not included.
pub fn extract_text(data: &[u8]) -> Result<String, ExtractionError> {
    let file = DocxFile::from_reader(Cursor::new(data))
        .map_err(|e| ExtractionError::Word(format!("Failed to open Word document: {}", e)))?;
    let docx = file
        .parse()
        .map_err(|e| ExtractionError::Word(format!("Failed to parse Word document: {}", e)))?;

    let paragraphs: Vec<String> = docx
        .document
        .body
        .content
        .iter()
        .filter_map(|content| match content {
            BodyContent::Paragraph(paragraph) => {
                Some(paragraph.iter_text().map(|t| t.as_ref()).collect::<String>())
            }
            _ => None,
        })
        .collect();

    Ok(paragraphs.join("\n"))
}

/// Minimal .docx with one body paragraph per entry
#[cfg(test)]
pub(crate) fn build_docx(paragraphs: &[&str]) -> Vec<u8> {
    use docx_rust::document::Paragraph;
    use docx_rust::Docx;

    let mut docx = Docx::default();
    for text in paragraphs {
        docx.document.push(Paragraph::default().push_text(*text));
    }
    let mut buffer = Cursor::new(Vec::new());
    docx.write(&mut buffer).unwrap();
    buffer.into_inner()
}
