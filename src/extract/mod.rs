//! File Extraction
//!
//! Turns an uploaded file into a bounded text digest for the report prompt.
//! The file kind is decided once from the extension and matched exhaustively:
//!
//! | Extension            | Digest                                       |
//! |----------------------|----------------------------------------------|
//! | `csv`, `xlsx`, `xls` | summary statistics table + histogram chart   |
//! | `docx`               | paragraph text, first 7000 characters        |
//! | `pdf`                | page text, first 7000 characters             |
//! | `jpg`, `jpeg`, `png` | fixed visual-analysis placeholder            |
//! | anything else        | `Unsupported Format`                         |

pub mod pdf;
pub mod tabular;
pub mod word;

use std::path::Path;

use bytes::Bytes;
use serde::Serialize;
use tracing::{debug, info};

use crate::analysis::{ChartDescriptor, HistogramError};

/// Character budget for document text embedded in the prompt
pub const MAX_TEXT_CHARS: usize = 7000;

pub const UNSUPPORTED_FORMAT: &str = "Unsupported Format";
pub const IMAGE_DIGEST: &str = "DATA_TYPE: Image\nTask: Comprehensive strategic visual analysis.";

#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("{0}")]
    Csv(#[from] csv::Error),

    #[error("{0}")]
    Excel(#[from] calamine::Error),

    #[error("{0}")]
    Pdf(#[from] lopdf::Error),

    #[error("{0}")]
    Word(String),

    #[error("{0}")]
    Histogram(#[from] HistogramError),

    #[error("{0}")]
    Malformed(String),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Csv,
    Excel,
    Word,
    Pdf,
    Image,
    Unsupported,
}

impl FileKind {
    /// Classify by the text after the last `.`; a name without a dot is its own extension
    pub fn from_filename(filename: &str) -> Self {
        let lower = filename.to_lowercase();
        let extension = lower.rsplit('.').next().unwrap_or_default();
        match extension {
            "csv" => FileKind::Csv,
            "xlsx" | "xls" => FileKind::Excel,
            "docx" => FileKind::Word,
            "pdf" => FileKind::Pdf,
            "jpg" | "jpeg" | "png" => FileKind::Image,
            _ => FileKind::Unsupported,
        }
    }
}

/// File as received from the client; never retained after extraction
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub data: Bytes,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            data: data.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Digest {
    pub kind: FileKind,
    pub text: String,
    pub chart: Option<ChartDescriptor>,
}

impl Digest {
    fn text_only(kind: FileKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            chart: None,
        }
    }

    /// Digest standing in for a file that could not be parsed
    pub fn from_error(kind: FileKind, error: &ExtractionError) -> Self {
        Self::text_only(kind, format!("Error: {}", error))
    }
}

/// Produce the digest for one uploaded file
pub fn extract(file: &UploadedFile) -> Result<Digest, ExtractionError> {
    let kind = FileKind::from_filename(&file.filename);
    debug!(filename = %file.filename, kind = ?kind, bytes = file.data.len(), "Extracting file");

    let digest = match kind {
        FileKind::Csv => tabular_digest(kind, tabular::read_csv(&file.data)?)?,
        FileKind::Excel => tabular_digest(kind, tabular::read_excel(&file.data)?)?,
        FileKind::Word => textual_digest(kind, "Word", &word::extract_text(&file.data)?),
        FileKind::Pdf => textual_digest(kind, "PDF", &pdf::extract_text(&file.data)?),
        FileKind::Image => Digest::text_only(kind, IMAGE_DIGEST),
        FileKind::Unsupported => Digest::text_only(kind, UNSUPPORTED_FORMAT),
    };

    info!(
        filename = %file.filename,
        kind = ?kind,
        digest_chars = digest.text.chars().count(),
        has_chart = digest.chart.is_some(),
        "File extracted"
    );

    Ok(digest)
}

/// Read a local file and extract it under its own name
pub fn extract_path(path: &Path) -> Result<Digest, ExtractionError> {
    let data = std::fs::read(path)?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    extract(&UploadedFile::new(filename, data))
}

fn tabular_digest(kind: FileKind, table: crate::analysis::Table) -> Result<Digest, ExtractionError> {
    let (stats, chart) = tabular::summarize(&table)?;
    Ok(Digest {
        kind,
        text: format!("DATA_TYPE: Numeric\nStats Summary:\n{}", stats),
        chart,
    })
}

fn textual_digest(kind: FileKind, label: &str, text: &str) -> Digest {
    Digest::text_only(
        kind,
        format!(
            "DATA_TYPE: Textual ({})\nContent:\n{}",
            label,
            truncate_chars(text, MAX_TEXT_CHARS)
        ),
    )
}

/// First `max` characters of `text`
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
