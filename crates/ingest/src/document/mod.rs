mod pdf;
mod txt;

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),
}

/// File types the extractor understands, keyed by filename suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Pdf,
    Txt,
}

impl DocumentKind {
    /// Case-insensitive `.pdf` / `.txt` suffix dispatch.
    pub fn from_filename(filename: &str) -> Result<Self, ExtractionError> {
        let lower = filename.to_lowercase();
        if lower.ends_with(".pdf") {
            Ok(DocumentKind::Pdf)
        } else if lower.ends_with(".txt") {
            Ok(DocumentKind::Txt)
        } else {
            let ext = lower.rsplit_once('.').map(|(_, e)| e).unwrap_or("");
            Err(ExtractionError::UnsupportedType(ext.to_string()))
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Pdf => "pdf",
            DocumentKind::Txt => "txt",
        }
    }
}

/// Why an extraction produced no usable text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    /// The file had zero bytes.
    NoBytes,
    /// Decoding succeeded but left nothing but whitespace.
    Blank,
}

/// Outcome of text extraction. Decoding never fails outright; an empty
/// result still flows on to retrieval, where it matches nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Text(String),
    Empty(EmptyReason),
}

impl Extraction {
    fn from_decoded(bytes: &[u8], text: String) -> Self {
        if bytes.is_empty() {
            Extraction::Empty(EmptyReason::NoBytes)
        } else if text.trim().is_empty() {
            Extraction::Empty(EmptyReason::Blank)
        } else {
            Extraction::Text(text)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Extraction::Empty(_))
    }

    /// Lowercased document text; empty string when nothing was extracted.
    pub fn into_text(self) -> String {
        match self {
            Extraction::Text(text) => text,
            Extraction::Empty(_) => String::new(),
        }
    }
}

/// Extract lowercase text from raw file bytes.
pub fn extract_text(bytes: &[u8], kind: DocumentKind) -> Extraction {
    let text = match kind {
        DocumentKind::Pdf => pdf::extract_pdf(bytes),
        DocumentKind::Txt => txt::extract_txt(bytes),
    };

    let extraction = Extraction::from_decoded(bytes, text);
    if let Extraction::Empty(reason) = &extraction {
        tracing::warn!(
            "No text extracted from {} document ({} bytes): {:?}",
            kind.as_str(),
            bytes.len(),
            reason
        );
    }
    extraction
}
