//! Document text extraction and keyword fragment retrieval.

pub mod document;
pub mod retrieval;

pub use document::{extract_text, DocumentKind, EmptyReason, Extraction};
pub use retrieval::{is_sentinel, retrieve, NO_RELEVANT_INFORMATION};
