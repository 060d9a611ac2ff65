//! Request orchestration: validate → store → extract → retrieve → generate.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use thiserror::Error;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use tutor_core::config::RetrievalConfig;
use tutor_core::Config;
use tutor_ingest::{extract_text, is_sentinel, retrieve, DocumentKind};
use tutor_llm::AnswerGenerator;
use tutor_storage::{DocumentStore, StorageError};

use crate::event::{InvocationEvent, InvocationResponse, QaRequest, QaResponse};

/// Faults that are not the caller's doing. These are not turned into 4xx
/// responses; the hosting layer maps them to a generic 5xx.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("storage upload failed: {0}")]
    Storage(#[from] StorageError),

    #[error("response serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Client input problems, each answered with a 400.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Rejection {
    #[error("Request body missing")]
    BodyMissing,
    #[error("Invalid request body")]
    InvalidBody,
    #[error("query, filename, and filecontent are required")]
    MissingFields,
    #[error("Invalid base64 file")]
    InvalidBase64File,
    #[error("Only PDF and TXT files are supported")]
    UnsupportedFileType,
}

impl Rejection {
    pub fn into_response(self) -> InvocationResponse {
        InvocationResponse::error(400, &self.to_string())
    }
}

/// A validated question request with the file already decoded.
#[derive(Debug)]
struct Question {
    query: String,
    filename: String,
    bytes: Bytes,
}

pub struct QaHandler {
    store: DocumentStore,
    generator: AnswerGenerator,
    retrieval: RetrievalConfig,
}

impl QaHandler {
    pub fn new(store: DocumentStore, generator: AnswerGenerator, retrieval: RetrievalConfig) -> Self {
        Self {
            store,
            generator,
            retrieval,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, StorageError> {
        Ok(Self::new(
            DocumentStore::from_config(config)?,
            AnswerGenerator::from_config(&config.gemini),
            config.retrieval,
        ))
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    pub fn llm_configured(&self) -> bool {
        self.generator.is_configured()
    }

    /// Handle one invocation. Client errors come back as `Ok` 400 responses;
    /// only storage and serialization faults are `Err`.
    pub async fn handle(&self, event: InvocationEvent) -> Result<InvocationResponse, HandlerError> {
        let span = info_span!("invoke", request_id = %Uuid::new_v4());
        self.handle_inner(event).instrument(span).await
    }

    async fn handle_inner(&self, event: InvocationEvent) -> Result<InvocationResponse, HandlerError> {
        info!(
            "Invocation received (method: {})",
            event.http_method.as_deref().unwrap_or("-")
        );

        if event.is_preflight() {
            return Ok(InvocationResponse::preflight());
        }

        let question = match parse_question(&event) {
            Ok(q) => q,
            Err(rejection) => {
                warn!("Rejected request: {}", rejection);
                return Ok(rejection.into_response());
            }
        };

        // Upload happens before the extension check, so rejected file
        // types are still persisted.
        self.store.put(&question.filename, question.bytes.clone()).await?;

        let kind = match DocumentKind::from_filename(&question.filename) {
            Ok(kind) => kind,
            Err(e) => {
                warn!("Rejected request for '{}': {}", question.filename, e);
                return Ok(Rejection::UnsupportedFileType.into_response());
            }
        };

        let text = extract_text(&question.bytes, kind).into_text();
        let fragments = retrieve(&question.query, &text, &self.retrieval);
        let matched = if is_sentinel(&fragments) { 0 } else { fragments.len() };

        let generation = self.generator.generate(&question.query, &fragments).await;
        let outcome = generation.label();
        let mut answer = generation.into_answer(&fragments);
        if answer.is_empty() {
            answer = fragments;
        }

        info!(
            "Answered '{}' ({} bytes, {} chars extracted, {} fragments matched, outcome: {}, {} answer lines)",
            question.filename,
            question.bytes.len(),
            text.chars().count(),
            matched,
            outcome,
            answer.len()
        );

        let body = serde_json::to_string(&QaResponse {
            filename: question.filename,
            query: question.query,
            answer,
        })?;
        Ok(InvocationResponse::ok_json(body))
    }
}

fn parse_question(event: &InvocationEvent) -> Result<Question, Rejection> {
    let raw = match event.body.as_deref() {
        Some(body) if !body.is_empty() => body,
        _ => return Err(Rejection::BodyMissing),
    };

    let decoded;
    let raw = if event.is_base64_encoded.unwrap_or(false) {
        let bytes = decode_base64(raw).map_err(|_| Rejection::InvalidBody)?;
        decoded = String::from_utf8(bytes).map_err(|_| Rejection::InvalidBody)?;
        decoded.as_str()
    } else {
        raw
    };

    let request: QaRequest = serde_json::from_str(raw).map_err(|_| Rejection::InvalidBody)?;

    let (query, filename, filecontent) = match (
        non_empty(request.query),
        non_empty(request.filename),
        non_empty(request.filecontent),
    ) {
        (Some(q), Some(f), Some(c)) => (q, f, c),
        _ => return Err(Rejection::MissingFields),
    };

    let bytes = decode_base64(&filecontent).map_err(|_| Rejection::InvalidBase64File)?;

    Ok(Question {
        query,
        filename,
        bytes: Bytes::from(bytes),
    })
}

/// Standard-alphabet decode that skips characters outside the alphabet,
/// so line-wrapped (MIME-style) payloads are accepted. Padding is still
/// enforced on what remains.
fn decode_base64(input: &str) -> Result<Vec<u8>, base64::DecodeError> {
    let filtered: Vec<u8> = input
        .bytes()
        .filter(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'='))
        .collect();
    STANDARD.decode(filtered)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
