//! OpenAPI documentation, served via Scalar UI at `/docs`.

use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "notes-tutor API",
        version = "0.1.0",
        description = "Ask questions about an uploaded PDF or text document and get a teaching-style answer.",
    ),
    tags(
        (name = "Health", description = "Server liveness and configuration"),
        (name = "Ask", description = "Document upload, keyword retrieval, and answer generation"),
    ),
    paths(
        crate::api::health::health,
        crate::api::ask::ask,
        crate::api::ask::invoke,
    ),
    components(schemas(
        crate::event::QaRequest,
        crate::event::QaResponse,
        crate::event::ErrorBody,
        crate::event::InvocationEvent,
        crate::event::InvocationResponse,
        crate::api::health::HealthResponse,
    ))
)]
pub struct ApiDoc;
