//! Document question answering over an HTTP-style invocation envelope.
//!
//! [`handler::QaHandler`] is transport-agnostic; [`router::build_router`]
//! exposes it over axum.

pub mod api;
pub mod event;
pub mod handler;
pub mod router;
pub mod state;

pub use event::{InvocationEvent, InvocationResponse, QaRequest, QaResponse};
pub use handler::{HandlerError, QaHandler, Rejection};
pub use router::build_router;
pub use state::AppState;
