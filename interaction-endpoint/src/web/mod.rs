//! Web server module for handling signed interaction webhooks.
//!
//! This module provides:
//! - Ed25519 request signature verification
//! - The request/response envelope exchanged with the host
//! - The interaction handler and its axum adapter

pub mod envelope;
pub mod handlers;
pub mod signature;

pub use envelope::{HandlerResponse, InboundRequest, INVALID_SIGNATURE_MESSAGE};
pub use handlers::{handle_interaction, health, interactions_webhook, router, AppState, HealthResponse};
pub use signature::{verify_request, verify_signature, SIGNATURE_HEADER, TIMESTAMP_HEADER};
