//! Interactions - signed chat-platform interaction endpoint.
//!
//! This library verifies, parses and answers interaction webhooks delivered
//! by a chat platform. The `interaction-endpoint` binary serves it over HTTP.
//!
//! ## Request Flow
//!
//! ```text
//! Request → Signature check → Interaction::parse → route → Responder → Response
//! ```

pub mod config;
pub mod error;
pub mod interaction;
pub mod web;

// Re-export commonly used types
pub use config::{Config, ConfigError};
pub use error::InteractionError;
pub use interaction::{Interaction, InteractionResponse, InteractionType};
pub use web::{handle_interaction, AppState, HandlerResponse, InboundRequest};
