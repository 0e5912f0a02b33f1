//! Interaction wire types.
//!
//! This module defines the JSON formats for:
//! - Inbound interactions delivered by the chat platform
//! - Responses returned synchronously to the platform
//!
//! Type discriminants follow the platform's integer enumerations.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::InteractionError;

// =============================================================================
// Inbound Interactions
// =============================================================================

/// Kind of an inbound interaction, carried in its `type` field.
///
/// Any JSON value is accepted; values outside the known codes, including a
/// missing `type`, become `Unknown` and are rejected at routing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "Value")]
pub enum InteractionType {
    /// Connectivity check sent when the endpoint is registered
    Ping,
    ApplicationCommand,
    MessageComponent,
    ApplicationCommandAutocomplete,
    ModalSubmit,
    /// Any value the platform may add later
    Unknown(Value),
}

impl Default for InteractionType {
    fn default() -> Self {
        InteractionType::Unknown(Value::Null)
    }
}

impl From<Value> for InteractionType {
    fn from(value: Value) -> Self {
        match value.as_u64() {
            Some(1) => InteractionType::Ping,
            Some(2) => InteractionType::ApplicationCommand,
            Some(3) => InteractionType::MessageComponent,
            Some(4) => InteractionType::ApplicationCommandAutocomplete,
            Some(5) => InteractionType::ModalSubmit,
            _ => InteractionType::Unknown(value),
        }
    }
}

impl fmt::Display for InteractionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InteractionType::Ping => f.write_str("1"),
            InteractionType::ApplicationCommand => f.write_str("2"),
            InteractionType::MessageComponent => f.write_str("3"),
            InteractionType::ApplicationCommandAutocomplete => f.write_str("4"),
            InteractionType::ModalSubmit => f.write_str("5"),
            InteractionType::Unknown(value) => write!(f, "{}", value),
        }
    }
}

/// An interaction delivered to the endpoint.
///
/// Only the fields needed for validation and routing are modelled; anything
/// else in the payload is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct Interaction {
    /// Application the interaction was sent to
    pub application_id: String,
    /// Interaction kind
    #[serde(default, rename = "type")]
    pub kind: InteractionType,
}

impl Interaction {
    /// Parse a verified request body and check it targets `application_id`.
    pub fn parse(body: &str, application_id: &str) -> Result<Self, InteractionError> {
        let interaction: Interaction =
            serde_json::from_str(body).map_err(|_| InteractionError::NotAnInteraction)?;

        if interaction.application_id != application_id {
            return Err(InteractionError::NotAnInteraction);
        }

        Ok(interaction)
    }
}

// =============================================================================
// Interaction Responses
// =============================================================================

/// How the platform should act on a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "u8")]
pub enum InteractionResponseType {
    /// Acknowledges a Ping
    Pong,
    ChannelMessageWithSource,
    DeferredChannelMessageWithSource,
    DeferredUpdateMessage,
    UpdateMessage,
    ApplicationCommandAutocompleteResult,
    Modal,
}

impl From<InteractionResponseType> for u8 {
    fn from(kind: InteractionResponseType) -> Self {
        match kind {
            InteractionResponseType::Pong => 1,
            InteractionResponseType::ChannelMessageWithSource => 4,
            InteractionResponseType::DeferredChannelMessageWithSource => 5,
            InteractionResponseType::DeferredUpdateMessage => 6,
            InteractionResponseType::UpdateMessage => 7,
            InteractionResponseType::ApplicationCommandAutocompleteResult => 8,
            InteractionResponseType::Modal => 9,
        }
    }
}

/// Response payload returned to the platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InteractionResponse {
    #[serde(rename = "type")]
    pub kind: InteractionResponseType,
}

impl InteractionResponse {
    pub fn pong() -> Self {
        Self {
            kind: InteractionResponseType::Pong,
        }
    }
}
