//! Type-based dispatch of interactions to responders.
//!
//! Each supported interaction type gets one match arm returning its
//! responder. Everything else is rejected as unsupported.

use futures::future::BoxFuture;
use tracing::info;

use super::types::{Interaction, InteractionResponse, InteractionType};
use crate::error::InteractionError;

/// Produces the reply for a routed interaction.
pub type Responder =
    for<'a> fn(&'a Interaction) -> BoxFuture<'a, Result<InteractionResponse, InteractionError>>;

/// Select the responder for an identity-checked interaction.
pub fn route(interaction: &Interaction) -> Result<Responder, InteractionError> {
    match &interaction.kind {
        InteractionType::Ping => {
            info!(interaction_type = %interaction.kind, "interaction_routed");
            Ok(pong)
        }
        other => Err(InteractionError::UnsupportedInteraction(other.clone())),
    }
}

fn pong(_interaction: &Interaction) -> BoxFuture<'_, Result<InteractionResponse, InteractionError>> {
    Box::pin(async { Ok::<_, InteractionError>(InteractionResponse::pong()) })
}
