//! Interaction parsing and routing.
//!
//! ## Processing Flow
//!
//! ```text
//! verified body → Interaction::parse() → route() → Responder → InteractionResponse
//! ```

pub mod router;
pub mod types;

pub use router::{route, Responder};
pub use types::{Interaction, InteractionResponse, InteractionResponseType, InteractionType};
