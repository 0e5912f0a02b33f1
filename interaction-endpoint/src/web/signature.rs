//! Interaction request signature verification.
//!
//! The platform signs every request with Ed25519. The signed message is the
//! `X-Signature-Timestamp` header value immediately followed by the raw body,
//! and the hex-encoded detached signature is sent in `X-Signature-Ed25519`.

use ed25519_dalek::{Signature, Verifier, VerifyingKey, PUBLIC_KEY_LENGTH};
use tracing::warn;

use crate::web::envelope::InboundRequest;

/// Header carrying the hex-encoded detached signature.
pub const SIGNATURE_HEADER: &str = "X-Signature-Ed25519";

/// Header carrying the timestamp that prefixes the signed message.
pub const TIMESTAMP_HEADER: &str = "X-Signature-Timestamp";

/// Verify the signature of an inbound request.
///
/// Missing headers and an absent body read as empty strings, see
/// [`InboundRequest::header`] and [`InboundRequest::body`].
pub fn verify_request(request: &InboundRequest, public_key: &str) -> bool {
    verify_signature(
        public_key,
        request.header(TIMESTAMP_HEADER),
        request.body(),
        request.header(SIGNATURE_HEADER),
    )
}

/// Verify an Ed25519 signature over `timestamp + body`.
///
/// # Arguments
///
/// * `public_key` - Hex-encoded 32 byte Ed25519 public key
/// * `timestamp` - The `X-Signature-Timestamp` header value
/// * `body` - The raw, unparsed request body
/// * `signature` - The hex-encoded 64 byte signature
///
/// # Returns
///
/// `true` if the signature is valid for that exact message and key. Malformed
/// hex, wrong lengths and invalid keys all yield `false`.
pub fn verify_signature(public_key: &str, timestamp: &str, body: &str, signature: &str) -> bool {
    // Check for empty inputs
    if timestamp.is_empty() || signature.is_empty() {
        warn!(
            has_timestamp = !timestamp.is_empty(),
            has_signature = !signature.is_empty(),
            "interaction_signature_missing_fields"
        );
        return false;
    }

    let verifying_key = match decode_public_key(public_key) {
        Some(key) => key,
        None => {
            warn!(key_length = public_key.len(), "interaction_signature_invalid_key");
            return false;
        }
    };

    let signature = match hex::decode(signature)
        .ok()
        .and_then(|bytes| Signature::from_slice(&bytes).ok())
    {
        Some(sig) => sig,
        None => {
            warn!(signature_length = signature.len(), "interaction_signature_invalid_hex");
            return false;
        }
    };

    let mut message = Vec::with_capacity(timestamp.len() + body.len());
    message.extend_from_slice(timestamp.as_bytes());
    message.extend_from_slice(body.as_bytes());

    let valid = verifying_key.verify(&message, &signature).is_ok();

    if !valid {
        warn!(body_length = body.len(), "interaction_signature_mismatch");
    }

    valid
}

fn decode_public_key(public_key: &str) -> Option<VerifyingKey> {
    let bytes: [u8; PUBLIC_KEY_LENGTH] = hex::decode(public_key).ok()?.try_into().ok()?;
    VerifyingKey::from_bytes(&bytes).ok()
}
