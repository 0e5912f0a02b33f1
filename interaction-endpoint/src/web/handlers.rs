//! Interaction endpoint handlers.
//!
//! Every invocation runs one linear pass:
//! 1. Load the application identity and public key
//! 2. Verify the request signature, rejecting with 401 on failure
//! 3. Parse the body and check it belongs to this application
//! 4. Route by interaction type and serialize the responder's reply

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::error::InteractionError;
use crate::interaction::{route, Interaction};
use crate::web::envelope::{HandlerResponse, InboundRequest};
use crate::web::signature::{verify_request, SIGNATURE_HEADER, TIMESTAMP_HEADER};
use crate::Config;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

/// Build the HTTP routes served by the endpoint.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/interactions", post(interactions_webhook))
        .with_state(state)
}

// =============================================================================
// Health Check
// =============================================================================

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// =============================================================================
// Interaction Webhook
// =============================================================================

/// Handle one inbound request and produce its response envelope.
///
/// Recoverable errors become a 400 carrying their message; every other
/// failure becomes a 500 with a fixed body.
pub async fn handle_interaction(config: &Config, request: &InboundRequest) -> HandlerResponse {
    info!(
        has_signature = !request.header(SIGNATURE_HEADER).is_empty(),
        has_timestamp = !request.header(TIMESTAMP_HEADER).is_empty(),
        body_length = request.body().len(),
        "interaction_received"
    );

    match dispatch(config, request).await {
        Ok(response) => response,
        Err(err) if err.is_expected() => {
            warn!(error = %err, "interaction_rejected");
            err.into()
        }
        Err(err) => {
            error!(error = ?err, "interaction_failed");
            err.into()
        }
    }
}

async fn dispatch(config: &Config, request: &InboundRequest) -> Result<HandlerResponse, InteractionError> {
    let public_key = config.application_public_key()?;
    let application_id = config.application_id()?;

    if !verify_request(request, public_key) {
        warn!("interaction_signature_invalid");
        return Ok(HandlerResponse::unauthorized());
    }

    let interaction = Interaction::parse(request.body(), application_id)?;
    let responder = route(&interaction)?;
    let response = responder(&interaction).await?;
    let body = serde_json::to_string(&response)?;

    info!(interaction_type = %interaction.kind, "interaction_responded");

    Ok(HandlerResponse::ok(body))
}

/// Interaction webhook endpoint.
///
/// HTTP header names are case-insensitive, so the signature headers are
/// stored under their canonical names before the envelope lookup.
pub async fn interactions_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> HandlerResponse {
    let request = inbound_request(&headers, &body);
    handle_interaction(&state.config, &request).await
}

fn inbound_request(headers: &HeaderMap, body: &Bytes) -> InboundRequest {
    // Repeated headers keep their first value, as `HeaderMap::get` does
    let value = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()).map(str::to_string);

    let mut map: HashMap<String, String> = headers
        .keys()
        .filter_map(|name| value(name.as_str()).map(|v| (name.as_str().to_string(), v)))
        .collect();

    for canonical in [SIGNATURE_HEADER, TIMESTAMP_HEADER] {
        if let Some(v) = value(canonical) {
            map.insert(canonical.to_string(), v);
        }
    }

    let body = if body.is_empty() {
        None
    } else {
        Some(String::from_utf8_lossy(body).into_owned())
    };

    InboundRequest::new(map, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{APPLICATION_ID, APPLICATION_PUBLIC_KEY};
    use crate::error::UNEXPECTED_ERROR_MESSAGE;
    use crate::web::envelope::INVALID_SIGNATURE_MESSAGE;
    use axum::{
        body::Body,
        http::{HeaderValue, Request, StatusCode},
    };
    use ed25519_dalek::{Signer, SigningKey};
    use tower::ServiceExt;

    const APP_ID: &str = "1100000000000000001";
    const TIMESTAMP: &str = "1700000000";

    fn signing_key() -> SigningKey {
        SigningKey::from_bytes(&[7u8; 32])
    }

    fn config_with(vars: &[(&'static str, String)]) -> Config {
        Config::from_lookup(|name| {
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| value.clone())
        })
    }

    fn config() -> Config {
        config_with(&[
            (APPLICATION_ID, APP_ID.to_string()),
            (
                APPLICATION_PUBLIC_KEY,
                hex::encode(signing_key().verifying_key().to_bytes()),
            ),
        ])
    }

    fn signed_request(body: &str) -> InboundRequest {
        let signature = signing_key().sign(format!("{}{}", TIMESTAMP, body).as_bytes());
        let mut headers = HashMap::new();
        headers.insert(SIGNATURE_HEADER.to_string(), hex::encode(signature.to_bytes()));
        headers.insert(TIMESTAMP_HEADER.to_string(), TIMESTAMP.to_string());
        InboundRequest::new(headers, Some(body.to_string()))
    }

    fn ping_body(application_id: &str) -> String {
        format!(r#"{{"id":"1","application_id":"{application_id}","type":1,"token":"t","version":1}}"#)
    }

    #[tokio::test]
    async fn test_ping_returns_pong() {
        let response = handle_interaction(&config(), &signed_request(&ping_body(APP_ID))).await;

        assert_eq!(response.status_code, 200);
        assert_eq!(response.body, r#"{"type":1}"#);
    }

    #[tokio::test]
    async fn test_mismatched_application_is_bad_request() {
        let response = handle_interaction(&config(), &signed_request(&ping_body("42"))).await;

        assert_eq!(response.status_code, 400);
        assert_eq!(response.body, "The body is not an Interaction structure.");
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let response = handle_interaction(&config(), &signed_request("not json")).await;
        assert_eq!(response.status_code, 400);

        let response = handle_interaction(&config(), &signed_request("")).await;
        assert_eq!(response.status_code, 400);
    }

    #[tokio::test]
    async fn test_unsupported_type_is_bad_request() {
        let body = format!(r#"{{"application_id":"{APP_ID}","type":2}}"#);
        let response = handle_interaction(&config(), &signed_request(&body)).await;

        assert_eq!(response.status_code, 400);
        assert!(response.body.contains("unexpected"));

        let body = format!(r#"{{"application_id":"{APP_ID}","type":77}}"#);
        let response = handle_interaction(&config(), &signed_request(&body)).await;
        assert_eq!(response.status_code, 400);
        assert!(response.body.contains("77"));
    }

    #[tokio::test]
    async fn test_any_unrecognized_type_is_unsupported() {
        for raw in ["300", "-1", r#""1""#, "1.0", "null"] {
            let body = format!(r#"{{"application_id":"{APP_ID}","type":{raw}}}"#);
            let response = handle_interaction(&config(), &signed_request(&body)).await;

            assert_eq!(response.status_code, 400, "type: {raw}");
            assert!(response.body.contains("unexpected"), "type: {raw}");
        }

        let body = format!(r#"{{"application_id":"{APP_ID}"}}"#);
        let response = handle_interaction(&config(), &signed_request(&body)).await;
        assert_eq!(response.status_code, 400);
        assert_eq!(response.body, "The type of interaction was unexpected: null.");

        let body = format!(r#"{{"application_id":"{APP_ID}","type":300}}"#);
        let response = handle_interaction(&config(), &signed_request(&body)).await;
        assert_eq!(response.body, "The type of interaction was unexpected: 300.");
    }

    #[tokio::test]
    async fn test_missing_signature_headers_are_unauthorized() {
        let body = ping_body(APP_ID);
        let request = InboundRequest::new(HashMap::new(), Some(body));

        let response = handle_interaction(&config(), &request).await;

        assert_eq!(response, HandlerResponse::unauthorized());
        assert_eq!(response.body, INVALID_SIGNATURE_MESSAGE);
    }

    #[tokio::test]
    async fn test_unverified_garbage_is_unauthorized() {
        let mut request = signed_request(&ping_body(APP_ID));
        request.body = Some("not json at all".to_string());

        let response = handle_interaction(&config(), &request).await;
        assert_eq!(response.status_code, 401);
    }

    #[tokio::test]
    async fn test_missing_configuration_is_server_error() {
        let request = signed_request(&ping_body(APP_ID));
        let public_key = hex::encode(signing_key().verifying_key().to_bytes());

        for config in [
            config_with(&[(APPLICATION_ID, APP_ID.to_string())]),
            config_with(&[(APPLICATION_PUBLIC_KEY, public_key.clone())]),
            config_with(&[]),
        ] {
            let response = handle_interaction(&config, &request).await;
            assert_eq!(response.status_code, 500);
            assert_eq!(response.body, UNEXPECTED_ERROR_MESSAGE);
        }
    }

    #[tokio::test]
    async fn test_malformed_public_key_is_unauthorized() {
        let config = config_with(&[
            (APPLICATION_ID, APP_ID.to_string()),
            (APPLICATION_PUBLIC_KEY, "not-hex".to_string()),
        ]);

        let response = handle_interaction(&config, &signed_request(&ping_body(APP_ID))).await;
        assert_eq!(response.status_code, 401);
    }

    fn app() -> Router {
        router(AppState::new(config()))
    }

    #[tokio::test]
    async fn test_http_ping_with_lowercase_headers() {
        let body = ping_body(APP_ID);
        let signature = signing_key().sign(format!("{}{}", TIMESTAMP, body).as_bytes());

        let req = Request::builder()
            .method("POST")
            .uri("/interactions")
            .header("x-signature-ed25519", hex::encode(signature.to_bytes()))
            .header("x-signature-timestamp", TIMESTAMP)
            .body(Body::from(body))
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get("content-type").unwrap(),
            "application/json"
        );
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], br#"{"type":1}"#);
    }

    #[tokio::test]
    async fn test_http_unsigned_request_is_unauthorized() {
        let req = Request::builder()
            .method("POST")
            .uri("/interactions")
            .body(Body::from(ping_body(APP_ID)))
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], INVALID_SIGNATURE_MESSAGE.as_bytes());
    }

    #[test]
    fn test_repeated_headers_keep_first_value() {
        let mut headers = HeaderMap::new();
        headers.append("x-signature-timestamp", HeaderValue::from_static("first"));
        headers.append("x-signature-timestamp", HeaderValue::from_static("second"));
        headers.append("x-trace", HeaderValue::from_static("a"));
        headers.append("x-trace", HeaderValue::from_static("b"));

        let request = inbound_request(&headers, &Bytes::new());

        assert_eq!(request.header(TIMESTAMP_HEADER), "first");
        assert_eq!(request.header("x-signature-timestamp"), "first");
        assert_eq!(request.header("x-trace"), "a");
        assert_eq!(request.header(SIGNATURE_HEADER), "");
        assert_eq!(request.body, None);
    }

    #[tokio::test]
    async fn test_http_health() {
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let resp = app().oneshot(req).await.unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], br#"{"status":"ok"}"#);
    }
}
