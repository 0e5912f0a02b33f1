//! Request and response envelopes exchanged with the hosting platform.

use std::collections::HashMap;

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::error::{InteractionError, UNEXPECTED_ERROR_MESSAGE};

/// Body returned when signature verification fails.
pub const INVALID_SIGNATURE_MESSAGE: &str = "Invalid request signature.";

/// An inbound request, alive for a single invocation.
#[derive(Debug, Clone, Default)]
pub struct InboundRequest {
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

impl InboundRequest {
    pub fn new(headers: HashMap<String, String>, body: Option<String>) -> Self {
        Self { headers, body }
    }

    /// Case-sensitive header lookup, empty when absent.
    pub fn header(&self, name: &str) -> &str {
        self.headers.get(name).map(String::as_str).unwrap_or_default()
    }

    /// Raw body, empty when absent.
    pub fn body(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }
}

/// Result of a single invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HandlerResponse {
    pub status_code: u16,
    pub body: String,
}

impl HandlerResponse {
    pub fn ok(body: String) -> Self {
        Self {
            status_code: StatusCode::OK.as_u16(),
            body,
        }
    }

    pub fn unauthorized() -> Self {
        Self {
            status_code: StatusCode::UNAUTHORIZED.as_u16(),
            body: INVALID_SIGNATURE_MESSAGE.to_string(),
        }
    }

    pub fn bad_request(message: String) -> Self {
        Self {
            status_code: StatusCode::BAD_REQUEST.as_u16(),
            body: message,
        }
    }

    pub fn server_error() -> Self {
        Self {
            status_code: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            body: UNEXPECTED_ERROR_MESSAGE.to_string(),
        }
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl From<InteractionError> for HandlerResponse {
    fn from(err: InteractionError) -> Self {
        if err.is_expected() {
            HandlerResponse::bad_request(err.message())
        } else {
            HandlerResponse::server_error()
        }
    }
}

impl IntoResponse for HandlerResponse {
    fn into_response(self) -> Response {
        let content_type = if self.status() == StatusCode::OK {
            "application/json"
        } else {
            "text/plain; charset=utf-8"
        };

        (self.status(), [(header::CONTENT_TYPE, content_type)], self.body).into_response()
    }
}
