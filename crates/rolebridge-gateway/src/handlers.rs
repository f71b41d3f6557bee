// SPDX-FileCopyrightText: 2026 Rolebridge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway API.
//!
//! Validation errors, including bodies that are not valid JSON, are returned
//! as `{"error": ...}` with status 200 so the browser client handles every
//! outcome from the body alone.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use rolebridge_core::Role;
use rolebridge_translate::{Classification, classify, start_translation};

use crate::server::GatewayState;
use crate::sse;

/// Request body for POST /api/translate.
#[derive(Debug, Default, Deserialize)]
pub struct TranslateRequest {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub direction: String,
}

/// Request body for POST /api/detect.
#[derive(Debug, Default, Deserialize)]
pub struct DetectRequest {
    #[serde(default)]
    pub content: String,
}

/// Response body for POST /api/detect.
#[derive(Debug, Serialize)]
pub struct DetectResponse {
    pub role: Role,
    /// Present only when the upstream call failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<Classification> for DetectResponse {
    fn from(c: Classification) -> Self {
        Self {
            role: c.role,
            error: c.error,
        }
    }
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Response body for GET /api/directions.
#[derive(Debug, Serialize)]
pub struct DirectionsResponse {
    pub directions: Vec<String>,
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
}

impl ErrorResponse {
    fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// GET /
///
/// Serves `index.html` from the static directory.
pub async fn index(State(state): State<GatewayState>) -> Response {
    let path = state.static_dir.join("index.html");
    match tokio::fs::read_to_string(&path).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "index page unavailable");
            (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse::new("index page not found")),
            )
                .into_response()
        }
    }
}

/// POST /api/translate
///
/// Returns an event stream of translated fragments, or a JSON error when
/// the content is empty or the direction is unsupported.
pub async fn translate(
    State(state): State<GatewayState>,
    body: Result<Json<TranslateRequest>, JsonRejection>,
) -> Response {
    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "translate body rejected");
            return Json(ErrorResponse::new(rejection.body_text())).into_response();
        }
    };

    match start_translation(
        state.provider.clone(),
        &state.prompts,
        &body.content,
        &body.direction,
    ) {
        Ok(events) => sse::event_stream(events).into_response(),
        Err(e) => {
            tracing::debug!(error = %e, direction = %body.direction, "translate request rejected");
            Json(ErrorResponse::new(e.to_string())).into_response()
        }
    }
}

/// POST /api/detect
///
/// An unreadable body classifies as `unknown` with the rejection attached.
pub async fn detect(
    State(state): State<GatewayState>,
    body: Result<Json<DetectRequest>, JsonRejection>,
) -> Json<DetectResponse> {
    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "detect body rejected");
            return Json(DetectResponse {
                role: Role::Unknown,
                error: Some(rejection.body_text()),
            });
        }
    };

    let classification = classify(state.provider.as_ref(), &body.content).await;
    Json(classification.into())
}

/// GET /api/directions
pub async fn directions(State(state): State<GatewayState>) -> Json<DirectionsResponse> {
    Json(DirectionsResponse {
        directions: state
            .prompts
            .directions()
            .into_iter()
            .map(str::to_string)
            .collect(),
    })
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translate_request_fields_default_to_empty() {
        let req: TranslateRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.content, "");
        assert_eq!(req.direction, "");

        let req: TranslateRequest =
            serde_json::from_str(r#"{"content": "hi", "direction": "dev_to_product"}"#).unwrap();
        assert_eq!(req.content, "hi");
        assert_eq!(req.direction, "dev_to_product");
    }

    #[test]
    fn detect_request_ignores_unknown_fields() {
        let req: DetectRequest =
            serde_json::from_str(r#"{"content": "x", "extra": true}"#).unwrap();
        assert_eq!(req.content, "x");
    }

    #[test]
    fn detect_response_omits_error_when_absent() {
        let json = serde_json::to_string(&DetectResponse {
            role: Role::Dev,
            error: None,
        })
        .unwrap();
        assert_eq!(json, r#"{"role":"dev"}"#);
    }

    #[test]
    fn detect_response_includes_error_when_present() {
        let json = serde_json::to_string(&DetectResponse {
            role: Role::Unknown,
            error: Some("timeout".into()),
        })
        .unwrap();
        assert_eq!(json, r#"{"role":"unknown","error":"timeout"}"#);
    }

    #[test]
    fn error_response_serializes() {
        let json = serde_json::to_string(&ErrorResponse::new("something went wrong")).unwrap();
        assert_eq!(json, r#"{"error":"something went wrong"}"#);
    }

    #[test]
    fn health_response_serializes() {
        let resp = HealthResponse {
            status: "ok".to_string(),
            version: "0.1.0".to_string(),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"status\":\"ok\""));
        assert!(json.contains("\"version\":\"0.1.0\""));
    }
}
