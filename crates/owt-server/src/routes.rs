//! HTTP handlers
//!
//! Route names keep the casing existing clients call.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderMap, StatusCode, header};
use owt_auth::{ClaimSet, ClaimSetRequest, OwtError, Verification};
use serde_json::{Value, json};
use tracing::debug;

use crate::error::{ServerError, ServerResult};
use crate::extract::AllowedCaller;
use crate::state::AppState;

pub const GENERATE_TOKEN_PATH: &str = "/GenerateOwtToken";
pub const VALIDATE_TOKEN_PATH: &str = "/InValidateToken";
pub const PAYLOAD_PATH: &str = "/GetPayloadFromToken";
pub const HEALTH_PATH: &str = "/health";

/// Wire value of a validation result
const TRUE: &str = "True";
const FALSE: &str = "False";

fn authorization(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
}

/// `POST /GenerateOwtToken`
pub async fn generate_token(
    State(state): State<AppState>,
    AllowedCaller(caller): AllowedCaller,
    body: Result<Json<ClaimSetRequest>, JsonRejection>,
) -> ServerResult<(StatusCode, Json<String>)> {
    let Json(request) = body.map_err(|e| ServerError::InvalidBody(e.body_text()))?;
    debug!(caller = %caller.identity, request = %request, "Generating token");

    let token = state.issuer.issue(&request)?;
    Ok((StatusCode::ACCEPTED, Json(token)))
}

/// `POST /InValidateToken`
pub async fn validate_token(
    State(state): State<AppState>,
    _caller: AllowedCaller,
    headers: HeaderMap,
) -> (StatusCode, Json<&'static str>) {
    let valid = state.validator.validate(authorization(&headers));
    (StatusCode::ACCEPTED, Json(if valid { TRUE } else { FALSE }))
}

/// `POST /GetPayloadFromToken`
///
/// `null` for an invalid token, `400` only when no token was sent.
pub async fn payload_from_token(
    State(state): State<AppState>,
    _caller: AllowedCaller,
    headers: HeaderMap,
) -> ServerResult<(StatusCode, Json<Option<ClaimSet>>)> {
    match state.validator.extract(authorization(&headers)) {
        Verification::Absent => Err(OwtError::TokenAbsent.into()),
        verification => Ok((StatusCode::ACCEPTED, Json(verification.into_claims()))),
    }
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
