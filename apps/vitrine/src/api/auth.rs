//! # Authentication Module
//!
//! API key authentication for the mutating actions of the endpoint
//! (`save_storage`, `add_log`). Reads, `login` and `/health` stay public.
//!
//! ## Usage
//!
//! Send the API key in the Authorization header:
//! ```text
//! Authorization: Bearer <your-api-key>
//! ```

use super::types::{Action, ActionQuery, ApiResponse};
use axum::{
    Json,
    body::Body,
    extract::{Query, State},
    http::{Request, StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use subtle::ConstantTimeEq;

// =============================================================================
// KEY COMPARISON
// =============================================================================

/// Constant-time key comparison.
///
/// Both keys are padded to the same length so `ct_eq` always runs over the
/// same number of bytes.
pub fn keys_match(provided: &str, expected: &str) -> bool {
    let provided_bytes = provided.as_bytes();
    let expected_bytes = expected.as_bytes();

    let max_len = provided_bytes.len().max(expected_bytes.len());
    let mut padded_provided = vec![0u8; max_len];
    let mut padded_expected = vec![0u8; max_len];
    padded_provided[..provided_bytes.len()].copy_from_slice(provided_bytes);
    padded_expected[..expected_bytes.len()].copy_from_slice(expected_bytes);

    let bytes_match: bool = padded_provided.ct_eq(&padded_expected).into();
    bytes_match && provided_bytes.len() == expected_bytes.len()
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ApiResponse::error("Unauthorized")),
    )
        .into_response()
}

// =============================================================================
// MIDDLEWARE
// =============================================================================

/// Require `Authorization: Bearer <key>` on mutating actions.
pub async fn api_key_auth_middleware(
    State(expected): State<Arc<str>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let action = Query::<ActionQuery>::try_from_uri(request.uri())
        .map(|Query(q)| Action::parse(q.action.as_deref()))
        .unwrap_or(Action::Status);

    if !action.is_mutating() {
        return next.run(request).await;
    }

    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match auth_header {
        Some(header_value) => {
            // Support both "Bearer <key>" and raw "<key>" formats
            let provided = header_value.strip_prefix("Bearer ").unwrap_or(header_value);
            if keys_match(provided, &expected) {
                next.run(request).await
            } else {
                tracing::warn!(
                    event = "auth_failure",
                    reason = "invalid_api_key",
                    ?action,
                    "Authentication failed: invalid API key"
                );
                unauthorized()
            }
        }
        None => {
            tracing::warn!(
                event = "auth_failure",
                reason = "missing_authorization_header",
                ?action,
                "Missing Authorization header"
            );
            unauthorized()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_keys() {
        assert!(keys_match("secret", "secret"));
    }

    #[test]
    fn prefix_is_not_a_match() {
        assert!(!keys_match("secre", "secret"));
        assert!(!keys_match("secret-and-more", "secret"));
        assert!(!keys_match("", "secret"));
    }
}
