//! # API Endpoint Handlers
//!
//! One handler serves the multiplexed endpoint and dispatches on the
//! `action` query parameter.

use super::{
    AppState, members,
    types::{
        Action, ActionQuery, AddLogRequest, ApiResponse, HealthResponse, LoginRequest,
        SaveStorageRequest,
    },
};
use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use vitrine_core::primitives::{AUDIT_LOG_CAPACITY, MAX_DOCUMENT_BYTES};
use vitrine_core::{
    Environment, StorageKey, config_from_value, content_from_value, features_from_value,
};

// =============================================================================
// HELPERS
// =============================================================================

fn reply(status: StatusCode, body: ApiResponse) -> Response {
    (status, Json(body)).into_response()
}

fn bad_request(message: impl Into<String>) -> Response {
    reply(StatusCode::BAD_REQUEST, ApiResponse::error(message))
}

fn internal_error(context: &str, error: impl std::fmt::Display) -> Response {
    tracing::error!(context, error = %error, "Request failed");
    reply(
        StatusCode::INTERNAL_SERVER_ERROR,
        ApiResponse::error(format!("{context} failed")),
    )
}

fn success_with<T: Serialize>(context: &str, data: &T) -> Response {
    match serde_json::to_value(data) {
        Ok(value) => reply(StatusCode::OK, ApiResponse::success(value)),
        Err(e) => internal_error(context, e),
    }
}

fn require_post(method: &Method, action: &str) -> Result<(), Response> {
    if *method == Method::POST {
        Ok(())
    } else {
        Err(reply(
            StatusCode::METHOD_NOT_ALLOWED,
            ApiResponse::error(format!("{action} requires POST")),
        ))
    }
}

fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, Response> {
    serde_json::from_slice(body).map_err(|e| bad_request(format!("Invalid JSON body: {e}")))
}

fn parse_key(raw: Option<&str>) -> Result<StorageKey, Response> {
    let raw = raw.ok_or_else(|| bad_request("Missing storage key"))?;
    raw.parse().map_err(|e| bad_request(format!("{e}")))
}

/// Reject documents that do not decode as the record stored under `key`.
/// Missing fields are allowed; readers fill them from the defaults.
fn validate_document(key: StorageKey, data: &Value) -> Result<(), String> {
    let result = match key {
        StorageKey::Config => config_from_value(data.clone()).map(|_| ()),
        StorageKey::Features => features_from_value(data.clone()).map(|_| ()),
        StorageKey::Content => content_from_value(data.clone()).map(|_| ()),
    };
    result.map_err(|e| format!("Invalid {key} document: {e}"))
}

// =============================================================================
// HEALTH HANDLER
// =============================================================================

pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// ENDPOINT DISPATCH
// =============================================================================

/// `GET|POST <route>?action=…`
pub async fn endpoint_handler(
    State(state): State<AppState>,
    method: Method,
    Query(query): Query<ActionQuery>,
    body: Bytes,
) -> Response {
    let action = Action::parse(query.action.as_deref());
    let result = match action {
        Action::Login => login(&state, &method, &body).await,
        Action::GetStorage => get_storage(&state, query.key.as_deref()),
        Action::SaveStorage => save_storage(&state, &method, &body),
        Action::AddLog => add_log(&state, &method, &body),
        Action::GetLogs => get_logs(&state),
        Action::Status => Ok(reply(StatusCode::OK, ApiResponse::online())),
    };
    result.unwrap_or_else(|response| response)
}

// =============================================================================
// ACTIONS
// =============================================================================

async fn login(state: &AppState, method: &Method, body: &Bytes) -> Result<Response, Response> {
    require_post(method, "login")?;
    let request: LoginRequest = parse_body(body)?;

    let store = state.store.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        members::login(&store, &request.email, &request.pass)
    })
    .await
    .map_err(|e| internal_error("login", e))?
    .map_err(|e| internal_error("login", e))?;

    match outcome {
        Some(panel) => {
            tracing::info!(email = %panel.user.email, "Member logged in");
            Ok(success_with("login", &panel))
        }
        None => {
            tracing::info!("Member login refused");
            Ok(reply(
                StatusCode::OK,
                ApiResponse::error(members::INVALID_CREDENTIALS),
            ))
        }
    }
}

fn get_storage(state: &AppState, key: Option<&str>) -> Result<Response, Response> {
    let key = parse_key(key)?;
    let data = state
        .store
        .get_document(key)
        .map_err(|e| internal_error("get_storage", e))?;
    Ok(reply(
        StatusCode::OK,
        ApiResponse::success(data.unwrap_or(Value::Null)),
    ))
}

fn save_storage(state: &AppState, method: &Method, body: &Bytes) -> Result<Response, Response> {
    require_post(method, "save_storage")?;
    let request: SaveStorageRequest = parse_body(body)?;
    let key = parse_key(Some(&request.key))?;

    if request.data.is_null() {
        return Err(bad_request("Missing data"));
    }
    let size = serde_json::to_vec(&request.data).map_or(0, |bytes| bytes.len());
    if size > MAX_DOCUMENT_BYTES {
        return Err(reply(
            StatusCode::PAYLOAD_TOO_LARGE,
            ApiResponse::error(format!(
                "Document size {size} exceeds maximum {MAX_DOCUMENT_BYTES} bytes"
            )),
        ));
    }
    validate_document(key, &request.data).map_err(bad_request)?;

    state
        .store
        .put_document(key, &request.data)
        .map_err(|e| internal_error("save_storage", e))?;
    tracing::info!(key = %key, bytes = size, "Document saved");
    Ok(reply(StatusCode::OK, ApiResponse::ok()))
}

fn add_log(state: &AppState, method: &Method, body: &Bytes) -> Result<Response, Response> {
    require_post(method, "add_log")?;
    let request: AddLogRequest = parse_body(body)?;

    let environment = stored_environment(state).unwrap_or_default();
    let entry = request.into_entry(environment).map_err(bad_request)?;

    state
        .store
        .append_audit(&entry)
        .map_err(|e| internal_error("add_log", e))?;
    tracing::debug!(action = %entry.action, severity = %entry.severity, "Audit entry appended");
    Ok(reply(StatusCode::OK, ApiResponse::ok()))
}

fn get_logs(state: &AppState) -> Result<Response, Response> {
    let entries = state
        .store
        .recent_audit(AUDIT_LOG_CAPACITY)
        .map_err(|e| internal_error("get_logs", e))?;
    Ok(success_with("get_logs", &entries))
}

/// Environment of the stored configuration, if readable.
fn stored_environment(state: &AppState) -> Option<Environment> {
    let config = state.store.get_document(StorageKey::Config).ok()??;
    serde_json::from_value(config.get("environment")?.clone()).ok()
}
