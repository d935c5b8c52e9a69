//! # API Request/Response Types
//!
//! JSON structures of the multiplexed endpoint.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use vitrine_core::primitives::{DEFAULT_ACTOR, MAX_AUDIT_TEXT_LENGTH};
use vitrine_core::{AuditLogEntry, Environment, Severity};

/// Marker returned by the default action.
pub const ONLINE_STATUS: &str = "Vitrine Core API online";

// =============================================================================
// QUERY
// =============================================================================

/// Query string of every endpoint call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionQuery {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
}

/// Actions understood by the endpoint. Anything else gets the status reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Login,
    GetStorage,
    SaveStorage,
    AddLog,
    GetLogs,
    Status,
}

impl Action {
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("login") => Action::Login,
            Some("get_storage") => Action::GetStorage,
            Some("save_storage") => Action::SaveStorage,
            Some("add_log") => Action::AddLog,
            Some("get_logs") => Action::GetLogs,
            _ => Action::Status,
        }
    }

    /// Actions that change stored state and therefore require the API key.
    #[must_use]
    pub const fn is_mutating(self) -> bool {
        matches!(self, Action::SaveStorage | Action::AddLog)
    }
}

// =============================================================================
// RESPONSE ENVELOPE
// =============================================================================

/// `{success, data?, error?, status?}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    /// `Some(Value::Null)` serializes as `"data": null`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl ApiResponse {
    #[must_use]
    pub fn ok() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
            status: None,
        }
    }

    #[must_use]
    pub fn success(data: Value) -> Self {
        Self {
            data: Some(data),
            ..Self::ok()
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(message.into()),
            ..Self::ok()
        }
    }

    #[must_use]
    pub fn online() -> Self {
        Self {
            status: Some(ONLINE_STATUS.to_string()),
            ..Self::ok()
        }
    }
}

/// `GET /health` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// REQUEST BODIES
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub pass: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveStorageRequest {
    pub key: String,
    #[serde(default)]
    pub data: Value,
}

/// `add_log` body. Only `action` is required; the server fills the rest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddLogRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<i64>,
    pub action: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub environment: Option<Environment>,
}

impl AddLogRequest {
    /// Validate and complete the entry.
    ///
    /// `fallback_env` is used when the caller did not send an environment.
    pub fn into_entry(self, fallback_env: Environment) -> Result<AuditLogEntry, String> {
        if self.action.trim().is_empty() {
            return Err("action must not be empty".to_string());
        }
        for (name, text) in [("action", &self.action), ("details", &self.details)] {
            if text.len() > MAX_AUDIT_TEXT_LENGTH {
                return Err(format!(
                    "{name} length {} exceeds maximum {MAX_AUDIT_TEXT_LENGTH} bytes",
                    text.len()
                ));
            }
        }
        Ok(AuditLogEntry {
            id: self
                .id
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
            timestamp: self
                .timestamp
                .unwrap_or_else(|| Utc::now().timestamp_millis()),
            action: self.action,
            user: self
                .user
                .filter(|u| !u.is_empty())
                .unwrap_or_else(|| DEFAULT_ACTOR.to_string()),
            details: self.details,
            environment: self.environment.unwrap_or(fallback_env),
            severity: self.severity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_data_is_serialized() {
        let json = serde_json::to_string(&ApiResponse::success(Value::Null)).expect("encode");
        assert_eq!(json, r#"{"success":true,"data":null}"#);
    }

    #[test]
    fn minimal_log_request_is_completed() {
        let request: AddLogRequest =
            serde_json::from_str(r#"{"action":"CONFIG_CHANGE","details":"x","severity":"warning"}"#)
                .expect("decode");
        let entry = request.into_entry(Environment::Staging).expect("entry");
        assert_eq!(entry.user, DEFAULT_ACTOR);
        assert_eq!(entry.environment, Environment::Staging);
        assert_eq!(entry.severity, Severity::Warning);
        assert!(!entry.id.is_empty());
    }

    #[test]
    fn oversized_details_are_rejected() {
        let request = AddLogRequest {
            id: None,
            timestamp: None,
            action: "X".to_string(),
            details: "d".repeat(MAX_AUDIT_TEXT_LENGTH + 1),
            severity: Severity::Info,
            user: None,
            environment: None,
        };
        assert!(request.into_entry(Environment::Prod).is_err());
    }

    #[test]
    fn unknown_actions_map_to_status() {
        assert_eq!(Action::parse(Some("dashboard")), Action::Status);
        assert_eq!(Action::parse(None), Action::Status);
        assert!(Action::parse(Some("save_storage")).is_mutating());
        assert!(!Action::parse(Some("login")).is_mutating());
    }
}
