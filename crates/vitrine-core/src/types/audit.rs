//! # Audit Records
//!
//! Append-only record of administrative actions. Entries are immutable once
//! written; the store keeps only the `AUDIT_LOG_CAPACITY` most recent.

use super::Environment;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity attached to an audit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Warning,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Critical => "critical",
        })
    }
}

/// One audit entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub action: String,
    pub user: String,
    pub details: String,
    pub environment: Environment,
    pub severity: Severity,
}

/// Well-known action tags written by the store.
pub mod actions {
    pub const CONFIG_CHANGE: &str = "CONFIG_CHANGE";
    pub const FEATURE_TOGGLE: &str = "FEATURE_TOGGLE";
    pub const CONTENT_UPDATE: &str = "CONTENT_UPDATE";
    pub const ENV_CHANGE: &str = "ENV_CHANGE";
}
