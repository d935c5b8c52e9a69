//! # Data Providers
//!
//! The [`DataProvider`] trait abstracts the backend that holds the
//! configuration, feature flags, content and audit trail. Two
//! implementations exist:
//!
//! - [`LocalProvider`]: the redb-backed store in this process
//! - [`RemoteProvider`]: the multiplexed HTTP endpoint served by `vitrine server`
//!
//! ## Empty vs. unavailable
//!
//! A getter returning `Ok(None)` means the backend was never seeded. That is
//! not an error and drives the seed path of the store. Any network or storage
//! failure is reported as [`ProviderError::BackendUnavailable`].

mod local;
mod remote;

pub use local::LocalProvider;
pub use remote::RemoteProvider;

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use vitrine_core::{
    AppConfig, AppContent, AuditLogEntry, CoreError, FeatureFlags, ProviderKind,
};

// =============================================================================
// ERRORS
// =============================================================================

/// Errors raised by a data provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The backend could not be reached or failed to complete the operation.
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The backend answered but refused the request (bad credentials, bad input).
    #[error("Request rejected: {0}")]
    Rejected(String),
}

impl From<CoreError> for ProviderError {
    fn from(e: CoreError) -> Self {
        ProviderError::BackendUnavailable(e.to_string())
    }
}

// =============================================================================
// DATA PROVIDER TRAIT
// =============================================================================

/// Whole-value persistence for the store's documents plus an append-only
/// audit trail.
#[async_trait]
pub trait DataProvider: Send + Sync + std::fmt::Debug {
    /// Which backend this is.
    fn kind(&self) -> ProviderKind;

    /// Prepare the backend. Idempotent; an empty backend is not an error.
    async fn init(&self) -> Result<(), ProviderError>;

    async fn get_config(&self) -> Result<Option<AppConfig>, ProviderError>;

    async fn save_config(&self, config: &AppConfig) -> Result<(), ProviderError>;

    async fn get_features(&self) -> Result<Option<FeatureFlags>, ProviderError>;

    async fn save_features(&self, features: &FeatureFlags) -> Result<(), ProviderError>;

    /// Read content with missing plan payment settings filled from the
    /// defaults. The backfill is never written back.
    async fn get_content(&self) -> Result<Option<AppContent>, ProviderError>;

    async fn save_content(&self, content: &AppContent) -> Result<(), ProviderError>;

    /// Audit entries, newest first, at most `AUDIT_LOG_CAPACITY`.
    async fn get_logs(&self) -> Result<Vec<AuditLogEntry>, ProviderError>;

    async fn add_log(&self, entry: &AuditLogEntry) -> Result<(), ProviderError>;
}

/// A provider shared between the store and its callers.
pub type SharedProvider = Arc<dyn DataProvider>;

// =============================================================================
// PROVIDER REGISTRY
// =============================================================================

/// The providers a store may switch between.
///
/// `local` is always present and doubles as the seed source for any other
/// backend. `remote` is present only when an endpoint is configured.
#[derive(Debug, Clone)]
pub struct Providers {
    pub local: SharedProvider,
    pub remote: Option<SharedProvider>,
}

impl Providers {
    #[must_use]
    pub fn new(local: SharedProvider, remote: Option<SharedProvider>) -> Self {
        Self { local, remote }
    }

    /// Provider for `kind`, if configured.
    #[must_use]
    pub fn get(&self, kind: ProviderKind) -> Option<SharedProvider> {
        match kind {
            ProviderKind::Local => Some(Arc::clone(&self.local)),
            ProviderKind::Remote => self.remote.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_without_remote() {
        let local: SharedProvider = Arc::new(LocalProvider::in_memory().expect("local"));
        let providers = Providers::new(local, None);
        assert!(providers.get(ProviderKind::Local).is_some());
        assert!(providers.get(ProviderKind::Remote).is_none());
    }

    #[test]
    fn core_errors_map_to_unavailable() {
        let err: ProviderError = CoreError::Storage("disk".to_string()).into();
        assert!(matches!(err, ProviderError::BackendUnavailable(_)));
    }
}
