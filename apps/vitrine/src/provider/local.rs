//! # Local Provider
//!
//! Data provider backed by the redb [`KvStore`] of this process. Every
//! getter falls back to the seed values when its key is missing, so the
//! local provider never reports an empty backend.

use super::{DataProvider, ProviderError};
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use vitrine_core::primitives::AUDIT_LOG_CAPACITY;
use vitrine_core::{
    AppConfig, AppContent, AuditLogEntry, CoreError, FeatureFlags, KvStore, ProviderKind,
    StorageKey, config_from_value, content_from_value, default_config, default_content,
    default_features, features_from_value,
};

/// Provider over the local key-value store.
#[derive(Debug, Clone)]
pub struct LocalProvider {
    store: Arc<KvStore>,
}

impl LocalProvider {
    #[must_use]
    pub fn new(store: Arc<KvStore>) -> Self {
        Self { store }
    }

    /// Provider over a volatile in-memory store.
    pub fn in_memory() -> Result<Self, ProviderError> {
        Ok(Self::new(Arc::new(KvStore::in_memory()?)))
    }

    /// The underlying store, shared with the preference channel.
    #[must_use]
    pub fn store(&self) -> &Arc<KvStore> {
        &self.store
    }

    /// Read a stored document through `decode`. Missing fields are filled by
    /// the decoder; only an undecodable document is an error.
    fn read<T>(
        &self,
        key: StorageKey,
        decode: fn(Value) -> Result<T, CoreError>,
    ) -> Result<Option<T>, ProviderError> {
        let Some(value) = self.store.get_document(key)? else {
            return Ok(None);
        };
        decode(value)
            .map(Some)
            .map_err(|e| ProviderError::BackendUnavailable(format!("corrupt {key} document: {e}")))
    }

    fn write<T: Serialize>(&self, key: StorageKey, value: &T) -> Result<(), ProviderError> {
        let value = serde_json::to_value(value)
            .map_err(|e| ProviderError::BackendUnavailable(e.to_string()))?;
        self.store.put_document(key, &value)?;
        Ok(())
    }

    fn seed<T: Serialize>(&self, key: StorageKey, value: &T) -> Result<(), ProviderError> {
        let value = serde_json::to_value(value)
            .map_err(|e| ProviderError::BackendUnavailable(e.to_string()))?;
        if self.store.put_document_if_absent(key, &value)? {
            tracing::info!(key = %key, "Seeded local document");
        }
        Ok(())
    }
}

#[async_trait]
impl DataProvider for LocalProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Local
    }

    async fn init(&self) -> Result<(), ProviderError> {
        self.seed(StorageKey::Config, &default_config())?;
        self.seed(StorageKey::Features, &default_features())?;
        self.seed(StorageKey::Content, &default_content())?;
        Ok(())
    }

    async fn get_config(&self) -> Result<Option<AppConfig>, ProviderError> {
        Ok(Some(
            self.read(StorageKey::Config, config_from_value)?
                .unwrap_or_else(default_config),
        ))
    }

    async fn save_config(&self, config: &AppConfig) -> Result<(), ProviderError> {
        self.write(StorageKey::Config, config)
    }

    async fn get_features(&self) -> Result<Option<FeatureFlags>, ProviderError> {
        Ok(Some(
            self.read(StorageKey::Features, features_from_value)?
                .unwrap_or(default_features()),
        ))
    }

    async fn save_features(&self, features: &FeatureFlags) -> Result<(), ProviderError> {
        self.write(StorageKey::Features, features)
    }

    async fn get_content(&self) -> Result<Option<AppContent>, ProviderError> {
        Ok(Some(
            self.read(StorageKey::Content, content_from_value)?
                .unwrap_or_else(default_content),
        ))
    }

    async fn save_content(&self, content: &AppContent) -> Result<(), ProviderError> {
        self.write(StorageKey::Content, content)
    }

    async fn get_logs(&self) -> Result<Vec<AuditLogEntry>, ProviderError> {
        Ok(self.store.recent_audit(AUDIT_LOG_CAPACITY)?)
    }

    async fn add_log(&self, entry: &AuditLogEntry) -> Result<(), ProviderError> {
        self.store.append_audit(entry)?;
        Ok(())
    }
}
