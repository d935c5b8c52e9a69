//! # Core Store
//!
//! Owns the in-memory application state, boots it from the active
//! [`DataProvider`] and exposes the mutation actions.
//!
//! ## Boot
//!
//! ```text
//! Uninitialized ─► Booting(p) ─► [Seeding(p)] ─► Ready(p)
//!                      │
//!                      ▼
//!                  Failed(remote) ──BackendFailed──► Booting(local)
//! ```
//!
//! The three document reads run concurrently. If config or content is
//! missing, the local provider's values are written to the active provider
//! before the store becomes ready. A failing remote falls back to the local
//! provider; a failing local provider leaves the store uninitialized.
//!
//! ## Mutations
//!
//! Every action applies its change in memory first, then persists. A failed
//! save is logged and returned; the in-memory value is kept and no audit
//! entry is written. Audit entries are appended only after a successful
//! save, and an audit failure never fails the action that caused it.
//!
//! Persisting actions are serialized: each holds the write lock from its
//! in-memory change until its save returns, so the backend receives saves
//! in the same order memory applied them.
//!
//! ## Lifecycle
//!
//! `dispose()` stops the store from committing anything further, including
//! boots and saves already in flight.

mod commands;
mod state;

pub use commands::{ConfigUpdate, ContentUpdate};
pub use state::{BootEvent, BootPhase, CoreSnapshot};

use crate::provider::{ProviderError, Providers, SharedProvider};
use chrono::Utc;
use state::StoreState;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use thiserror::Error;
use tokio::sync::{Mutex, RwLock, watch};
use vitrine_core::primitives::DEFAULT_ACTOR;
use vitrine_core::types::audit::actions;
use vitrine_core::{
    AppConfig, AppContent, AuditLogEntry, CoreError, Environment, FeatureFlag, FeatureFlags,
    Locale, Preferences, ProviderKind, SecurityConfig, Severity, ThemePalette, default_config,
    default_content, default_features,
};

// =============================================================================
// ERRORS
// =============================================================================

/// Errors returned by store actions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The active provider failed.
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The flag can never be toggled.
    #[error("Feature '{0}' is locked")]
    FeatureLocked(FeatureFlag),

    /// The action needs a booted store.
    #[error("Store is not initialized")]
    NotInitialized,

    /// A handle outlived its store.
    #[error("Core store is not available")]
    ContextMissing,

    /// The store was disposed while the action was running.
    #[error("Store was disposed")]
    Disposed,

    /// The selected provider is not configured.
    #[error("Provider '{0}' is not configured")]
    ProviderNotConfigured(ProviderKind),

    /// The local preference channel failed.
    #[error("Preferences error: {0}")]
    Preferences(CoreError),
}

// =============================================================================
// OPTIONS
// =============================================================================

/// Everything a store needs at creation.
#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub providers: Providers,
    pub preferences: Preferences,
    /// Provider to boot against first.
    pub initial_provider: ProviderKind,
}

// =============================================================================
// CORE STORE
// =============================================================================

struct Inner {
    state: RwLock<StoreState>,
    provider: RwLock<SharedProvider>,
    providers: Providers,
    preferences: Preferences,
    alive: AtomicBool,
    updates: watch::Sender<CoreSnapshot>,
    /// Held by a persisting action from commit through save.
    writes: Mutex<()>,
}

/// The application state service. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct CoreStore {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for CoreStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreStore")
            .field("alive", &self.is_alive())
            .finish_non_exhaustive()
    }
}

impl CoreStore {
    /// Create an unbooted store. Reads the locale and lite-mode preferences.
    ///
    /// Falls back to the local provider when the requested one is not
    /// configured.
    pub fn new(options: StoreOptions) -> Result<Self, StoreError> {
        let StoreOptions {
            providers,
            preferences,
            initial_provider,
        } = options;

        let locale = preferences.locale().map_err(StoreError::Preferences)?;
        let lite_mode = preferences.lite_mode().map_err(StoreError::Preferences)?;

        let provider = providers.get(initial_provider).unwrap_or_else(|| {
            tracing::warn!(requested = %initial_provider, "Provider not configured, using local");
            Arc::clone(&providers.local)
        });
        let state = StoreState::new(locale, lite_mode, provider.kind());
        let (updates, _) = watch::channel(state.snapshot());

        Ok(Self {
            inner: Arc::new(Inner {
                state: RwLock::new(state),
                provider: RwLock::new(provider),
                providers,
                preferences,
                alive: AtomicBool::new(true),
                updates,
                writes: Mutex::new(()),
            }),
        })
    }

    /// Weak handle for the presentation layer.
    #[must_use]
    pub fn handle(&self) -> CoreHandle {
        CoreHandle {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Stop committing state. In-flight work finishes without effect.
    pub fn dispose(&self) {
        if self.inner.alive.swap(false, Ordering::SeqCst) {
            tracing::debug!("Core store disposed");
        }
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.inner.alive.load(Ordering::SeqCst)
    }

    fn ensure_alive(&self) -> Result<(), StoreError> {
        if self.is_alive() { Ok(()) } else { Err(StoreError::Disposed) }
    }

    // =========================================================================
    // READ SURFACE
    // =========================================================================

    pub async fn snapshot(&self) -> CoreSnapshot {
        self.inner.state.read().await.snapshot()
    }

    pub async fn config(&self) -> AppConfig {
        self.inner.state.read().await.config.clone()
    }

    pub async fn features(&self) -> FeatureFlags {
        self.inner.state.read().await.features
    }

    /// Localized content.
    pub async fn content(&self) -> AppContent {
        self.inner.state.read().await.content.clone()
    }

    /// Content as stored, without the locale overlay.
    pub async fn base_content(&self) -> AppContent {
        self.inner.state.read().await.base_content.clone()
    }

    pub async fn logs(&self) -> Vec<AuditLogEntry> {
        self.inner.state.read().await.logs.clone()
    }

    pub async fn locale(&self) -> Locale {
        self.inner.state.read().await.locale
    }

    pub async fn is_initialized(&self) -> bool {
        self.inner.state.read().await.initialized
    }

    pub async fn security(&self) -> SecurityConfig {
        self.inner.state.read().await.security.clone()
    }

    pub async fn theme(&self) -> ThemePalette {
        self.inner.state.read().await.theme
    }

    pub async fn lite_mode(&self) -> bool {
        self.inner.state.read().await.lite_mode
    }

    pub async fn phase(&self) -> BootPhase {
        self.inner.state.read().await.phase
    }

    pub async fn active_provider(&self) -> ProviderKind {
        self.inner.provider.read().await.kind()
    }

    /// Receive a new snapshot after every committed change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CoreSnapshot> {
        self.inner.updates.subscribe()
    }

    // =========================================================================
    // INTERNAL HELPERS
    // =========================================================================

    async fn current_provider(&self) -> SharedProvider {
        Arc::clone(&*self.inner.provider.read().await)
    }

    /// Apply `f` to the state and notify subscribers, unless disposed.
    async fn commit<R>(&self, f: impl FnOnce(&mut StoreState) -> R) -> Result<R, StoreError> {
        self.ensure_alive()?;
        let mut state = self.inner.state.write().await;
        let result = f(&mut state);
        self.inner.updates.send_replace(state.snapshot());
        Ok(result)
    }

    async fn set_phase(&self, phase: BootPhase) -> Result<(), StoreError> {
        self.commit(|s| s.phase = phase).await
    }

    async fn ensure_ready(&self) -> Result<(), StoreError> {
        self.ensure_alive()?;
        if self.inner.state.read().await.initialized {
            Ok(())
        } else {
            Err(StoreError::NotInitialized)
        }
    }

    /// Log a failed save and turn it into a store error.
    fn persist_failed(&self, what: &str, error: ProviderError) -> StoreError {
        tracing::error!(operation = what, error = %error, "Persisting change failed");
        StoreError::Provider(error)
    }

    /// Append an audit entry after a successful save. Failures are logged only.
    async fn audit(&self, action: &str, details: String, severity: Severity) {
        if let Err(e) = self.log_action(action, &details, severity).await {
            tracing::warn!(action, error = %e, "Audit entry was not recorded");
        }
    }

    // =========================================================================
    // BOOT
    // =========================================================================

    /// Boot against the active provider, falling back to local on failure.
    pub async fn boot(&self) -> Result<(), StoreError> {
        let mut provider = self.current_provider().await;
        loop {
            let kind = provider.kind();
            let error = match self.boot_with(&provider).await {
                Ok(()) => return Ok(()),
                Err(StoreError::Provider(e)) => e,
                Err(other) => return Err(other),
            };

            tracing::error!(provider = %kind, error = %error, "Boot failed");
            let failed = BootPhase::Booting(kind).on(BootEvent::BackendFailed);
            let failed = failed.unwrap_or(BootPhase::Failed(kind));
            self.set_phase(failed).await?;

            match failed.on(BootEvent::BackendFailed) {
                Some(BootPhase::Booting(next)) => {
                    tracing::warn!(from = %kind, to = %next, "Falling back to local provider");
                    provider = Arc::clone(&self.inner.providers.local);
                    *self.inner.provider.write().await = Arc::clone(&provider);
                    self.commit(|s| s.active_provider = next).await?;
                }
                _ => return Err(StoreError::Provider(error)),
            }
        }
    }

    async fn boot_with(&self, provider: &SharedProvider) -> Result<(), StoreError> {
        let kind = provider.kind();
        self.set_phase(BootPhase::Booting(kind)).await?;
        provider.init().await?;

        let (config, features, content) = tokio::try_join!(
            provider.get_config(),
            provider.get_features(),
            provider.get_content()
        )?;

        let (config, features, content) = match (config, content) {
            (Some(config), Some(content)) => {
                let features = match features {
                    Some(features) => features,
                    None => {
                        let features = self.seed_features().await?;
                        provider.save_features(&features).await?;
                        features
                    }
                };
                (config, features, content)
            }
            _ => {
                self.set_phase(BootPhase::Seeding(kind)).await?;
                tracing::info!(provider = %kind, "Backend empty, seeding from local defaults");
                self.seed(provider).await?
            }
        };

        let logs = provider.get_logs().await?;

        self.commit(|s| {
            s.theme = ThemePalette::for_mode(config.theme_mode);
            s.config = config;
            s.features = features;
            s.set_base_content(content);
            s.logs = logs;
            s.security = SecurityConfig::standard();
            s.initialized = true;
            s.phase = BootPhase::Ready(kind);
            s.active_provider = kind;
        })
        .await?;

        tracing::info!(provider = %kind, "Core store ready");
        Ok(())
    }

    /// Copy the local provider's documents into `provider`.
    async fn seed(
        &self,
        provider: &SharedProvider,
    ) -> Result<(AppConfig, FeatureFlags, AppContent), StoreError> {
        let local = &self.inner.providers.local;
        let (config, features, content) =
            tokio::try_join!(local.get_config(), local.get_features(), local.get_content())?;
        let config = config.unwrap_or_else(default_config);
        let features = features.unwrap_or(default_features());
        let content = content.unwrap_or_else(default_content);

        provider.save_config(&config).await?;
        provider.save_features(&features).await?;
        provider.save_content(&content).await?;
        Ok((config, features, content))
    }

    async fn seed_features(&self) -> Result<FeatureFlags, StoreError> {
        Ok(self
            .inner
            .providers
            .local
            .get_features()
            .await?
            .unwrap_or(default_features()))
    }

    // =========================================================================
    // ACTIONS
    // =========================================================================

    /// Change one configuration field.
    pub async fn update_config(&self, update: ConfigUpdate) -> Result<(), StoreError> {
        self.ensure_ready().await?;
        let _write = self.inner.writes.lock().await;
        let details = update.describe();
        let config = self
            .commit(|s| {
                update.apply(&mut s.config);
                s.theme = ThemePalette::for_mode(s.config.theme_mode);
                s.config.clone()
            })
            .await?;

        let provider = self.current_provider().await;
        provider
            .save_config(&config)
            .await
            .map_err(|e| self.persist_failed("save_config", e))?;
        self.audit(actions::CONFIG_CHANGE, details, Severity::Info).await;
        Ok(())
    }

    /// Flip one feature flag. Locked flags are refused.
    pub async fn toggle_feature(&self, flag: FeatureFlag) -> Result<(), StoreError> {
        if flag.is_locked() {
            return Err(StoreError::FeatureLocked(flag));
        }
        self.ensure_ready().await?;
        let _write = self.inner.writes.lock().await;
        let features = self
            .commit(|s| {
                s.features = s.features.toggled(flag);
                s.features
            })
            .await?;

        let provider = self.current_provider().await;
        provider
            .save_features(&features)
            .await
            .map_err(|e| self.persist_failed("save_features", e))?;
        self.audit(actions::FEATURE_TOGGLE, format!("Toggled {flag}"), Severity::Info)
            .await;
        Ok(())
    }

    /// Replace a content section or upsert a catalog entry.
    pub async fn update_content(&self, update: ContentUpdate) -> Result<(), StoreError> {
        self.ensure_ready().await?;
        let _write = self.inner.writes.lock().await;
        let details = update.describe();
        let content = self
            .commit(|s| {
                let mut content = s.base_content.clone();
                update.apply(&mut content);
                s.set_base_content(content);
                s.base_content.clone()
            })
            .await?;

        let provider = self.current_provider().await;
        provider
            .save_content(&content)
            .await
            .map_err(|e| self.persist_failed("save_content", e))?;
        self.audit(actions::CONTENT_UPDATE, details, Severity::Info).await;
        Ok(())
    }

    /// Change the deployment environment recorded on audit entries.
    pub async fn set_environment(&self, environment: Environment) -> Result<(), StoreError> {
        self.ensure_ready().await?;
        let _write = self.inner.writes.lock().await;
        let config = self
            .commit(|s| {
                s.config.environment = environment;
                s.config.clone()
            })
            .await?;

        let provider = self.current_provider().await;
        provider
            .save_config(&config)
            .await
            .map_err(|e| self.persist_failed("save_config", e))?;
        self.audit(
            actions::ENV_CHANGE,
            format!("Environment set to {environment}"),
            Severity::Warning,
        )
        .await;
        Ok(())
    }

    /// Switch the display locale. Content is re-localized from the stored
    /// base; nothing goes through the provider.
    pub async fn set_locale(&self, locale: Locale) -> Result<(), StoreError> {
        self.commit(|s| {
            s.locale = locale;
            let base = s.base_content.clone();
            s.set_base_content(base);
        })
        .await?;
        self.inner
            .preferences
            .set_locale(locale)
            .map_err(StoreError::Preferences)
    }

    /// Toggle the reduced-effects preference.
    pub async fn set_lite_mode(&self, enabled: bool) -> Result<(), StoreError> {
        self.commit(|s| s.lite_mode = enabled).await?;
        self.inner
            .preferences
            .set_lite_mode(enabled)
            .map_err(StoreError::Preferences)
    }

    /// Append an audit entry and refresh the log list.
    pub async fn log_action(
        &self,
        action: &str,
        details: &str,
        severity: Severity,
    ) -> Result<(), StoreError> {
        self.ensure_alive()?;
        let now = Utc::now();
        let entry = AuditLogEntry {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp: now.timestamp_millis(),
            action: action.to_string(),
            user: DEFAULT_ACTOR.to_string(),
            details: details.to_string(),
            environment: self.inner.state.read().await.config.environment,
            severity,
        };

        let provider = self.current_provider().await;
        provider.add_log(&entry).await?;
        let logs = provider.get_logs().await?;
        self.commit(|s| s.logs = logs).await
    }

    /// Make `kind` the active provider and boot against it.
    pub async fn set_provider(&self, kind: ProviderKind) -> Result<(), StoreError> {
        self.ensure_alive()?;
        let provider = self
            .inner
            .providers
            .get(kind)
            .ok_or(StoreError::ProviderNotConfigured(kind))?;

        let current = self.inner.state.read().await.phase;
        if let Some(phase) = current.on(BootEvent::ProviderSelected(kind)) {
            self.set_phase(phase).await?;
        }
        tracing::info!(provider = %kind, "Switching provider");
        *self.inner.provider.write().await = provider;
        self.commit(|s| s.active_provider = kind).await?;
        self.boot().await
    }
}

// =============================================================================
// HANDLE
// =============================================================================

/// Non-owning reference to a store.
///
/// Every access fails with [`StoreError::ContextMissing`] once the store has
/// been dropped or disposed.
#[derive(Debug, Clone)]
pub struct CoreHandle {
    inner: Weak<Inner>,
}

impl CoreHandle {
    /// The store behind this handle.
    pub fn store(&self) -> Result<CoreStore, StoreError> {
        let inner = self.inner.upgrade().ok_or(StoreError::ContextMissing)?;
        let store = CoreStore { inner };
        if store.is_alive() {
            Ok(store)
        } else {
            Err(StoreError::ContextMissing)
        }
    }

    pub async fn snapshot(&self) -> Result<CoreSnapshot, StoreError> {
        Ok(self.store()?.snapshot().await)
    }
}
