//! # Store State
//!
//! The in-memory state owned by `CoreStore`, the read-only snapshot handed to
//! the presentation layer, and the boot state machine.

use serde::{Deserialize, Serialize};
use vitrine_core::{
    AppConfig, AppContent, AuditLogEntry, FeatureFlags, Locale, ProviderKind, SecurityConfig,
    ThemePalette, default_config, default_content, default_features, localize,
};

// =============================================================================
// BOOT STATE MACHINE
// =============================================================================

/// Progress of the boot sequence against one provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "phase", content = "provider", rename_all = "snake_case")]
pub enum BootPhase {
    #[default]
    Uninitialized,
    Booting(ProviderKind),
    Seeding(ProviderKind),
    Ready(ProviderKind),
    Failed(ProviderKind),
}

/// Events that move the boot state machine outside the happy path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootEvent {
    /// The provider being booted raised `BackendUnavailable`.
    BackendFailed,
    /// The caller selected a different provider.
    ProviderSelected(ProviderKind),
}

impl BootPhase {
    /// Next phase after `event`, or `None` when the event leaves nothing to try.
    #[must_use]
    pub const fn on(self, event: BootEvent) -> Option<BootPhase> {
        match (self, event) {
            (BootPhase::Failed(ProviderKind::Remote), BootEvent::BackendFailed) => {
                Some(BootPhase::Booting(ProviderKind::Local))
            }
            (
                BootPhase::Booting(kind) | BootPhase::Seeding(kind),
                BootEvent::BackendFailed,
            ) => Some(BootPhase::Failed(kind)),
            (_, BootEvent::BackendFailed) => None,
            (_, BootEvent::ProviderSelected(kind)) => Some(BootPhase::Booting(kind)),
        }
    }

    /// Provider this phase refers to.
    #[must_use]
    pub const fn provider(self) -> Option<ProviderKind> {
        match self {
            BootPhase::Uninitialized => None,
            BootPhase::Booting(kind)
            | BootPhase::Seeding(kind)
            | BootPhase::Ready(kind)
            | BootPhase::Failed(kind) => Some(kind),
        }
    }
}

// =============================================================================
// STATE
// =============================================================================

/// Mutable state behind the store lock.
#[derive(Debug, Clone)]
pub(crate) struct StoreState {
    pub config: AppConfig,
    pub features: FeatureFlags,
    /// Content as stored, without the locale overlay.
    pub base_content: AppContent,
    /// `base_content` seen through `locale`.
    pub content: AppContent,
    pub logs: Vec<AuditLogEntry>,
    pub locale: Locale,
    pub lite_mode: bool,
    pub security: SecurityConfig,
    pub theme: ThemePalette,
    pub initialized: bool,
    pub phase: BootPhase,
    pub active_provider: ProviderKind,
}

impl StoreState {
    pub fn new(locale: Locale, lite_mode: bool, active_provider: ProviderKind) -> Self {
        let config = default_config();
        let base_content = default_content();
        Self {
            theme: ThemePalette::for_mode(config.theme_mode),
            content: localize(&base_content, locale),
            config,
            features: default_features(),
            base_content,
            logs: Vec::new(),
            locale,
            lite_mode,
            security: SecurityConfig::default(),
            initialized: false,
            phase: BootPhase::Uninitialized,
            active_provider,
        }
    }

    /// Replace the base content and refresh the localized view.
    pub fn set_base_content(&mut self, content: AppContent) {
        self.content = localize(&content, self.locale);
        self.base_content = content;
    }

    pub fn snapshot(&self) -> CoreSnapshot {
        CoreSnapshot {
            config: self.config.clone(),
            features: self.features,
            content: self.content.clone(),
            logs: self.logs.clone(),
            locale: self.locale,
            is_initialized: self.initialized,
            security: self.security.clone(),
            theme: self.theme,
            lite_mode: self.lite_mode,
            phase: self.phase,
            active_provider: self.active_provider,
        }
    }
}

// =============================================================================
// SNAPSHOT
// =============================================================================

/// Read-only view of the store consumed by the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoreSnapshot {
    pub config: AppConfig,
    pub features: FeatureFlags,
    /// Localized content.
    pub content: AppContent,
    pub logs: Vec<AuditLogEntry>,
    pub locale: Locale,
    pub is_initialized: bool,
    pub security: SecurityConfig,
    pub theme: ThemePalette,
    pub lite_mode: bool,
    pub phase: BootPhase,
    pub active_provider: ProviderKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_failure_falls_back_to_local() {
        let failed = BootPhase::Booting(ProviderKind::Remote).on(BootEvent::BackendFailed);
        assert_eq!(failed, Some(BootPhase::Failed(ProviderKind::Remote)));
        assert_eq!(
            BootPhase::Failed(ProviderKind::Remote).on(BootEvent::BackendFailed),
            Some(BootPhase::Booting(ProviderKind::Local))
        );
    }

    #[test]
    fn local_failure_is_terminal() {
        assert_eq!(BootPhase::Failed(ProviderKind::Local).on(BootEvent::BackendFailed), None);
        assert_eq!(BootPhase::Ready(ProviderKind::Local).on(BootEvent::BackendFailed), None);
    }

    #[test]
    fn selecting_a_provider_restarts_boot() {
        let next = BootPhase::Ready(ProviderKind::Local)
            .on(BootEvent::ProviderSelected(ProviderKind::Remote));
        assert_eq!(next, Some(BootPhase::Booting(ProviderKind::Remote)));
    }

    #[test]
    fn phase_reports_its_provider() {
        assert_eq!(BootPhase::Uninitialized.provider(), None);
        assert_eq!(
            BootPhase::Seeding(ProviderKind::Remote).provider(),
            Some(ProviderKind::Remote)
        );
    }

    #[test]
    fn fresh_state_is_not_initialized() {
        let state = StoreState::new(Locale::En, false, ProviderKind::Local);
        let snapshot = state.snapshot();
        assert!(!snapshot.is_initialized);
        assert_eq!(snapshot.phase, BootPhase::Uninitialized);
        assert_eq!(snapshot.content.product("tool_ghost").map(|p| p.name.as_str()), Some("Ghost Mode"));
    }

    #[test]
    fn phase_serializes_with_provider() {
        let json = serde_json::to_value(BootPhase::Ready(ProviderKind::Remote)).expect("encode");
        assert_eq!(json, serde_json::json!({"phase": "ready", "provider": "remote"}));
    }
}
