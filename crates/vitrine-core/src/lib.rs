//! # vitrine-core
//!
//! The synchronous content and configuration model for Vitrine.
//!
//! This crate holds everything that does not need a runtime or a network:
//! - the data model (configuration, feature flags, content, audit entries)
//! - the seed values and the payment-settings backfill
//! - the localization overlay and its translation tables
//! - the redb-backed key-value store used by the local provider and the server
//! - the local preference side channel
//!
//! ## Architectural Constraints
//!
//! - No async, no network dependencies (pure Rust)
//! - Overlays and merges never mutate their input
//! - Locales, feature flags and storage keys are closed sets

// =============================================================================
// MODULES
// =============================================================================

pub mod defaults;
pub mod localize;
pub mod preferences;
pub mod primitives;
pub mod storage;
pub mod theme;
pub mod translations;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types
// =============================================================================

pub use types::audit::{AuditLogEntry, Severity};
pub use types::content::{AppContent, PaymentSettings, Plan, PlanKind, Product};
pub use types::{
    AppConfig, CoreError, Environment, FeatureFlag, FeatureFlags, Locale, MemberPanel,
    MemberProfile, MemberRecord, PanelTool, PricingMode, ProviderKind, SecurityConfig, ThemeMode,
    ToolStatus,
};

// =============================================================================
// RE-EXPORTS: Model Operations
// =============================================================================

pub use defaults::{
    backfill_content, config_from_value, content_from_value, default_config, default_content,
    default_features, default_payment_settings, features_from_value,
};
pub use localize::localize;
pub use preferences::Preferences;
pub use storage::{KvStore, StorageKey};
pub use theme::ThemePalette;
