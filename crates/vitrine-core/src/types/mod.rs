//! # Core Type Definitions
//!
//! This module contains the records shared by every Vitrine component:
//! - Process-wide configuration (`AppConfig`) and its closed enums
//! - Feature switches (`FeatureFlags`, `FeatureFlag`)
//! - Locales (`Locale`)
//! - The static role table (`SecurityConfig`)
//! - Member panel payloads (`MemberPanel`)
//! - Error types (`CoreError`)
//!
//! Content records live in [`content`], audit records in [`audit`].
//!
//! All records serialize with `camelCase` field names so that payloads stored
//! by the remote endpoint and by the local store are interchangeable.

pub mod audit;
pub mod content;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// CONFIGURATION ENUMS
// =============================================================================

/// Page layout used to render the pricing section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PricingMode {
    #[default]
    #[serde(rename = "LayoutPRINCIPAL")]
    Principal,
    #[serde(rename = "LayoutCOMPACT")]
    Compact,
    #[serde(rename = "LayoutANCHOR")]
    Anchor,
}

/// Visual theme. Each mode maps to a brand colour (see `theme`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Gold,
    Cyber,
    Matrix,
}

/// Which data provider backs the store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Local,
    Remote,
}

/// Deployment environment, recorded on every audit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Staging,
    #[default]
    Prod,
}

macro_rules! impl_str_enum {
    ($ty:ty, $what:literal, { $($variant:path => $name:literal),+ $(,)? }) => {
        impl $ty {
            /// Wire name of this value.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $($variant => $name,)+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok($variant),)+
                    other => Err(CoreError::InvalidValue(format!(
                        "unknown {} '{}'",
                        $what, other
                    ))),
                }
            }
        }
    };
}

impl_str_enum!(PricingMode, "pricing mode", {
    PricingMode::Principal => "LayoutPRINCIPAL",
    PricingMode::Compact => "LayoutCOMPACT",
    PricingMode::Anchor => "LayoutANCHOR",
});

impl_str_enum!(ThemeMode, "theme mode", {
    ThemeMode::Gold => "gold",
    ThemeMode::Cyber => "cyber",
    ThemeMode::Matrix => "matrix",
});

impl_str_enum!(ProviderKind, "provider", {
    ProviderKind::Local => "local",
    ProviderKind::Remote => "remote",
});

impl_str_enum!(Environment, "environment", {
    Environment::Dev => "dev",
    Environment::Staging => "staging",
    Environment::Prod => "prod",
});

// =============================================================================
// APP CONFIG
// =============================================================================

/// Process-wide configuration. Persisted as a whole on every change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub pricing_mode: PricingMode,
    pub theme_mode: ThemeMode,
    pub provider: ProviderKind,
    pub environment: Environment,
    pub maintenance_mode: bool,
    pub version: String,
    /// Reference price shown crossed out next to the campaign price.
    pub anchor_price: f64,
}

// =============================================================================
// FEATURE FLAGS
// =============================================================================

/// Named boolean switches controlling optional page behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureFlags {
    pub sales_toast: bool,
    pub exit_popup: bool,
    pub floating_chat: bool,
    pub top_banner: bool,
    pub emulator: bool,
    pub campaign_active: bool,
    /// Locked off. `FeatureFlag::AiEnabled.is_locked()` is always true.
    pub ai_enabled: bool,
    pub global_notes: bool,
}

/// Key of a single switch in [`FeatureFlags`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FeatureFlag {
    SalesToast,
    ExitPopup,
    FloatingChat,
    TopBanner,
    Emulator,
    CampaignActive,
    AiEnabled,
    GlobalNotes,
}

impl FeatureFlag {
    /// Every flag, in declaration order.
    pub const ALL: [FeatureFlag; 8] = [
        FeatureFlag::SalesToast,
        FeatureFlag::ExitPopup,
        FeatureFlag::FloatingChat,
        FeatureFlag::TopBanner,
        FeatureFlag::Emulator,
        FeatureFlag::CampaignActive,
        FeatureFlag::AiEnabled,
        FeatureFlag::GlobalNotes,
    ];

    /// Locked flags can never be toggled at runtime.
    #[must_use]
    pub const fn is_locked(self) -> bool {
        matches!(self, FeatureFlag::AiEnabled)
    }
}

impl_str_enum!(FeatureFlag, "feature flag", {
    FeatureFlag::SalesToast => "salesToast",
    FeatureFlag::ExitPopup => "exitPopup",
    FeatureFlag::FloatingChat => "floatingChat",
    FeatureFlag::TopBanner => "topBanner",
    FeatureFlag::Emulator => "emulator",
    FeatureFlag::CampaignActive => "campaignActive",
    FeatureFlag::AiEnabled => "aiEnabled",
    FeatureFlag::GlobalNotes => "globalNotes",
});

impl FeatureFlags {
    /// Read a single switch.
    #[must_use]
    pub const fn get(&self, flag: FeatureFlag) -> bool {
        match flag {
            FeatureFlag::SalesToast => self.sales_toast,
            FeatureFlag::ExitPopup => self.exit_popup,
            FeatureFlag::FloatingChat => self.floating_chat,
            FeatureFlag::TopBanner => self.top_banner,
            FeatureFlag::Emulator => self.emulator,
            FeatureFlag::CampaignActive => self.campaign_active,
            FeatureFlag::AiEnabled => self.ai_enabled,
            FeatureFlag::GlobalNotes => self.global_notes,
        }
    }

    /// Return a copy with `flag` set to `value`.
    #[must_use]
    pub const fn with(mut self, flag: FeatureFlag, value: bool) -> Self {
        match flag {
            FeatureFlag::SalesToast => self.sales_toast = value,
            FeatureFlag::ExitPopup => self.exit_popup = value,
            FeatureFlag::FloatingChat => self.floating_chat = value,
            FeatureFlag::TopBanner => self.top_banner = value,
            FeatureFlag::Emulator => self.emulator = value,
            FeatureFlag::CampaignActive => self.campaign_active = value,
            FeatureFlag::AiEnabled => self.ai_enabled = value,
            FeatureFlag::GlobalNotes => self.global_notes = value,
        }
        self
    }

    /// Return a copy with `flag` inverted.
    #[must_use]
    pub const fn toggled(self, flag: FeatureFlag) -> Self {
        let current = self.get(flag);
        self.with(flag, !current)
    }
}

// =============================================================================
// LOCALE
// =============================================================================

/// Supported display languages.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Pt,
    En,
    Es,
}

impl Locale {
    pub const ALL: [Locale; 3] = [Locale::Pt, Locale::En, Locale::Es];
}

impl_str_enum!(Locale, "locale", {
    Locale::Pt => "pt",
    Locale::En => "en",
    Locale::Es => "es",
});

// =============================================================================
// SECURITY TABLE
// =============================================================================

/// Administrative role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    SuperAdmin,
    Admin,
    Editor,
    Viewer,
}

/// Capability granted to a role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    All,
    Configure,
    ManageUsers,
    EditContent,
    ReadOnly,
}

/// Static role table assembled at boot. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SecurityConfig {
    pub active_roles: Vec<Role>,
    pub permissions: BTreeMap<Role, Vec<Permission>>,
}

impl SecurityConfig {
    /// The fixed role table installed once the store is ready.
    #[must_use]
    pub fn standard() -> Self {
        let permissions = BTreeMap::from([
            (Role::SuperAdmin, vec![Permission::All]),
            (Role::Admin, vec![Permission::Configure, Permission::ManageUsers]),
            (Role::Editor, vec![Permission::EditContent]),
            (Role::Viewer, vec![Permission::ReadOnly]),
        ]);
        Self {
            active_roles: vec![Role::SuperAdmin, Role::Admin, Role::Editor, Role::Viewer],
            permissions,
        }
    }

    /// Whether `role` holds `permission` (directly or through `All`).
    #[must_use]
    pub fn allows(&self, role: Role, permission: Permission) -> bool {
        self.permissions
            .get(&role)
            .is_some_and(|granted| granted.contains(&Permission::All) || granted.contains(&permission))
    }
}

// =============================================================================
// MEMBER PANEL
// =============================================================================

/// Member profile returned by a successful panel login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberProfile {
    pub email: String,
    pub plan: String,
    pub balance: f64,
}

/// Availability of a tool listed in the member panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ToolStatus {
    Stable,
    Updating,
    Offline,
}

/// A tool listed in the member panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelTool {
    pub id: String,
    pub name: String,
    pub status: ToolStatus,
}

/// Payload of a successful panel login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberPanel {
    pub user: MemberProfile,
    pub tools: Vec<PanelTool>,
}

/// Stored member account. The password is kept only as an Argon2 PHC hash.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberRecord {
    pub email: String,
    pub password_hash: String,
    pub plan: String,
    pub balance: f64,
}

impl MemberRecord {
    /// Public part of the record.
    #[must_use]
    pub fn profile(&self) -> MemberProfile {
        MemberProfile {
            email: self.email.clone(),
            plan: self.plan.clone(),
            balance: self.balance,
        }
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors raised by the Vitrine core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The underlying storage engine failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// A stored value could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A storage key outside the fixed key set was requested.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// A textual value did not name any known variant.
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}
