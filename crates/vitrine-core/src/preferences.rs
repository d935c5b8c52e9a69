//! # Local Preferences
//!
//! Per-installation view settings stored next to the local documents but
//! outside the data provider contract: the display locale and the lite
//! (reduced effects) mode. Both are read once when a store is created and
//! written directly on change.

use crate::storage::KvStore;
use crate::types::{CoreError, Locale};
use std::sync::Arc;

const LOCALE_KEY: &str = "locale";
const LITE_MODE_KEY: &str = "lite_mode";

/// Typed access to the `preferences` table.
#[derive(Debug, Clone)]
pub struct Preferences {
    store: Arc<KvStore>,
}

impl Preferences {
    #[must_use]
    pub fn new(store: Arc<KvStore>) -> Self {
        Self { store }
    }

    /// Stored locale, or the default locale when none (or an unknown one) is stored.
    pub fn locale(&self) -> Result<Locale, CoreError> {
        Ok(self
            .store
            .get_preference(LOCALE_KEY)?
            .and_then(|raw| raw.parse().ok())
            .unwrap_or_default())
    }

    pub fn set_locale(&self, locale: Locale) -> Result<(), CoreError> {
        self.store.set_preference(LOCALE_KEY, locale.as_str())
    }

    /// Whether lite mode is on. Absent means off.
    pub fn lite_mode(&self) -> Result<bool, CoreError> {
        Ok(self
            .store
            .get_preference(LITE_MODE_KEY)?
            .is_some_and(|raw| raw == "true"))
    }

    pub fn set_lite_mode(&self, enabled: bool) -> Result<(), CoreError> {
        self.store
            .set_preference(LITE_MODE_KEY, if enabled { "true" } else { "false" })
    }
}
