//! # Storage Module
//!
//! The redb-backed key-value store and the fixed set of document keys.

mod redb_store;

pub use redb_store::KvStore;

use crate::types::CoreError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Key of a whole-value document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKey {
    Config,
    Features,
    Content,
}

impl StorageKey {
    pub const ALL: [StorageKey; 3] = [StorageKey::Config, StorageKey::Features, StorageKey::Content];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            StorageKey::Config => "config",
            StorageKey::Features => "features",
            StorageKey::Content => "content",
        }
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "config" => Ok(StorageKey::Config),
            "features" => Ok(StorageKey::Features),
            "content" => Ok(StorageKey::Content),
            other => Err(CoreError::InvalidKey(other.to_string())),
        }
    }
}
