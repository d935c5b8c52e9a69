//! # redb-backed Key-Value Store
//!
//! Persistent storage for documents, the audit ring, local preferences and
//! member records, built on the redb embedded database.
//!
//! Documents (config, flags, content) are stored whole as JSON text under a
//! fixed [`StorageKey`]. Every write replaces the previous value: last write
//! wins, no versioning.
//!
//! The audit ring is the single authority for the `AUDIT_LOG_CAPACITY` cap.
//! Appends and evictions happen in the same write transaction, so a reader
//! never observes more than the cap.

use super::StorageKey;
use crate::primitives::AUDIT_LOG_CAPACITY;
use crate::types::audit::AuditLogEntry;
use crate::types::{CoreError, MemberRecord};
use redb::backends::InMemoryBackend;
use redb::{Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition};
use serde_json::Value;
use std::fmt::Display;
use std::path::Path;

/// Table for documents: storage key -> JSON text
const DOCUMENTS: TableDefinition<&str, &str> = TableDefinition::new("documents");

/// Table for the audit ring: append sequence -> JSON entry
const AUDIT: TableDefinition<u64, &str> = TableDefinition::new("audit");

/// Table for local preferences: name -> value
const PREFERENCES: TableDefinition<&str, &str> = TableDefinition::new("preferences");

/// Table for member accounts: lowercase email -> JSON record
const MEMBERS: TableDefinition<&str, &str> = TableDefinition::new("members");

/// Table for metadata: key string -> value u64
const METADATA: TableDefinition<&str, u64> = TableDefinition::new("metadata");

const NEXT_AUDIT_SEQ: &str = "next_audit_seq";

type TextTable = TableDefinition<'static, &'static str, &'static str>;

fn storage_err(e: impl Display) -> CoreError {
    CoreError::Storage(e.to_string())
}

fn serialization_err(e: impl Display) -> CoreError {
    CoreError::Serialization(e.to_string())
}

/// A disk-backed (or in-memory) key-value store using redb.
pub struct KvStore {
    db: Database,
}

impl std::fmt::Debug for KvStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KvStore").finish_non_exhaustive()
    }
}

impl KvStore {
    /// Open or create a store at the given path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let db = Database::create(path.as_ref()).map_err(storage_err)?;
        Self::with_database(db)
    }

    /// Create a volatile store that lives only as long as this value.
    pub fn in_memory() -> Result<Self, CoreError> {
        let db = Database::builder()
            .create_with_backend(InMemoryBackend::new())
            .map_err(storage_err)?;
        Self::with_database(db)
    }

    fn with_database(db: Database) -> Result<Self, CoreError> {
        // Initialize tables if they don't exist
        let write_txn = db.begin_write().map_err(storage_err)?;
        write_txn.open_table(DOCUMENTS).map_err(storage_err)?;
        write_txn.open_table(AUDIT).map_err(storage_err)?;
        write_txn.open_table(PREFERENCES).map_err(storage_err)?;
        write_txn.open_table(MEMBERS).map_err(storage_err)?;
        write_txn.open_table(METADATA).map_err(storage_err)?;
        write_txn.commit().map_err(storage_err)?;
        Ok(Self { db })
    }

    // =========================================================================
    // DOCUMENTS
    // =========================================================================

    /// Read a document. `None` means the key was never written.
    pub fn get_document(&self, key: StorageKey) -> Result<Option<Value>, CoreError> {
        let Some(text) = self.get_text(DOCUMENTS, key.as_str())? else {
            return Ok(None);
        };
        serde_json::from_str(&text).map(Some).map_err(serialization_err)
    }

    /// Replace a document.
    pub fn put_document(&self, key: StorageKey, value: &Value) -> Result<(), CoreError> {
        let text = serde_json::to_string(value).map_err(serialization_err)?;
        self.put_text(DOCUMENTS, key.as_str(), &text)
    }

    /// Write a document only if the key is absent. Returns whether it wrote.
    pub fn put_document_if_absent(&self, key: StorageKey, value: &Value) -> Result<bool, CoreError> {
        let text = serde_json::to_string(value).map_err(serialization_err)?;
        let write_txn = self.db.begin_write().map_err(storage_err)?;
        let written = {
            let mut table = write_txn.open_table(DOCUMENTS).map_err(storage_err)?;
            if table.get(key.as_str()).map_err(storage_err)?.is_some() {
                false
            } else {
                table.insert(key.as_str(), text.as_str()).map_err(storage_err)?;
                true
            }
        };
        write_txn.commit().map_err(storage_err)?;
        Ok(written)
    }

    // =========================================================================
    // AUDIT RING
    // =========================================================================

    /// Append an entry and evict the oldest entries beyond the capacity.
    pub fn append_audit(&self, entry: &AuditLogEntry) -> Result<(), CoreError> {
        let text = serde_json::to_string(entry).map_err(serialization_err)?;
        let write_txn = self.db.begin_write().map_err(storage_err)?;
        {
            let mut meta = write_txn.open_table(METADATA).map_err(storage_err)?;
            let seq = meta
                .get(NEXT_AUDIT_SEQ)
                .map_err(storage_err)?
                .map(|v| v.value())
                .unwrap_or(0);
            meta.insert(NEXT_AUDIT_SEQ, seq.saturating_add(1))
                .map_err(storage_err)?;

            let mut audit = write_txn.open_table(AUDIT).map_err(storage_err)?;
            audit.insert(seq, text.as_str()).map_err(storage_err)?;
            while audit.len().map_err(storage_err)? > AUDIT_LOG_CAPACITY as u64 {
                audit.pop_first().map_err(storage_err)?;
            }
        }
        write_txn.commit().map_err(storage_err)?;
        Ok(())
    }

    /// Most recent audit entries, newest first, at most `limit`.
    pub fn recent_audit(&self, limit: usize) -> Result<Vec<AuditLogEntry>, CoreError> {
        let read_txn = self.db.begin_read().map_err(storage_err)?;
        let table = read_txn.open_table(AUDIT).map_err(storage_err)?;

        let mut entries = Vec::new();
        for item in table.iter().map_err(storage_err)?.rev().take(limit) {
            let (_, value) = item.map_err(storage_err)?;
            let entry: AuditLogEntry =
                serde_json::from_str(value.value()).map_err(serialization_err)?;
            entries.push(entry);
        }
        Ok(entries)
    }

    /// Number of audit entries currently kept.
    pub fn audit_len(&self) -> Result<usize, CoreError> {
        let read_txn = self.db.begin_read().map_err(storage_err)?;
        let table = read_txn.open_table(AUDIT).map_err(storage_err)?;
        Ok(table.len().map_err(storage_err)? as usize)
    }

    // =========================================================================
    // PREFERENCES
    // =========================================================================

    pub fn get_preference(&self, name: &str) -> Result<Option<String>, CoreError> {
        self.get_text(PREFERENCES, name)
    }

    pub fn set_preference(&self, name: &str, value: &str) -> Result<(), CoreError> {
        self.put_text(PREFERENCES, name, value)
    }

    // =========================================================================
    // MEMBERS
    // =========================================================================

    /// Look up a member by email (case-insensitive).
    pub fn get_member(&self, email: &str) -> Result<Option<MemberRecord>, CoreError> {
        let key = email.trim().to_lowercase();
        let Some(text) = self.get_text(MEMBERS, &key)? else {
            return Ok(None);
        };
        serde_json::from_str(&text).map(Some).map_err(serialization_err)
    }

    /// Insert or replace a member record.
    pub fn put_member(&self, member: &MemberRecord) -> Result<(), CoreError> {
        let key = member.email.trim().to_lowercase();
        let text = serde_json::to_string(member).map_err(serialization_err)?;
        self.put_text(MEMBERS, &key, &text)
    }

    // =========================================================================
    // RAW TEXT HELPERS
    // =========================================================================

    fn get_text(
        &self,
        table: TextTable,
        key: &str,
    ) -> Result<Option<String>, CoreError> {
        let read_txn = self.db.begin_read().map_err(storage_err)?;
        let table = read_txn.open_table(table).map_err(storage_err)?;
        let value = table
            .get(key)
            .map_err(storage_err)?
            .map(|v| v.value().to_string());
        Ok(value)
    }

    fn put_text(
        &self,
        table: TextTable,
        key: &str,
        value: &str,
    ) -> Result<(), CoreError> {
        let write_txn = self.db.begin_write().map_err(storage_err)?;
        {
            let mut table = write_txn.open_table(table).map_err(storage_err)?;
            table.insert(key, value).map_err(storage_err)?;
        }
        write_txn.commit().map_err(storage_err)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::types::Environment;
    use crate::types::audit::Severity;
    use serde_json::json;
    use tempfile::tempdir;

    fn entry(n: usize) -> AuditLogEntry {
        AuditLogEntry {
            id: format!("log-{n}"),
            timestamp: n as i64,
            action: "TEST".to_string(),
            user: "ADMIN".to_string(),
            details: format!("entry {n}"),
            environment: Environment::Dev,
            severity: Severity::Info,
        }
    }

    #[test]
    fn missing_document_is_none() {
        let store = KvStore::in_memory().expect("open");
        assert_eq!(store.get_document(StorageKey::Config).expect("get"), None);
    }

    #[test]
    fn put_then_get_document() {
        let store = KvStore::in_memory().expect("open");
        let doc = json!({"a": 1});
        store.put_document(StorageKey::Features, &doc).expect("put");
        assert_eq!(store.get_document(StorageKey::Features).expect("get"), Some(doc));
    }

    #[test]
    fn last_write_wins() {
        let store = KvStore::in_memory().expect("open");
        store.put_document(StorageKey::Config, &json!({"v": 1})).expect("put");
        store.put_document(StorageKey::Config, &json!({"v": 2})).expect("put");
        assert_eq!(
            store.get_document(StorageKey::Config).expect("get"),
            Some(json!({"v": 2}))
        );
    }

    #[test]
    fn put_if_absent_does_not_overwrite() {
        let store = KvStore::in_memory().expect("open");
        assert!(store.put_document_if_absent(StorageKey::Content, &json!({"v": 1})).expect("put"));
        assert!(!store.put_document_if_absent(StorageKey::Content, &json!({"v": 2})).expect("put"));
        assert_eq!(
            store.get_document(StorageKey::Content).expect("get"),
            Some(json!({"v": 1}))
        );
    }

    #[test]
    fn audit_ring_keeps_newest_hundred() {
        let store = KvStore::in_memory().expect("open");
        for n in 0..150 {
            store.append_audit(&entry(n)).expect("append");
        }
        assert_eq!(store.audit_len().expect("len"), AUDIT_LOG_CAPACITY);

        let recent = store.recent_audit(AUDIT_LOG_CAPACITY).expect("recent");
        assert_eq!(recent.len(), 100);
        assert_eq!(recent.first().map(|e| e.id.as_str()), Some("log-149"));
        assert_eq!(recent.last().map(|e| e.id.as_str()), Some("log-50"));
    }

    #[test]
    fn recent_audit_respects_limit() {
        let store = KvStore::in_memory().expect("open");
        for n in 0..5 {
            store.append_audit(&entry(n)).expect("append");
        }
        let recent = store.recent_audit(2).expect("recent");
        assert_eq!(recent, vec![entry(4), entry(3)]);
    }

    #[test]
    fn preferences_round_trip() {
        let store = KvStore::in_memory().expect("open");
        assert_eq!(store.get_preference("locale").expect("get"), None);
        store.set_preference("locale", "en").expect("set");
        assert_eq!(store.get_preference("locale").expect("get"), Some("en".to_string()));
    }

    #[test]
    fn member_lookup_is_case_insensitive() {
        let store = KvStore::in_memory().expect("open");
        let member = MemberRecord {
            email: "Member@Example.com".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            plan: "FREE".to_string(),
            balance: 0.0,
        };
        store.put_member(&member).expect("put");
        let found = store.get_member("  member@example.COM ").expect("get");
        assert_eq!(found, Some(member));
    }

    #[test]
    fn recovery_after_reopen() {
        let temp = tempdir().expect("temp dir");
        let db_path = temp.path().join("store.redb");

        {
            let store = KvStore::open(&db_path).expect("open");
            store.put_document(StorageKey::Config, &json!({"v": 7})).expect("put");
            store.append_audit(&entry(1)).expect("append");
        }

        {
            let store = KvStore::open(&db_path).expect("reopen");
            assert_eq!(
                store.get_document(StorageKey::Config).expect("get"),
                Some(json!({"v": 7}))
            );
            store.append_audit(&entry(2)).expect("append");
            let recent = store.recent_audit(10).expect("recent");
            assert_eq!(recent, vec![entry(2), entry(1)]);
        }
    }
}
