//! # Member Accounts
//!
//! Password hashing and the member panel login. Passwords are stored only as
//! Argon2id PHC strings; verification runs in constant time.

use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand_core::OsRng;
use thiserror::Error;
use vitrine_core::{
    CoreError, KvStore, MemberPanel, MemberRecord, PanelTool, ToolStatus,
};

#[derive(Debug, Error)]
pub enum MemberError {
    #[error("Failed to hash password: {0}")]
    Hash(String),

    #[error(transparent)]
    Storage(#[from] CoreError),
}

/// Argon2id parameters (OWASP minimum).
const MEMORY_COST: u32 = 19456;
const TIME_COST: u32 = 2;
const PARALLELISM: u32 = 1;

/// Returned for any failed login, whatever the cause.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials.";

fn argon2() -> Result<Argon2<'static>, MemberError> {
    let params = Params::new(MEMORY_COST, TIME_COST, PARALLELISM, None)
        .map_err(|e| MemberError::Hash(e.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

pub fn hash_password(password: &str) -> Result<String, MemberError> {
    let salt = SaltString::generate(&mut OsRng);
    argon2()?
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| MemberError::Hash(e.to_string()))
}

/// Check `password` against a PHC hash. Malformed hashes never verify.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    argon2().is_ok_and(|a| a.verify_password(password.as_bytes(), &parsed).is_ok())
}

/// Create the account unless one with the same email exists.
///
/// Returns whether a record was written.
pub fn provision_member(
    store: &KvStore,
    email: &str,
    password: &str,
    plan: &str,
    balance: f64,
) -> Result<bool, MemberError> {
    let email = email.trim().to_lowercase();
    if store.get_member(&email)?.is_some() {
        return Ok(false);
    }
    store.put_member(&MemberRecord {
        email,
        password_hash: hash_password(password)?,
        plan: plan.to_string(),
        balance,
    })?;
    Ok(true)
}

/// Tools listed in every member panel.
#[must_use]
pub fn panel_tools() -> Vec<PanelTool> {
    vec![PanelTool {
        id: "bundle".to_string(),
        name: "Vitrine Pass".to_string(),
        status: ToolStatus::Stable,
    }]
}

/// Verify credentials and build the panel payload.
///
/// `Ok(None)` means the credentials did not match.
pub fn login(store: &KvStore, email: &str, password: &str) -> Result<Option<MemberPanel>, MemberError> {
    let Some(member) = store.get_member(email)? else {
        return Ok(None);
    };
    if !verify_password(password, &member.password_hash) {
        return Ok(None);
    }
    Ok(Some(MemberPanel {
        user: member.profile(),
        tools: panel_tools(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_argon2id_and_verifies() {
        let hash = hash_password("hunter2").expect("hash");
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("hunter2", &hash));
        assert!(!verify_password("hunter3", &hash));
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("anything", "plain-text"));
    }

    #[test]
    fn provisioning_is_idempotent() {
        let store = KvStore::in_memory().expect("store");
        assert!(provision_member(&store, "Demo@Site.example", "pw", "LIFETIME", 10.0).expect("first"));
        assert!(!provision_member(&store, "demo@site.example", "other", "FREE", 0.0).expect("second"));

        let panel = login(&store, "demo@site.example", "pw").expect("login").expect("panel");
        assert_eq!(panel.user.plan, "LIFETIME");
        assert_eq!(panel.tools, panel_tools());
    }

    #[test]
    fn wrong_password_and_unknown_member_look_alike() {
        let store = KvStore::in_memory().expect("store");
        provision_member(&store, "a@b.c", "pw", "FREE", 0.0).expect("provision");
        assert!(login(&store, "a@b.c", "nope").expect("login").is_none());
        assert!(login(&store, "x@y.z", "pw").expect("login").is_none());
    }
}
