//! Authentication collaborator for the desktop front end.
//!
//! Credentials are stored as salted Argon2 hashes in PHC string form. The
//! ledger and aggregation core never depends on how this check is
//! implemented, only that it gates mutating and administrative operations.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use tracing::info;

use crate::domain::AuthGrant;
use crate::errors::{LedgerError, Result};
use crate::store::LedgerStore;

/// Username created on first run when no accounts exist.
pub const BOOTSTRAP_ADMIN: &str = "admin";
/// Initial credential for the bootstrap administrator; expected to be
/// changed right after the first login.
pub const BOOTSTRAP_PASSWORD: &str = "1234";

pub struct AccountService;

impl AccountService {
    /// Creates the initial administrator account when the accounts table is
    /// empty. Safe to call on every startup.
    pub fn bootstrap(store: &LedgerStore) -> Result<()> {
        if store.account_count()? > 0 {
            return Ok(());
        }
        let credential = hash_password(BOOTSTRAP_PASSWORD)?;
        store.insert_account(BOOTSTRAP_ADMIN, &credential, true)?;
        info!(username = BOOTSTRAP_ADMIN, "bootstrap administrator created");
        Ok(())
    }

    /// Registers a new account with a freshly salted credential hash.
    pub fn register(
        store: &LedgerStore,
        username: &str,
        password: &str,
        is_admin: bool,
    ) -> Result<i64> {
        let username = username.trim();
        if username.is_empty() {
            return Err(LedgerError::Validation("username must not be empty".into()));
        }
        if password.is_empty() {
            return Err(LedgerError::Validation("password must not be empty".into()));
        }
        let credential = hash_password(password)?;
        let id = store.insert_account(username, &credential, is_admin)?;
        info!(username, is_admin, "account registered");
        Ok(id)
    }

    /// Checks a username/password pair. Unknown users and wrong passwords are
    /// indistinguishable to the caller.
    pub fn login(store: &LedgerStore, username: &str, password: &str) -> Result<Option<AuthGrant>> {
        let Some(account) = store.find_account(username.trim())? else {
            return Ok(None);
        };
        if !verify_password(password, &account.credential)? {
            return Ok(None);
        }
        Ok(Some(AuthGrant {
            username: account.username,
            is_admin: account.is_admin,
        }))
    }

    /// Replaces the credential of an existing account.
    pub fn change_password(store: &LedgerStore, username: &str, new_password: &str) -> Result<()> {
        if new_password.is_empty() {
            return Err(LedgerError::Validation("password must not be empty".into()));
        }
        let credential = hash_password(new_password)?;
        store.update_credential(username.trim(), &credential)?;
        info!(username, "credential changed");
        Ok(())
    }

    pub fn usernames(store: &LedgerStore) -> Result<Vec<String>> {
        store.list_usernames()
    }
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| LedgerError::Storage(format!("credential hashing failed: {err}")))
}

fn verify_password(password: &str, stored_hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|err| LedgerError::Storage(format!("stored credential unreadable: {err}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
