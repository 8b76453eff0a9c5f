use serde::{Deserialize, Serialize};

/// A login account for the desktop front end.
///
/// `credential` holds a salted Argon2 hash in PHC string form, never the
/// plaintext password. Accounts have no relation to movements; the ledger is
/// single and shared.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: i64,
    pub username: String,
    pub credential: String,
    pub is_admin: bool,
}

/// Outcome of a successful login check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthGrant {
    pub username: String,
    pub is_admin: bool,
}
