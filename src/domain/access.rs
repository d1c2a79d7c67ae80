//! Tier Passwords - Shared Secrets for Paid Tiers
//!
//! Records are issued by the admin and compared by exact string equality.
//! There is no hashing and no normalization: this is a placeholder
//! gate for paid tiers, not a credential system.

use serde::{Deserialize, Serialize};

use super::tier::Tier;

/// Opaque password record identifier.
pub type PasswordId = String;

/// Whether a tier password can still be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PasswordStatus {
    Active,
    /// Never assigned by this crate; honoured if present in storage.
    Inactive,
}

/// A stored tier password.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierPassword {
    pub id: PasswordId,
    /// Display only, never used for matching.
    pub username: String,
    pub tier: Tier,
    pub password: String,
    pub status: PasswordStatus,
}

// Keep secrets out of log output.
impl std::fmt::Debug for TierPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TierPassword")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("tier", &self.tier)
            .field("password", &"<redacted>")
            .field("status", &self.status)
            .finish()
    }
}

impl TierPassword {
    /// Record seeded on first access to an empty password collection.
    pub fn demo() -> Self {
        Self {
            id: "1".to_string(),
            username: "demo_user".to_string(),
            tier: Tier::Medium,
            password: "123".to_string(),
            status: PasswordStatus::Active,
        }
    }

    /// Build an active record from admin input.
    pub fn issue(entry: NewTierPassword, id: PasswordId) -> Self {
        Self {
            id,
            username: entry.username,
            tier: entry.tier,
            password: entry.password,
            status: PasswordStatus::Active,
        }
    }

    /// Whether this record unlocks `tier` for `password`.
    pub fn grants(&self, tier: Tier, password: &str) -> bool {
        self.status == PasswordStatus::Active && self.tier == tier && self.password == password
    }
}

/// Admin input for a new tier password.
#[derive(Clone, PartialEq, Eq)]
pub struct NewTierPassword {
    pub username: String,
    pub tier: Tier,
    pub password: String,
}

impl std::fmt::Debug for NewTierPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewTierPassword")
            .field("username", &self.username)
            .field("tier", &self.tier)
            .finish_non_exhaustive()
    }
}
