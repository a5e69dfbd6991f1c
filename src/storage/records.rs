// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Persisted entity types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wallet lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WalletStatus {
    /// Registered, ownership not yet proven
    #[default]
    Pending,
    /// Ownership proven by a signed challenge
    Active,
}

/// A wallet address registered by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletRecord {
    /// Canonical wallet address (unique key)
    pub wallet_address: String,
    /// User who registered the address
    pub owner_user_id: String,
    /// Whether ownership has been proven
    pub is_verified: bool,
    /// Current status
    pub status: WalletStatus,
    /// When the wallet was registered
    pub created_at: DateTime<Utc>,
    /// When ownership was first proven
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<DateTime<Utc>>,
}

impl WalletRecord {
    /// A freshly registered, unverified wallet.
    pub fn new_pending(
        wallet_address: impl Into<String>,
        owner_user_id: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            wallet_address: wallet_address.into(),
            owner_user_id: owner_user_id.into(),
            is_verified: false,
            status: WalletStatus::Pending,
            created_at: now,
            verified_at: None,
        }
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_user_id == user_id
    }

    /// Apply the verified state. Repeated calls keep the first `verified_at`.
    pub fn mark_verified(&mut self, now: DateTime<Utc>) {
        self.is_verified = true;
        self.status = WalletStatus::Active;
        self.verified_at.get_or_insert(now);
    }
}

/// The message a wallet holder must sign to prove ownership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeRecord {
    pub wallet_address: String,
    /// Exact text that must be signed
    pub message: String,
    /// Random value embedded in `message`
    pub nonce: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl ChallengeRecord {
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn mark_verified_is_idempotent() {
        let t0 = Utc::now();
        let mut wallet = WalletRecord::new_pending("GABC", "user-1", t0);
        assert!(!wallet.is_verified);
        assert_eq!(wallet.status, WalletStatus::Pending);

        wallet.mark_verified(t0 + Duration::minutes(1));
        let first = wallet.clone();
        wallet.mark_verified(t0 + Duration::minutes(5));

        assert_eq!(wallet, first);
        assert!(wallet.is_verified);
        assert_eq!(wallet.status, WalletStatus::Active);
        assert_eq!(wallet.verified_at, Some(t0 + Duration::minutes(1)));
    }

    #[test]
    fn challenge_is_inactive_at_expiry() {
        let now = Utc::now();
        let challenge = ChallengeRecord {
            wallet_address: "GABC".to_string(),
            message: "m".to_string(),
            nonce: "n".to_string(),
            created_at: now,
            expires_at: now + Duration::minutes(15),
        };

        assert!(challenge.is_active(now));
        assert!(!challenge.is_active(challenge.expires_at));
        assert!(!challenge.is_active(challenge.expires_at + Duration::seconds(1)));
    }

    #[test]
    fn wallet_serializes_camel_case_with_uppercase_status() {
        let wallet = WalletRecord::new_pending("GABC", "user-1", Utc::now());
        let json = serde_json::to_value(&wallet).unwrap();

        assert_eq!(json["walletAddress"], "GABC");
        assert_eq!(json["ownerUserId"], "user-1");
        assert_eq!(json["isVerified"], false);
        assert_eq!(json["status"], "PENDING");
        assert!(json.get("verifiedAt").is_none());
    }
}
