// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the wallet endpoints. Field names are
//! camelCase on the wire.
//!
//! Wallet addresses are accepted as free-form strings and canonicalized by the
//! service, so `walletAddress` in a response may differ in case from the
//! request.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::{WalletRecord, WalletStatus};

// =============================================================================
// Registration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterWalletRequest {
    pub wallet_address: String,
}

/// Wallet as returned to its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletResponse {
    pub wallet_address: String,
    pub owner_user_id: String,
    pub is_verified: bool,
    pub status: WalletStatus,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verified_at: Option<DateTime<Utc>>,
}

impl From<WalletRecord> for WalletResponse {
    fn from(record: WalletRecord) -> Self {
        Self {
            wallet_address: record.wallet_address,
            owner_user_id: record.owner_user_id,
            is_verified: record.is_verified,
            status: record.status,
            created_at: record.created_at,
            verified_at: record.verified_at,
        }
    }
}

// =============================================================================
// Challenge
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeRequest {
    pub wallet_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeResponse {
    /// Exact text to sign
    pub message: String,
    pub wallet_address: String,
}

// =============================================================================
// Verification
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub wallet_address: String,
    /// Base64 Ed25519 signature (Stellar) or 65-byte hex signature (EVM)
    pub signature: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub wallet_address: String,
    pub verified: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requests_use_camel_case() {
        let req: VerifyRequest =
            serde_json::from_str(r#"{"walletAddress":"GABC","signature":"c2ln"}"#).unwrap();
        assert_eq!(req.wallet_address, "GABC");
        assert_eq!(req.signature, "c2ln");

        assert!(serde_json::from_str::<ChallengeRequest>(r#"{"wallet_address":"GABC"}"#).is_err());
    }

    #[test]
    fn wallet_response_mirrors_record() {
        let mut record = WalletRecord::new_pending("GABC", "user-1", Utc::now());
        record.mark_verified(Utc::now());

        let json = serde_json::to_value(WalletResponse::from(record.clone())).unwrap();
        assert_eq!(json["walletAddress"], "GABC");
        assert_eq!(json["ownerUserId"], "user-1");
        assert_eq!(json["isVerified"], true);
        assert_eq!(json["status"], "ACTIVE");
        assert!(json["verifiedAt"].is_string());
    }
}
