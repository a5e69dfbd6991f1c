// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Failure modes of the verification protocol.

use crate::chain::Chain;
use crate::storage::StorageError;

#[derive(Debug, thiserror::Error)]
pub enum VerificationError {
    #[error("Invalid {0} wallet address format")]
    InvalidAddressFormat(Chain),

    #[error("Wallet address not found")]
    WalletNotFound,

    #[error("Wallet address does not belong to authenticated user")]
    OwnershipMismatch,

    #[error("No active challenge found for this wallet address")]
    NoActiveChallenge,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Wallet address is already registered")]
    WalletAlreadyRegistered,

    #[error("Challenge expiry is out of range")]
    ExpiryOutOfRange,

    #[error("Persistence failure: {0}")]
    Persistence(#[from] StorageError),
}

impl VerificationError {
    /// Stable machine-readable code for API clients.
    pub fn error_code(&self) -> &'static str {
        match self {
            VerificationError::InvalidAddressFormat(_) => "invalid_address_format",
            VerificationError::WalletNotFound => "wallet_not_found",
            VerificationError::OwnershipMismatch => "ownership_mismatch",
            VerificationError::NoActiveChallenge => "no_active_challenge",
            VerificationError::InvalidSignature => "invalid_signature",
            VerificationError::WalletAlreadyRegistered => "wallet_already_registered",
            VerificationError::ExpiryOutOfRange => "expiry_out_of_range",
            VerificationError::Persistence(_) => "persistence_error",
        }
    }
}
