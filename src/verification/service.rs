// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet ownership verification service.
//!
//! ## Flow
//!
//! 1. `issue_challenge` stores a fresh message + nonce for the address,
//!    replacing any earlier challenge.
//! 2. The wallet holder signs the message with their key, out of band.
//! 3. `verify_ownership` checks, in order: wallet exists, caller owns it,
//!    a challenge is active, the signature matches. Then it marks the wallet
//!    verified and removes the challenge.
//!
//! If marking the wallet fails, the challenge is kept so the caller can retry.
//! Removing the challenge afterwards is cleanup only: a failure is logged and
//! the verification still succeeds.

use std::sync::Arc;

use tracing::{info, warn};

use super::challenge::{challenge_message, generate_nonce, ChallengeSettings};
use super::VerificationError;
use crate::chain::{ChainError, SignatureVerifier};
use crate::clock::{Clock, SystemClock};
use crate::storage::{ChallengeRecord, ChallengeStore, StorageError, WalletRecord, WalletStore};

pub struct WalletVerificationService {
    wallets: Arc<dyn WalletStore>,
    challenges: Arc<dyn ChallengeStore>,
    verifier: Arc<dyn SignatureVerifier>,
    clock: Arc<dyn Clock>,
    settings: ChallengeSettings,
}

impl WalletVerificationService {
    /// Create a service with default challenge settings and the system clock.
    pub fn new(
        wallets: Arc<dyn WalletStore>,
        challenges: Arc<dyn ChallengeStore>,
        verifier: Arc<dyn SignatureVerifier>,
    ) -> Self {
        Self {
            wallets,
            challenges,
            verifier,
            clock: Arc::new(SystemClock),
            settings: ChallengeSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: ChallengeSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn verifier(&self) -> &dyn SignatureVerifier {
        self.verifier.as_ref()
    }

    fn canonical_address(&self, wallet_address: &str) -> Result<String, VerificationError> {
        self.verifier
            .canonical_address(wallet_address)
            .map_err(|_| VerificationError::InvalidAddressFormat(self.verifier.chain()))
    }

    // =========================================================================
    // Wallet registration
    // =========================================================================

    /// Register a wallet address for `owner_user_id` as PENDING and unverified.
    pub fn register_wallet(
        &self,
        wallet_address: &str,
        owner_user_id: &str,
    ) -> Result<WalletRecord, VerificationError> {
        let address = self.canonical_address(wallet_address)?;
        let wallet = WalletRecord::new_pending(&address, owner_user_id, self.clock.now());

        self.wallets.create(&wallet).map_err(|e| match e {
            StorageError::AlreadyExists(_) => VerificationError::WalletAlreadyRegistered,
            other => VerificationError::Persistence(other),
        })?;

        info!(
            wallet_address = %address,
            user_id = %owner_user_id,
            "Wallet registered"
        );
        Ok(wallet)
    }

    /// Fetch a wallet owned by `caller_user_id`.
    ///
    /// Wallets owned by someone else are reported as not found.
    pub fn get_wallet(
        &self,
        wallet_address: &str,
        caller_user_id: &str,
    ) -> Result<WalletRecord, VerificationError> {
        let address = self.canonical_address(wallet_address)?;
        self.wallets
            .get(&address)?
            .filter(|w| w.is_owned_by(caller_user_id))
            .ok_or(VerificationError::WalletNotFound)
    }

    // =========================================================================
    // Challenge issuance
    // =========================================================================

    /// Issue a new challenge for `wallet_address`, replacing any previous one.
    pub fn issue_challenge(
        &self,
        wallet_address: &str,
    ) -> Result<ChallengeRecord, VerificationError> {
        let address = self.canonical_address(wallet_address)?;
        let now = self.clock.now();
        let expires_at = now
            .checked_add_signed(self.settings.ttl)
            .ok_or(VerificationError::ExpiryOutOfRange)?;
        let nonce = generate_nonce();

        let challenge = ChallengeRecord {
            message: challenge_message(&self.settings.app_name, &address, &nonce),
            wallet_address: address,
            nonce,
            created_at: now,
            expires_at,
        };

        self.challenges.upsert(&challenge)?;

        info!(
            wallet_address = %challenge.wallet_address,
            expires_at = %challenge.expires_at,
            "Wallet challenge issued"
        );
        Ok(challenge)
    }

    // =========================================================================
    // Verification
    // =========================================================================

    /// Verify that `caller_user_id` controls the key behind `wallet_address`.
    ///
    /// Returns the updated wallet record on success.
    pub fn verify_ownership(
        &self,
        wallet_address: &str,
        signature: &str,
        caller_user_id: &str,
    ) -> Result<WalletRecord, VerificationError> {
        let address = self.canonical_address(wallet_address)?;

        let wallet = self
            .wallets
            .get(&address)?
            .ok_or(VerificationError::WalletNotFound)?;

        if !wallet.is_owned_by(caller_user_id) {
            warn!(
                wallet_address = %address,
                user_id = %caller_user_id,
                "Verification attempted by non-owner"
            );
            return Err(VerificationError::OwnershipMismatch);
        }

        let now = self.clock.now();
        let challenge = self
            .challenges
            .get(&address, now)?
            .ok_or(VerificationError::NoActiveChallenge)?;

        self.verifier
            .verify(&address, &challenge.message, signature)
            .map_err(|e| {
                if let ChainError::MalformedSignature(reason) = &e {
                    warn!(wallet_address = %address, reason = %reason, "Malformed signature");
                }
                VerificationError::InvalidSignature
            })?;

        // The challenge stays in place if this fails so the caller can retry.
        let verified = self.wallets.mark_verified(&address, now)?;

        if let Err(e) = self.challenges.remove(&address) {
            warn!(
                wallet_address = %address,
                error = %e,
                "Failed to remove consumed challenge"
            );
        }

        info!(
            wallet_address = %address,
            user_id = %caller_user_id,
            "Wallet ownership verified"
        );
        Ok(verified)
    }

    // =========================================================================
    // Maintenance
    // =========================================================================

    /// Delete expired challenges. Returns how many were removed.
    pub fn purge_expired_challenges(&self) -> Result<usize, VerificationError> {
        Ok(self.challenges.purge_expired(self.clock.now())?)
    }

    /// Probe the wallet store with a read.
    pub fn check_storage(&self) -> Result<(), VerificationError> {
        self.wallets.get("")?;
        Ok(())
    }
}
