// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory store used by tests and development runs without `DATA_DIR`.
//!
//! Each map sits behind its own mutex, so every trait operation is a single
//! critical section (upsert is atomic per address).

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use super::{
    ChallengeRecord, ChallengeStore, StorageError, StorageResult, WalletRecord, WalletStore,
};

#[derive(Debug, Default)]
pub struct InMemoryStore {
    wallets: Mutex<HashMap<String, WalletRecord>>,
    challenges: Mutex<HashMap<String, ChallengeRecord>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn wallets(&self) -> StorageResult<MutexGuard<'_, HashMap<String, WalletRecord>>> {
        self.wallets.lock().map_err(|_| StorageError::LockPoisoned)
    }

    fn challenges(&self) -> StorageResult<MutexGuard<'_, HashMap<String, ChallengeRecord>>> {
        self.challenges.lock().map_err(|_| StorageError::LockPoisoned)
    }
}

impl WalletStore for InMemoryStore {
    fn create(&self, wallet: &WalletRecord) -> StorageResult<()> {
        let mut wallets = self.wallets()?;
        if wallets.contains_key(&wallet.wallet_address) {
            return Err(StorageError::AlreadyExists(format!(
                "Wallet {}",
                wallet.wallet_address
            )));
        }
        wallets.insert(wallet.wallet_address.clone(), wallet.clone());
        Ok(())
    }

    fn get(&self, wallet_address: &str) -> StorageResult<Option<WalletRecord>> {
        Ok(self.wallets()?.get(wallet_address).cloned())
    }

    fn mark_verified(
        &self,
        wallet_address: &str,
        now: DateTime<Utc>,
    ) -> StorageResult<WalletRecord> {
        let mut wallets = self.wallets()?;
        let wallet = wallets
            .get_mut(wallet_address)
            .ok_or_else(|| StorageError::NotFound(format!("Wallet {wallet_address}")))?;
        wallet.mark_verified(now);
        Ok(wallet.clone())
    }
}

impl ChallengeStore for InMemoryStore {
    fn upsert(&self, challenge: &ChallengeRecord) -> StorageResult<()> {
        self.challenges()?
            .insert(challenge.wallet_address.clone(), challenge.clone());
        Ok(())
    }

    fn get(
        &self,
        wallet_address: &str,
        now: DateTime<Utc>,
    ) -> StorageResult<Option<ChallengeRecord>> {
        Ok(self
            .challenges()?
            .get(wallet_address)
            .filter(|c| c.is_active(now))
            .cloned())
    }

    fn remove(&self, wallet_address: &str) -> StorageResult<()> {
        self.challenges()?.remove(wallet_address);
        Ok(())
    }

    fn purge_expired(&self, now: DateTime<Utc>) -> StorageResult<usize> {
        let mut challenges = self.challenges()?;
        let before = challenges.len();
        challenges.retain(|_, c| c.is_active(now));
        Ok(before - challenges.len())
    }
}
