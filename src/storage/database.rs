// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Embedded wallet database backed by redb (pure Rust, ACID).
//!
//! ## Table Layout
//!
//! - `wallets`: canonical address → serialized WalletRecord
//! - `challenges`: canonical address → serialized ChallengeRecord
//!
//! redb allows a single write transaction at a time, so every mutation here
//! (challenge upsert, mark-verified) is atomic per call.

use std::path::Path;

use chrono::{DateTime, Utc};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};

use super::{
    ChallengeRecord, ChallengeStore, StorageError, StorageResult, WalletRecord, WalletStore,
};

// =============================================================================
// Table Definitions
// =============================================================================

/// Wallets: canonical address → WalletRecord (JSON bytes).
const WALLETS: TableDefinition<&str, &[u8]> = TableDefinition::new("wallets");

/// Challenges: canonical address → ChallengeRecord (JSON bytes).
const CHALLENGES: TableDefinition<&str, &[u8]> = TableDefinition::new("challenges");

// =============================================================================
// WalletDatabase
// =============================================================================

/// Embedded ACID store for wallets and challenges.
pub struct WalletDatabase {
    db: Database,
}

impl WalletDatabase {
    /// Open (or create) the database at the given path.
    pub fn open(path: &Path) -> StorageResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::create(path)?;

        // Pre-create all tables so later read transactions don't fail
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(WALLETS)?;
            let _ = write_txn.open_table(CHALLENGES)?;
        }
        write_txn.commit()?;

        Ok(Self { db })
    }
}

impl WalletStore for WalletDatabase {
    fn create(&self, wallet: &WalletRecord) -> StorageResult<()> {
        let json = serde_json::to_vec(wallet)?;
        let address = wallet.wallet_address.as_str();

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(WALLETS)?;
            if table.get(address)?.is_some() {
                return Err(StorageError::AlreadyExists(format!("Wallet {address}")));
            }
            table.insert(address, json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn get(&self, wallet_address: &str) -> StorageResult<Option<WalletRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(WALLETS)?;
        match table.get(wallet_address)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    fn mark_verified(
        &self,
        wallet_address: &str,
        now: DateTime<Utc>,
    ) -> StorageResult<WalletRecord> {
        let write_txn = self.db.begin_write()?;
        let wallet = {
            let mut table = write_txn.open_table(WALLETS)?;

            // Copy the bytes out before mutating the table
            let existing_bytes = {
                let existing = table
                    .get(wallet_address)?
                    .ok_or_else(|| StorageError::NotFound(format!("Wallet {wallet_address}")))?;
                existing.value().to_vec()
            };

            let mut wallet: WalletRecord = serde_json::from_slice(&existing_bytes)?;
            wallet.mark_verified(now);

            let json = serde_json::to_vec(&wallet)?;
            table.insert(wallet_address, json.as_slice())?;
            wallet
        };
        write_txn.commit()?;
        Ok(wallet)
    }
}

impl ChallengeStore for WalletDatabase {
    fn upsert(&self, challenge: &ChallengeRecord) -> StorageResult<()> {
        let json = serde_json::to_vec(challenge)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(CHALLENGES)?;
            table.insert(challenge.wallet_address.as_str(), json.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn get(
        &self,
        wallet_address: &str,
        now: DateTime<Utc>,
    ) -> StorageResult<Option<ChallengeRecord>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(CHALLENGES)?;
        let challenge: Option<ChallengeRecord> = match table.get(wallet_address)? {
            Some(value) => Some(serde_json::from_slice(value.value())?),
            None => None,
        };
        Ok(challenge.filter(|c| c.is_active(now)))
    }

    fn remove(&self, wallet_address: &str) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(CHALLENGES)?;
            table.remove(wallet_address)?;
        }
        write_txn.commit()?;
        Ok(())
    }

    fn purge_expired(&self, now: DateTime<Utc>) -> StorageResult<usize> {
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut table = write_txn.open_table(CHALLENGES)?;

            let mut expired = Vec::new();
            for entry in table.iter()? {
                let (key, value) = entry?;
                match serde_json::from_slice::<ChallengeRecord>(value.value()) {
                    Ok(challenge) if challenge.is_active(now) => {}
                    Ok(_) => expired.push(key.value().to_string()),
                    Err(e) => {
                        tracing::warn!(
                            wallet_address = %key.value(),
                            error = %e,
                            "Dropping unreadable challenge record"
                        );
                        expired.push(key.value().to_string());
                    }
                }
            }

            for address in &expired {
                table.remove(address.as_str())?;
            }
            expired.len()
        };
        write_txn.commit()?;
        Ok(removed)
    }
}

// =============================================================================
// Tests
// =============================================================================
