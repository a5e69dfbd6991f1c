// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Storage
//!
//! Persistence for the two entities of the verification flow:
//!
//! - [`WalletRecord`] - a claimed wallet address, its owner and verification state
//! - [`ChallengeRecord`] - the single active challenge for a wallet address
//!
//! Both are keyed by the canonical wallet address. The service only talks to
//! the [`WalletStore`] and [`ChallengeStore`] traits; two backends exist:
//!
//! - [`WalletDatabase`] - embedded redb file (ACID, single writer)
//! - [`InMemoryStore`] - mutex-guarded maps for tests and development

use chrono::{DateTime, Utc};

pub mod database;
pub mod memory;
pub mod records;

pub use database::WalletDatabase;
pub use memory::InMemoryStore;
pub use records::{ChallengeRecord, WalletRecord, WalletStatus};

// =============================================================================
// Error Type
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("redb error: {0}")]
    Redb(#[from] redb::Error),

    #[error("redb database error: {0}")]
    RedbDatabase(#[from] redb::DatabaseError),

    #[error("redb transaction error: {0}")]
    RedbTransaction(#[from] redb::TransactionError),

    #[error("redb table error: {0}")]
    RedbTable(#[from] redb::TableError),

    #[error("redb storage error: {0}")]
    RedbStorage(#[from] redb::StorageError),

    #[error("redb commit error: {0}")]
    RedbCommit(#[from] redb::CommitError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("already exists: {0}")]
    AlreadyExists(String),

    #[error("store lock poisoned")]
    LockPoisoned,
}

pub type StorageResult<T> = Result<T, StorageError>;

// =============================================================================
// Store Traits
// =============================================================================

/// Wallet records, owned by the account subsystem and mutated by verification.
pub trait WalletStore: Send + Sync {
    /// Insert a new wallet.
    ///
    /// Fails with [`StorageError::AlreadyExists`] if the address is taken.
    fn create(&self, wallet: &WalletRecord) -> StorageResult<()>;

    /// Look up a wallet by canonical address.
    fn get(&self, wallet_address: &str) -> StorageResult<Option<WalletRecord>>;

    /// Set `is_verified = true` and `status = ACTIVE`.
    ///
    /// Idempotent. Fails with [`StorageError::NotFound`] if the wallet does
    /// not exist.
    fn mark_verified(&self, wallet_address: &str, now: DateTime<Utc>)
        -> StorageResult<WalletRecord>;
}

/// Active challenges, at most one per wallet address.
pub trait ChallengeStore: Send + Sync {
    /// Create or replace the challenge for `challenge.wallet_address` atomically.
    fn upsert(&self, challenge: &ChallengeRecord) -> StorageResult<()>;

    /// Return the challenge if one exists and `expires_at > now`.
    fn get(&self, wallet_address: &str, now: DateTime<Utc>)
        -> StorageResult<Option<ChallengeRecord>>;

    /// Delete the challenge. Absence is not an error.
    fn remove(&self, wallet_address: &str) -> StorageResult<()>;

    /// Delete every challenge with `expires_at <= now`, returning how many were removed.
    fn purge_expired(&self, now: DateTime<Utc>) -> StorageResult<usize>;
}
