// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet Verification Server
//!
//! Proves that a user controls the private key behind a wallet address they
//! registered, using a signed-message challenge.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Bearer JWT authentication
//! - `chain` - Address formats and signature schemes (Stellar, EVM)
//! - `storage` - Wallet and challenge stores (redb, in-memory)
//! - `verification` - Challenge issuance and ownership verification
//! - `sweeper` - Background purge of expired challenges

pub mod api;
pub mod auth;
pub mod chain;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;
pub mod sweeper;
pub mod verification;
