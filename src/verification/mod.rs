// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Wallet Verification
//!
//! Challenge/response proof that a user controls the private key behind a
//! wallet address they registered.
//!
//! - [`challenge`] - nonce generation and message text
//! - [`service`] - [`WalletVerificationService`], the protocol itself
//! - [`error`] - [`VerificationError`]

pub mod challenge;
pub mod error;
pub mod service;

pub use challenge::ChallengeSettings;
pub use error::VerificationError;
pub use service::WalletVerificationService;
