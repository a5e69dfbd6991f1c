// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Chain Signature Schemes
//!
//! Ownership proofs are checked by a [`SignatureVerifier`]. One verifier is
//! selected per deployment (`WALLET_CHAIN`); the rest of the service never
//! looks at address encodings or signature formats directly.
//!
//! - [`StellarVerifier`] - Ed25519 keys encoded as StrKey (`G...`),
//!   base64 signatures over the raw message bytes.
//! - [`EvmVerifier`] - 20-byte hex addresses, EIP-191 `personal_sign`
//!   signatures recovered with secp256k1.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub mod evm;
pub mod stellar;

pub use evm::EvmVerifier;
pub use stellar::StellarVerifier;

/// Supported signature schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Stellar,
    Evm,
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Chain::Stellar => write!(f, "stellar"),
            Chain::Evm => write!(f, "evm"),
        }
    }
}

impl FromStr for Chain {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "stellar" => Ok(Chain::Stellar),
            "evm" | "ethereum" => Ok(Chain::Evm),
            other => Err(ChainError::UnknownChain(other.to_string())),
        }
    }
}

/// Errors raised while parsing addresses or checking signatures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChainError {
    #[error("unknown chain: {0}")]
    UnknownChain(String),

    #[error("invalid {0} wallet address format")]
    InvalidAddress(Chain),

    #[error("malformed signature: {0}")]
    MalformedSignature(String),

    #[error("signature does not match wallet address")]
    SignatureMismatch,
}

/// Chain-specific address handling and signature verification.
pub trait SignatureVerifier: Send + Sync {
    /// The scheme this verifier implements.
    fn chain(&self) -> Chain;

    /// Validate the structural format of an address and return its canonical
    /// textual form.
    ///
    /// Two spellings of the same key always map to the same canonical string,
    /// which is what gets stored and embedded in challenge messages.
    fn canonical_address(&self, address: &str) -> Result<String, ChainError>;

    /// Check that `signature` over `message` was produced by the key behind
    /// `address`.
    fn verify(&self, address: &str, message: &str, signature: &str) -> Result<(), ChainError>;
}

/// Build the verifier for a configured chain.
pub fn verifier_for(chain: Chain) -> Arc<dyn SignatureVerifier> {
    match chain {
        Chain::Stellar => Arc::new(StellarVerifier),
        Chain::Evm => Arc::new(EvmVerifier),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_parses_case_insensitively() {
        assert_eq!("Stellar".parse::<Chain>().unwrap(), Chain::Stellar);
        assert_eq!("EVM".parse::<Chain>().unwrap(), Chain::Evm);
        assert_eq!("ethereum".parse::<Chain>().unwrap(), Chain::Evm);
        assert!(matches!(
            "solana".parse::<Chain>(),
            Err(ChainError::UnknownChain(_))
        ));
    }

    #[test]
    fn verifier_for_matches_chain() {
        assert_eq!(verifier_for(Chain::Stellar).chain(), Chain::Stellar);
        assert_eq!(verifier_for(Chain::Evm).chain(), Chain::Evm);
    }
}
