// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! EVM addresses and EIP-191 `personal_sign` verification.
//!
//! The signer is recovered from `keccak256("\x19Ethereum Signed Message:\n" || len || message)`
//! and compared to the claimed address by value, so checksum casing never
//! matters.

use std::str::FromStr;

use alloy::primitives::{Address, Signature};

use super::{Chain, ChainError, SignatureVerifier};

/// Verifier for EVM (secp256k1) accounts.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvmVerifier;

impl SignatureVerifier for EvmVerifier {
    fn chain(&self) -> Chain {
        Chain::Evm
    }

    fn canonical_address(&self, address: &str) -> Result<String, ChainError> {
        parse_address(address).map(|addr| addr.to_checksum(None))
    }

    fn verify(&self, address: &str, message: &str, signature: &str) -> Result<(), ChainError> {
        let expected = parse_address(address)?;

        let raw = alloy::hex::decode(signature.trim())
            .map_err(|e| ChainError::MalformedSignature(format!("invalid hex: {e}")))?;
        let signature = Signature::try_from(raw.as_slice())
            .map_err(|e| ChainError::MalformedSignature(e.to_string()))?;

        let recovered = signature
            .recover_address_from_msg(message.as_bytes())
            .map_err(|_| ChainError::SignatureMismatch)?;

        if recovered != expected {
            return Err(ChainError::SignatureMismatch);
        }

        Ok(())
    }
}

/// Parse a 20-byte hex address (`0x` prefix optional, any casing).
fn parse_address(address: &str) -> Result<Address, ChainError> {
    let trimmed = address.trim();
    let hex_part = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    if hex_part.len() != 40 || !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(ChainError::InvalidAddress(Chain::Evm));
    }
    Address::from_str(hex_part).map_err(|_| ChainError::InvalidAddress(Chain::Evm))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::B256;
    use alloy::signers::{local::PrivateKeySigner, SignerSync};

    fn signer(byte: u8) -> PrivateKeySigner {
        PrivateKeySigner::from_bytes(&B256::repeat_byte(byte)).unwrap()
    }

    fn sign(signer: &PrivateKeySigner, message: &str) -> String {
        let signature = signer.sign_message_sync(message.as_bytes()).unwrap();
        alloy::hex::encode_prefixed(signature.as_bytes())
    }

    #[test]
    fn canonical_address_is_checksummed() {
        let canonical = EvmVerifier
            .canonical_address("0x742d35cc6634c0532925a3b844bc9e7595f4ab12")
            .unwrap();
        assert_eq!(canonical.to_lowercase(), "0x742d35cc6634c0532925a3b844bc9e7595f4ab12");
        assert!(canonical.starts_with("0x"));
        assert_eq!(
            EvmVerifier
                .canonical_address("742D35CC6634C0532925A3B844BC9E7595F4AB12")
                .unwrap(),
            canonical
        );
    }

    #[test]
    fn malformed_addresses_are_rejected() {
        for bad in ["", "0x1234", "0xZZ2d35cc6634c0532925a3b844bc9e7595f4ab12", "GABC"] {
            assert_eq!(
                EvmVerifier.canonical_address(bad),
                Err(ChainError::InvalidAddress(Chain::Evm)),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn personal_sign_signature_verifies() {
        let signer = signer(0x11);
        let address = signer.address().to_string();
        let message = "Verify ownership of wallet address for AURORA Platform. Nonce: 42";
        let signature = sign(&signer, message);

        assert!(EvmVerifier.verify(&address, message, &signature).is_ok());
        // Lowercased address still matches.
        assert!(EvmVerifier
            .verify(&address.to_lowercase(), message, &signature)
            .is_ok());
    }

    #[test]
    fn signature_from_other_key_is_rejected() {
        let owner = signer(0x11);
        let attacker = signer(0x22);
        let signature = sign(&attacker, "hello");

        assert_eq!(
            EvmVerifier.verify(&owner.address().to_string(), "hello", &signature),
            Err(ChainError::SignatureMismatch)
        );
    }

    #[test]
    fn malformed_signature_is_reported() {
        let owner = signer(0x11);
        let address = owner.address().to_string();
        assert!(matches!(
            EvmVerifier.verify(&address, "hello", "0xnothex"),
            Err(ChainError::MalformedSignature(_))
        ));
        assert!(matches!(
            EvmVerifier.verify(&address, "hello", "0x1234"),
            Err(ChainError::MalformedSignature(_))
        ));
    }
}
