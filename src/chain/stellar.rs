// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Stellar account keys (StrKey) and Ed25519 signature verification.
//!
//! A Stellar account ID is the RFC 4648 base32 encoding (no padding) of:
//!
//! ```text
//! version byte (6 << 3) | 32-byte Ed25519 public key | CRC16-XModem (little-endian)
//! ```
//!
//! which always yields a 56-character string starting with `G`.

use base32::Alphabet;
use base64ct::{Base64, Encoding};
use ed25519_dalek::{Signature, VerifyingKey};

use super::{Chain, ChainError, SignatureVerifier};

/// Version byte for an Ed25519 account ID.
const ED25519_PUBLIC_KEY_VERSION: u8 = 6 << 3;

/// Encoded length of an account ID.
const STRKEY_LEN: usize = 56;

/// Decoded length: version + key + checksum.
const DECODED_LEN: usize = 1 + 32 + 2;

const BASE32: Alphabet = Alphabet::Rfc4648 { padding: false };

/// Verifier for Stellar Ed25519 accounts.
#[derive(Debug, Clone, Copy, Default)]
pub struct StellarVerifier;

impl SignatureVerifier for StellarVerifier {
    fn chain(&self) -> Chain {
        Chain::Stellar
    }

    fn canonical_address(&self, address: &str) -> Result<String, ChainError> {
        decode_public_key(address).map(|key| encode_public_key(&key))
    }

    fn verify(&self, address: &str, message: &str, signature: &str) -> Result<(), ChainError> {
        let key = decode_public_key(address)?;

        // Structurally valid StrKeys can still carry bytes that are not a curve point.
        let verifying_key =
            VerifyingKey::from_bytes(&key).map_err(|_| ChainError::SignatureMismatch)?;

        let raw = Base64::decode_vec(signature.trim())
            .map_err(|e| ChainError::MalformedSignature(format!("invalid base64: {e}")))?;
        let signature = Signature::from_slice(&raw)
            .map_err(|_| ChainError::MalformedSignature("expected 64 bytes".to_string()))?;

        // Strict mode rejects small-order keys and non-canonical R, as libsodium does.
        verifying_key
            .verify_strict(message.as_bytes(), &signature)
            .map_err(|_| ChainError::SignatureMismatch)
    }
}

/// Decode a StrKey account ID into the raw Ed25519 public key.
///
/// Input is accepted case-insensitively; the checksum is always enforced.
pub fn decode_public_key(address: &str) -> Result<[u8; 32], ChainError> {
    let invalid = || ChainError::InvalidAddress(Chain::Stellar);

    let address = address.trim().to_ascii_uppercase();
    if address.len() != STRKEY_LEN {
        return Err(invalid());
    }

    let raw = base32::decode(BASE32, &address).ok_or_else(invalid)?;
    if raw.len() != DECODED_LEN || raw[0] != ED25519_PUBLIC_KEY_VERSION {
        return Err(invalid());
    }

    let (body, checksum) = raw.split_at(DECODED_LEN - 2);
    if checksum != crc16_xmodem(body).to_le_bytes() {
        return Err(invalid());
    }

    let mut key = [0u8; 32];
    key.copy_from_slice(&body[1..]);
    Ok(key)
}

/// Encode a raw Ed25519 public key as a StrKey account ID.
pub fn encode_public_key(key: &[u8; 32]) -> String {
    let mut raw = Vec::with_capacity(DECODED_LEN);
    raw.push(ED25519_PUBLIC_KEY_VERSION);
    raw.extend_from_slice(key);
    let checksum = crc16_xmodem(&raw);
    raw.extend_from_slice(&checksum.to_le_bytes());
    base32::encode(BASE32, &raw)
}

/// CRC16-XModem (poly 0x1021, init 0).
fn crc16_xmodem(data: &[u8]) -> u16 {
    let mut crc: u16 = 0;
    for &byte in data {
        crc ^= (byte as u16) << 8;
        for _ in 0..8 {
            crc = if crc & 0x8000 != 0 {
                (crc << 1) ^ 0x1021
            } else {
                crc << 1
            };
        }
    }
    crc
}

#[cfg(test)]
mod tests {
    use super::*;
    use ed25519_dalek::{Signer, SigningKey};

    fn keypair(seed: u8) -> (SigningKey, String) {
        let signing_key = SigningKey::from_bytes(&[seed; 32]);
        let address = encode_public_key(&signing_key.verifying_key().to_bytes());
        (signing_key, address)
    }

    fn sign(signing_key: &SigningKey, message: &str) -> String {
        Base64::encode_string(&signing_key.sign(message.as_bytes()).to_bytes())
    }

    #[test]
    fn small_order_key_is_rejected() {
        // Identity point: with R = identity and s = 0 the cofactorless equation
        // holds for any message.
        let mut identity = [0u8; 32];
        identity[0] = 1;
        let address = encode_public_key(&identity);

        let mut forged = [0u8; 64];
        forged[0] = 1;
        let signature = Base64::encode_string(&forged);

        assert_eq!(
            StellarVerifier.verify(&address, "any message", &signature),
            Err(ChainError::SignatureMismatch)
        );
    }

    #[test]
    fn crc16_xmodem_known_vector() {
        // Standard check value for CRC-16/XMODEM.
        assert_eq!(crc16_xmodem(b"123456789"), 0x31C3);
    }

    #[test]
    fn encoded_account_id_has_stellar_shape() {
        let (_, address) = keypair(7);
        assert_eq!(address.len(), STRKEY_LEN);
        assert!(address.starts_with('G'));
        assert!(address
            .chars()
            .all(|c| c.is_ascii_uppercase() || ('2'..='7').contains(&c)));
    }

    #[test]
    fn decode_round_trips_key() {
        let (signing_key, address) = keypair(7);
        let key = decode_public_key(&address).unwrap();
        assert_eq!(key, signing_key.verifying_key().to_bytes());
    }

    #[test]
    fn lowercase_input_is_canonicalized() {
        let (_, address) = keypair(3);
        let canonical = StellarVerifier
            .canonical_address(&address.to_lowercase())
            .unwrap();
        assert_eq!(canonical, address);
    }

    #[test]
    fn corrupted_checksum_is_rejected() {
        let (_, address) = keypair(7);
        let mut chars: Vec<char> = address.chars().collect();
        let last = chars.len() - 1;
        chars[last] = if chars[last] == 'A' { 'B' } else { 'A' };
        let tampered: String = chars.into_iter().collect();

        assert_eq!(
            decode_public_key(&tampered),
            Err(ChainError::InvalidAddress(Chain::Stellar))
        );
    }

    #[test]
    fn wrong_length_and_evm_addresses_are_rejected() {
        let (_, address) = keypair(7);
        assert!(decode_public_key(&address[..55]).is_err());
        assert!(decode_public_key("").is_err());
        assert!(decode_public_key("0x742d35Cc6634C0532925a3b844Bc9e7595f4aB12").is_err());
    }

    #[test]
    fn secret_seed_prefix_is_rejected() {
        // Same payload shape but with the secret-seed version byte (18 << 3 => 'S').
        let mut raw = vec![18 << 3];
        raw.extend_from_slice(&[7u8; 32]);
        let checksum = crc16_xmodem(&raw);
        raw.extend_from_slice(&checksum.to_le_bytes());
        let seed = base32::encode(BASE32, &raw);
        assert!(seed.starts_with('S'));
        assert!(decode_public_key(&seed).is_err());
    }

    #[test]
    fn valid_signature_verifies() {
        let (signing_key, address) = keypair(7);
        let message = "Verify ownership of wallet address for AURORA Platform. Nonce: 1";
        let signature = sign(&signing_key, message);

        assert!(StellarVerifier.verify(&address, message, &signature).is_ok());
    }

    #[test]
    fn signature_from_other_key_is_rejected() {
        let (_, address) = keypair(7);
        let (other_key, _) = keypair(9);
        let message = "hello";
        let signature = sign(&other_key, message);

        assert_eq!(
            StellarVerifier.verify(&address, message, &signature),
            Err(ChainError::SignatureMismatch)
        );
    }

    #[test]
    fn signature_over_other_message_is_rejected() {
        let (signing_key, address) = keypair(7);
        let signature = sign(&signing_key, "old message");

        assert_eq!(
            StellarVerifier.verify(&address, "new message", &signature),
            Err(ChainError::SignatureMismatch)
        );
    }

    #[test]
    fn malformed_signature_encoding_is_reported() {
        let (_, address) = keypair(7);
        assert!(matches!(
            StellarVerifier.verify(&address, "hello", "not base64!!"),
            Err(ChainError::MalformedSignature(_))
        ));
        assert!(matches!(
            StellarVerifier.verify(&address, "hello", &Base64::encode_string(&[1u8; 10])),
            Err(ChainError::MalformedSignature(_))
        ));
    }
}
