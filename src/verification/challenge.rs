// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Challenge construction: nonce generation and the signed message text.
//!
//! The message is what the wallet holder signs, byte for byte, so it is built
//! in exactly one place.

use chrono::Duration;
use k256::elliptic_curve::rand_core::{OsRng, RngCore};

/// Nonce size in bytes (128 bits).
const NONCE_BYTES: usize = 16;

/// Application name embedded in challenge messages unless configured.
pub const DEFAULT_APP_NAME: &str = "AURORA";

/// Default challenge lifetime in seconds (15 minutes).
pub const DEFAULT_CHALLENGE_TTL_SECS: i64 = 15 * 60;

/// Upper bound accepted for a configured challenge lifetime (one day).
pub const MAX_CHALLENGE_TTL_SECS: i64 = 24 * 60 * 60;

/// Settings that shape issued challenges.
#[derive(Debug, Clone)]
pub struct ChallengeSettings {
    pub app_name: String,
    pub ttl: Duration,
}

impl Default for ChallengeSettings {
    fn default() -> Self {
        Self {
            app_name: DEFAULT_APP_NAME.to_string(),
            ttl: Duration::seconds(DEFAULT_CHALLENGE_TTL_SECS),
        }
    }
}

/// Generate a hex-encoded nonce from the OS CSPRNG.
pub fn generate_nonce() -> String {
    let mut bytes = [0u8; NONCE_BYTES];
    OsRng.fill_bytes(&mut bytes);
    alloy::hex::encode(bytes)
}

/// Build the exact text a wallet holder must sign.
pub fn challenge_message(app_name: &str, wallet_address: &str, nonce: &str) -> String {
    format!(
        "Verify ownership of wallet address {wallet_address} for {app_name} Platform. Nonce: {nonce}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn nonce_is_128_bit_hex() {
        let nonce = generate_nonce();
        assert_eq!(nonce.len(), NONCE_BYTES * 2);
        assert!(nonce.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn nonces_do_not_repeat() {
        let nonces: HashSet<String> = (0..100).map(|_| generate_nonce()).collect();
        assert_eq!(nonces.len(), 100);
    }

    #[test]
    fn message_embeds_address_app_and_nonce() {
        let message = challenge_message("AURORA", "GADDR", "abc123");
        assert_eq!(
            message,
            "Verify ownership of wallet address GADDR for AURORA Platform. Nonce: abc123"
        );
    }

    #[test]
    fn default_settings_use_fifteen_minutes() {
        let settings = ChallengeSettings::default();
        assert_eq!(settings.ttl, Duration::minutes(15));
        assert_eq!(settings.app_name, "AURORA");
    }
}
