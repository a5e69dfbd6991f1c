// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::auth::AuthConfig;
use crate::chain::verifier_for;
use crate::config::Config;
use crate::storage::{ChallengeStore, InMemoryStore, StorageResult, WalletDatabase, WalletStore};
use crate::verification::WalletVerificationService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<WalletVerificationService>,
    pub auth_config: AuthConfig,
}

impl AppState {
    pub fn new(service: WalletVerificationService, auth_config: AuthConfig) -> Self {
        Self {
            service: Arc::new(service),
            auth_config,
        }
    }

    /// Wire stores, verifier and auth from startup configuration.
    ///
    /// Uses the redb file under `DATA_DIR` when set, otherwise in-memory maps.
    pub fn from_config(config: &Config) -> StorageResult<Self> {
        let wallets: Arc<dyn WalletStore>;
        let challenges: Arc<dyn ChallengeStore>;
        match config.database_path() {
            Some(path) => {
                tracing::info!(path = %path.display(), "Opening wallet database");
                let db = Arc::new(WalletDatabase::open(&path)?);
                wallets = db.clone();
                challenges = db;
            }
            None => {
                tracing::warn!("DATA_DIR not set, wallet state will not survive restarts");
                let store = Arc::new(InMemoryStore::new());
                wallets = store.clone();
                challenges = store;
            }
        }

        let service = WalletVerificationService::new(wallets, challenges, verifier_for(config.chain))
            .with_settings(config.challenge.clone());
        let auth_config = AuthConfig::from_secret(&config.jwt_secret, config.jwt_issuer.clone());

        Ok(Self::new(service, auth_config))
    }
}

#[cfg(test)]
impl AppState {
    /// In-memory Stellar deployment authenticated with the test secret.
    pub fn for_tests() -> Self {
        use crate::auth::extractor::test_tokens::TEST_SECRET;
        use crate::chain::StellarVerifier;

        let store = Arc::new(InMemoryStore::new());
        let service =
            WalletVerificationService::new(store.clone(), store, Arc::new(StellarVerifier));
        Self::new(service, AuthConfig::from_secret(TEST_SECRET, None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::Chain;
    use crate::config::{DATA_DIR_ENV, JWT_SECRET_ENV, WALLET_CHAIN_ENV};

    #[test]
    fn from_config_opens_database_under_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("state").to_string_lossy().into_owned();
        let config = Config::from_lookup(|name| match name {
            JWT_SECRET_ENV => Some("s3cret".to_string()),
            DATA_DIR_ENV => Some(data_dir.clone()),
            WALLET_CHAIN_ENV => Some("evm".to_string()),
            _ => None,
        })
        .unwrap();

        let state = AppState::from_config(&config).unwrap();
        assert_eq!(state.service.verifier().chain(), Chain::Evm);
        assert!(state.service.check_storage().is_ok());
        assert!(dir.path().join("state").join("wallets.redb").exists());
    }
}
