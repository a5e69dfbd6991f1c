// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Expired Challenge Sweeper
//!
//! Background task that periodically deletes expired challenges. Expired
//! challenges are already invisible to verification, so this only bounds
//! storage growth from challenges that were issued and never used.
//!
//! ## Shutdown
//!
//! Uses `tokio_util::sync::CancellationToken`; the token is cancelled by the
//! shutdown signal handler in `main`.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::verification::WalletVerificationService;

pub struct ChallengeSweeper {
    service: Arc<WalletVerificationService>,
    interval: Duration,
}

impl ChallengeSweeper {
    pub fn new(service: Arc<WalletVerificationService>, interval: Duration) -> Self {
        Self { service, interval }
    }

    /// Run the sweep loop until the cancellation token is triggered.
    ///
    /// Should be spawned as a background task:
    /// ```rust,ignore
    /// tokio::spawn(sweeper.run(shutdown.clone()));
    /// ```
    pub async fn run(self, shutdown: CancellationToken) {
        info!(
            interval_secs = self.interval.as_secs(),
            "Challenge sweeper starting"
        );

        loop {
            tokio::select! {
                _ = tokio::time::sleep(self.interval) => {},
                _ = shutdown.cancelled() => {
                    info!("Challenge sweeper shutting down");
                    return;
                }
            }

            self.sweep();
        }
    }

    /// Execute one sweep. Returns how many challenges were removed.
    pub fn sweep(&self) -> usize {
        match self.service.purge_expired_challenges() {
            Ok(0) => {
                debug!("No expired challenges to purge");
                0
            }
            Ok(removed) => {
                info!(removed, "Purged expired challenges");
                removed
            }
            Err(e) => {
                warn!(error = %e, "Challenge sweep failed, will retry");
                0
            }
        }
    }
}

/// Wait for a spawned sweeper to finish after shutdown.
///
/// Returns `false` if the task panicked or was aborted; the cause is logged.
pub async fn join_sweeper(handle: JoinHandle<()>) -> bool {
    match handle.await {
        Ok(()) => true,
        Err(e) => {
            error!(error = %e, panicked = e.is_panic(), "Challenge sweeper task failed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::stellar::encode_public_key;
    use crate::chain::StellarVerifier;
    use crate::clock::ManualClock;
    use crate::storage::InMemoryStore;
    use chrono::Utc;

    fn service_with_clock() -> (Arc<WalletVerificationService>, Arc<ManualClock>) {
        let store = Arc::new(InMemoryStore::new());
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let service =
            WalletVerificationService::new(store.clone(), store, Arc::new(StellarVerifier))
                .with_clock(clock.clone());
        (Arc::new(service), clock)
    }

    #[test]
    fn sweep_removes_expired_challenges() {
        let (service, clock) = service_with_clock();
        let address = encode_public_key(&[3u8; 32]);
        service.issue_challenge(&address).unwrap();

        let sweeper = ChallengeSweeper::new(service, Duration::from_secs(60));
        assert_eq!(sweeper.sweep(), 0);

        clock.advance(chrono::Duration::minutes(16));
        assert_eq!(sweeper.sweep(), 1);
    }

    #[tokio::test]
    async fn run_stops_on_cancellation() {
        let (service, _clock) = service_with_clock();
        let sweeper = ChallengeSweeper::new(service, Duration::from_secs(3600));
        let shutdown = CancellationToken::new();

        let handle = tokio::spawn(sweeper.run(shutdown.clone()));
        shutdown.cancel();

        let joined = tokio::time::timeout(Duration::from_secs(5), join_sweeper(handle))
            .await
            .expect("sweeper did not stop");
        assert!(joined);
    }

    #[tokio::test]
    async fn join_reports_panicked_task() {
        let handle = tokio::spawn(async { panic!("sweep exploded") });
        assert!(!join_sweeper(handle).await);
    }
}
