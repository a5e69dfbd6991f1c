// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! This module defines environment variable names and default values used
//! throughout the application. Configuration is loaded from the environment
//! once at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `DATA_DIR` | Directory holding `wallets.redb` | unset (in-memory) |
//! | `JWT_SECRET` | HS256 secret for bearer tokens | Required |
//! | `JWT_ISSUER` | Expected JWT issuer claim | Optional |
//! | `WALLET_CHAIN` | Signature scheme (`stellar` or `evm`) | `stellar` |
//! | `APP_NAME` | Name embedded in challenge messages | `AURORA` |
//! | `CHALLENGE_TTL_SECS` | Challenge lifetime | `900` |
//! | `CHALLENGE_SWEEP_INTERVAL_SECS` | Expired challenge purge interval | `300` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::chain::{Chain, ChainError};
use crate::verification::challenge::{
    ChallengeSettings, DEFAULT_APP_NAME, DEFAULT_CHALLENGE_TTL_SECS, MAX_CHALLENGE_TTL_SECS,
};

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";

/// Directory for the embedded database. When unset, state lives in memory
/// and is lost on restart.
pub const DATA_DIR_ENV: &str = "DATA_DIR";

pub const JWT_SECRET_ENV: &str = "JWT_SECRET";
pub const JWT_ISSUER_ENV: &str = "JWT_ISSUER";
pub const WALLET_CHAIN_ENV: &str = "WALLET_CHAIN";
pub const APP_NAME_ENV: &str = "APP_NAME";
pub const CHALLENGE_TTL_ENV: &str = "CHALLENGE_TTL_SECS";
pub const SWEEP_INTERVAL_ENV: &str = "CHALLENGE_SWEEP_INTERVAL_SECS";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 300;
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

/// File name of the redb database inside `DATA_DIR`.
pub const DATABASE_FILE: &str = "wallets.redb";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has invalid value '{value}'")]
    Invalid { name: &'static str, value: String },

    #[error(transparent)]
    Chain(#[from] ChainError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Settings read from the environment at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub data_dir: Option<PathBuf>,
    pub jwt_secret: String,
    pub jwt_issuer: Option<String>,
    pub chain: Chain,
    pub challenge: ChallengeSettings,
    pub sweep_interval: Duration,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let host = var(HOST_ENV).unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match var(PORT_ENV) {
            Some(v) => parse(PORT_ENV, &v)?,
            None => DEFAULT_PORT,
        };
        let bind_addr = format!("{host}:{port}")
            .parse()
            .map_err(|_| ConfigError::Invalid {
                name: HOST_ENV,
                value: host,
            })?;

        let jwt_secret = var(JWT_SECRET_ENV).ok_or(ConfigError::Missing(JWT_SECRET_ENV))?;

        let chain = match var(WALLET_CHAIN_ENV) {
            Some(v) => v.parse()?,
            None => Chain::Stellar,
        };

        let ttl_secs: i64 = match var(CHALLENGE_TTL_ENV) {
            Some(v) => parse(CHALLENGE_TTL_ENV, &v)?,
            None => DEFAULT_CHALLENGE_TTL_SECS,
        };
        let ttl = chrono::Duration::try_seconds(ttl_secs)
            .filter(|_| (1..=MAX_CHALLENGE_TTL_SECS).contains(&ttl_secs))
            .ok_or_else(|| ConfigError::Invalid {
                name: CHALLENGE_TTL_ENV,
                value: ttl_secs.to_string(),
            })?;

        let sweep_secs: u64 = match var(SWEEP_INTERVAL_ENV) {
            Some(v) => parse(SWEEP_INTERVAL_ENV, &v)?,
            None => DEFAULT_SWEEP_INTERVAL_SECS,
        };
        if sweep_secs == 0 {
            return Err(ConfigError::Invalid {
                name: SWEEP_INTERVAL_ENV,
                value: "0".to_string(),
            });
        }

        let log_format = match var(LOG_FORMAT_ENV).as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    name: LOG_FORMAT_ENV,
                    value: other.to_string(),
                })
            }
        };

        Ok(Self {
            bind_addr,
            data_dir: var(DATA_DIR_ENV).map(PathBuf::from),
            jwt_secret,
            jwt_issuer: var(JWT_ISSUER_ENV),
            chain,
            challenge: ChallengeSettings {
                app_name: var(APP_NAME_ENV).unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
                ttl,
            },
            sweep_interval: Duration::from_secs(sweep_secs),
            log_format,
        })
    }

    /// Path of the database file, if persistence is enabled.
    pub fn database_path(&self) -> Option<PathBuf> {
        self.data_dir.as_ref().map(|dir| dir.join(DATABASE_FILE))
    }
}

fn parse<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        name,
        value: value.to_string(),
    })
}
