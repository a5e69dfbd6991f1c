// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Bearer JWT authentication for the wallet verification API.
//!
//! ## Auth Flow
//!
//! 1. The account service issues an HS256 JWT signed with the shared secret
//! 2. Clients send `Authorization: Bearer <JWT>`
//! 3. This server:
//!    - Verifies signature and expiry (and issuer, if `JWT_ISSUER` is set)
//!    - Extracts `sub` → canonical `user_id`
//!
//! ## Security
//!
//! - All non-health endpoints require authentication
//! - Clock skew tolerance is 60 seconds

pub mod claims;
pub mod error;
pub mod extractor;

pub use claims::AuthenticatedUser;
pub use error::AuthError;
pub use extractor::{Auth, AuthConfig};
