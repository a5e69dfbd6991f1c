// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::verification::VerificationError;

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    error_code: &'static str,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "bad_request", message)
    }
}

impl From<VerificationError> for ApiError {
    fn from(err: VerificationError) -> Self {
        let status = match &err {
            VerificationError::InvalidAddressFormat(_)
            | VerificationError::WalletNotFound
            | VerificationError::OwnershipMismatch
            | VerificationError::NoActiveChallenge
            | VerificationError::InvalidSignature => StatusCode::BAD_REQUEST,
            VerificationError::WalletAlreadyRegistered => StatusCode::CONFLICT,
            VerificationError::ExpiryOutOfRange => {
                tracing::error!("Configured challenge TTL overflows the expiry timestamp");
                return Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    err.error_code(),
                    "Internal server error",
                );
            }
            VerificationError::Persistence(e) => {
                tracing::error!(error = %e, "Storage failure while handling request");
                return Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    err.error_code(),
                    "Internal server error",
                );
            }
        };
        Self::new(status, err.error_code(), err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
            error_code: self.code,
        });
        (self.status, body).into_response()
    }
}
