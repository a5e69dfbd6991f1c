// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Wallet registration and ownership verification endpoints.
//!
//! All operations require authentication. The authenticated user id is the
//! caller identity passed to the verification service.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    auth::Auth,
    error::ApiError,
    models::{
        ChallengeRequest, ChallengeResponse, RegisterWalletRequest, VerifyRequest, VerifyResponse,
        WalletResponse,
    },
    state::AppState,
    verification::VerificationError,
};

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| ApiError::bad_request(rejection.body_text()))
}

/// Register a wallet address for the authenticated user.
///
/// The wallet starts PENDING and unverified.
pub async fn register_wallet(
    Auth(user): Auth,
    State(state): State<AppState>,
    body: Result<Json<RegisterWalletRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<WalletResponse>), ApiError> {
    let request = json_body(body)?;
    let wallet = state
        .service
        .register_wallet(&request.wallet_address, &user.user_id)?;

    Ok((StatusCode::CREATED, Json(wallet.into())))
}

/// Get a wallet owned by the authenticated user.
pub async fn get_wallet(
    Auth(user): Auth,
    State(state): State<AppState>,
    Path(wallet_address): Path<String>,
) -> Result<Json<WalletResponse>, ApiError> {
    match state.service.get_wallet(&wallet_address, &user.user_id) {
        Ok(wallet) => Ok(Json(wallet.into())),
        Err(VerificationError::WalletNotFound) => Err(ApiError::not_found(format!(
            "Wallet {wallet_address} not found"
        ))),
        Err(e) => Err(e.into()),
    }
}

/// Issue a challenge message for the given wallet address.
///
/// Any previous challenge for the address stops being valid.
pub async fn issue_challenge(
    Auth(_user): Auth,
    State(state): State<AppState>,
    body: Result<Json<ChallengeRequest>, JsonRejection>,
) -> Result<Json<ChallengeResponse>, ApiError> {
    let request = json_body(body)?;
    let challenge = state.service.issue_challenge(&request.wallet_address)?;

    Ok(Json(ChallengeResponse {
        message: challenge.message,
        wallet_address: challenge.wallet_address,
    }))
}

/// Verify a signed challenge and mark the wallet verified.
pub async fn verify_wallet(
    Auth(user): Auth,
    State(state): State<AppState>,
    body: Result<Json<VerifyRequest>, JsonRejection>,
) -> Result<Json<VerifyResponse>, ApiError> {
    let request = json_body(body)?;
    let wallet = state.service.verify_ownership(
        &request.wallet_address,
        &request.signature,
        &user.user_id,
    )?;

    Ok(Json(VerifyResponse {
        wallet_address: wallet.wallet_address,
        verified: wallet.is_verified,
    }))
}
