// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token endpoints.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    auth::{Authenticated, BasicAuth},
    error::ApiError,
    models::{DetailResponse, RegistryErrorResponse, StatusResponse, TokenResponse},
    state::AppState,
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct TokenQuery {
    /// Target service (token audience)
    pub service: String,
    /// Requested scope, `type:name:action1,action2`
    pub scope: String,
    /// Account the token is issued for
    #[serde(default)]
    pub account: String,
}

/// Echo a previously obtained token supplied as the basic-auth password.
#[utoipa::path(
    get,
    path = "/auth",
    tag = "Token",
    security(("basic" = [])),
    responses(
        (status = 200, description = "Token echoed back", body = TokenResponse),
        (status = 401, description = "No basic credentials"),
    )
)]
pub async fn auth(BasicAuth(credentials): BasicAuth) -> Json<TokenResponse> {
    Json(TokenResponse::echo(credentials.password))
}

/// Issue a token for the requested scope.
#[utoipa::path(
    get,
    path = "/get-token",
    params(TokenQuery),
    tag = "Token",
    security(("basic" = [])),
    responses(
        (status = 200, description = "Signed token", body = TokenResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "No actions granted", body = DetailResponse),
        (status = 500, description = "Key material or signing failure", body = DetailResponse),
    )
)]
pub async fn get_token(
    Authenticated(username): Authenticated,
    State(state): State<AppState>,
    Query(params): Query<TokenQuery>,
) -> Result<Json<TokenResponse>, ApiError> {
    let material = state.keys.load().inspect_err(|e| {
        tracing::warn!(error = %e, "Failed to load signing key material");
    })?;

    let request = state
        .issuer
        .request(&params.service, &params.account, &params.scope);
    let actions = state.authorizer.authorize(&request);

    if actions.is_empty() {
        tracing::warn!(
            username = %username,
            scope = %params.scope,
            "No actions granted for scope"
        );
        return Err(ApiError::forbidden("Unauthorized actions"));
    }

    let issued = state
        .issuer
        .issue(&material, &request, &actions)
        .inspect_err(|e| tracing::warn!(error = %e, "Token issuance failed"))?;

    tracing::info!(
        username = %username,
        account = %request.account,
        service = %request.service,
        resource_type = %request.resource_type,
        resource_name = %request.resource_name,
        actions = actions.len(),
        "Issued registry token"
    );

    Ok(Json(issued.into()))
}

/// Validate a token supplied as the basic-auth password.
#[utoipa::path(
    get,
    path = "/validate",
    tag = "Token",
    security(("basic" = [])),
    responses(
        (status = 200, description = "Token is valid", body = StatusResponse),
        (status = 401, description = "Token rejected", body = RegistryErrorResponse),
        (status = 500, description = "Key material failure", body = DetailResponse),
    )
)]
pub async fn validate(
    State(state): State<AppState>,
    BasicAuth(credentials): BasicAuth,
) -> Result<Json<StatusResponse>, ApiError> {
    let material = state.keys.load().inspect_err(|e| {
        tracing::warn!(error = %e, "Failed to load signing key material");
    })?;

    let claims = state
        .verifier
        .verify(&credentials.password, &material.public_key)
        .inspect_err(|e| tracing::warn!(reason = ?e, "Rejected token"))?;

    tracing::debug!(sub = %claims.sub, aud = %claims.aud, "Validated token");
    Ok(Json(StatusResponse::ok()))
}
