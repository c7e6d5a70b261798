// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::{header::WWW_AUTHENTICATE, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

use crate::models::{DetailResponse, RegistryErrorResponse};
use crate::token::{InvalidToken, KeyMaterialError, TokenIssuanceError};

/// Challenge sent with rejected tokens.
pub const REGISTRY_REALM_CHALLENGE: &str = "Basic realm=\"Registry Realm\"";

#[derive(Debug)]
pub enum ApiError {
    /// `{"detail": ...}` with the given status.
    Detail { status: StatusCode, message: String },
    /// Registry error envelope, 401 with a realm challenge.
    InvalidToken(InvalidToken),
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Detail {
            status,
            message: message.into(),
        }
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    pub fn server_error(cause: impl std::fmt::Display) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Server error: {cause}"),
        )
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Detail { status, .. } => *status,
            ApiError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
        }
    }
}

impl From<KeyMaterialError> for ApiError {
    fn from(e: KeyMaterialError) -> Self {
        Self::server_error(e)
    }
}

impl From<TokenIssuanceError> for ApiError {
    fn from(e: TokenIssuanceError) -> Self {
        Self::server_error(e)
    }
}

impl From<InvalidToken> for ApiError {
    fn from(e: InvalidToken) -> Self {
        Self::InvalidToken(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Detail { status, message } => {
                (status, Json(DetailResponse { detail: message })).into_response()
            }
            ApiError::InvalidToken(e) => (
                StatusCode::UNAUTHORIZED,
                [(WWW_AUTHENTICATE, REGISTRY_REALM_CHALLENGE)],
                Json(RegistryErrorResponse::unauthorized(e.to_string())),
            )
                .into_response(),
        }
    }
}
