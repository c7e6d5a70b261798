// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Response bodies of the token endpoints. All types derive `Serialize` and
//! `ToSchema` for JSON handling and OpenAPI documentation.
//!
//! ## Model Categories
//!
//! - **Tokens**: `{"token": ..., "access_token": ...}`
//! - **Status**: `{"status": "OK"}` from `/validate`
//! - **Errors**: `{"detail": ...}` and the registry `{"errors": [...]}` envelope

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::token::IssuedToken;

// =============================================================================
// Tokens
// =============================================================================

/// Token response.
///
/// Docker clients read `token`, OAuth2-style clients read `access_token`;
/// both hold the same signed value.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct TokenResponse {
    /// Signed bearer token
    pub token: String,
    /// Same value as `token`
    pub access_token: String,
}

impl TokenResponse {
    pub fn echo(token: impl Into<String>) -> Self {
        let token = token.into();
        Self {
            access_token: token.clone(),
            token,
        }
    }
}

impl From<IssuedToken> for TokenResponse {
    fn from(issued: IssuedToken) -> Self {
        Self::echo(issued.signed_value)
    }
}

// =============================================================================
// Status
// =============================================================================

/// Successful validation.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct StatusResponse {
    pub status: String,
}

impl StatusResponse {
    pub fn ok() -> Self {
        Self {
            status: "OK".to_string(),
        }
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Generic error body.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct DetailResponse {
    pub detail: String,
}

/// One entry of the registry error envelope.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct RegistryError {
    /// Error code, e.g. `UNAUTHORIZED`
    pub code: String,
    pub message: String,
    /// Reason the token was rejected
    pub detail: String,
}

/// Registry error envelope returned by `/validate`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct RegistryErrorResponse {
    pub errors: Vec<RegistryError>,
}

impl RegistryErrorResponse {
    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self {
            errors: vec![RegistryError {
                code: "UNAUTHORIZED".to_string(),
                message: "authentication required".to_string(),
                detail: detail.into(),
            }],
        }
    }
}
