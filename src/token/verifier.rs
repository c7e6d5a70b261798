// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token verification.
//!
//! Verification is self-contained: signature, algorithm, issuer, audience and
//! the `nbf`/`exp` window are all checked against the configured values and
//! the supplied public key, with no call back to the issuer.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

use super::claims::ClaimSet;
use crate::config::TokenConfig;

/// Why a presented token was rejected.
///
/// Display text keeps the three outcomes callers see: expired, invalid, or a
/// validation error with detail.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidToken {
    #[error("Token expired")]
    Expired,

    #[error("Invalid token")]
    NotYetValid,

    /// Bad structure, bad signature or unexpected algorithm.
    #[error("Invalid token")]
    Malformed(String),

    /// Issuer or audience differs from the configured value.
    #[error("Invalid token")]
    ClaimMismatch(&'static str),

    #[error("Token validation error: {0}")]
    Validation(String),
}

impl From<jsonwebtoken::errors::Error> for InvalidToken {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => InvalidToken::Expired,
            ErrorKind::ImmatureSignature => InvalidToken::NotYetValid,
            ErrorKind::InvalidIssuer => InvalidToken::ClaimMismatch("iss"),
            ErrorKind::InvalidAudience => InvalidToken::ClaimMismatch("aud"),
            ErrorKind::MissingRequiredClaim(claim) => match claim.as_str() {
                "iss" => InvalidToken::ClaimMismatch("iss"),
                "aud" => InvalidToken::ClaimMismatch("aud"),
                _ => InvalidToken::Malformed(e.to_string()),
            },
            ErrorKind::InvalidToken
            | ErrorKind::InvalidSignature
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidAlgorithmName
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => InvalidToken::Malformed(e.to_string()),
            _ => InvalidToken::Validation(e.to_string()),
        }
    }
}

/// Validates registry tokens against one public key.
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    issuer: String,
    audience: String,
    algorithm: Algorithm,
    leeway_secs: u64,
}

impl TokenVerifier {
    pub fn new(config: &TokenConfig) -> Self {
        Self {
            issuer: config.issuer.clone(),
            audience: config.service.clone(),
            algorithm: config.algorithm,
            leeway_secs: config.leeway_secs,
        }
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = self.leeway_secs;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.set_required_spec_claims(&["exp", "nbf", "iss", "aud"]);
        validation
    }

    /// Verify `token` with a `PUBLIC KEY` PEM and return its claims.
    pub fn verify(&self, token: &str, public_key_pem: &[u8]) -> Result<ClaimSet, InvalidToken> {
        let key = DecodingKey::from_rsa_pem(public_key_pem)
            .map_err(|e| InvalidToken::Validation(e.to_string()))?;

        let data = decode::<ClaimSet>(token, &key, &self.validation())?;
        Ok(data.claims)
    }
}
