// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Token issuance.
//!
//! ## Claims
//!
//! All timestamps derive from a single `now` captured per call:
//!
//! - `iat = now`
//! - `nbf = now - 10` (absorbs clock skew between issuer and registry)
//! - `exp` per the configured [`ExpiryPolicy`]
//!
//! The header carries the configured RSA algorithm, `typ: JWT` and the
//! signing key's `kid`.

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use rand::Rng;

use super::claims::{ClaimSet, IssuedToken, ResourceAccess};
use super::keys::{KeyMaterialError, SigningMaterial};
use super::kid::derive_kid;
use super::scope::{parse_scope, AuthorizationRequest};
use crate::config::{ExpiryPolicy, TokenConfig};

/// Seconds `nbf` is backdated from `iat`.
pub const NOT_BEFORE_SKEW_SECS: i64 = 10;

/// Upper bound (inclusive) of the random `jti`.
const JTI_MAX: u32 = 1_000_000;

/// Errors raised while issuing a token. Issuance never partially succeeds.
#[derive(Debug, thiserror::Error)]
pub enum TokenIssuanceError {
    #[error(transparent)]
    KeyMaterial(#[from] KeyMaterialError),

    #[error("Failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// Builds and signs registry tokens.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    issuer: String,
    algorithm: Algorithm,
    expiry: ExpiryPolicy,
}

impl TokenIssuer {
    pub fn new(config: &TokenConfig) -> Self {
        Self {
            issuer: config.issuer.clone(),
            algorithm: config.algorithm,
            expiry: config.expiry,
        }
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Parse a scope into a request attributed to this issuer.
    pub fn request(&self, service: &str, account: &str, scope: &str) -> AuthorizationRequest {
        parse_scope(&self.issuer, service, account, scope)
    }

    /// Sign a token granting `granted_actions` on the requested resource.
    pub fn issue(
        &self,
        material: &SigningMaterial,
        request: &AuthorizationRequest,
        granted_actions: &[String],
    ) -> Result<IssuedToken, TokenIssuanceError> {
        let now = chrono::Utc::now().timestamp();
        let jti = rand::rng().random_range(1..=JTI_MAX).to_string();
        self.issue_at(material, request, granted_actions, now, jti)
    }

    pub(crate) fn claims_at(
        &self,
        request: &AuthorizationRequest,
        granted_actions: &[String],
        now: i64,
        jti: String,
    ) -> ClaimSet {
        ClaimSet {
            iss: request.issuer.clone(),
            sub: request.account.clone(),
            aud: request.service.clone(),
            exp: self.expiry.expires_at(now),
            nbf: now - NOT_BEFORE_SKEW_SECS,
            iat: now,
            jti,
            access: vec![ResourceAccess {
                resource_type: request.resource_type.clone(),
                name: request.resource_name.clone(),
                actions: granted_actions.to_vec(),
            }],
        }
    }

    pub(crate) fn issue_at(
        &self,
        material: &SigningMaterial,
        request: &AuthorizationRequest,
        granted_actions: &[String],
        now: i64,
        jti: String,
    ) -> Result<IssuedToken, TokenIssuanceError> {
        let kid = derive_kid(&material.public_key)?;

        let mut header = Header::new(self.algorithm);
        header.typ = Some("JWT".to_string());
        header.kid = Some(kid.to_string());

        let claims = self.claims_at(request, granted_actions, now, jti);
        let key = EncodingKey::from_rsa_pem(&material.private_key)?;
        let signed = encode(&header, &claims, &key)?;

        tracing::debug!(
            kid = %kid,
            sub = %claims.sub,
            aud = %claims.aud,
            exp = claims.exp,
            "Signed registry token"
        );

        Ok(IssuedToken::new(signed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::keys::test_keys;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use serde_json::Value;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(&TokenConfig::new("Example Issuer", "registry.example.com"))
    }

    fn decode_segment(token: &str, index: usize) -> Value {
        let segment = token.split('.').nth(index).unwrap();
        serde_json::from_slice(&URL_SAFE_NO_PAD.decode(segment).unwrap()).unwrap()
    }

    #[test]
    fn timestamps_derive_from_one_instant() {
        let issuer = issuer();
        let request = issuer.request("registry.example.com", "alice", "repository:foo:pull");
        let claims = issuer.claims_at(&request, &request.requested_actions, 1_700_000_000, "7".into());

        assert_eq!(claims.iat, 1_700_000_000);
        assert_eq!(claims.nbf, 1_700_000_000 - 10);
        assert_eq!(claims.exp, 1_700_000_000 + 86_400);
        assert!(claims.exp > claims.nbf);
        assert!(claims.nbf <= claims.iat);
    }

    #[test]
    fn legacy_expiry_grows_with_epoch() {
        let issuer = TokenIssuer::new(&TokenConfig::default().with_expiry(ExpiryPolicy::Legacy));
        let request = issuer.request("svc", "alice", "repository:foo:pull");
        let claims = issuer.claims_at(&request, &request.requested_actions, 1_700_000_000, "7".into());
        assert_eq!(claims.exp, 1_700_000_000 + (1_700_000_000 + 86_400));
    }

    #[test]
    fn access_uses_granted_not_requested_actions() {
        let issuer = issuer();
        let request = issuer.request("svc", "alice", "repository:foo:pull,push,delete");
        let granted = vec!["pull".to_string()];
        let claims = issuer.claims_at(&request, &granted, 1_700_000_000, "1".into());

        assert_eq!(claims.access.len(), 1);
        assert_eq!(claims.access[0].resource_type, "repository");
        assert_eq!(claims.access[0].name, "foo");
        assert_eq!(claims.access[0].actions, vec!["pull"]);
    }

    #[test]
    fn header_carries_algorithm_type_and_kid() {
        let issuer = issuer();
        let request = issuer.request("registry.example.com", "alice", "repository:foo:pull");
        let token = issuer
            .issue(&test_keys::material(), &request, &request.requested_actions)
            .unwrap();

        let header = decode_segment(token.token(), 0);
        assert_eq!(header["alg"], "RS256");
        assert_eq!(header["typ"], "JWT");
        assert_eq!(header["kid"], test_keys::KID);
        assert_eq!(token.token().split('.').count(), 3);
    }

    #[test]
    fn payload_matches_request() {
        let issuer = issuer();
        let request = issuer.request(
            "registry.example.com",
            "alice",
            "repository:library/ubuntu:pull",
        );
        let token = issuer
            .issue(&test_keys::material(), &request, &request.requested_actions)
            .unwrap();

        let payload = decode_segment(token.access_token(), 1);
        assert_eq!(payload["iss"], "Example Issuer");
        assert_eq!(payload["sub"], "alice");
        assert_eq!(payload["aud"], "registry.example.com");
        assert_eq!(
            payload["access"],
            serde_json::json!([{"type": "repository", "name": "library/ubuntu", "actions": ["pull"]}])
        );

        let jti: u32 = payload["jti"].as_str().unwrap().parse().unwrap();
        assert!((1..=JTI_MAX).contains(&jti));
    }

    #[test]
    fn honours_configured_algorithm() {
        let issuer = TokenIssuer::new(&TokenConfig::default().with_algorithm(Algorithm::RS512));
        let request = issuer.request("svc", "alice", "repository:foo:pull");
        let token = issuer
            .issue(&test_keys::material(), &request, &request.requested_actions)
            .unwrap();
        assert_eq!(decode_segment(token.token(), 0)["alg"], "RS512");
    }

    #[test]
    fn invalid_public_key_fails_issuance() {
        let mut material = test_keys::material();
        material.public_key = b"garbage".to_vec();
        let issuer = issuer();
        let request = issuer.request("svc", "alice", "repository:foo:pull");

        let result = issuer.issue(&material, &request, &request.requested_actions);
        assert!(matches!(result, Err(TokenIssuanceError::KeyMaterial(_))));
    }

    #[test]
    fn invalid_private_key_fails_issuance() {
        let mut material = test_keys::material();
        material.private_key = b"garbage".to_vec();
        let issuer = issuer();
        let request = issuer.request("svc", "alice", "repository:foo:pull");

        let result = issuer.issue(&material, &request, &request.requested_actions);
        assert!(matches!(result, Err(TokenIssuanceError::Signing(_))));
    }
}
