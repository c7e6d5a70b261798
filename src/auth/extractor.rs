// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Axum extractors for HTTP basic credentials.
//!
//! Registry clients send `Authorization: Basic base64(username:password)`.
//! On `/auth` and `/validate` the password field carries a previously issued
//! token, so [`BasicAuth`] only decodes; [`Authenticated`] additionally checks
//! the pair against the configured [`CredentialVerifier`].
//!
//! ```rust,ignore
//! async fn my_handler(Authenticated(username): Authenticated) -> impl IntoResponse {
//!     // username passed the credential check
//! }
//! ```
//!
//! [`CredentialVerifier`]: super::CredentialVerifier

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use base64ct::{Base64, Encoding};

use super::AuthError;
use crate::state::AppState;

/// Decoded basic credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl BasicCredentials {
    /// Parse an `Authorization` header value.
    pub fn from_header(value: &str) -> Result<Self, AuthError> {
        let (scheme, encoded) = value
            .trim()
            .split_once(' ')
            .ok_or(AuthError::MissingCredentials)?;
        if !scheme.eq_ignore_ascii_case("basic") {
            return Err(AuthError::MissingCredentials);
        }

        let decoded =
            Base64::decode_vec(encoded.trim()).map_err(|_| AuthError::MalformedCredentials)?;
        let decoded = String::from_utf8(decoded).map_err(|_| AuthError::MalformedCredentials)?;
        let (username, password) = decoded
            .split_once(':')
            .ok_or(AuthError::MalformedCredentials)?;

        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }
}

/// Extractor for raw basic credentials, without checking them.
pub struct BasicAuth(pub BasicCredentials);

impl<S: Send + Sync> FromRequestParts<S> for BasicAuth {
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingCredentials)?
            .to_str()
            .map_err(|_| AuthError::MalformedCredentials)?;

        Ok(BasicAuth(BasicCredentials::from_header(header)?))
    }
}

/// Extractor that requires valid credentials; yields the username.
pub struct Authenticated(pub String);

impl FromRequestParts<AppState> for Authenticated {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let BasicAuth(credentials) = BasicAuth::from_request_parts(parts, state)
            .await
            .inspect_err(|e| tracing::warn!(reason = e.error_code(), "Rejected basic credentials"))?;

        if !state
            .credentials
            .verify(&credentials.username, &credentials.password)
        {
            tracing::warn!(username = %credentials.username, "Invalid credentials");
            return Err(AuthError::InvalidCredentials);
        }

        Ok(Authenticated(credentials.username))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_state;
    use axum::http::Request;

    fn basic(user: &str, pass: &str) -> String {
        format!("Basic {}", Base64::encode_string(format!("{user}:{pass}").as_bytes()))
    }

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/get-token");
        if let Some(value) = value {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn parses_basic_header() {
        let creds = BasicCredentials::from_header(&basic("alice", "s3cr:et")).unwrap();
        assert_eq!(creds.username, "alice");
        assert_eq!(creds.password, "s3cr:et");
    }

    #[test]
    fn scheme_is_case_insensitive() {
        let header = basic("alice", "pw").replacen("Basic", "basic", 1);
        assert!(BasicCredentials::from_header(&header).is_ok());
    }

    #[test]
    fn rejects_other_schemes() {
        assert_eq!(
            BasicCredentials::from_header("Bearer abc.def.ghi"),
            Err(AuthError::MissingCredentials)
        );
        assert_eq!(
            BasicCredentials::from_header("Basic"),
            Err(AuthError::MissingCredentials)
        );
    }

    #[test]
    fn rejects_bad_payloads() {
        assert_eq!(
            BasicCredentials::from_header("Basic !!!not-base64!!!"),
            Err(AuthError::MalformedCredentials)
        );
        let no_colon = format!("Basic {}", Base64::encode_string(b"alice"));
        assert_eq!(
            BasicCredentials::from_header(&no_colon),
            Err(AuthError::MalformedCredentials)
        );
    }

    #[tokio::test]
    async fn basic_auth_requires_header() {
        let mut parts = parts_with_auth(None);
        let result = BasicAuth::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthError::MissingCredentials)));
    }

    #[tokio::test]
    async fn basic_auth_does_not_check_password() {
        let mut parts = parts_with_auth(Some(&basic("anyone", "a.jwt.token")));
        let BasicAuth(creds) = BasicAuth::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(creds.password, "a.jwt.token");
    }

    #[tokio::test]
    async fn authenticated_accepts_configured_pair() {
        let state = test_state();
        let mut parts = parts_with_auth(Some(&basic("demo", "demo")));
        let Authenticated(username) = Authenticated::from_request_parts(&mut parts, &state)
            .await
            .unwrap();
        assert_eq!(username, "demo");
    }

    #[tokio::test]
    async fn authenticated_rejects_wrong_password() {
        let state = test_state();
        let mut parts = parts_with_auth(Some(&basic("demo", "nope")));
        let result = Authenticated::from_request_parts(&mut parts, &state).await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }
}
