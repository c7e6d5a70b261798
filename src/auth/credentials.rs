// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Credential checking.
//!
//! The token service only needs a yes/no answer for a username/password pair;
//! where the users live is up to the [`CredentialVerifier`] implementation.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Decides whether a username/password pair is valid.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// A single configured username/password pair.
#[derive(Clone)]
pub struct StaticCredentials {
    username: String,
    username_digest: [u8; 32],
    password_digest: [u8; 32],
}

fn digest(value: &str) -> [u8; 32] {
    Sha256::digest(value.as_bytes()).into()
}

impl StaticCredentials {
    pub fn new(username: impl Into<String>, password: &str) -> Self {
        let username = username.into();
        Self {
            username_digest: digest(&username),
            password_digest: digest(password),
            username,
        }
    }
}

impl std::fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        // Fixed-length digests, both always compared.
        let username_ok = digest(username)[..].ct_eq(&self.username_digest[..]);
        let password_ok = digest(password)[..].ct_eq(&self.password_digest[..]);
        (username_ok & password_ok).into()
    }
}
