// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Registry token claims.

use serde::{Deserialize, Deserializer, Serialize};

/// One granted resource entry of the `access` claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceAccess {
    #[serde(rename = "type")]
    pub resource_type: String,
    pub name: String,
    pub actions: Vec<String>,
}

/// Claim set carried by an issued token.
///
/// Only the claims validation depends on are required when decoding; tokens
/// from other issuers may omit `sub`, `iat` or `jti`, or send `aud` as a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimSet {
    /// Issuer
    pub iss: String,
    /// Subject (requesting account, may be empty)
    #[serde(default)]
    pub sub: String,
    /// Audience (target service)
    #[serde(deserialize_with = "single_audience")]
    pub aud: String,
    /// Expiration timestamp
    pub exp: i64,
    /// Not before timestamp
    pub nbf: i64,
    /// Issued at timestamp
    #[serde(default)]
    pub iat: i64,
    /// Token id (random, advisory)
    #[serde(default)]
    pub jti: String,
    /// Granted resource access
    #[serde(default)]
    pub access: Vec<ResourceAccess>,
}

/// Accept `"aud": "svc"` or `"aud": ["svc", ...]`, keeping the first entry.
///
/// Audience membership is checked by the verifier before claims are used.
fn single_audience<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Audience {
        One(String),
        Many(Vec<String>),
    }

    match Audience::deserialize(deserializer)? {
        Audience::One(aud) => Ok(aud),
        Audience::Many(list) => list
            .into_iter()
            .next()
            .ok_or_else(|| serde::de::Error::custom("empty audience list")),
    }
}

/// A signed, compact-serialized token.
///
/// Registry clients read either `token` or `access_token` from the response;
/// both carry this same value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub signed_value: String,
}

impl IssuedToken {
    pub fn new(signed_value: impl Into<String>) -> Self {
        Self {
            signed_value: signed_value.into(),
        }
    }

    pub fn token(&self) -> &str {
        &self.signed_value
    }

    pub fn access_token(&self) -> &str {
        &self.signed_value
    }
}
