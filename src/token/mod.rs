// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Registry Token Module
//!
//! Issues and validates the RS256 bearer tokens used by registry-style
//! token authentication.
//!
//! ## Token Flow
//!
//! 1. Client authenticates with basic credentials and asks for a scope
//!    (`repository:library/ubuntu:pull`)
//! 2. The scope is parsed into an [`AuthorizationRequest`]
//! 3. An [`Authorizer`] decides which actions are granted
//! 4. [`TokenIssuer`] signs a claim set with the certificate's private key,
//!    tagging the header with the key's [`KeyIdentifier`]
//! 5. The registry (or `/validate`) runs [`TokenVerifier`] with the public key
//!
//! ## Security
//!
//! - Issuance and verification are synchronous and stateless
//! - Verification never contacts the issuer
//! - `nbf` is backdated 10 seconds to absorb clock skew

pub mod authorize;
pub mod claims;
pub mod issuer;
pub mod keys;
pub mod kid;
pub mod scope;
pub mod verifier;

pub use authorize::{Authorizer, PassthroughAuthorizer};
pub use claims::{ClaimSet, IssuedToken, ResourceAccess};
pub use issuer::{TokenIssuanceError, TokenIssuer};
pub use keys::{normalize, FileKeySource, KeyMaterialError, KeySource, SigningMaterial};
pub use kid::{derive_kid, KeyIdentifier};
pub use scope::{parse_scope, AuthorizationRequest};
pub use verifier::{InvalidToken, TokenVerifier};
