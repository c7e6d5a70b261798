// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! HTTP basic authentication for the token endpoints.
//!
//! ## Auth Flow
//!
//! 1. Registry client calls `/get-token` with `Authorization: Basic ...`
//! 2. [`Authenticated`] decodes the header and asks the configured
//!    [`CredentialVerifier`] whether the pair is valid
//! 3. On `/auth` and `/validate` the password field is a bearer token and is
//!    passed through [`BasicAuth`] without a credential check
//!
//! ## Security
//!
//! - Failures answer 401 with `WWW-Authenticate: Basic`
//! - Passwords and tokens are never logged

pub mod credentials;
pub mod error;
pub mod extractor;

pub use credentials::{CredentialVerifier, StaticCredentials};
pub use error::AuthError;
pub use extractor::{Authenticated, BasicAuth, BasicCredentials};
